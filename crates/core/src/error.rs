#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("staff with this username already exists in this hospital")]
    AlreadyExists,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unsupported hospital: {0}")]
    UnsupportedHospital(String),
    #[error("hospital API unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("hospital API returned status: {status}")]
    RemoteError { status: u16 },
    #[error("malformed hospital API response: {0}")]
    MalformedResponse(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("failed to hash password: {0}")]
    PasswordHash(bcrypt::BcryptError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<sqlx::Error> for RegistryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RegistryError::Conflict(db_err.message().to_string())
            }
            other => RegistryError::Database(other),
        }
    }
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
