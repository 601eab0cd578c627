//! Session tokens for authenticated staff.
//!
//! Tokens are HS256 JWTs: `base64url(header).base64url(claims).base64url(signature)`, no padding.
//! They are stateless; everything needed to authorise a request travels in the claims.

use agnos_core::Staff;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// How long an issued token stays valid, in seconds.
pub const TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

const ALGORITHM: &str = "HS256";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token secret must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,
    #[error("malformed token")]
    Malformed,
    #[error("unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("failed to encode token: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Claims carried by a session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub staff_id: Uuid,
    pub username: String,
    /// Hospital of the authenticated staff member; selects the remote API on search fallback.
    pub hospital: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret);
        }
        Ok(Self { secret })
    }

    pub fn issue(&self, staff: &Staff) -> Result<String, AuthError> {
        self.issue_at(staff, Utc::now())
    }

    /// Issues a token for `staff` as if the current time were `now`.
    pub fn issue_at(&self, staff: &Staff, now: DateTime<Utc>) -> Result<String, AuthError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let claims = Claims {
            staff_id: staff.id,
            username: staff.username.clone(),
            hospital: staff.hospital.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
        };

        let message = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        );
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&message)?.finalize().into_bytes());
        Ok(format!("{}.{}", message, signature))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies `token` as if the current time were `now`.
    ///
    /// The signature is checked in constant time before the claims are trusted.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [header_b64, claims_b64, signature_b64] = parts[..] else {
            return Err(AuthError::Malformed);
        };

        let header: Header = decode_segment(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::Malformed)?;
        self.mac(&format!("{}.{}", header_b64, claims_b64))?
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let claims: Claims = decode_segment(claims_b64)?;
        if now.timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }

    fn mac(&self, message: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret).map_err(|_| AuthError::WeakSecret)?;
        mac.update(message.as_bytes());
        Ok(mac)
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
