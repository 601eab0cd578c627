use crate::error::{ApiError, ApiResult};
use crate::AppState;
use agnos_types::NonEmptyText;
use api_shared::dto::{CreateStaffReq, CreateStaffRes, ErrorRes, LoginQuery, LoginReq, LoginRes};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Json,
};

#[utoipa::path(
    post,
    path = "/staff/create",
    request_body = CreateStaffReq,
    responses(
        (status = 201, description = "Staff created", body = CreateStaffRes),
        (status = 400, description = "Missing or invalid fields", body = ErrorRes),
        (status = 409, description = "Username already taken at this hospital", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Register a staff account
///
/// The username must be unique within the hospital; the same username may exist at other
/// hospitals.
#[axum::debug_handler]
pub async fn create_staff(
    State(state): State<AppState>,
    payload: Result<Json<CreateStaffReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateStaffRes>)> {
    let Json(req) = payload?;
    let registration = req.validate()?;

    let staff = state
        .staff_service
        .create_staff(
            registration.username.as_str(),
            registration.password.as_str(),
            registration.hospital.as_str(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateStaffRes {
            message: "Staff created successfully".into(),
            staff_id: staff.id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/staff/login",
    params(LoginQuery),
    request_body = LoginReq,
    responses(
        (status = 200, description = "Session token issued", body = LoginRes),
        (status = 400, description = "Missing hospital, username or password", body = ErrorRes),
        (status = 401, description = "Invalid credentials", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Log in and receive a bearer token
///
/// Unknown usernames and wrong passwords are reported identically.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    query: Result<Query<LoginQuery>, QueryRejection>,
    payload: Result<Json<LoginReq>, JsonRejection>,
) -> ApiResult<Json<LoginRes>> {
    let Query(query) = query?;
    let hospital = query
        .hospital
        .and_then(|h| NonEmptyText::new("hospital", h).ok())
        .ok_or_else(|| ApiError::bad_request("hospital parameter is required"))?;

    let Json(req) = payload?;
    let username = NonEmptyText::new("username", req.username)?;
    let password = NonEmptyText::new_untrimmed("password", req.password)?;

    let staff = state
        .staff_service
        .login(username.as_str(), password.as_str(), hospital.as_str())
        .await?;
    let access_token = state.tokens.issue(&staff)?;

    tracing::info!(staff_id = %staff.id, hospital = %staff.hospital, "staff logged in");
    Ok(Json(LoginRes { access_token }))
}
