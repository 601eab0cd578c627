use crate::auth::AuthenticatedStaff;
use crate::error::ApiResult;
use crate::AppState;
use api_shared::dto::{ErrorRes, PatientSearchReq, PatientSearchRes};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

#[utoipa::path(
    post,
    path = "/patient/search",
    request_body = PatientSearchReq,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Matching patients", body = PatientSearchRes),
        (status = 400, description = "Invalid filter", body = ErrorRes),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Search patients
///
/// Searches local records first. When nothing matches and a national id or passport id was
/// given, the API of the caller's own hospital is consulted and any hit is stored locally.
#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<AppState>,
    AuthenticatedStaff(claims): AuthenticatedStaff,
    payload: Result<Json<PatientSearchReq>, JsonRejection>,
) -> ApiResult<Json<PatientSearchRes>> {
    let Json(req) = payload?;
    let filter = req.to_filter()?;

    let patients = state
        .patient_service
        .search_patients(&filter, &claims.hospital)
        .await?;

    tracing::debug!(
        staff_id = %claims.staff_id,
        count = patients.len(),
        "patient search completed"
    );
    Ok(Json(PatientSearchRes::from(patients)))
}
