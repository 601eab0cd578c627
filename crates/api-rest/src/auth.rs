//! Bearer token authentication for protected routes.

use crate::error::ApiError;
use crate::AppState;
use api_shared::auth::bearer_token;
use api_shared::Claims;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Claims of the staff member who made the request, taken from a verified bearer token.
///
/// Adding this extractor to a handler makes the route reject requests without a valid token.
#[derive(Clone, Debug)]
pub struct AuthenticatedStaff(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedStaff {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?
            .to_str()
            .map_err(|_| ApiError::unauthorized("invalid Authorization header"))?;

        let token = bearer_token(header)
            .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer scheme"))?;

        let claims = state.tokens.verify(token)?;
        Ok(Self(claims))
    }
}
