use crate::AppState;
use crate::api::error::AppError;
use crate::utils::auth::resolve_principal;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Resolve the bearer credential and expose the caller as a `Principal` extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = resolve_principal(req.headers(), &state.config.jwt_secret)?;
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
