use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::infrastructure::config::Config;
use crate::{domain::auth::JwtManager, domain::session::Session, error::AppError};

/// Session middleware
///
/// Requests without an Authorization header continue as anonymous viewers.
/// A header that is present must carry a valid bearer token.
pub async fn session_middleware(
    State(config): State<Arc<Config>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = match request
        .headers()
        .get("authorization")
        .map(|v| v.to_str())
    {
        None => Session::anonymous(),
        Some(Err(_)) => {
            return Err(AppError::Unauthorized(
                "Invalid authorization header".to_string(),
            ))
        }
        Some(Ok(auth_header)) => {
            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                AppError::Unauthorized("Invalid authorization format".to_string())
            })?;

            let jwt_manager = JwtManager::new(config.jwt_secret.clone());
            Session::authenticated(jwt_manager.extract_user_id(token)?)
        }
    };

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
