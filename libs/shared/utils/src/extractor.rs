use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_database::AppState;
use shared_models::auth::{AuthCapabilities, User};
use shared_models::error::AppError;

use crate::jwt::validate_token;

fn bearer_token(request: &Request<Body>) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(&auth_value[7..])
}

/// Validates the bearer token once per request and attaches the user plus the
/// capability set derived from their role. Handlers read the capability
/// extension instead of the raw role string.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;

    let user = validate_token(token, &state.config.jwt_secret).map_err(AppError::Auth)?;
    let capabilities = AuthCapabilities::for_role(user.role.as_deref());

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(capabilities);

    Ok(next.run(request).await)
}

/// Same validation, then rejects any principal without the administer
/// capability. Gate in front of the /admin routes and admin-only endpoints.
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;

    let user = validate_token(token, &state.config.jwt_secret).map_err(AppError::Auth)?;
    let capabilities = AuthCapabilities::for_role(user.role.as_deref());

    if !capabilities.can_administer {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(capabilities);

    Ok(next.run(request).await)
}

/// Pull the user back out of the request extensions.
pub fn extract_user<B>(request: &Request<B>) -> Result<User, AppError> {
    request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))
}
