use axum::{
    headers::{Cookie, HeaderMapExt},
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::{app_state::AppState, error::AppError, services::jwt_service::validate_token};

/// Name of the cookie carrying the login token
pub const TOKEN_COOKIE: &str = "chat_token";

/// Username of the logged-in caller, inserted by `auth_middleware`
#[derive(Clone, Debug)]
pub struct ChatUser(pub String);

/// Token from the `chat_token` cookie, or else from `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(TOKEN_COOKIE).map(str::to_string))
    {
        return Some(token);
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Username carried by a valid token in `headers`, if any
pub fn current_user(headers: &HeaderMap, secret: &str) -> Option<String> {
    extract_token(headers).and_then(|token| validate_token(&token, secret))
}

// Lets logged-in callers through; everyone else is sent to the login view.
pub async fn auth_middleware<B>(mut req: Request<B>, next: Next<B>) -> Response {
    let Some(state) = req.extensions().get::<AppState>().cloned() else {
        return AppError::Internal("AppState extension missing".to_string()).into_response();
    };

    match current_user(req.headers(), &state.settings.jwt_secret) {
        Some(username) => {
            debug!("Authenticated request from {}", username);
            req.extensions_mut().insert(ChatUser(username));
            next.run(req).await
        }
        None => {
            debug!("No valid login token for {}, redirecting to login", req.uri().path());
            Redirect::to("/").into_response()
        }
    }
}
