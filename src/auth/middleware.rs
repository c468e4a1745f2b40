//! Session guard middleware for Axum
//!
//! Gates the user-management routes: a request passes only if its session
//! cookie resolves to a live identity in the [`SessionStore`]; anything else
//! is redirected to the login page. On success the resolved [`SessionUser`]
//! is inserted as a request extension for handlers to consume.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::session::{SessionStore, SessionUser, SharedSessionStore, SESSION_COOKIE};

/// Extract the session token from a Cookie header value
fn extract_token(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// Resolve the request's session cookie to an identity, if any
pub fn resolve_session(sessions: &SessionStore, headers: &HeaderMap) -> Option<SessionUser> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    let token = extract_token(cookie_header)?;
    sessions.resolve(token)
}

/// Session guard - requires a valid session, redirects to /login otherwise
pub async fn require_session(
    State(sessions): State<SharedSessionStore>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match resolve_session(&sessions, request.headers()) {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => Redirect::to("/login").into_response(),
    }
}
