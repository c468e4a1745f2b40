//! Home page handler
//!
//! Not behind the session guard: performs its own inline check and
//! redirects anonymous visitors to the login page.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::middleware::resolve_session;
use crate::http::router::AppState;
use crate::http::views;

pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match resolve_session(&state.sessions, &headers) {
        Some(user) => views::home(&user.name).into_response(),
        None => Redirect::to("/login").into_response(),
    }
}
