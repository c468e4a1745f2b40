//! Login handlers

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::password::verify_password;
use crate::auth::session::{SessionUser, SESSION_COOKIE};
use crate::error::AppError;
use crate::http::router::AppState;
use crate::http::views;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    #[serde(rename = "senha")]
    pub password: Option<String>,
}

pub async fn login_page() -> Html<String> {
    views::login()
}

/// POST /login - authenticate and establish a session.
///
/// The account's active flag is not consulted here; a deactivated user can
/// still sign in. Matches the long-standing behavior this service replaces.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = form.email.as_deref().filter(|v| !v.is_empty());
    let password = form.password.as_deref().filter(|v| !v.is_empty());

    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::Validation(
            "Email and password are required.".to_string(),
        ));
    };

    let user = state
        .repo
        .find_by_email(email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.sessions.create(SessionUser {
        user_id: user.id,
        name: user.name.clone(),
    });
    info!(email = %user.email, "login succeeded");

    let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, token);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}
