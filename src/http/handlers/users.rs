//! User management handlers
//!
//! All routes here sit behind the session guard; the resolved identity
//! arrives as a request extension. Form field names follow the wire
//! contract of the views (`nome`, `senha`, `confirmSenha`, `papel`,
//! `ativo`).

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Extension, Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::password::hash_password;
use crate::auth::session::SessionUser;
use crate::db::repository::{NewUser, UserChanges};
use crate::error::AppError;
use crate::http::router::AppState;
use crate::http::views;

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "senha")]
    pub password: Option<String>,
    #[serde(rename = "confirmSenha")]
    pub confirm_password: Option<String>,
    #[serde(rename = "papel")]
    pub role: Option<String>,
    // Checkbox: present ("on") when checked, absent otherwise
    #[serde(rename = "ativo")]
    pub active: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserForm {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "senha")]
    pub password: Option<String>,
    #[serde(rename = "papel")]
    pub role: Option<String>,
    #[serde(rename = "ativo")]
    pub active: Option<String>,
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<SessionUser>,
) -> Result<Html<String>, AppError> {
    let users = state.repo.list().await?;
    Ok(views::user_list(&current.name, &users))
}

/// GET /users/add
pub async fn add_user_page() -> Html<String> {
    views::user_add()
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> Result<Redirect, AppError> {
    let name = form.name.as_deref().filter(|v| !v.is_empty());
    let email = form.email.as_deref().filter(|v| !v.is_empty());
    let password = form.password.as_deref().filter(|v| !v.is_empty());
    let role = form.role.as_deref().filter(|v| !v.is_empty());

    let (Some(name), Some(email), Some(password), Some(role)) = (name, email, password, role)
    else {
        return Err(AppError::Validation("All fields are required.".to_string()));
    };

    if form.confirm_password.as_deref() != Some(password) {
        return Err(AppError::Validation("Passwords do not match.".to_string()));
    }

    let password_hash = hash_password(password)?;
    let created = state
        .repo
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: role.to_string(),
            is_active: form.active.is_some(),
        })
        .await?;
    info!(user_id = created.id, email = %created.email, "user created");

    Ok(Redirect::to("/users"))
}

/// GET /users/{id}/edit
pub async fn edit_user_page(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let user = state
        .repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    Ok(views::user_edit(&user))
}

/// POST /users/{id}/edit
///
/// A blank password field keeps the stored hash; a filled one is re-hashed.
/// Updating a missing id affects nothing and still redirects, like the
/// delete below.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<UpdateUserForm>,
) -> Result<Redirect, AppError> {
    let password_hash = match form.password.as_deref().filter(|v| !v.is_empty()) {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    state
        .repo
        .update(
            id,
            UserChanges {
                name: form.name.unwrap_or_default(),
                email: form.email.unwrap_or_default(),
                password_hash,
                role: form.role.unwrap_or_default(),
                is_active: form.active.is_some(),
            },
        )
        .await?;
    info!(user_id = id, "user updated");

    Ok(Redirect::to("/users"))
}

/// DELETE /users/{id}/delete
///
/// Not existence-checked: deleting an unknown id still acknowledges
/// success.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    state.repo.delete(id).await?;
    info!(user_id = id, "user deleted");

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
