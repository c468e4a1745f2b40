//! Application router
//!
//! Two route groups: the public pages (home, login, health) and the
//! user-management subtree, which sits behind the session guard. The guard
//! only needs the session store, so that is all the middleware layer gets.

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::require_session;
use crate::auth::session::SharedSessionStore;
use crate::db::repository::UserRepository;

use super::handlers::{auth, health, home, users};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub repo: UserRepository,
    pub sessions: SharedSessionStore,
    pub db: DatabaseConnection,
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    // User management - every route gated on a live session
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/add", get(users::add_user_page))
        .route(
            "/{id}/edit",
            get(users::edit_user_page).post(users::update_user),
        )
        .route("/{id}/delete", delete(users::delete_user))
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            require_session,
        ))
        .with_state(state.clone());

    // Public routes; the home page does its own session check inline
    let public_routes = Router::new()
        .route("/", get(home::home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/health", get(health::health_check))
        .with_state(state);

    Router::new()
        .nest("/users", user_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
}
