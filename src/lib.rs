//! # User Admin
//!
//! Minimal user-management web application: session-based login and a CRUD
//! interface over a single `users` table, server-rendered.
//!
//! ## Architecture
//!
//! - **config**: TOML configuration with environment overrides
//! - **auth**: password hashing, the in-memory session store and the
//!   session guard middleware
//! - **db**: SeaORM entity, migrations, repository, startup readiness gate
//!   and bootstrap seeding
//! - **http**: router, handlers and the HTML view layer

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;

pub use config::AppConfig;
pub use error::AppError;

// Re-export the pieces main() wires together
pub use auth::session::{SessionStore, SessionUser, SharedSessionStore};
pub use db::bootstrap::run_bootstrap;
pub use db::readiness::{wait_for_database, RetryPolicy};
pub use db::repository::UserRepository;
pub use http::router::{create_router, AppState};
