//! Bootstrap seeding: schema plus the default administrator account
//!
//! Runs once at startup, after the readiness gate. Idempotent: migrations
//! use `CREATE TABLE IF NOT EXISTS` semantics and the admin row is only
//! inserted when no row with the configured email exists. A failure here is
//! logged and swallowed so the server still comes up; operators are expected
//! to notice the error and re-run.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use crate::auth::password::hash_password;
use crate::config::AdminConfig;
use crate::db::entities::user;
use crate::db::migrator::Migrator;
use crate::error::AppError;

/// Ensure the schema and the default administrator exist.
///
/// Errors are reported but never halt startup.
pub async fn run_bootstrap(db: &DatabaseConnection, admin: &AdminConfig) {
    if let Err(err) = ensure_schema_and_admin(db, admin).await {
        error!(error = %err, "bootstrap failed, continuing to serve");
    }
}

/// Schema first, then the existence check, then the insert - in that order.
async fn ensure_schema_and_admin(
    db: &DatabaseConnection,
    admin: &AdminConfig,
) -> Result<(), AppError> {
    Migrator::up(db, None).await?;
    info!("database migrations applied");

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&admin.email))
        .one(db)
        .await?;

    if existing.is_some() {
        info!(email = %admin.email, "default admin already exists");
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)?;
    let now = Utc::now();

    user::ActiveModel {
        name: Set(admin.name.clone()),
        email: Set(admin.email.clone()),
        password_hash: Set(password_hash),
        role: Set("admin".to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(email = %admin.email, "default admin created");
    Ok(())
}
