//! User management web application.
//!
//! Startup order matters: configuration, then the database readiness gate,
//! then bootstrap seeding, and only then does the HTTP listener come up.
//! Reads configuration from a TOML file (~/.config/user-admin/config.toml).

use tracing::{error, info};

use user_admin::config::{default_config_path, AppConfig};
use user_admin::db::repository::UserRepository;
use user_admin::{create_router, run_bootstrap, wait_for_database, AppState, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("USER_ADMIN_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting user-admin...");

    // ── Readiness gate: block until the database answers ───────
    let db = wait_for_database(
        &cfg.database.connection_url(),
        &cfg.database.retry_policy(),
    )
    .await?;

    // ── Bootstrap: schema + default admin, errors logged only ──
    run_bootstrap(&db, &cfg.admin).await;

    // ── Wire up state and routes ───────────────────────────────
    let state = AppState {
        repo: UserRepository::new(db.clone()),
        sessions: SessionStore::shared(),
        db,
    };
    let app = create_router(state);

    let addr = cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
