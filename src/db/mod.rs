//! Database layer: entity, migrations, repository and startup sequence

pub mod bootstrap;
pub mod entities;
pub mod migrator;
pub mod readiness;
pub mod repository;

pub use readiness::{wait_for_database, RetryPolicy};
pub use repository::UserRepository;
