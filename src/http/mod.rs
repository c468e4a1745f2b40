//! HTTP layer: router, handlers and views

pub mod handlers;
pub mod router;
pub mod views;

pub use router::{create_router, AppState};
