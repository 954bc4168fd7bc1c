//! Review sentiment HTTP API

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::create_router;
pub use config::ServerConfig;
pub use state::AppState;
