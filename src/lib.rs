pub mod config;
pub mod error;
pub mod http_client;
pub mod lending;
pub mod models;
pub mod services;
pub mod session;

pub use config::Config;
pub use error::{AppError, AppResult};
