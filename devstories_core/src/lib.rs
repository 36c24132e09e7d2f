pub mod api;
pub mod config;
pub mod error;
pub mod location;
pub mod models;
pub mod notify;
pub mod session;
pub mod sync;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
