// File: ./src/client/mod.rs
// HTTP plumbing for the list service
pub mod cert;
pub mod core;
pub mod error;

pub use self::core::ApiClient;
pub use self::error::ApiError;
