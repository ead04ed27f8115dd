// iiec-api: Async Rust client for the IIEC content backend

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod orders;
pub mod resources;
pub mod sections;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
