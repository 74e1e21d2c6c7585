//! Clients - HTTP Clients for External APIs
//!
//! This module contains the HTTP client for the remote vehicle service.

pub mod car_client;

// Re-export main types for convenience
pub use car_client::{CarService, HttpCarClient};
