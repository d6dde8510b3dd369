//! Network layer: wire types and the backend HTTP client.

pub mod api;
pub mod types;

#[cfg(test)]
pub mod mock_backend;
