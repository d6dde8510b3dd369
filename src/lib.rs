//! # lunch
//!
//! Session client for the lets-get-lunch backend.
//!
//! The crate signs users up and in over HTTP, keeps the bearer token in a
//! pluggable key-value store, decodes the token's claims into the current
//! user, and broadcasts login/logout transitions. A static route table maps
//! application paths to lazily constructed feature units.

pub mod config;
pub mod net;
pub mod routes;
pub mod services;
pub mod storage;
pub mod token;

pub use config::ClientConfig;
pub use net::api::{AuthApi, HttpAuthApi};
pub use net::types::{ApiErrorBody, CreatedUser, Credentials, LoginResponse};
pub use routes::{Feature, RouteTable};
pub use services::auth::{AuthError, AuthService};
pub use storage::{AUTHORIZATION_KEY, FileStorage, MemoryStorage, StorageError, TokenStorage};
pub use token::{DecodedUser, TokenError, decode_token};
