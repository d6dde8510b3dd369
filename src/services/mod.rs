//! Services — session lifecycle logic on top of the network and storage layers.

pub mod auth;
