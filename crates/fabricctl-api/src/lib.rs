// fabricctl-api: Async Rust client for the NDFC LAN-fabric REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

mod fabric;
mod interface;
mod network;
mod policy;
mod switch;
mod vpc;
mod vrf;

pub use auth::Credentials;
pub use client::NdfcClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
