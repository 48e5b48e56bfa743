// solidcom-api: Async Rust client for the Solidcom base station HTTP API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod pack;
pub mod roles;
pub mod transport;

pub use client::{DeviceClient, Session, device_url};
pub use error::Error;
pub use models::{BaseStation, Headset, PackInfo, Role, RoleRef};
pub use transport::TransportConfig;
