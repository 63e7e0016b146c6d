// homepilot-api: Async Rust client for the Rademacher Homepilot hub REST API

pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use client::HubClient;
pub use error::Error;
pub use models::{DeviceDescriptor, DeviceDetail, MoveCommand, StatusesMap};
pub use transport::TransportConfig;
