// domotica-api: async client for a home-automation HTTP API

pub mod client;
pub mod device;
mod endpoints;
pub mod error;
pub mod transport;

pub use client::HomeClient;
pub use device::{DeviceAction, DeviceKind, SensorKind};
pub use error::Error;
pub use reqwest::Method;
pub use transport::TransportConfig;
