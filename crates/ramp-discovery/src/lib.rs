//! [`Discovery`] implementations backed by a generative
//! content endpoint.
//!
//! [`GenerativeDiscovery`] asks the remote model for points near a location
//! and validates every returned item before handing it to the repository.
//! [`ConfiguredDiscovery`] picks between it and [`DisabledDiscovery`]
//! depending on whether an API key was configured.

pub mod client;
pub mod config;
pub mod payload;

pub use client::{ConfiguredDiscovery, DisabledDiscovery, GenerativeDiscovery};
pub use config::DiscoveryConfig;

pub use ramp_core::discovery::{Discovery, DiscoveryError};

#[cfg(test)]
mod tests;
