//! Provider registry module.
//!
//! Maps a configured [`VendorId`](crate::models::VendorId) to the provider
//! module implementing its operations.

mod provider_registry;

pub use provider_registry::ProviderRegistry;
