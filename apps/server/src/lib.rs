//! finData server library: configuration, logging, bootstrap and transports.
//!
//! The `findata` binary is a thin wrapper around [`Bootstrap`]; integration
//! tests drive the same pieces directly.

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::{Bootstrap, WiredServer, SERVER_NAME};
pub use config::{Cli, Config, LogSettings, Transport};
pub use logging::init_tracing;
