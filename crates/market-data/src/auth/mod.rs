//! Authentication strategy registry.
//!
//! Each vendor supplies one [`Authenticator`] whose `login` yields a fresh
//! [`VendorSession`]. The [`AuthRegistry`] maps lower-cased vendor names to those
//! strategies and never falls back to a default: an unknown name is an
//! [`MarketDataError::UnsupportedVendor`] error. Login failures propagate as
//! [`MarketDataError::Authentication`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};

use crate::config::ProviderConfig;
use crate::errors::MarketDataError;
use crate::models::VendorId;
use crate::provider::tushare::TushareAuthenticator;
use crate::provider::VendorSession;

/// Login procedure for one vendor.
#[async_trait]
pub trait Authenticator: Send + Sync {
    fn vendor(&self) -> VendorId;

    /// Produce a new session owned by the caller.
    async fn login(&self) -> Result<Box<dyn VendorSession>, MarketDataError>;
}

/// Static mapping from vendor name to login strategy.
#[derive(Default, Clone)]
pub struct AuthRegistry {
    handlers: HashMap<String, Arc<dyn Authenticator>>,
}

impl AuthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in strategies, configured from `config`.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut registry = Self::new();
        registry.register(
            VendorId::Tushare.as_str(),
            Arc::new(TushareAuthenticator::new(config)),
        );
        registry
    }

    /// Registers `handler` under the lower-cased `name`, replacing any previous one.
    pub fn register(&mut self, name: &str, handler: Arc<dyn Authenticator>) {
        self.handlers.insert(name.trim().to_lowercase(), handler);
    }

    pub fn vendors(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Looks up the strategy for `name` (case-insensitive).
    pub fn handler(&self, name: &str) -> Result<Arc<dyn Authenticator>, MarketDataError> {
        let key = name.trim().to_lowercase();
        self.handlers.get(&key).cloned().ok_or_else(|| {
            error!("Unsupported login vendor: {}", key);
            MarketDataError::UnsupportedVendor(key)
        })
    }

    /// Resolves `name` and logs in.
    pub async fn login(&self, name: &str) -> Result<Box<dyn VendorSession>, MarketDataError> {
        let handler = self.handler(name)?;
        debug!("Logging in to vendor '{}'", handler.vendor());
        match handler.login().await {
            Ok(session) => {
                info!("Logged in to vendor '{}'", handler.vendor());
                Ok(session)
            }
            Err(e) => {
                error!("Login to vendor '{}' failed: {}", handler.vendor(), e);
                Err(e)
            }
        }
    }

    /// Logs in to the vendor selected in `config`.
    pub async fn login_configured(
        &self,
        config: &ProviderConfig,
    ) -> Result<Box<dyn VendorSession>, MarketDataError> {
        self.login(config.vendor.as_str()).await
    }
}
