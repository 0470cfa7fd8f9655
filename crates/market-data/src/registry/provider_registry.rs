//! Startup-time mapping from vendor tag to provider module.

use std::sync::Arc;

use log::info;

use crate::auth::AuthRegistry;
use crate::config::ProviderConfig;
use crate::models::VendorId;
use crate::provider::dataset::OperationContext;
use crate::provider::tushare::TushareProvider;
use crate::provider::ProviderModule;

/// Resolves the statically linked provider module of a vendor.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Builds the module for `config.vendor`, wiring its operations to `auth`.
    pub fn module_for(config: &ProviderConfig, auth: Arc<AuthRegistry>) -> Box<dyn ProviderModule> {
        let ctx = Arc::new(OperationContext::new(config, auth));
        let module: Box<dyn ProviderModule> = match config.vendor {
            VendorId::Tushare => Box::new(TushareProvider::new(ctx)),
        };
        info!(
            "Loaded provider module '{}' with {} operations",
            module.vendor(),
            module.operations().len()
        );
        module
    }
}
