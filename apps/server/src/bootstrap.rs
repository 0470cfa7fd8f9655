//! Startup sequence: configured, then wired, then serving.
//!
//! [`Bootstrap`] holds a validated [`Config`]. [`Bootstrap::wire`] selects the
//! provider module, registers its operations as tools and yields a
//! [`WiredServer`]. [`WiredServer::serve`] consumes it and runs the configured
//! transport until it shuts down. There is no way back to an earlier state.

use std::sync::Arc;

use findata_market_data::{AuthRegistry, ProviderRegistry};
use findata_tools::{McpHandler, ToolError, ToolRegistry};
use tracing::info;

use crate::config::{Config, Transport};
use crate::transport::{sse, stdio};

pub const SERVER_NAME: &str = "finData";

pub struct Bootstrap {
    config: Config,
}

impl Bootstrap {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn wire(self) -> Result<WiredServer, ToolError> {
        let config = self.config;
        let auth = Arc::new(AuthRegistry::from_config(&config.provider));
        let module = ProviderRegistry::module_for(&config.provider, auth);

        let mut registry = ToolRegistry::new(config.tool_timeout);
        let count = registry.register_module(module.as_ref())?;
        info!(
            "Wired {} tools for vendor '{}' (transport {:?})",
            count, config.provider.vendor, config.transport
        );

        Ok(WiredServer {
            handler: McpHandler::new(Arc::new(registry), SERVER_NAME),
            config,
        })
    }
}

pub struct WiredServer {
    config: Config,
    handler: McpHandler,
}

impl WiredServer {
    pub fn handler(&self) -> McpHandler {
        self.handler.clone()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.handler
            .registry()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Runs the transport; returns only when it stops.
    pub async fn serve(self) -> anyhow::Result<()> {
        match self.config.transport {
            Transport::Stdio => stdio::serve_stdio(self.handler).await,
            Transport::Sse => {
                sse::serve_sse(self.handler, &self.config.sse_host, self.config.sse_port).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;

    #[test]
    fn test_wire_registers_vendor_operations() {
        let server = Bootstrap::new(test_config()).wire().unwrap();
        let names = server.tool_names();

        assert_eq!(names.len(), 15);
        for expected in [
            "daily",
            "trade_cal",
            "stock_basic",
            "stock_company",
            "bak_basic",
            "income",
            "balancesheet",
            "cashflow",
            "shibor_lpr",
            "cn_gdp",
            "cn_cpi",
            "cn_ppi",
            "cn_m",
            "sf_month",
            "cn_pmi",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
    }
}
