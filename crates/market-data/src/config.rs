//! Provider configuration, built once at startup and shared read-only.

use std::time::Duration;

use crate::dates::{DateNormalizer, LengthGate};
use crate::models::VendorId;

/// Default Tushare Pro endpoint.
pub const DEFAULT_API_URL: &str = "http://api.tushare.pro";

/// Default timeout for a single vendor HTTP request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub vendor: VendorId,
    /// Vendor credential, consumed only by the login strategy.
    pub api_token: Option<String>,
    pub api_url: String,
    pub http_timeout: Duration,
    pub date_gate: LengthGate,
}

impl ProviderConfig {
    pub fn new(vendor: VendorId) -> Self {
        Self {
            vendor,
            api_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            date_gate: LengthGate::default(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_date_gate(mut self, gate: LengthGate) -> Self {
        self.date_gate = gate;
        self
    }

    pub fn date_normalizer(&self) -> DateNormalizer {
        DateNormalizer::new(self.date_gate)
    }
}
