//! In-memory vendor used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::{AuthRegistry, Authenticator};
use crate::config::ProviderConfig;
use crate::dates::LengthGate;
use crate::errors::MarketDataError;
use crate::models::{QueryRequest, Table, VendorId};
use crate::provider::dataset::OperationContext;
use crate::provider::VendorSession;

/// Records every request and answers from canned tables keyed by endpoint.
#[derive(Default)]
pub struct MockVendor {
    tables: HashMap<String, Table>,
    requests: Mutex<Vec<QueryRequest>>,
    logins: AtomicUsize,
    reject_logins: bool,
}

impl MockVendor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, api_name: &str, table: Table) -> Self {
        self.tables.insert(api_name.to_string(), table);
        self
    }

    /// Every login attempt fails with [`MarketDataError::Authentication`].
    pub fn rejecting_logins(mut self) -> Self {
        self.reject_logins = true;
        self
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn api_calls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.api_name).collect()
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

struct MockSession(Arc<MockVendor>);

#[async_trait]
impl VendorSession for MockSession {
    fn vendor(&self) -> VendorId {
        VendorId::Tushare
    }

    async fn query(&self, request: QueryRequest) -> Result<Table, MarketDataError> {
        let table = self.0.tables.get(&request.api_name).cloned().unwrap_or_default();
        self.0.requests.lock().unwrap().push(request);
        Ok(table)
    }
}

pub struct MockAuthenticator(pub Arc<MockVendor>);

#[async_trait]
impl Authenticator for MockAuthenticator {
    fn vendor(&self) -> VendorId {
        VendorId::Tushare
    }

    async fn login(&self) -> Result<Box<dyn VendorSession>, MarketDataError> {
        self.0.logins.fetch_add(1, Ordering::SeqCst);
        if self.0.reject_logins {
            return Err(MarketDataError::Authentication {
                vendor: VendorId::Tushare.to_string(),
                message: "token rejected".to_string(),
            });
        }
        Ok(Box::new(MockSession(self.0.clone())))
    }
}

/// Operation context whose logins all resolve to `vendor`.
pub fn mock_context(vendor: Arc<MockVendor>, gate: LengthGate) -> Arc<OperationContext> {
    let config = ProviderConfig::new(VendorId::Tushare).with_date_gate(gate);
    let mut registry = AuthRegistry::new();
    registry.register("tushare", Arc::new(MockAuthenticator(vendor)));
    Arc::new(OperationContext::new(&config, Arc::new(registry)))
}
