//! Stub operations and modules used by the tool layer tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use findata_market_data::{DataOperation, MarketDataError, ProviderModule, Table, VendorId};
use serde_json::{json, Value};

pub enum Behavior {
    Rows(Table),
    Fail(&'static str),
    Sleep(Duration),
}

pub struct StubOperation {
    name: &'static str,
    behavior: Behavior,
}

impl StubOperation {
    pub fn rows(name: &'static str, table: Table) -> Arc<dyn DataOperation> {
        Arc::new(Self {
            name,
            behavior: Behavior::Rows(table),
        })
    }

    pub fn failing(name: &'static str, context: &'static str) -> Arc<dyn DataOperation> {
        Arc::new(Self {
            name,
            behavior: Behavior::Fail(context),
        })
    }

    pub fn sleeping(name: &'static str, delay: Duration) -> Arc<dyn DataOperation> {
        Arc::new(Self {
            name,
            behavior: Behavior::Sleep(delay),
        })
    }
}

#[async_trait]
impl DataOperation for StubOperation {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "stub operation"
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn call(&self, _args: Value) -> Result<Table, MarketDataError> {
        match &self.behavior {
            Behavior::Rows(table) => Ok(table.clone()),
            Behavior::Fail(context) => Err(MarketDataError::Authentication {
                vendor: "tushare".to_string(),
                message: "missing API token".to_string(),
            }
            .in_operation(context)),
            Behavior::Sleep(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Table::default())
            }
        }
    }
}

pub struct StubModule(pub Vec<Arc<dyn DataOperation>>);

impl StubModule {
    pub fn named(names: &[&'static str]) -> Self {
        Self(
            names
                .iter()
                .map(|&name| StubOperation::rows(name, Table::default()))
                .collect(),
        )
    }
}

impl ProviderModule for StubModule {
    fn vendor(&self) -> VendorId {
        VendorId::Tushare
    }

    fn operations(&self) -> Vec<Arc<dyn DataOperation>> {
        self.0.clone()
    }
}

pub fn quote_table() -> Table {
    Table::new(
        vec!["ts_code".to_string(), "close".to_string()],
        vec![vec![json!("000001.SZ"), json!(10.5)]],
    )
}
