//! Tool registry.
//!
//! Holds one [`ToolDescriptor`] per operation of the selected provider module.
//! The registry is filled once at startup and only read afterwards, so it is
//! shared behind an `Arc` without locking.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use findata_market_data::{DataOperation, ProviderModule, Table};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn, Instrument};

use crate::error::ToolError;

/// Default upper bound for a single tool call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// A registered tool: name, signature and handler.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: Arc<dyn DataOperation>,
}

impl ToolDescriptor {
    /// Describes `operation` unmodified: same name, same schema.
    pub fn from_operation(operation: Arc<dyn DataOperation>) -> Self {
        Self {
            name: operation.name().to_string(),
            description: operation.description().to_string(),
            input_schema: operation.input_schema(),
            handler: operation,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

/// Wire form of a tool listed to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
    call_timeout: Duration,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_TIMEOUT)
    }
}

impl ToolRegistry {
    pub fn new(call_timeout: Duration) -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            call_timeout,
        }
    }

    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), ToolError> {
        if self.index.contains_key(&descriptor.name) {
            return Err(ToolError::Duplicate(descriptor.name));
        }
        debug!("Registering tool '{}'", descriptor.name);
        self.index.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Registers every operation declared by `module`; returns how many were added.
    pub fn register_module(&mut self, module: &dyn ProviderModule) -> Result<usize, ToolError> {
        let operations = module.operations();
        let count = operations.len();
        for operation in operations {
            self.register(ToolDescriptor::from_operation(operation))?;
        }
        info!(
            "Registered {} tools from provider module '{}'",
            count,
            module.vendor()
        );
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDescriptor::definition).collect()
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Invokes a tool, bounded by the registry's call timeout.
    pub async fn call(&self, name: &str, args: Value) -> Result<Table, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let args = match args {
            Value::Null => Value::Object(Default::default()),
            Value::Object(_) => args,
            other => {
                return Err(ToolError::InvalidArguments(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };

        let span = tracing::info_span!("tool_call", tool = %tool.name);
        let result = tokio::time::timeout(self.call_timeout, tool.handler.call(args))
            .instrument(span)
            .await;

        match result {
            Ok(Ok(table)) => {
                debug!("Tool '{}' returned {} rows", name, table.len());
                Ok(table)
            }
            Ok(Err(e)) => {
                warn!("Tool '{}' failed: {}", name, e);
                Err(ToolError::Failed(e))
            }
            Err(_) => {
                warn!("Tool '{}' timed out", name);
                Err(ToolError::Timeout {
                    name: name.to_string(),
                    seconds: self.call_timeout.as_secs(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{quote_table, StubModule, StubOperation};
    use findata_market_data::MarketDataError;
    use serde_json::json;

    #[test]
    fn test_registers_exactly_module_operations() {
        let mut registry = ToolRegistry::default();
        let added = registry
            .register_module(&StubModule::named(&["daily", "income", "cn_gdp"]))
            .unwrap();

        assert_eq!(added, 3);
        assert_eq!(registry.names(), vec!["daily", "income", "cn_gdp"]);
        assert!(registry.get("bak_basic").is_none());
    }

    #[test]
    fn test_different_modules_yield_different_tool_sets() {
        let mut first = ToolRegistry::default();
        first
            .register_module(&StubModule::named(&["daily", "income"]))
            .unwrap();
        let mut second = ToolRegistry::default();
        second
            .register_module(&StubModule::named(&["cn_cpi"]))
            .unwrap();

        assert_eq!(first.names(), vec!["daily", "income"]);
        assert_eq!(second.names(), vec!["cn_cpi"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = ToolRegistry::default();
        let result = registry.register_module(&StubModule::named(&["daily", "daily"]));
        assert!(matches!(result, Err(ToolError::Duplicate(ref n)) if n == "daily"));
    }

    #[test]
    fn test_definition_uses_camel_case_schema_key() {
        let mut registry = ToolRegistry::default();
        registry
            .register_module(&StubModule::named(&["daily"]))
            .unwrap();

        let listed = serde_json::to_value(registry.list()).unwrap();
        assert_eq!(listed[0]["name"], "daily");
        assert_eq!(listed[0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_call_returns_table() {
        let mut registry = ToolRegistry::default();
        registry
            .register(ToolDescriptor::from_operation(StubOperation::rows(
                "daily",
                quote_table(),
            )))
            .unwrap();

        let table = registry.call("daily", json!({})).await.unwrap();
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let registry = ToolRegistry::default();
        let err = registry.call("nope", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
        assert_eq!(err.code(), "TOOL_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_call_failure_keeps_operation_context() {
        let mut registry = ToolRegistry::default();
        registry
            .register(ToolDescriptor::from_operation(StubOperation::failing(
                "income",
                "Failed to fetch income statements",
            )))
            .unwrap();

        let err = registry.call("income", json!({})).await.unwrap_err();
        assert!(matches!(
            err,
            ToolError::Failed(MarketDataError::Operation { .. })
        ));
        assert!(err
            .to_string()
            .starts_with("Failed to fetch income statements: "));
    }

    #[tokio::test]
    async fn test_call_rejects_non_object_arguments() {
        let mut registry = ToolRegistry::default();
        registry
            .register_module(&StubModule::named(&["daily"]))
            .unwrap();

        let err = registry.call("daily", json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(registry.call("daily", Value::Null).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_times_out() {
        let mut registry = ToolRegistry::new(Duration::from_secs(5));
        registry
            .register(ToolDescriptor::from_operation(StubOperation::sleeping(
                "slow",
                Duration::from_secs(30),
            )))
            .unwrap();

        let err = registry.call("slow", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Timeout { seconds: 5, .. }));
    }
}
