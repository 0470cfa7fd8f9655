//! Vendor-facing trait definitions.
//!
//! - [`VendorSession`]: an authenticated handle able to run one query.
//! - [`DataOperation`]: one dataset accessor exposed as a tool.
//! - [`ProviderModule`]: the explicit operation table of a vendor.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{QueryRequest, Table, VendorId};

/// Authenticated handle to a vendor.
///
/// Sessions are created by a login strategy for a single operation call and
/// dropped when the call ends. They are never pooled or shared between calls.
#[async_trait]
pub trait VendorSession: Send + Sync {
    /// Vendor this session is logged in to.
    fn vendor(&self) -> VendorId;

    /// Run one query and return the vendor's table unchanged.
    async fn query(&self, request: QueryRequest) -> Result<Table, MarketDataError>;
}

/// A dataset accessor exposed to callers under [`name`](Self::name).
///
/// # Example
///
/// ```ignore
/// struct Ping;
///
/// #[async_trait]
/// impl DataOperation for Ping {
///     fn name(&self) -> &'static str { "ping" }
///     fn description(&self) -> &'static str { "Returns an empty table" }
///     fn input_schema(&self) -> Value { json!({ "type": "object", "properties": {} }) }
///     async fn call(&self, _args: Value) -> Result<Table, MarketDataError> {
///         Ok(Table::default())
///     }
/// }
/// ```
#[async_trait]
pub trait DataOperation: Send + Sync {
    /// Tool name, unique within a provider module.
    fn name(&self) -> &'static str;

    /// Human-readable summary shown to callers.
    fn description(&self) -> &'static str;

    /// JSON Schema (`type: object`) of the accepted named arguments.
    fn input_schema(&self) -> Value;

    /// Normalize arguments, log in, query the vendor and return the table.
    ///
    /// Every failure is reported as [`MarketDataError::Operation`].
    async fn call(&self, args: Value) -> Result<Table, MarketDataError>;
}

/// The full operation set implemented against one vendor.
pub trait ProviderModule: Send + Sync {
    fn vendor(&self) -> VendorId;

    /// Explicit (name, handler) table; order is the registration order.
    fn operations(&self) -> Vec<Arc<dyn DataOperation>>;
}
