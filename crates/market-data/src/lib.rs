//! finData Market Data Crate
//!
//! This crate provides vendor-agnostic access to financial and macroeconomic
//! datasets for the finData tool server.
//!
//! # Overview
//!
//! - Date normalization of free-form date arguments to `YYYYMMDD`
//! - Vendor login strategies keyed by vendor name
//! - Provider modules: explicit tables of dataset operations per vendor
//! - Trading-calendar lookups used to restrict daily datasets
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  ProviderConfig  | --> | ProviderRegistry |  (vendor tag -> module)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  ProviderModule  |  (Tushare, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  DataOperation   |  normalize -> login -> query
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  VendorSession   |  (from AuthRegistry)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |      Table       |
//!                          +------------------+
//! ```

pub mod auth;
pub mod calendar;
pub mod config;
pub mod dates;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthRegistry, Authenticator};
pub use calendar::{CalendarQuery, TradingCalendar};
pub use config::ProviderConfig;
pub use dates::{standardize_date, DateNormalizer, LengthGate};
pub use errors::MarketDataError;
pub use models::{FieldSelection, QueryRequest, Table, VendorId};
pub use provider::tushare::TushareProvider;
pub use provider::{DataOperation, ProviderModule, VendorSession};
pub use registry::ProviderRegistry;
