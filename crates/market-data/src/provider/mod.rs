//! Vendor provider abstractions and implementations.
//!
//! This module contains:
//! - The [`VendorSession`], [`DataOperation`] and [`ProviderModule`] traits
//! - The declarative dataset machinery shared by every vendor ([`dataset`])
//! - Concrete provider modules (Tushare)
//!
//! Swapping the configured vendor swaps the whole operation set: a provider
//! module declares its operations explicitly and the tool layer registers
//! exactly that list.

pub mod dataset;
mod traits;

pub mod tushare;

pub use traits::{DataOperation, ProviderModule, VendorSession};
