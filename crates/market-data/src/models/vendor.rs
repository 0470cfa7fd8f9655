use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Data vendors with a statically linked provider module and login strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorId {
    Tushare,
}

impl VendorId {
    /// Every vendor compiled into this build.
    pub const ALL: &'static [VendorId] = &[VendorId::Tushare];

    /// Lower-cased registry key.
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorId::Tushare => "tushare",
        }
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorId {
    type Err = MarketDataError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        VendorId::ALL
            .iter()
            .copied()
            .find(|vendor| vendor.as_str() == key)
            .ok_or(MarketDataError::UnsupportedVendor(key))
    }
}
