//! Date normalization.
//!
//! Every date-valued tool argument goes through [`DateNormalizer`] before it reaches a
//! vendor. Inputs may use any of a fixed list of layouts and always come out as
//! `YYYYMMDD`. Layouts are tried in priority order and the first one that parses wins.
//!
//! The historical contract only accepts inputs of exactly eight characters
//! ([`LengthGate::Strict`]). That rejects common forms such as `2023-04-15`, so the
//! gate can be relaxed through configuration ([`LengthGate::Relaxed`]).

use std::str::FromStr;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Canonical length of a normalized date.
pub const CANONICAL_LEN: usize = 8;

/// Input length policy applied before any layout is tried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthGate {
    /// Only inputs of exactly eight characters are parsed.
    Strict,
    /// Any length is parsed.
    #[default]
    Relaxed,
}

impl FromStr for LengthGate {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "relaxed" => Ok(Self::Relaxed),
            other => Err(MarketDataError::Configuration(format!(
                "unknown date length gate '{}', expected 'strict' or 'relaxed'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Order {
    Ymd,
    Mdy,
    Dmy,
}

#[derive(Debug, Clone, Copy)]
enum MonthStyle {
    Numeric,
    Abbreviated,
    Full,
}

struct Layout {
    name: &'static str,
    pattern: Regex,
    order: Order,
    month: MonthStyle,
}

impl Layout {
    fn new(name: &'static str, pattern: &str, order: Order, month: MonthStyle) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("static date pattern"),
            order,
            month,
        }
    }

    fn parse(&self, input: &str) -> Option<NaiveDate> {
        let caps = self.pattern.captures(input)?;
        let parts: Vec<&str> = (1..=3).map(|i| caps.get(i).map_or("", |m| m.as_str())).collect();
        let (year, month, day) = match self.order {
            Order::Ymd => (parts[0], parts[1], parts[2]),
            Order::Mdy => (parts[2], parts[0], parts[1]),
            Order::Dmy => (parts[2], parts[1], parts[0]),
        };

        let month = match self.month {
            MonthStyle::Numeric => month.parse().ok()?,
            MonthStyle::Abbreviated => month_from_name(month, true)?,
            MonthStyle::Full => month_from_name(month, false)?,
        };
        let year: i32 = year.parse().ok()?;
        if year < 1 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day.parse().ok()?)
    }
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn month_from_name(name: &str, abbreviated: bool) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|m| if abbreviated { m[..3] == name } else { *m == name })
        .map(|i| i as u32 + 1)
}

lazy_static! {
    /// Layouts in priority order.
    static ref LAYOUTS: Vec<Layout> = vec![
        Layout::new("YYYY-MM-DD", r"^(\d{4})-(\d{1,2})-(\d{1,2})$", Order::Ymd, MonthStyle::Numeric),
        Layout::new("YYYY/MM/DD", r"^(\d{4})/(\d{1,2})/(\d{1,2})$", Order::Ymd, MonthStyle::Numeric),
        Layout::new("MM/DD/YYYY", r"^(\d{1,2})/(\d{1,2})/(\d{4})$", Order::Mdy, MonthStyle::Numeric),
        Layout::new("DD-MM-YYYY", r"^(\d{1,2})-(\d{1,2})-(\d{4})$", Order::Dmy, MonthStyle::Numeric),
        Layout::new("DD.MM.YYYY", r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$", Order::Dmy, MonthStyle::Numeric),
        Layout::new("YYYYMMDD", r"^(\d{4})(\d{2})(\d{2})$", Order::Ymd, MonthStyle::Numeric),
        Layout::new("Mon DD, YYYY", r"^([A-Za-z]{3}) (\d{1,2}), (\d{4})$", Order::Mdy, MonthStyle::Abbreviated),
        Layout::new("Month DD, YYYY", r"^([A-Za-z]+) (\d{1,2}), (\d{4})$", Order::Mdy, MonthStyle::Full),
        Layout::new("DD Mon YYYY", r"^(\d{1,2}) ([A-Za-z]{3}) (\d{4})$", Order::Dmy, MonthStyle::Abbreviated),
        Layout::new("DD Month YYYY", r"^(\d{1,2}) ([A-Za-z]+) (\d{4})$", Order::Dmy, MonthStyle::Full),
    ];

    /// Localized form such as `2023年4月15日`.
    static ref CN_LAYOUT: Layout =
        Layout::new("YYYY年M月D日", r"^(\d{4})年(\d{1,2})月(\d{1,2})日$", Order::Ymd, MonthStyle::Numeric);
}

/// Converts free-form date strings to `YYYYMMDD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateNormalizer {
    gate: LengthGate,
}

impl DateNormalizer {
    pub fn new(gate: LengthGate) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> LengthGate {
        self.gate
    }

    /// Normalizes `input` or fails with [`MarketDataError::DateParse`] naming the input.
    pub fn normalize(&self, input: &str) -> Result<String, MarketDataError> {
        let candidate = input.trim();
        let unparseable = || MarketDataError::DateParse {
            input: input.to_string(),
        };

        if self.gate == LengthGate::Strict && input.chars().count() != CANONICAL_LEN {
            return Err(unparseable());
        }

        LAYOUTS
            .iter()
            .chain(std::iter::once(&*CN_LAYOUT))
            .find_map(|layout| {
                layout.parse(candidate).inspect(|_| {
                    log::trace!("Parsed '{}' with layout {}", candidate, layout.name)
                })
            })
            .map(|date| date.format("%Y%m%d").to_string())
            .ok_or_else(unparseable)
    }

    /// Normalizes an optional argument; blank inputs stay blank.
    pub fn normalize_optional(&self, input: Option<&str>) -> Result<Option<String>, MarketDataError> {
        match input {
            None => Ok(None),
            Some(value) if value.trim().is_empty() => Ok(None),
            Some(value) => self.normalize(value).map(Some),
        }
    }
}

/// Normalizes with the historical eight-character gate.
pub fn standardize_date(input: &str) -> Result<String, MarketDataError> {
    DateNormalizer::new(LengthGate::Strict).normalize(input)
}
