//! Trading calendar lookups.
//!
//! Resolves the open trading dates of an exchange within a range so other
//! datasets can be restricted to them.

use std::collections::HashSet;

use log::debug;

use crate::errors::MarketDataError;
use crate::models::{QueryRequest, Table};
use crate::provider::VendorSession;

pub const TRADE_CAL_API: &str = "trade_cal";
pub const CAL_DATE_FIELD: &str = "cal_date";

/// Filters for a calendar lookup. Dates must already be normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarQuery {
    /// Exchange code; blank means the vendor default (SSE).
    pub exchange: String,
    pub start_date: String,
    pub end_date: String,
    /// "1" for open days, "0" for closed days, blank for both.
    pub is_open: String,
}

impl CalendarQuery {
    /// Open days of the default exchange between two normalized dates.
    pub fn open_days(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            exchange: String::new(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            is_open: "1".to_string(),
        }
    }

    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    pub fn to_request(&self) -> QueryRequest {
        QueryRequest::new(TRADE_CAL_API)
            .param("exchange", self.exchange.as_str())
            .param("start_date", self.start_date.as_str())
            .param("end_date", self.end_date.as_str())
            .param("is_open", self.is_open.as_str())
    }
}

/// Deduplicated trading dates, in the order the vendor returned them.
#[derive(Debug, Clone, Default)]
pub struct TradingCalendar {
    dates: Vec<String>,
    index: HashSet<String>,
}

impl TradingCalendar {
    /// Queries the calendar through an existing session.
    pub async fn fetch(
        session: &dyn VendorSession,
        query: &CalendarQuery,
    ) -> Result<Self, MarketDataError> {
        let table = session.query(query.to_request()).await?;
        let calendar = Self::from_table(&table)?;
        debug!(
            "Trading calendar {}..={} has {} dates",
            query.start_date,
            query.end_date,
            calendar.len()
        );
        Ok(calendar)
    }

    /// Collects non-null `cal_date` values, dropping duplicates.
    pub fn from_table(table: &Table) -> Result<Self, MarketDataError> {
        let Some(values) = table.column_values(CAL_DATE_FIELD) else {
            if table.is_empty() {
                return Ok(Self::default());
            }
            return Err(MarketDataError::Decode(format!(
                "trading calendar has no '{}' column",
                CAL_DATE_FIELD
            )));
        };

        let mut calendar = Self::default();
        for value in values {
            let Some(date) = Table::cell_key(value) else {
                continue;
            };
            if calendar.index.insert(date.clone()) {
                calendar.dates.push(date);
            }
        }
        Ok(calendar)
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn as_set(&self) -> &HashSet<String> {
        &self.index
    }

    pub fn contains(&self, date: &str) -> bool {
        self.index.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_table_dedups_and_drops_nulls() {
        let table = Table::new(
            vec!["exchange".to_string(), "cal_date".to_string()],
            vec![
                vec![json!("SSE"), json!("20230417")],
                vec![json!("SZSE"), json!("20230417")],
                vec![json!("SSE"), json!(null)],
                vec![json!("SSE"), json!("20230418")],
            ],
        );
        let calendar = TradingCalendar::from_table(&table).unwrap();
        assert_eq!(calendar.dates(), ["20230417", "20230418"]);
        assert!(calendar.contains("20230418"));
        assert!(!calendar.contains("20230415"));
    }

    #[test]
    fn test_numeric_dates_filter_numeric_rows() {
        let calendar = TradingCalendar::from_table(&Table::new(
            vec!["cal_date".to_string()],
            vec![vec![json!(20230417)]],
        ))
        .unwrap();
        assert!(calendar.contains("20230417"));

        let rows = Table::new(
            vec!["trade_date".to_string()],
            vec![vec![json!(20230417)], vec![json!(20230415)]],
        )
        .filter_rows_by_membership("trade_date", calendar.as_set());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_empty_response_is_empty_calendar() {
        let calendar = TradingCalendar::from_table(&Table::default()).unwrap();
        assert!(calendar.is_empty());
    }

    #[test]
    fn test_rows_without_cal_date_column_fail() {
        let table = Table::new(vec!["date".to_string()], vec![vec![json!("20230417")]]);
        assert!(TradingCalendar::from_table(&table).is_err());
    }

    #[test]
    fn test_request_omits_blank_exchange() {
        let request = CalendarQuery::open_days("20230415", "20230416").to_request();
        assert_eq!(request.api_name, "trade_cal");
        assert!(!request.params.contains_key("exchange"));
        assert_eq!(request.param_str("is_open"), Some("1"));

        let request = CalendarQuery::open_days("20230415", "20230416")
            .with_exchange("SZSE")
            .to_request();
        assert_eq!(request.param_str("exchange"), Some("SZSE"));
    }
}
