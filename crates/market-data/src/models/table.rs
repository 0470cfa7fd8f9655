use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tabular vendor result: column names plus row-major values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub fields: Vec<String>,
    pub items: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(fields: Vec<String>, items: Vec<Vec<Value>>) -> Self {
        Self { fields, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == column)
    }

    /// Values of one column, `None` if the column is absent.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(column)?;
        Some(
            self.items
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Value::Null))
                .collect(),
        )
    }

    /// Text form of a key cell: strings as-is, numbers in decimal, anything else `None`.
    pub fn cell_key(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Keeps only rows whose `column` key (see [`Table::cell_key`]) is contained in `allowed`.
    ///
    /// A table without that column loses every row.
    pub fn filter_rows_by_membership(self, column: &str, allowed: &HashSet<String>) -> Self {
        let Some(idx) = self.column_index(column) else {
            return Self {
                fields: self.fields,
                items: Vec::new(),
            };
        };

        let items = self
            .items
            .into_iter()
            .filter(|row| {
                row.get(idx)
                    .and_then(Self::cell_key)
                    .is_some_and(|v| allowed.contains(&v))
            })
            .collect();

        Self {
            fields: self.fields,
            items,
        }
    }

    /// Rows as JSON objects keyed by column name.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.items
            .iter()
            .map(|row| {
                self.fields
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().chain(std::iter::repeat(Value::Null)))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::new(
            vec!["ts_code".to_string(), "trade_date".to_string(), "pe".to_string()],
            vec![
                vec![json!("000001.SZ"), json!("20230414"), json!(5.1)],
                vec![json!("000001.SZ"), json!("20230415"), json!(5.2)],
                vec![json!("000001.SZ"), json!(null), json!(5.3)],
                vec![json!("000001.SZ"), json!("20230417"), json!(5.4)],
            ],
        )
    }

    #[test]
    fn test_filter_rows_by_membership() {
        let allowed: HashSet<String> = ["20230414", "20230417"].iter().map(|s| s.to_string()).collect();
        let filtered = sample().filter_rows_by_membership("trade_date", &allowed);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.items[1][1], json!("20230417"));
        assert_eq!(filtered.fields.len(), 3);
    }

    #[test]
    fn test_filter_matches_numeric_cells() {
        let table = Table::new(
            vec!["trade_date".to_string()],
            vec![vec![json!(20230414)], vec![json!(20230415)], vec![json!(null)]],
        );
        let allowed: HashSet<String> = ["20230414".to_string()].into_iter().collect();
        let filtered = table.filter_rows_by_membership("trade_date", &allowed);
        assert_eq!(filtered.items, vec![vec![json!(20230414)]]);
    }

    #[test]
    fn test_filter_without_column_drops_all_rows() {
        let allowed: HashSet<String> = HashSet::from(["20230414".to_string()]);
        let filtered = sample().filter_rows_by_membership("cal_date", &allowed);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_records_pad_short_rows() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![json!(1)]],
        );
        let records = table.records();
        assert_eq!(records[0]["a"], json!(1));
        assert_eq!(records[0]["b"], Value::Null);
    }

    #[test]
    fn test_column_values() {
        let table = sample();
        let values = table.column_values("pe").unwrap();
        assert_eq!(values.len(), 4);
        assert!(table.column_values("missing").is_none());
    }
}
