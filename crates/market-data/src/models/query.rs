use serde_json::{Map, Value};

use super::FieldSelection;

/// One vendor API call: endpoint name, filter parameters and output columns.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub api_name: String,
    pub params: Map<String, Value>,
    pub fields: FieldSelection,
}

impl QueryRequest {
    pub fn new(api_name: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            params: Map::new(),
            fields: FieldSelection::all(),
        }
    }

    /// Adds a filter parameter. Null and empty-string values are omitted.
    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        let blank = match &value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        if !blank {
            self.params.insert(name.to_string(), value);
        }
        self
    }

    pub fn fields(mut self, fields: FieldSelection) -> Self {
        self.fields = fields;
        self
    }

    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_params_are_omitted() {
        let request = QueryRequest::new("daily")
            .param("ts_code", "")
            .param("trade_date", Value::Null)
            .param("start_date", "20230415")
            .param("is_calc", 0);

        assert_eq!(request.params.len(), 2);
        assert_eq!(request.param_str("start_date"), Some("20230415"));
        assert_eq!(request.params["is_calc"], json!(0));
    }
}
