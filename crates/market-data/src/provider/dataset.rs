//! Declarative dataset operations.
//!
//! A [`DatasetSpec`] names the vendor endpoint, its filter parameters and the
//! join columns that must always be returned. [`DatasetOperation`] turns a spec
//! into a [`DataOperation`] following one protocol: parse and normalize the
//! arguments, force-include mandatory fields, log in, query, and return the
//! table unchanged. [`CalendarFilteredOperation`] adds a trading-calendar
//! restriction on top of the same argument handling.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};
use serde_json::{json, Map, Value};

use crate::auth::AuthRegistry;
use crate::calendar::{CalendarQuery, TradingCalendar};
use crate::config::ProviderConfig;
use crate::dates::DateNormalizer;
use crate::errors::MarketDataError;
use crate::models::{FieldSelection, QueryRequest, Table, VendorId};

use super::{DataOperation, VendorSession};

/// Name of the optional column-selection argument accepted by every operation.
pub const FIELDS_ARG: &str = "fields";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    /// Normalized to `YYYYMMDD` before dispatch.
    Date,
    Integer,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Text,
            required: false,
            description,
        }
    }

    pub const fn date(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Date,
            required: false,
            description,
        }
    }

    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Integer,
            required: false,
            description,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn schema(&self) -> Value {
        match self.kind {
            ParamKind::Text => json!({ "type": "string", "description": self.description }),
            ParamKind::Integer => json!({ "type": "integer", "description": self.description }),
            ParamKind::Date => json!({
                "type": "string",
                "description": format!(
                    "{} Accepts layouts such as YYYYMMDD, YYYY-MM-DD or YYYY年M月D日; normalized to YYYYMMDD.",
                    self.description
                ),
            }),
        }
    }
}

/// Static description of one vendor dataset.
#[derive(Debug)]
pub struct DatasetSpec {
    /// Tool name exposed to callers.
    pub name: &'static str,
    /// Vendor endpoint.
    pub api_name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    /// Columns always returned when the caller narrows the selection.
    pub mandatory_fields: &'static [&'static str],
    /// Prefix of every error this operation reports.
    pub failure_context: &'static str,
}

impl DatasetSpec {
    /// JSON Schema of the accepted arguments, including `fields`.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in self.params {
            properties.insert(param.name.to_string(), param.schema());
        }

        let fields_description = if self.mandatory_fields.is_empty() {
            "Columns to return; omit for all columns.".to_string()
        } else {
            format!(
                "Columns to return; omit for all columns. Always includes: {}.",
                self.mandatory_fields.join(", ")
            )
        };
        properties.insert(
            FIELDS_ARG.to_string(),
            json!({
                "type": "array",
                "items": { "type": "string" },
                "description": fields_description,
            }),
        );

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Validates `args`, normalizes dates and builds the vendor request.
    ///
    /// Mandatory fields are already merged into the returned selection.
    pub fn build_request(
        &self,
        args: Value,
        normalizer: &DateNormalizer,
    ) -> Result<QueryRequest, MarketDataError> {
        let mut args = match args {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(MarketDataError::InvalidArgument(format!(
                    "arguments must be an object, got {}",
                    other
                )))
            }
        };

        let fields = parse_fields(args.remove(FIELDS_ARG))?;

        if let Some(unknown) = args
            .keys()
            .find(|key| !self.params.iter().any(|p| p.name == key.as_str()))
        {
            return Err(MarketDataError::InvalidArgument(format!(
                "unknown argument '{}' for {}",
                unknown, self.name
            )));
        }

        let mut request = QueryRequest::new(self.api_name);
        for param in self.params {
            let value = parse_param(param, args.remove(param.name), normalizer)?;
            match value {
                Some(value) => request = request.param(param.name, value),
                None if param.required => {
                    return Err(MarketDataError::InvalidArgument(format!(
                        "missing required argument '{}'",
                        param.name
                    )))
                }
                None => {}
            }
        }

        Ok(request.fields(fields.with_mandatory(self.mandatory_fields)))
    }
}

fn parse_fields(value: Option<Value>) -> Result<FieldSelection, MarketDataError> {
    match value {
        None | Some(Value::Null) => Ok(FieldSelection::all()),
        Some(Value::String(s)) => Ok(s
            .split(',')
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(MarketDataError::InvalidArgument(format!(
                    "field names must be strings, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FieldSelection::from),
        Some(other) => Err(MarketDataError::InvalidArgument(format!(
            "'fields' must be a list of column names, got {}",
            other
        ))),
    }
}

/// `Ok(None)` for absent or blank values.
fn parse_param(
    param: &ParamSpec,
    value: Option<Value>,
    normalizer: &DateNormalizer,
) -> Result<Option<Value>, MarketDataError> {
    let wrong_type = |v: &Value| {
        MarketDataError::InvalidArgument(format!(
            "'{}' has the wrong type: {}",
            param.name, v
        ))
    };

    let raw = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(wrong_type(&other)),
    };
    let text = raw.trim().to_string();
    if text.is_empty() {
        return Ok(None);
    }

    match param.kind {
        ParamKind::Text => Ok(Some(Value::String(text))),
        // The raw value goes to the normalizer so the strict gate sees its true length.
        ParamKind::Date => normalizer.normalize(&raw).map(|d| Some(Value::String(d))),
        ParamKind::Integer => text
            .parse::<i64>()
            .map(|n| Some(Value::from(n)))
            .map_err(|_| wrong_type(&Value::String(text.clone()))),
    }
}

/// Shared dependencies of every operation in a provider module.
pub struct OperationContext {
    auth: Arc<AuthRegistry>,
    vendor: VendorId,
    normalizer: DateNormalizer,
}

impl OperationContext {
    pub fn new(config: &ProviderConfig, auth: Arc<AuthRegistry>) -> Self {
        Self {
            auth,
            vendor: config.vendor,
            normalizer: config.date_normalizer(),
        }
    }

    pub fn vendor(&self) -> VendorId {
        self.vendor
    }

    pub fn normalizer(&self) -> &DateNormalizer {
        &self.normalizer
    }

    /// Fresh session for one call.
    pub async fn session(&self) -> Result<Box<dyn VendorSession>, MarketDataError> {
        self.auth.login(self.vendor.as_str()).await
    }
}

/// Generic operation driven by a [`DatasetSpec`].
pub struct DatasetOperation {
    spec: &'static DatasetSpec,
    ctx: Arc<OperationContext>,
}

impl DatasetOperation {
    pub fn new(spec: &'static DatasetSpec, ctx: Arc<OperationContext>) -> Self {
        Self { spec, ctx }
    }

    async fn run(&self, args: Value) -> Result<Table, MarketDataError> {
        let request = self.spec.build_request(args, self.ctx.normalizer())?;
        let session = self.ctx.session().await?;
        session.query(request).await
    }
}

#[async_trait]
impl DataOperation for DatasetOperation {
    fn name(&self) -> &'static str {
        self.spec.name
    }

    fn description(&self) -> &'static str {
        self.spec.description
    }

    fn input_schema(&self) -> Value {
        self.spec.input_schema()
    }

    async fn call(&self, args: Value) -> Result<Table, MarketDataError> {
        debug!("Calling {} with {}", self.spec.name, args);
        self.run(args).await.map_err(|e| {
            error!("{} failed: {}", self.spec.name, e);
            e.in_operation(self.spec.failure_context)
        })
    }
}

/// Operation whose rows are restricted to the open trading days of a range.
///
/// The [`DatasetSpec`] must declare required `start_date` and `end_date` date parameters;
/// they bound the calendar lookup and are not forwarded to the dataset query,
/// which fetches the full history for the instrument.
pub struct CalendarFilteredOperation {
    spec: &'static DatasetSpec,
    date_column: &'static str,
    ctx: Arc<OperationContext>,
}

impl CalendarFilteredOperation {
    pub fn new(
        spec: &'static DatasetSpec,
        date_column: &'static str,
        ctx: Arc<OperationContext>,
    ) -> Self {
        Self {
            spec,
            date_column,
            ctx,
        }
    }

    async fn run(&self, args: Value) -> Result<Table, MarketDataError> {
        let mut request = self.spec.build_request(args, self.ctx.normalizer())?;
        let take_bound = |request: &mut QueryRequest, name: &str| {
            request
                .params
                .remove(name)
                .and_then(|v| v.as_str().map(str::to_string))
                .ok_or_else(|| {
                    MarketDataError::InvalidArgument(format!("missing required argument '{}'", name))
                })
        };
        let start_date = take_bound(&mut request, "start_date")?;
        let end_date = take_bound(&mut request, "end_date")?;

        let session = self.ctx.session().await?;

        let calendar = TradingCalendar::fetch(
            session.as_ref(),
            &CalendarQuery::open_days(start_date.as_str(), end_date.as_str()),
        )
        .await?;
        if calendar.is_empty() {
            return Err(MarketDataError::EmptyCalendar {
                start_date,
                end_date,
            });
        }

        let request = QueryRequest {
            fields: request.fields.with_mandatory(&[self.date_column]),
            ..request
        };
        let table = session.query(request).await?;
        let total = table.len();
        let filtered = table.filter_rows_by_membership(self.date_column, calendar.as_set());
        debug!(
            "{} kept {} of {} rows on {} trading days",
            self.spec.name,
            filtered.len(),
            total,
            calendar.len()
        );
        Ok(filtered)
    }
}

#[async_trait]
impl DataOperation for CalendarFilteredOperation {
    fn name(&self) -> &'static str {
        self.spec.name
    }

    fn description(&self) -> &'static str {
        self.spec.description
    }

    fn input_schema(&self) -> Value {
        self.spec.input_schema()
    }

    async fn call(&self, args: Value) -> Result<Table, MarketDataError> {
        debug!("Calling {} with {}", self.spec.name, args);
        self.run(args).await.map_err(|e| {
            error!("{} failed: {}", self.spec.name, e);
            e.in_operation(self.spec.failure_context)
        })
    }
}
