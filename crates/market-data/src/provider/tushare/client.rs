//! Tushare Pro HTTP client.
//!
//! Every endpoint shares one wire format:
//!
//! ```text
//! POST http://api.tushare.pro
//! {"api_name": "daily", "token": "...", "params": {"ts_code": "000001.SZ"}, "fields": "ts_code,close"}
//!
//! {"code": 0, "msg": "", "data": {"fields": ["ts_code", "close"], "items": [["000001.SZ", 11.2]]}}
//! ```

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::Authenticator;
use crate::config::ProviderConfig;
use crate::errors::MarketDataError;
use crate::models::{QueryRequest, Table, VendorId};
use crate::provider::VendorSession;

// ============================================================================
// Wire Structures
// ============================================================================

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    api_name: &'a str,
    token: &'a str,
    params: &'a Map<String, Value>,
    fields: String,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    items: Vec<Vec<Value>>,
}

/// Decodes a response body into a [`Table`].
///
/// A non-zero `code` is a [`MarketDataError::VendorQuery`]; a missing `data`
/// object is an empty table.
pub(crate) fn decode_response(api_name: &str, body: &str) -> Result<Table, MarketDataError> {
    let response: ResponseBody =
        serde_json::from_str(body).map_err(|e| MarketDataError::Decode(e.to_string()))?;

    if response.code != 0 {
        return Err(MarketDataError::VendorQuery {
            api_name: api_name.to_string(),
            code: response.code,
            message: response.msg.unwrap_or_default(),
        });
    }

    Ok(response
        .data
        .map(|data| Table::new(data.fields, data.items))
        .unwrap_or_default())
}

// ============================================================================
// TushareSession
// ============================================================================

/// Logged-in Tushare handle. Created per call by [`TushareAuthenticator`].
pub struct TushareSession {
    client: Client,
    token: String,
    api_url: String,
}

#[async_trait]
impl VendorSession for TushareSession {
    fn vendor(&self) -> VendorId {
        VendorId::Tushare
    }

    async fn query(&self, request: QueryRequest) -> Result<Table, MarketDataError> {
        debug!(
            "Tushare query '{}' params={:?} fields='{}'",
            request.api_name,
            request.params,
            request.fields.to_param()
        );

        let body = RequestBody {
            api_name: &request.api_name,
            token: &self.token,
            params: &request.params,
            fields: request.fields.to_param(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;

        let table = decode_response(&request.api_name, &text)?;
        debug!(
            "Tushare query '{}' returned {} rows",
            request.api_name,
            table.len()
        );
        Ok(table)
    }
}

// ============================================================================
// TushareAuthenticator
// ============================================================================

/// Login strategy for Tushare: validates the configured token and hands out sessions.
pub struct TushareAuthenticator {
    client: Client,
    token: Option<String>,
    api_url: String,
}

impl TushareAuthenticator {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token: config.api_token.clone(),
            api_url: config.api_url.clone(),
        }
    }
}

#[async_trait]
impl Authenticator for TushareAuthenticator {
    fn vendor(&self) -> VendorId {
        VendorId::Tushare
    }

    async fn login(&self) -> Result<Box<dyn VendorSession>, MarketDataError> {
        let token = match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => {
                warn!("DATA_API_TOKEN is not set, cannot log in to Tushare");
                return Err(MarketDataError::Authentication {
                    vendor: VendorId::Tushare.to_string(),
                    message: "missing API token (set DATA_API_TOKEN)".to_string(),
                });
            }
        };

        Ok(Box::new(TushareSession {
            client: self.client.clone(),
            token,
            api_url: self.api_url.clone(),
        }))
    }
}
