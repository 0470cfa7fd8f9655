//! Startup configuration: CLI flags, environment variables and `.env`.
//!
//! Everything is read once here and passed down explicitly. Components never
//! consult the environment themselves.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use findata_market_data::{LengthGate, MarketDataError, ProviderConfig, VendorId};
use findata_tools::DEFAULT_CALL_TIMEOUT;

pub const PROVIDER_ENV: &str = "PROVIDER";
pub const TOKEN_ENV: &str = "DATA_API_TOKEN";
pub const API_URL_ENV: &str = "DATA_API_URL";
pub const HTTP_TIMEOUT_ENV: &str = "DATA_API_TIMEOUT_SECS";
pub const TOOL_TIMEOUT_ENV: &str = "FINDATA_TOOL_TIMEOUT_SECS";
pub const DATE_GATE_ENV: &str = "FINDATA_DATE_LENGTH_GATE";
pub const LOG_RETENTION_ENV: &str = "FINDATA_LOG_RETENTION_DAYS";
pub const LOG_FORMAT_ENV: &str = "FINDATA_LOG_FORMAT";

const DEFAULT_LOG_RETENTION_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// HTTP server-sent events
    Sse,
}

/// finData: financial datasets exposed as MCP tools
#[derive(Debug, Parser)]
#[command(name = "findata", version, about = "Financial data tool server")]
pub struct Cli {
    /// Transport used to talk to the client.
    #[arg(long, value_enum, env = "FINDATA_TRANSPORT", default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Bind host for the SSE transport.
    #[arg(long, env = "FINDATA_SSE_HOST", default_value = "localhost")]
    pub sse_host: String,

    /// Bind port for the SSE transport.
    #[arg(long, env = "FINDATA_SSE_PORT", default_value_t = 8000)]
    pub sse_port: u16,

    /// Directory for the daily rolling log files.
    #[arg(long, env = "FINDATA_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub retention_days: usize,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub transport: Transport,
    pub sse_host: String,
    pub sse_port: u16,
    pub tool_timeout: Duration,
    pub logging: LogSettings,
    pub provider: ProviderConfig,
}

impl Config {
    /// Loads `.env`, parses the command line and reads the environment.
    pub fn from_env() -> Result<Self, MarketDataError> {
        dotenvy::dotenv().ok();
        let cli = Cli::parse();
        Self::from_sources(cli, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from parsed flags and a variable lookup.
    pub fn from_sources<F>(cli: Cli, lookup: F) -> Result<Self, MarketDataError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let vendor_name = var(PROVIDER_ENV).ok_or_else(|| {
            MarketDataError::Configuration(format!("{} environment variable is not set", PROVIDER_ENV))
        })?;
        let vendor: VendorId = vendor_name.parse()?;

        let date_gate = match var(DATE_GATE_ENV) {
            Some(value) => value.parse::<LengthGate>()?,
            None => LengthGate::default(),
        };

        let mut provider = ProviderConfig::new(vendor)
            .with_date_gate(date_gate)
            .with_http_timeout(Duration::from_secs(parse_var(
                &var,
                HTTP_TIMEOUT_ENV,
                findata_market_data::config::DEFAULT_HTTP_TIMEOUT.as_secs(),
            )?));
        if let Some(url) = var(API_URL_ENV) {
            provider = provider.with_api_url(url);
        }
        if let Some(token) = var(TOKEN_ENV) {
            provider = provider.with_token(token);
        }

        let tool_timeout = Duration::from_secs(parse_var(
            &var,
            TOOL_TIMEOUT_ENV,
            DEFAULT_CALL_TIMEOUT.as_secs(),
        )?);
        if tool_timeout.is_zero() {
            return Err(MarketDataError::Configuration(format!(
                "{} must be greater than zero",
                TOOL_TIMEOUT_ENV
            )));
        }

        let logging = LogSettings {
            dir: cli.log_dir,
            retention_days: parse_var(&var, LOG_RETENTION_ENV, DEFAULT_LOG_RETENTION_DAYS)?,
            json: var(LOG_FORMAT_ENV).is_some_and(|f| f.eq_ignore_ascii_case("json")),
        };

        Ok(Self {
            transport: cli.transport,
            sse_host: cli.sse_host,
            sse_port: cli.sse_port,
            tool_timeout,
            logging,
            provider,
        })
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T, MarketDataError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| MarketDataError::Configuration(format!("{}={}: {}", key, raw, e))),
        None => Ok(default),
    }
}
