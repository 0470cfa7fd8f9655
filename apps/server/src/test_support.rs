use clap::Parser;
use findata_tools::McpHandler;

use crate::bootstrap::Bootstrap;
use crate::config::{Cli, Config};

/// Tushare configuration without a token; nothing here reaches the network.
pub fn test_config() -> Config {
    let cli = Cli::try_parse_from(["findata"]).unwrap();
    Config::from_sources(cli, |key| (key == "PROVIDER").then(|| "tushare".to_string())).unwrap()
}

pub fn wired_handler() -> McpHandler {
    Bootstrap::new(test_config()).wire().unwrap().handler()
}
