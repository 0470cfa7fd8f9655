use anyhow::Context;
use findata_server::{init_tracing, Bootstrap, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    let _log_guard = init_tracing(&config.logging);

    tracing::info!(
        "Starting finData {} with vendor '{}'",
        env!("CARGO_PKG_VERSION"),
        config.provider.vendor
    );
    let server = Bootstrap::new(config).wire()?;
    server.serve().await
}
