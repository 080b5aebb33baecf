use std::net::SocketAddr;

use clap::Parser;
use engine_logging::LogDestination;
use gallery_proxy::{serve, ProxyConfig};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "gallery-proxy", about = "Record and upload-signing proxy")]
struct Cli {
    /// Overrides GALLERY_PROXY_ADDR.
    #[arg(long)]
    addr: Option<SocketAddr>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    engine_logging::initialize(LogDestination::Terminal, cli.log_level);

    let mut config = ProxyConfig::from_env()?;
    if let Some(addr) = cli.addr {
        config.addr = addr;
    }
    serve(config).await?;
    Ok(())
}
