use clap::Parser;
use tokio::io::BufReader;

use mcp_bridge::bridge::{Bridge, HttpForwarder};
use mcp_bridge::config::{BridgeConfig, Cli};
use mcp_bridge::discover;
use mcp_bridge::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout 是协议通道，日志一律走 stderr
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "mcp_bridge=info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 端点在进入主循环前解析一次，之后不再变化；
    // 发现失败直接以非零退出码结束进程
    let endpoint = if cli.discover {
        discover::discover_endpoint(&cli.path)?
    } else {
        BridgeConfig::static_endpoint(&cli)?
    };

    tracing::info!("桥接已启动 → {}", endpoint.url());

    let config = BridgeConfig {
        endpoint,
        auth_token: cli.auth_token.clone(),
    };
    let forwarder = HttpForwarder::new(&config)?;

    Bridge::new(forwarder)
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
