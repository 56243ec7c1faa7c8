use clap::Parser;

use crate::error::{ConfigError, Result};

/// 命令行参数
///
/// stdio 客户端（如 Claude Desktop）通过 command/args 启动本进程，
/// 所以全部配置走命令行和环境变量，不读配置文件。
#[derive(Debug, Parser)]
#[command(
    name = "mcp-bridge",
    version,
    about = "stdio ↔ Streamable HTTP 桥接器：让只会 stdio 传输的 MCP 客户端访问 HTTP 服务端"
)]
pub struct Cli {
    /// 远端主机名或 IP（如 my-device.local）
    #[arg(long, env = "MCP_BRIDGE_HOST", required_unless_present = "discover")]
    pub host: Option<String>,

    /// 远端 HTTP 端口
    #[arg(long, env = "MCP_BRIDGE_PORT", default_value_t = 80)]
    pub port: u16,

    /// MCP 端点路径
    #[arg(long, env = "MCP_BRIDGE_PATH", default_value = "/mcp")]
    pub path: String,

    /// 通过 mDNS 发现远端，取第一个应答者（忽略 --host / --port）
    #[arg(long)]
    pub discover: bool,

    /// Bearer 认证令牌（远端开启鉴权时附带 Authorization 头）
    #[arg(long, env = "MCP_BRIDGE_TOKEN")]
    pub auth_token: Option<String>,
}

/// 目标端点
///
/// 进程生命周期内不变的 (host, port, path) 三元组，
/// 启动时解析一次（直接配置或 mDNS 发现），之后每个出站请求都打到这里。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            path: path.into(),
        }
    }

    /// 渲染为完整请求 URL
    ///
    /// IPv6 字面量按 URL 规则加方括号。
    pub fn url(&self) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}{}", self.host, self.port, self.path)
        } else {
            format!("http://{}:{}{}", self.host, self.port, self.path)
        }
    }
}

/// 桥接器运行配置
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub endpoint: Endpoint,
    pub auth_token: Option<String>,
}

impl BridgeConfig {
    /// 静态模式：端点直接来自命令行参数
    ///
    /// `--discover` 模式不走这里，由 `discover::discover_endpoint` 解析端点。
    pub fn static_endpoint(cli: &Cli) -> Result<Endpoint> {
        let host = cli
            .host
            .clone()
            .ok_or_else(|| ConfigError::MissingField("host".to_string()))?;
        Ok(Endpoint::new(host, cli.port, cli.path.clone()))
    }
}
