use std::fmt;

/// 桥接进程的统一错误类型
///
/// 只覆盖启动失败与主循环里无法分类的运行时失败。
/// 单次转发的失败不是错误，而是 `bridge::Outcome` 的一个变体，
/// 会以 JSON-RPC 错误回复的形式写回输出流。
#[derive(Debug)]
pub enum BridgeError {
    /// 配置错误
    Config(ConfigError),
    /// mDNS 发现错误
    Discover(DiscoverError),
    /// IO 错误
    Io(std::io::Error),
    /// JSON 序列化/反序列化错误
    Json(serde_json::Error),
    /// 其他错误
    Other(String),
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 缺少必需的配置项
    MissingField(String),
    /// 配置值无效
    InvalidValue { field: String, message: String },
}

/// mDNS 发现错误
#[derive(Debug)]
pub enum DiscoverError {
    /// mDNS 守护任务不可用（通常是套接字无法创建）
    DaemonUnavailable(String),
    /// 浏览请求发不出去
    BrowseFailed(String),
    /// 等待窗口内没有任何服务应答
    Timeout,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Config(e) => write!(f, "Config Error: {}", e),
            BridgeError::Discover(e) => write!(f, "Discovery Error: {}", e),
            BridgeError::Io(e) => write!(f, "IO Error: {}", e),
            BridgeError::Json(e) => write!(f, "JSON Error: {}", e),
            BridgeError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField(field) => write!(f, "Missing config field: {}", field),
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid config value for '{}': {}", field, message)
            }
        }
    }
}

impl fmt::Display for DiscoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoverError::DaemonUnavailable(msg) => {
                write!(f, "mDNS daemon unavailable: {}", msg)
            }
            DiscoverError::BrowseFailed(msg) => write!(f, "mDNS browse failed: {}", msg),
            DiscoverError::Timeout => write!(f, "no MCP service discovered within 5 seconds"),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Io(e) => Some(e),
            BridgeError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for DiscoverError {}

// From 转换实现
impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err)
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Json(err)
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        BridgeError::Other(format!("HTTP client error: {}", err))
    }
}

impl From<ConfigError> for BridgeError {
    fn from(err: ConfigError) -> Self {
        BridgeError::Config(err)
    }
}

impl From<DiscoverError> for BridgeError {
    fn from(err: DiscoverError) -> Self {
        BridgeError::Discover(err)
    }
}

// 便捷的 Result 类型别名
pub type Result<T> = std::result::Result<T, BridgeError>;
