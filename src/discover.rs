use std::time::{Duration, Instant};

use mdns_sd::{ServiceDaemon, ServiceEvent, ServiceInfo};

use crate::config::Endpoint;
use crate::error::{DiscoverError, Result};

/// MCP 服务端在局域网内广播的服务类型
const SERVICE_TYPE: &str = "_mcp._tcp.local.";
/// 整个发现窗口的上限
const DISCOVER_TIMEOUT: Duration = Duration::from_secs(5);
/// 轮询粒度
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 通过 mDNS 发现第一个应答的 MCP 服务端
///
/// 阻塞等待最多 5 秒（100ms 一个轮询步），取第一个解析成功的服务；
/// 之后到达的应答者一律忽略。端点路径优先取服务 TXT 记录里的 `path`，
/// 没有广播 path 时退回 `default_path`。
///
/// 必须在主循环启动之前调用；无论成功失败，mDNS 守护任务都会在返回前关闭。
pub fn discover_endpoint(default_path: &str) -> Result<Endpoint> {
    let daemon =
        ServiceDaemon::new().map_err(|e| DiscoverError::DaemonUnavailable(e.to_string()))?;

    let result = browse_first(&daemon, default_path);

    // 成功与失败两条路径都走到这里，监听套接字不会泄漏
    let _ = daemon.shutdown();

    result
}

fn browse_first(daemon: &ServiceDaemon, default_path: &str) -> Result<Endpoint> {
    let receiver = daemon
        .browse(SERVICE_TYPE)
        .map_err(|e| DiscoverError::BrowseFailed(e.to_string()))?;

    tracing::info!("mDNS: 正在浏览 {}（最多等待 {:?}）", SERVICE_TYPE, DISCOVER_TIMEOUT);

    let deadline = Instant::now() + DISCOVER_TIMEOUT;
    while Instant::now() < deadline {
        match receiver.recv_timeout(POLL_INTERVAL) {
            Ok(ServiceEvent::ServiceResolved(info)) => {
                if let Some(endpoint) = endpoint_from_service(&info, default_path) {
                    tracing::info!(
                        "mDNS: 发现 '{}' → {}",
                        info.get_fullname(),
                        endpoint.url()
                    );
                    return Ok(endpoint);
                }
                // 没有可用地址的应答，继续等下一个
                tracing::debug!("mDNS: '{}' 未携带地址，忽略", info.get_fullname());
            }
            // SearchStarted / ServiceFound 等中间事件，等待解析完成
            Ok(_) => {}
            // 100ms 内无事件，进入下一个轮询步
            Err(_) => {}
        }
    }

    Err(DiscoverError::Timeout.into())
}

/// 从解析完成的服务公告组装端点
///
/// 服务端会在 TXT 记录里广播自己的端点路径（`path=/mcp`），
/// 优先采用；地址取公告里的第一个。
fn endpoint_from_service(info: &ServiceInfo, default_path: &str) -> Option<Endpoint> {
    let addr = info.get_addresses().iter().next()?;
    let path = info
        .get_property_val_str("path")
        .unwrap_or(default_path)
        .to_string();
    Some(Endpoint::new(addr.to_string(), info.get_port(), path))
}
