/// 会话跟踪器
///
/// 远端通过 `Mcp-Session-Id` 响应头签发会话令牌，之后每个出站请求
/// 原样带回。同一时刻至多持有一个令牌，进程级状态，不做持久化。
///
/// 状态机只有两态：无令牌 / 持有令牌。任何携带会话指示的响应都会
/// 覆盖当前令牌（首次签发与续期同一条路径）；远端用 404 表示会话
/// 已不存在，本地清除后，下一个请求不带令牌，远端会把它当作一次
/// 全新会话的开始。其余结果一律不改变状态。
#[derive(Debug, Default)]
pub struct SessionTracker {
    current: Option<String>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// 当前存活的令牌
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// 响应携带会话指示时调用
    pub fn update(&mut self, token: impl Into<String>) {
        let token = token.into();
        if self.current.as_deref() != Some(token.as_str()) {
            tracing::debug!("会话令牌: {}", token);
        }
        self.current = Some(token);
    }

    /// 远端返回 404：会话失效，下一个请求不再携带令牌
    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            tracing::warn!("会话已过期，下一个请求将触发重新初始化");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_without_token() {
        let tracker = SessionTracker::new();
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_first_issuance() {
        let mut tracker = SessionTracker::new();
        tracker.update("abc123");
        assert_eq!(tracker.current(), Some("abc123"));
    }

    #[test]
    fn test_renewal_overwrites() {
        let mut tracker = SessionTracker::new();
        tracker.update("abc123");
        tracker.update("def456");
        assert_eq!(tracker.current(), Some("def456"));

        // 同一令牌重复下发是幂等的
        tracker.update("def456");
        assert_eq!(tracker.current(), Some("def456"));
    }

    #[test]
    fn test_clear_after_expiry() {
        let mut tracker = SessionTracker::new();
        tracker.update("abc123");
        tracker.clear();
        assert_eq!(tracker.current(), None);

        // 空状态下 clear 是无操作
        tracker.clear();
        assert_eq!(tracker.current(), None);
    }
}
