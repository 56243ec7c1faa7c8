use std::time::Duration;

use async_trait::async_trait;

use super::session::SessionTracker;
use super::types::{Envelope, ErrorReply};
use crate::config::BridgeConfig;
use crate::error::Result;

/// 会话令牌走的传输层头部
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// 单次请求的总超时；超出按连接失败处理
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 一次转发的分类结果
///
/// 转发过程中的所有失败分支都折叠进 `Error` 变体，
/// 主循环只按变体分派，不处理异常路径。
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 2xx 响应体，已是信封形状的 JSON-RPC，原样写回
    Body(String),
    /// 202：通知已被接受，远端不会回复，什么都不写
    Accepted,
    /// 传输层失败，携带合成的错误回复
    Error(ErrorReply),
}

/// 把一个信封换成一个 Outcome 的转发抽象
///
/// 主循环只依赖这个 trait，测试里用脚本化的替身驱动。
#[async_trait]
pub trait Forward {
    async fn forward(&mut self, envelope: &Envelope) -> Outcome;
}

/// HTTP 转发器
///
/// 持有固定端点、复用的 reqwest 客户端和当前会话令牌，
/// 每个信封恰好发出一次 POST：
/// Content-Type 固定 application/json，Accept 同时声明普通回复和
/// 事件流两种格式；持有令牌时附带会话头，配置了认证令牌时附带
/// Bearer 认证头。
pub struct HttpForwarder {
    client: reqwest::Client,
    url: String,
    auth_token: Option<String>,
    session: SessionTracker,
}

impl HttpForwarder {
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: config.endpoint.url(),
            auth_token: config.auth_token.clone(),
            session: SessionTracker::new(),
        })
    }

    /// 当前会话状态（只读）
    pub fn session(&self) -> &SessionTracker {
        &self.session
    }
}

#[async_trait]
impl Forward for HttpForwarder {
    async fn forward(&mut self, envelope: &Envelope) -> Outcome {
        let mut builder = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json, text/event-stream")
            .body(envelope.raw.clone());

        if let Some(token) = self.session.current() {
            builder = builder.header(SESSION_HEADER, token);
        }
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            // DNS 失败、拒绝连接、超时都走这条路；会话状态不动
            Err(e) => {
                tracing::error!("连接远端失败: {}", e);
                return Outcome::Error(ErrorReply::transport_error(
                    envelope.id.clone(),
                    format!("Connection error: {}", e),
                ));
            }
        };

        // 任何携带会话指示的响应都更新跟踪器（首次签发与续期不区分）
        if let Some(token) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            self.session.update(token);
        }

        let status = response.status();

        if status == reqwest::StatusCode::ACCEPTED {
            tracing::debug!("← 202 Accepted");
            return Outcome::Accepted;
        }

        if status.is_success() {
            return match response.text().await {
                Ok(body) => Outcome::Body(body),
                // 读响应体途中连接断了，与发送失败同等对待
                Err(e) => Outcome::Error(ErrorReply::transport_error(
                    envelope.id.clone(),
                    format!("Connection error: {}", e),
                )),
            };
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("远端返回 HTTP {}: {}", status.as_u16(), body);

        // 404 表示会话在远端已不存在，本地同步清除
        if status == reqwest::StatusCode::NOT_FOUND {
            self.session.clear();
        }

        Outcome::Error(ErrorReply::transport_error(
            envelope.id.clone(),
            format!("HTTP {}: {}", status.as_u16(), body),
        ))
    }
}
