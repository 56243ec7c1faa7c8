use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 传输层失败统一使用的 JSON-RPC 错误码
pub const TRANSPORT_ERROR_CODE: i32 = -32000;

// ── 输入信封 ──────────────────────────────────────────────────────────────────

/// 解析一行输入得到的信封视图
///
/// 桥接器不理解 method 语义，只取 `id` 用于错误关联；
/// 原始行字节原样转发，永远不重新编码。
#[derive(Debug, Clone)]
pub struct Envelope {
    /// 去除首尾空白后的原始行
    pub raw: String,
    /// 请求 ID；通知没有 id（显式 null 视同没有）
    pub id: Option<Value>,
}

impl Envelope {
    /// 解析一行输入；不是合法 JSON 时返回 Err
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        let id = value.get("id").filter(|v| !v.is_null()).cloned();
        Ok(Self {
            raw: line.to_string(),
            id,
        })
    }

    /// 是否为通知（无 id，不期待回复）
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

// ── 合成错误回复 ──────────────────────────────────────────────────────────────

/// JSON-RPC 2.0 错误对象
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// 传输层失败时合成的错误回复
///
/// 形状与远端真实的 JSON-RPC 错误回复一致，调用方无法区分，
/// 也不需要区分：它发出的每个请求都保证收到一条 id 对应的回复。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorReply {
    pub jsonrpc: String,
    /// 原请求的 id；通知转发失败时为 null
    pub id: Option<Value>,
    pub error: JsonRpcError,
}

impl ErrorReply {
    /// 以原请求 id 合成一条传输错误回复
    pub fn transport_error(id: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            error: JsonRpcError {
                code: TRANSPORT_ERROR_CODE,
                message: message.into(),
                data: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_with_id() {
        let envelope =
            Envelope::parse(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#).unwrap();
        assert_eq!(envelope.id, Some(json!(1)));
        assert!(!envelope.is_notification());
    }

    #[test]
    fn test_parse_string_id() {
        let envelope =
            Envelope::parse(r#"{"jsonrpc":"2.0","id":"req-9","method":"tools/list"}"#).unwrap();
        assert_eq!(envelope.id, Some(json!("req-9")));
    }

    #[test]
    fn test_parse_notification() {
        let envelope =
            Envelope::parse(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(envelope.is_notification());

        // 显式 null id 也按通知处理
        let envelope =
            Envelope::parse(r#"{"jsonrpc":"2.0","id":null,"method":"x"}"#).unwrap();
        assert!(envelope.is_notification());
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        assert!(Envelope::parse("{not json").is_err());
        assert!(Envelope::parse("").is_err());
    }

    #[test]
    fn test_error_reply_shape() {
        let reply = ErrorReply::transport_error(Some(json!(7)), "HTTP 404: session gone");
        assert_eq!(
            serde_json::to_string(&reply).unwrap(),
            r#"{"jsonrpc":"2.0","id":7,"error":{"code":-32000,"message":"HTTP 404: session gone"}}"#
        );
    }

    #[test]
    fn test_error_reply_null_id() {
        // 通知（无 id）转发失败时，回复携带 null id
        let reply = ErrorReply::transport_error(None, "Connection error: refused");
        let text = serde_json::to_string(&reply).unwrap();
        assert!(text.contains(r#""id":null"#));
    }
}
