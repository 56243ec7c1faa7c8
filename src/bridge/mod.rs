pub mod forward;
pub mod session;
pub mod types;

pub use forward::{Forward, HttpForwarder, Outcome, SESSION_HEADER};
pub use session::SessionTracker;
pub use types::{Envelope, ErrorReply, JsonRpcError, TRANSPORT_ERROR_CODE};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// 桥接主循环
///
/// 严格串行：读一行 → 转发并等待结果 → 至多写一行 → 读下一行。
/// 没有并发的在途请求，会话状态天然无竞争。
/// 输入流关闭是唯一的退出信号。
pub struct Bridge<F: Forward> {
    forwarder: F,
}

impl<F: Forward> Bridge<F> {
    pub fn new(forwarder: F) -> Self {
        Self { forwarder }
    }

    /// 消费 reader 直到 EOF
    ///
    /// reader/writer 是泛型参数，测试里用内存流替代 stdin/stdout。
    /// 每写一行立即 flush，下游才能及时看到回复。
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // 解析失败只记日志：没有 id 可关联，不产生任何输出。
            // 转发失败则不同，信封已经解析成功，必须合成一条带 id 的错误回复。
            let envelope = match Envelope::parse(line) {
                Ok(envelope) => envelope,
                Err(e) => {
                    tracing::error!("丢弃无法解析的输入行: {}", e);
                    continue;
                }
            };

            tracing::debug!("→ 远端: {}", preview(&envelope.raw));

            let reply = match self.forwarder.forward(&envelope).await {
                Outcome::Body(body) => {
                    tracing::debug!("← 远端: {}", preview(&body));
                    Some(body)
                }
                Outcome::Accepted => None,
                Outcome::Error(reply) => match serde_json::to_string(&reply) {
                    Ok(line) => Some(line),
                    // 未分类的运行时失败：记日志后继续，这一行请求不会得到回复
                    Err(e) => {
                        tracing::error!("无法序列化错误回复: {}", e);
                        None
                    }
                },
            };

            if let Some(line) = reply {
                if let Err(e) = write_line(&mut writer, &line).await {
                    tracing::error!("写回输出流失败: {}", e);
                }
            }
        }

        tracing::info!("输入流已关闭，桥接退出");
        Ok(())
    }
}

/// 写一行并立即刷新
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// 日志里只保留消息前 200 个字符
fn preview(message: &str) -> &str {
    match message.char_indices().nth(200) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}
