use super::protocol::DapMessage;
use crate::error::{DebugError, DebugResult};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Largest message body accepted from a peer.
pub const MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Reads `Content-Length` framed DAP messages.
pub struct DapReader<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> DapReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
        }
    }

    /// Next message, or `None` once the stream is closed.
    pub async fn read_message(&mut self) -> DebugResult<Option<DapMessage>> {
        let mut content_length: Option<usize> = None;
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                break;
            }

            if let Some((name, value)) = trimmed.split_once(':') {
                if name.eq_ignore_ascii_case("Content-Length") {
                    let value = value.trim();
                    content_length = Some(value.parse().map_err(|_| {
                        DebugError::Protocol(format!("invalid Content-Length {value:?}"))
                    })?);
                }
            }
        }

        let len = content_length
            .ok_or_else(|| DebugError::Protocol("missing Content-Length header".into()))?;
        if len > MAX_CONTENT_LENGTH {
            return Err(DebugError::Protocol(format!(
                "Content-Length {len} exceeds the {MAX_CONTENT_LENGTH} byte limit"
            )));
        }
        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf).await?;
        Ok(Some(serde_json::from_slice(&buf)?))
    }
}

/// Writes `Content-Length` framed DAP messages, flushing after each one.
pub struct DapWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> DapWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_message(&mut self, msg: &DapMessage) -> DebugResult<()> {
        let json = serde_json::to_vec(msg)?;
        let header = format!("Content-Length: {}\r\n\r\n", json.len());
        self.writer.write_all(header.as_bytes()).await?;
        self.writer.write_all(&json).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
