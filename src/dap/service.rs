use super::protocol::{DapMessage, DapMessageContent};
use super::transport::{DapReader, DapWriter};
use crate::config::ResolvedDebugConfiguration;
use crate::error::{DebugError, DebugResult};
use crate::host::{DebugService, WorkspaceFolder};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

type Waiters = Arc<StdMutex<Vec<oneshot::Sender<()>>>>;

/// Debug service that hands the resolved configuration to a debug adapter client
/// over a DAP stream.
///
/// The configuration goes out as the `arguments` of a `launch` request. The
/// session counts as terminated on a `terminated` or `exited` event, even one that
/// arrives before the launch response, or when the peer closes the stream. One
/// session per service.
pub struct StdioDebugService<R, W> {
    reader: Mutex<Option<DapReader<R>>>,
    writer: Mutex<DapWriter<W>>,
    seq: AtomicU64,
    waiters: Waiters,
}

impl<R, W> StdioDebugService<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(Some(DapReader::new(reader))),
            writer: Mutex::new(DapWriter::new(writer)),
            seq: AtomicU64::new(0),
            waiters: Arc::default(),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Send `launch` and wait for its response. Returns whether the session already
    /// ended while the response was outstanding.
    async fn send_launch(
        &self,
        reader: &mut DapReader<R>,
        folder: &WorkspaceFolder,
        config: &ResolvedDebugConfiguration,
    ) -> DebugResult<bool> {
        let seq = self.next_seq();
        let arguments = serde_json::to_value(config)?;
        self.writer
            .lock()
            .await
            .write_message(&DapMessage::request(seq, "launch", Some(arguments)))
            .await?;
        debug!(seq, folder = %folder.path.display(), "sent launch request");

        let mut ended = false;
        loop {
            let Some(msg) = reader.read_message().await? else {
                return Err(DebugError::StartRejected(
                    "stream closed before the launch was acknowledged".into(),
                ));
            };
            if msg.event_name().is_some_and(is_session_end) {
                ended = true;
                continue;
            }
            match msg.content {
                DapMessageContent::Response {
                    request_seq,
                    success,
                    message,
                    ..
                } if request_seq == seq => {
                    if !success {
                        return Err(DebugError::StartRejected(
                            message.unwrap_or_else(|| "launch request failed".into()),
                        ));
                    }
                    return Ok(ended);
                }
                other => debug!(?other, "ignoring message while waiting for launch response"),
            }
        }
    }
}

impl<W> StdioDebugService<tokio::io::Stdin, W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn stdio(writer: W) -> Self {
        Self::new(tokio::io::stdin(), writer)
    }
}

#[async_trait]
impl<R, W> DebugService for StdioDebugService<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn on_session_terminated(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut waiters) = self.waiters.lock() {
            waiters.retain(|waiter| !waiter.is_closed());
            waiters.push(tx);
        }
        rx
    }

    async fn start_debugging(
        &self,
        folder: &WorkspaceFolder,
        config: &ResolvedDebugConfiguration,
    ) -> DebugResult<()> {
        let Some(mut reader) = self.reader.lock().await.take() else {
            return Err(DebugError::StartRejected(
                "a session was already started on this stream".into(),
            ));
        };

        match self.send_launch(&mut reader, folder, config).await {
            Ok(true) => {
                debug!("session ended before the launch was acknowledged");
                notify_all(&self.waiters);
            }
            Ok(false) => {
                tokio::spawn(watch_for_termination(reader, self.waiters.clone()));
            }
            Err(err) => {
                // Nothing runs on this stream any more; release every subscriber.
                if let Ok(mut waiters) = self.waiters.lock() {
                    waiters.clear();
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

fn is_session_end(event: &str) -> bool {
    matches!(event, "terminated" | "exited")
}

async fn watch_for_termination<R: AsyncRead + Unpin>(mut reader: DapReader<R>, waiters: Waiters) {
    loop {
        match reader.read_message().await {
            Ok(Some(msg)) if msg.event_name().is_some_and(is_session_end) => break,
            Ok(Some(msg)) => debug!(seq = msg.seq, "ignoring message during session"),
            Ok(None) => {
                debug!("dap stream closed");
                break;
            }
            Err(err) => {
                warn!(error = %err, "dap stream failed; treating session as terminated");
                break;
            }
        }
    }
    notify_all(&waiters);
}

fn notify_all(waiters: &Waiters) {
    let waiters = match waiters.lock() {
        Ok(mut waiters) => std::mem::take(&mut *waiters),
        Err(_) => return,
    };
    for waiter in waiters {
        let _ = waiter.send(());
    }
}
