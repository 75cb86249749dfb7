//! Feed actor: owns the connection to the planner and forwards snapshots.
//!
//! The connection is acquired when the actor is spawned and released when
//! its handle is shut down or dropped. Disconnects are reported to the
//! logic thread and retried after a fixed interval.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::feed::{decode_line, FeedEvent};
use crate::tea::Message;
use crate::{hlog, hlog_debug, hlog_trace, hlog_warn};

use super::ActorHandle;

pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_millis(2000);

/// Why [`pump`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpEnd {
    /// Shutdown was requested or the logic thread went away.
    Cancelled,
    /// The stream ended or failed; carries a human-readable reason.
    Closed(String),
}

/// Actor that keeps a line-oriented feed connection open.
pub struct FeedActor {
    addr: String,
    msg_tx: mpsc::UnboundedSender<Message>,
    reconnect_interval: Duration,
}

impl FeedActor {
    pub fn new(addr: impl Into<String>, msg_tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            addr: addr.into(),
            msg_tx,
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
        }
    }

    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    pub fn spawn(self) -> ActorHandle {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        hlog_debug!("FeedActor::spawn addr={}", self.addr);

        tokio::spawn(async move { self.run(cancel_clone).await });

        ActorHandle::new(cancel)
    }

    async fn run(self, cancel: CancellationToken) {
        loop {
            if self.msg_tx.is_closed() {
                hlog_debug!("FeedActor: message channel closed");
                break;
            }

            let connect = tokio::select! {
                _ = cancel.cancelled() => break,
                res = TcpStream::connect(&self.addr) => res,
            };

            let reason = match connect {
                Ok(stream) => {
                    hlog!("Feed connected: {}", self.addr);
                    let _ = self.msg_tx.send(Message::FeedConnected);
                    match pump(stream, &self.msg_tx, &cancel).await {
                        PumpEnd::Cancelled => break,
                        PumpEnd::Closed(reason) => reason,
                    }
                }
                Err(e) => e.to_string(),
            };

            hlog_warn!("Feed disconnected from {}: {}", self.addr, reason);
            let _ = self.msg_tx.send(Message::FeedDisconnected(reason));

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_interval) => {}
            }
        }

        hlog_debug!("FeedActor stopped: {}", self.addr);
    }
}

/// Read feed lines from `reader` until it ends or `cancel` fires.
///
/// Snapshots are forwarded as [`Message::SnapshotReceived`]. Malformed
/// lines are logged and dropped so the last good tree stays on screen.
pub async fn pump<R>(
    reader: R,
    msg_tx: &mpsc::UnboundedSender<Message>,
    cancel: &CancellationToken,
) -> PumpEnd
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            _ = cancel.cancelled() => return PumpEnd::Cancelled,
            read = reader.read_until(b'\n', &mut buf) => read,
        };

        match read {
            Ok(0) => return PumpEnd::Closed("connection closed by peer".to_string()),
            Ok(_) => {}
            Err(e) => return PumpEnd::Closed(e.to_string()),
        }

        // A bad byte spoils one line, not the connection.
        let event = match std::str::from_utf8(&buf) {
            Ok(line) => decode_line(line),
            Err(e) => Some(FeedEvent::Malformed(format!("invalid UTF-8: {}", e))),
        };

        match event {
            Some(FeedEvent::Snapshot(node)) => {
                hlog_trace!("Feed snapshot: {} bytes", buf.len());
                if msg_tx.send(Message::SnapshotReceived(node)).is_err() {
                    return PumpEnd::Cancelled;
                }
            }
            Some(FeedEvent::Ignored(event)) => {
                hlog_debug!("Feed: ignoring event '{}'", event);
            }
            Some(FeedEvent::Malformed(reason)) => {
                hlog_warn!("Feed: dropping malformed snapshot: {}", reason);
            }
            None => {}
        }
    }
}
