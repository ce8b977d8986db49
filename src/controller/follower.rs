//! Log follower
//!
//! Bridges the collaborator's byte stream into line-oriented events on a
//! bounded delivery channel. One follower per Logs tab scope; it exits on
//! end-of-stream, cancellation, or a read error, and on every exit path the
//! channel closes and the stream handle is dropped.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::kube::{LogOptions, ResourceClient};
use crate::models::{LogEvent, LogLine};

pub(crate) async fn follow_pod_logs<C: ResourceClient>(
    client: Arc<C>,
    namespace: String,
    pod: String,
    token: CancellationToken,
    tx: mpsc::Sender<LogEvent>,
) {
    let opts = LogOptions::default();
    let stream = tokio::select! {
        _ = token.cancelled() => return,
        res = client.stream_pod_logs(&namespace, &pod, &opts) => match res {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(%namespace, %pod, error = %e, "failed to open log stream");
                deliver(&tx, &token, LogEvent::Failed(e.to_string())).await;
                return;
            }
        },
    };

    tracing::debug!(%namespace, %pod, "log follower started");
    pump_lines(stream, tx, token).await;
    tracing::debug!(%namespace, %pod, "log follower ended");
}

/// Consume a byte stream, split it on newlines, and push each line into the
/// bounded channel. A full channel blocks the push, which pauses the upstream
/// read as well; lines are never dropped.
pub(crate) async fn pump_lines<S, E>(
    stream: S,
    tx: mpsc::Sender<LogEvent>,
    token: CancellationToken,
) where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let stream = stream.fuse();
    futures::pin_mut!(stream);
    let mut buf = BytesMut::new();

    loop {
        let next = tokio::select! {
            _ = token.cancelled() => return,
            next = stream.next() => next,
        };
        match next {
            Some(Ok(chunk)) => {
                buf.extend_from_slice(&chunk);
                while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                    let line = buf.split_to(pos);
                    let _ = buf.split_to(1); // drop '\n'
                    if !deliver(&tx, &token, line_event(&line)).await {
                        return;
                    }
                }
            }
            Some(Err(e)) => {
                // Fatal to this follower only; a fresh tab selection starts a
                // new one. Distinct from a clean end of stream.
                tracing::warn!(error = %e, "log stream read failed");
                deliver(&tx, &token, LogEvent::Failed(e.to_string())).await;
                return;
            }
            None => break,
        }
    }

    // Flush a trailing partial line, then signal the clean end of stream
    if !buf.is_empty() && !deliver(&tx, &token, line_event(&buf)).await {
        return;
    }
    deliver(&tx, &token, LogEvent::Ended).await;
}

fn line_event(raw: &[u8]) -> LogEvent {
    LogEvent::Line(LogLine {
        text: String::from_utf8_lossy(raw).into_owned(),
    })
}

/// Returns false when delivery is no longer possible (cancelled or the view
/// side of the channel is gone)
async fn deliver(tx: &mpsc::Sender<LogEvent>, token: &CancellationToken, event: LogEvent) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        res = tx.send(event) => res.is_ok(),
    }
}
