//! One-shot fetch tasks
//!
//! A fetch task runs a single collaborator call off the interactive thread
//! and delivers exactly one `FetchResult` through a oneshot channel. The
//! manager holds the receiver; replacing a scope also replaces the receiver,
//! so a result from a superseded task is structurally unobservable.

use std::future::Future;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::kube::ClientError;
use crate::models::FetchResult;

pub(crate) fn spawn_fetch<T, F>(
    token: CancellationToken,
    fut: F,
) -> oneshot::Receiver<FetchResult<T>>
where
    T: Send + 'static,
    F: Future<Output = Result<T, ClientError>> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("fetch cancelled in flight");
                FetchResult::Cancelled
            }
            res = fut => {
                // The scope may have been torn down between the call
                // completing and this task resuming; a late result for a
                // stale selection must be discarded, not delivered.
                if token.is_cancelled() {
                    FetchResult::Cancelled
                } else {
                    match res {
                        Ok(value) => FetchResult::Ok(value),
                        Err(e) => {
                            tracing::warn!(error = %e, "fetch failed");
                            FetchResult::Err(e.to_string())
                        }
                    }
                }
            }
        };
        let _ = tx.send(result);
    });
    rx
}

/// Non-blocking poll of a pending result slot, consumed at most once
///
/// A closed channel without a value means the task was torn down before it
/// could deliver; that is indistinguishable from cancellation for the view.
pub(crate) fn poll_result<T>(
    slot: &mut Option<oneshot::Receiver<FetchResult<T>>>,
) -> Option<FetchResult<T>> {
    let rx = slot.as_mut()?;
    match rx.try_recv() {
        Ok(result) => {
            *slot = None;
            Some(result)
        }
        Err(oneshot::error::TryRecvError::Empty) => None,
        Err(oneshot::error::TryRecvError::Closed) => {
            *slot = None;
            Some(FetchResult::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn delivers_ok_exactly_once() {
        let token = CancellationToken::new();
        let mut slot = Some(spawn_fetch(token, async { Ok(42u32) }));

        let result = loop {
            if let Some(result) = poll_result(&mut slot) {
                break result;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        };
        assert_eq!(result, FetchResult::Ok(42));
        assert!(slot.is_none());
    }

    #[tokio::test]
    async fn cancellation_wins_over_a_slow_call() {
        let token = CancellationToken::new();
        let mut slot = Some(spawn_fetch(token.clone(), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1u32)
        }));

        token.cancel();
        let result = loop {
            if let Some(result) = poll_result(&mut slot) {
                break result;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        };
        assert_eq!(result, FetchResult::Cancelled);
    }

    #[tokio::test]
    async fn client_error_surfaces_as_err() {
        let token = CancellationToken::new();
        let mut slot = Some(spawn_fetch(token, async {
            Err::<u32, _>(ClientError::NotFound {
                kind: "pod",
                name: "web-1".to_string(),
            })
        }));

        let result = loop {
            if let Some(result) = poll_result(&mut slot) {
                break result;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        };
        assert_eq!(result, FetchResult::Err("pod web-1 not found".to_string()));
    }
}
