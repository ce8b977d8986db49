//! Controller lifecycle tests
//!
//! Drives the scope manager with a fake cluster client: controllable delays
//! for racing cancellations against in-flight fetches, and scripted log
//! streams for follower ordering/teardown behavior.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, StreamExt};

use pod9s::{
    ClientError, FetchResult, LogEvent, LogOptions, PodEvent, PodInfo, ResourceClient,
    ScopeManager, Tab,
};

type LogByteStream = pod9s::kube::LogByteStream;

struct FakeClient {
    namespaces: Vec<String>,
    // namespace -> (artificial delay, pod names)
    pods: HashMap<String, (Duration, Vec<String>)>,
    info_delay: Duration,
    streams: Mutex<VecDeque<LogByteStream>>,
}

impl FakeClient {
    fn new() -> Self {
        Self {
            namespaces: vec!["default".to_string(), "kube-system".to_string()],
            pods: HashMap::new(),
            info_delay: Duration::ZERO,
            streams: Mutex::new(VecDeque::new()),
        }
    }

    fn with_pods(mut self, namespace: &str, delay: Duration, pods: &[&str]) -> Self {
        self.pods.insert(
            namespace.to_string(),
            (delay, pods.iter().map(|p| p.to_string()).collect()),
        );
        self
    }

    fn with_stream(self, stream: LogByteStream) -> Self {
        self.streams.lock().unwrap().push_back(stream);
        self
    }
}

#[async_trait]
impl ResourceClient for FakeClient {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.namespaces.clone())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ClientError> {
        let (delay, pods) = self
            .pods
            .get(namespace)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                kind: "namespace",
                name: namespace.to_string(),
            })?;
        tokio::time::sleep(delay).await;
        Ok(pods)
    }

    async fn get_pod_info(&self, namespace: &str, pod: &str) -> Result<PodInfo, ClientError> {
        tokio::time::sleep(self.info_delay).await;
        Ok(PodInfo {
            name: pod.to_string(),
            namespace: namespace.to_string(),
            ..PodInfo::default()
        })
    }

    async fn list_pod_events(
        &self,
        _namespace: &str,
        _pod: &str,
    ) -> Result<Vec<PodEvent>, ClientError> {
        Ok(vec![PodEvent {
            reason: "Scheduled".to_string(),
            event_type: "Normal".to_string(),
            ..PodEvent::default()
        }])
    }

    async fn stream_pod_logs(
        &self,
        _namespace: &str,
        pod: &str,
        _opts: &LogOptions,
    ) -> Result<LogByteStream, ClientError> {
        self.streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ClientError::NotFound {
                kind: "pod",
                name: pod.to_string(),
            })
    }
}

fn line_chunks(lines: &[&str]) -> Vec<Result<Bytes, std::io::Error>> {
    lines
        .iter()
        .map(|l| Ok(Bytes::from(format!("{}\n", l))))
        .collect()
}

/// Finite stream: the given lines, then end-of-stream
fn ending_stream(lines: &[&str]) -> LogByteStream {
    Box::pin(stream::iter(line_chunks(lines)))
}

/// The given lines, then the stream stays open without producing anything
fn blocking_stream(lines: &[&str]) -> LogByteStream {
    Box::pin(stream::iter(line_chunks(lines)).chain(stream::pending()))
}

async fn wait_for<T>(mut poll: impl FnMut() -> Option<T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(value) = poll() {
                return value;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for a result")
}

async fn collect_log_events<C: ResourceClient>(
    manager: &mut ScopeManager<C>,
    count: usize,
) -> Vec<LogEvent> {
    tokio::time::timeout(Duration::from_secs(5), async {
        let mut out = Vec::new();
        while out.len() < count {
            out.extend(manager.drain_log_events(64));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        out
    })
    .await
    .expect("timed out waiting for log events")
}

#[tokio::test]
async fn worked_example_select_namespace_pod_and_follow_logs() {
    let client = FakeClient::new()
        .with_pods("default", Duration::ZERO, &["web-1", "web-2"])
        .with_stream(blocking_stream(&["a", "b"]));
    let mut manager = ScopeManager::new(Arc::new(client));

    manager.load_namespaces();
    let namespaces = wait_for(|| manager.poll_namespaces()).await;
    assert_eq!(
        namespaces,
        FetchResult::Ok(vec!["default".to_string(), "kube-system".to_string()])
    );

    manager.select_namespace("default");
    let pods = wait_for(|| manager.poll_pods()).await;
    assert_eq!(
        pods,
        FetchResult::Ok(vec!["web-1".to_string(), "web-2".to_string()])
    );

    manager.select_pod("web-1").unwrap();
    manager.select_tab(Tab::Logs).unwrap();

    let events = collect_log_events(&mut manager, 2).await;
    let lines: Vec<String> = events
        .iter()
        .map(|ev| match ev {
            LogEvent::Line(line) => line.text.clone(),
            other => panic!("unexpected log event: {:?}", other),
        })
        .collect();
    assert_eq!(lines, vec!["a", "b"]);

    // Upstream is blocked, so nothing further arrives
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(manager.drain_log_events(64).is_empty());
}

#[tokio::test]
async fn racing_namespace_switch_discards_the_stale_pod_list() {
    let client = FakeClient::new()
        .with_pods("slow", Duration::from_millis(200), &["stale-pod"])
        .with_pods("fast", Duration::from_millis(10), &["fresh-pod"]);
    let mut manager = ScopeManager::new(Arc::new(client));

    manager.select_namespace("slow");
    manager.select_namespace("fast");

    let pods = wait_for(|| manager.poll_pods()).await;
    assert_eq!(pods, FetchResult::Ok(vec!["fresh-pod".to_string()]));

    // Give the slow fetch time to have completed; its result must never
    // surface
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(manager.poll_pods().is_none());
}

#[tokio::test]
async fn switching_tabs_drops_the_in_flight_fetch_for_the_old_tab() {
    let mut client = FakeClient::new().with_pods("default", Duration::ZERO, &["web-1"]);
    client.info_delay = Duration::from_millis(150);
    let mut manager = ScopeManager::new(Arc::new(client));

    manager.select_namespace("default");
    wait_for(|| manager.poll_pods()).await;
    manager.select_pod("web-1").unwrap();

    manager.select_tab(Tab::Info).unwrap();
    manager.select_tab(Tab::Events).unwrap();

    let events = wait_for(|| manager.poll_events()).await;
    assert!(matches!(events, FetchResult::Ok(_)));

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(manager.poll_info().is_none());
}

#[tokio::test]
async fn log_lines_arrive_in_production_order() {
    let produced: Vec<String> = (0..100).map(|i| format!("line-{i:03}")).collect();
    let refs: Vec<&str> = produced.iter().map(String::as_str).collect();
    let client = FakeClient::new()
        .with_pods("default", Duration::ZERO, &["web-1"])
        .with_stream(ending_stream(&refs));
    let mut manager = ScopeManager::new(Arc::new(client));

    manager.select_namespace("default");
    wait_for(|| manager.poll_pods()).await;
    manager.select_pod("web-1").unwrap();
    manager.select_tab(Tab::Logs).unwrap();

    let events = collect_log_events(&mut manager, 101).await;
    let (lines, terminal): (Vec<_>, Vec<_>) = events
        .into_iter()
        .partition(|ev| matches!(ev, LogEvent::Line(_)));
    let received: Vec<String> = lines
        .into_iter()
        .map(|ev| match ev {
            LogEvent::Line(line) => line.text,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(received, produced);
    assert_eq!(terminal, vec![LogEvent::Ended]);
}

#[tokio::test]
async fn stream_end_closes_the_delivery_channel() {
    let client = FakeClient::new()
        .with_pods("default", Duration::ZERO, &["web-1"])
        .with_stream(ending_stream(&["only"]));
    let mut manager = ScopeManager::new(Arc::new(client));

    manager.select_namespace("default");
    wait_for(|| manager.poll_pods()).await;
    manager.select_pod("web-1").unwrap();
    manager.select_tab(Tab::Logs).unwrap();

    let events = collect_log_events(&mut manager, 2).await;
    assert_eq!(events.last(), Some(&LogEvent::Ended));

    // Channel is closed: no further events, ever
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(manager.drain_log_events(64).is_empty());
}

#[tokio::test]
async fn reselecting_logs_starts_a_fresh_follower_without_leaks() {
    // First stream has more lines queued behind a long stall; they must
    // never show up after the tab is switched away and back
    let first: LogByteStream = Box::pin(
        stream::iter(line_chunks(&["old-1", "old-2"])).chain(
            stream::once(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Bytes::from("leaked\n"))
            })
            .chain(stream::pending()),
        ),
    );
    let client = FakeClient::new()
        .with_pods("default", Duration::ZERO, &["web-1"])
        .with_stream(first)
        .with_stream(blocking_stream(&["new-1", "new-2"]));
    let mut manager = ScopeManager::new(Arc::new(client));

    manager.select_namespace("default");
    wait_for(|| manager.poll_pods()).await;
    manager.select_pod("web-1").unwrap();

    manager.select_tab(Tab::Logs).unwrap();
    let events = collect_log_events(&mut manager, 2).await;
    assert!(matches!(events[0], LogEvent::Line(_)));

    manager.select_tab(Tab::Events).unwrap();
    manager.select_tab(Tab::Logs).unwrap();

    let events = collect_log_events(&mut manager, 2).await;
    let lines: Vec<String> = events
        .into_iter()
        .map(|ev| match ev {
            LogEvent::Line(line) => line.text,
            other => panic!("unexpected log event: {:?}", other),
        })
        .collect();
    assert_eq!(lines, vec!["new-1", "new-2"]);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(manager.drain_log_events(64).is_empty());
}

#[tokio::test]
async fn cancelling_the_logs_tab_releases_the_stream_handle() {
    let released = Arc::new(AtomicBool::new(false));
    let guard = ReleaseGuard(released.clone());
    let tracked: LogByteStream = Box::pin(
        stream::iter(line_chunks(&["a"]))
            .chain(stream::pending())
            .map(move |item| {
                let _hold = &guard;
                item
            }),
    );
    let client = FakeClient::new()
        .with_pods("default", Duration::ZERO, &["web-1"])
        .with_stream(tracked);
    let mut manager = ScopeManager::new(Arc::new(client));

    manager.select_namespace("default");
    wait_for(|| manager.poll_pods()).await;
    manager.select_pod("web-1").unwrap();
    manager.select_tab(Tab::Logs).unwrap();
    collect_log_events(&mut manager, 1).await;

    // Switching tabs cancels the follower; it must drop the stream promptly
    manager.select_tab(Tab::Info).unwrap();
    tokio::time::timeout(Duration::from_secs(1), async {
        while !released.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("stream handle was not released after cancellation");
}

struct ReleaseGuard(Arc<AtomicBool>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn failed_pod_list_surfaces_as_an_error_result() {
    let client = FakeClient::new(); // no pods registered for any namespace
    let mut manager = ScopeManager::new(Arc::new(client));

    manager.select_namespace("default");
    let pods = wait_for(|| manager.poll_pods()).await;
    assert_eq!(
        pods,
        FetchResult::Err("namespace default not found".to_string())
    );
}
