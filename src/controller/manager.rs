//! Scope manager
//!
//! Single writer for the selection and the scope tree. Each `select_*` call
//! tears down the scope at its level (and everything nested below) before
//! creating the replacement, so at most one task tree exists per selection
//! level and it always corresponds to the current selection. Results come
//! back through receivers the render loop polls; tearing down a scope also
//! drops its pending receiver, which is what discards stale results.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use super::fetch::{poll_result, spawn_fetch};
use super::follower::follow_pod_logs;
use super::scope::Scope;
use super::{ControllerError, LOG_CHANNEL_CAPACITY};
use crate::kube::ResourceClient;
use crate::models::{FetchResult, LogEvent, PodEvent, PodInfo, Selection, Tab};

type ResultSlot<T> = Option<oneshot::Receiver<FetchResult<T>>>;

pub struct ScopeManager<C: ResourceClient> {
    client: Arc<C>,
    selection: Selection,

    root: Scope,
    // One-shot namespace listing lives at root level, sibling of the
    // namespace scope, so changing namespaces does not cancel it.
    list_scope: Option<Scope>,
    namespace_scope: Option<Scope>,
    pod_scope: Option<Scope>,
    tab_scope: Option<Scope>,

    namespaces_rx: ResultSlot<Vec<String>>,
    pods_rx: ResultSlot<Vec<String>>,
    info_rx: ResultSlot<PodInfo>,
    events_rx: ResultSlot<Vec<PodEvent>>,
    log_rx: Option<mpsc::Receiver<LogEvent>>,
}

impl<C: ResourceClient> ScopeManager<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            selection: Selection::default(),
            root: Scope::new(),
            list_scope: None,
            namespace_scope: None,
            pod_scope: None,
            tab_scope: None,
            namespaces_rx: None,
            pods_rx: None,
            info_rx: None,
            events_rx: None,
            log_rx: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Start a one-shot namespace listing under the root scope
    pub fn load_namespaces(&mut self) {
        let scope = self.root.child();
        let client = self.client.clone();
        self.namespaces_rx = Some(spawn_fetch(scope.token(), async move {
            client.list_namespaces().await
        }));
        self.list_scope = Some(scope);
    }

    /// Select a namespace and start listing its pods
    ///
    /// Cancels the previous namespace scope and everything nested under it.
    /// The empty string deselects and returns the controller to idle.
    pub fn select_namespace(&mut self, namespace: &str) {
        self.teardown_pod_level();
        self.pods_rx = None;
        self.namespace_scope = None;

        if namespace.is_empty() {
            self.selection = Selection {
                tab: self.selection.tab,
                ..Selection::default()
            };
            return;
        }

        tracing::debug!(%namespace, "namespace selected");
        self.selection.namespace = Some(namespace.to_string());
        self.selection.pod = None;

        let scope = self.root.child();
        let client = self.client.clone();
        let ns = namespace.to_string();
        self.pods_rx = Some(spawn_fetch(scope.token(), async move {
            client.list_pods(&ns).await
        }));
        self.namespace_scope = Some(scope);
    }

    /// Select a pod under the current namespace
    ///
    /// Does not start a tab fetch; the caller re-applies the current tab with
    /// [`select_tab`](Self::select_tab) once the pod is set.
    pub fn select_pod(&mut self, pod: &str) -> Result<(), ControllerError> {
        if self.selection.namespace.is_none() {
            return Err(ControllerError::InvalidState(
                "cannot select a pod with no namespace selected",
            ));
        }

        self.teardown_pod_level();
        tracing::debug!(%pod, "pod selected");
        self.selection.pod = Some(pod.to_string());

        let parent = self
            .namespace_scope
            .as_ref()
            .expect("namespace scope exists while a namespace is selected");
        self.pod_scope = Some(parent.child());
        Ok(())
    }

    /// Select a detail tab and start exactly one task for it: a one-shot
    /// fetch for Info/Events, a log follower for Logs
    pub fn select_tab(&mut self, tab: Tab) -> Result<(), ControllerError> {
        let (Some(namespace), Some(pod)) =
            (self.selection.namespace.clone(), self.selection.pod.clone())
        else {
            return Err(ControllerError::InvalidState(
                "cannot select a tab with no pod selected",
            ));
        };

        // Replace only the tab scope; pending tab results go with it
        self.tab_scope = None;
        self.info_rx = None;
        self.events_rx = None;
        self.log_rx = None;
        self.selection.tab = tab;

        let parent = self
            .pod_scope
            .as_ref()
            .expect("pod scope exists while a pod is selected");
        let scope = parent.child();
        let client = self.client.clone();

        match tab {
            Tab::Info => {
                self.info_rx = Some(spawn_fetch(scope.token(), async move {
                    client.get_pod_info(&namespace, &pod).await
                }));
            }
            Tab::Events => {
                self.events_rx = Some(spawn_fetch(scope.token(), async move {
                    client.list_pod_events(&namespace, &pod).await
                }));
            }
            Tab::Logs => {
                let (tx, rx) = mpsc::channel(LOG_CHANNEL_CAPACITY);
                tokio::spawn(follow_pod_logs(client, namespace, pod, scope.token(), tx));
                self.log_rx = Some(rx);
            }
        }
        self.tab_scope = Some(scope);
        Ok(())
    }

    fn teardown_pod_level(&mut self) {
        self.tab_scope = None;
        self.pod_scope = None;
        self.selection.pod = None;
        self.info_rx = None;
        self.events_rx = None;
        self.log_rx = None;
    }

    // Poll accessors, called from the render loop. Each one-shot result is
    // observed at most once; nothing here blocks.

    pub fn poll_namespaces(&mut self) -> Option<FetchResult<Vec<String>>> {
        poll_result(&mut self.namespaces_rx)
    }

    pub fn poll_pods(&mut self) -> Option<FetchResult<Vec<String>>> {
        poll_result(&mut self.pods_rx)
    }

    pub fn poll_info(&mut self) -> Option<FetchResult<PodInfo>> {
        poll_result(&mut self.info_rx)
    }

    pub fn poll_events(&mut self) -> Option<FetchResult<Vec<PodEvent>>> {
        poll_result(&mut self.events_rx)
    }

    /// Drain up to `max` pending log events without blocking
    ///
    /// Draining in bounded batches keeps a chatty stream from starving the
    /// render loop. A closed channel (follower exited) clears the slot, after
    /// which no further log events can be observed.
    pub fn drain_log_events(&mut self, max: usize) -> Vec<LogEvent> {
        let mut out = Vec::new();
        let Some(rx) = self.log_rx.as_mut() else {
            return out;
        };
        while out.len() < max {
            match rx.try_recv() {
                Ok(event) => out.push(event),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.log_rx = None;
                    break;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kube::{ClientError, LogByteStream, LogOptions};
    use async_trait::async_trait;

    struct NoopClient;

    #[async_trait]
    impl ResourceClient for NoopClient {
        async fn list_namespaces(&self) -> Result<Vec<String>, ClientError> {
            Ok(Vec::new())
        }
        async fn list_pods(&self, _namespace: &str) -> Result<Vec<String>, ClientError> {
            Ok(Vec::new())
        }
        async fn get_pod_info(&self, _ns: &str, _pod: &str) -> Result<PodInfo, ClientError> {
            Ok(PodInfo::default())
        }
        async fn list_pod_events(&self, _ns: &str, _pod: &str) -> Result<Vec<PodEvent>, ClientError> {
            Ok(Vec::new())
        }
        async fn stream_pod_logs(
            &self,
            _ns: &str,
            _pod: &str,
            _opts: &LogOptions,
        ) -> Result<LogByteStream, ClientError> {
            Ok(Box::pin(futures::stream::empty()))
        }
    }

    #[tokio::test]
    async fn pod_selection_without_namespace_is_invalid() {
        let mut manager = ScopeManager::new(Arc::new(NoopClient));
        assert!(matches!(
            manager.select_pod("web-1"),
            Err(ControllerError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn tab_selection_without_pod_is_invalid() {
        let mut manager = ScopeManager::new(Arc::new(NoopClient));
        manager.select_namespace("default");
        assert!(matches!(
            manager.select_tab(Tab::Logs),
            Err(ControllerError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn empty_namespace_returns_to_idle_without_a_fetch() {
        let mut manager = ScopeManager::new(Arc::new(NoopClient));
        manager.select_namespace("default");
        manager.select_namespace("");

        assert!(manager.selection().namespace.is_none());
        assert!(manager.selection().pod.is_none());
        // No pod-list fetch is pending after deselection
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(manager.poll_pods().is_none());
    }

    #[tokio::test]
    async fn selecting_a_namespace_clears_the_pod_selection() {
        let mut manager = ScopeManager::new(Arc::new(NoopClient));
        manager.select_namespace("default");
        manager.select_pod("web-1").unwrap();
        manager.select_namespace("kube-system");
        assert!(manager.selection().pod.is_none());
    }
}
