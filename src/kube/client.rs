//! The Resource Client collaborator
//!
//! A thin accessor over the cluster API: list namespaces, list pods, get a
//! pod's spec/status snapshot, list its events, and open a line-oriented log
//! stream. The controller only sees this trait, which keeps it testable with
//! a fake client.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use k8s_openapi::api::core::v1::{Event, Namespace, Pod};
use kube::api::{Api, ListParams, LogParams};
use kube::{Client, ResourceExt};
use thiserror::Error;
use tokio_util::compat::FuturesAsyncReadCompatExt;
use tokio_util::io::ReaderStream;

use crate::models::{PodEvent, PodInfo};

/// Errors surfaced by the Resource Client
///
/// None of these panic the process: one-shot fetches resolve them to an error
/// result for the view, and at startup the binary exits non-zero.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Resource disappeared between list and get
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    /// API server unreachable, auth failure, or any other request error
    #[error("cluster request failed: {0}")]
    Api(#[from] kube::Error),
}

/// Options for opening a pod log stream
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Keep the stream open and follow new lines
    pub follow: bool,
    /// Bounded tail of historical lines requested from the server
    pub tail_lines: Option<i64>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            follow: true,
            tail_lines: Some(crate::controller::DEFAULT_LOG_TAIL_LINES),
        }
    }
}

/// Raw byte stream of pod log output; dropping it releases the connection
pub type LogByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Cluster accessor consumed by the controller
#[async_trait]
pub trait ResourceClient: Send + Sync + 'static {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClientError>;

    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ClientError>;

    async fn get_pod_info(&self, namespace: &str, pod: &str) -> Result<PodInfo, ClientError>;

    async fn list_pod_events(
        &self,
        namespace: &str,
        pod: &str,
    ) -> Result<Vec<PodEvent>, ClientError>;

    /// Open a log stream; the returned stream ends when the server closes it
    /// and is terminated early by dropping it
    async fn stream_pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        opts: &LogOptions,
    ) -> Result<LogByteStream, ClientError>;
}

/// Production implementation over kube-rs
#[derive(Clone)]
pub struct KubeResourceClient {
    client: Client,
}

impl KubeResourceClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

fn map_get_error(err: kube::Error, kind: &'static str, name: &str) -> ClientError {
    match err {
        kube::Error::Api(ref resp) if resp.code == 404 => ClientError::NotFound {
            kind,
            name: name.to_string(),
        },
        other => ClientError::Api(other),
    }
}

#[async_trait]
impl ResourceClient for KubeResourceClient {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClientError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(|ns| ns.name_any()).collect())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ClientError> {
        let list = self.pods(namespace).list(&ListParams::default()).await?;
        Ok(list.items.iter().map(|pod| pod.name_any()).collect())
    }

    async fn get_pod_info(&self, namespace: &str, pod: &str) -> Result<PodInfo, ClientError> {
        let obj = self
            .pods(namespace)
            .get(pod)
            .await
            .map_err(|e| map_get_error(e, "pod", pod))?;
        Ok(PodInfo::from_pod(&obj))
    }

    async fn list_pod_events(
        &self,
        namespace: &str,
        pod: &str,
    ) -> Result<Vec<PodEvent>, ClientError> {
        let api: Api<Event> = Api::namespaced(self.client.clone(), namespace);
        let params = ListParams::default().fields(&format!(
            "involvedObject.name={},involvedObject.kind=Pod",
            pod
        ));
        let list = api.list(&params).await?;
        Ok(list.items.iter().map(PodEvent::from_event).collect())
    }

    async fn stream_pod_logs(
        &self,
        namespace: &str,
        pod: &str,
        opts: &LogOptions,
    ) -> Result<LogByteStream, ClientError> {
        let mut lp = LogParams::default();
        lp.follow = opts.follow;
        lp.tail_lines = opts.tail_lines;

        tracing::debug!(%namespace, %pod, follow = lp.follow, tail = ?lp.tail_lines, "opening log stream");

        let reader = self
            .pods(namespace)
            .log_stream(pod, &lp)
            .await
            .map_err(|e| map_get_error(e, "pod", pod))?;

        // kube hands back a futures::AsyncBufRead; bridge it into a tokio
        // bytes stream the follower can select! on
        Ok(Box::pin(ReaderStream::new(reader.compat())))
    }
}
