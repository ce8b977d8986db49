//! Data model for the pod browser
//!
//! Flat, read-only snapshots copied from Kubernetes API responses at fetch
//! time, plus the selection/result types the controller hands to the view.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{
    Container, ContainerStatus, Event, Pod, PodCondition, PodIP, Toleration, Volume,
};
use serde::Serialize;

/// Detail tab for a selected pod
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tab {
    #[default]
    Info,
    Events,
    Logs,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Info, Tab::Events, Tab::Logs];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Info => "Info",
            Tab::Events => "Events",
            Tab::Logs => "Logs",
        }
    }

    /// Next tab, wrapping around
    pub fn next(&self) -> Tab {
        match self {
            Tab::Info => Tab::Events,
            Tab::Events => Tab::Logs,
            Tab::Logs => Tab::Info,
        }
    }

    /// Previous tab, wrapping around
    pub fn prev(&self) -> Tab {
        match self {
            Tab::Info => Tab::Logs,
            Tab::Events => Tab::Info,
            Tab::Logs => Tab::Events,
        }
    }
}

/// Current selection: namespace -> pod -> detail tab
///
/// `pod` is only ever set while `namespace` is set; `tab` is meaningful only
/// while `pod` is set. Mutated exclusively by the controller.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub namespace: Option<String>,
    pub pod: Option<String>,
    pub tab: Tab,
}

/// Outcome of a one-shot background fetch, delivered exactly once
#[derive(Debug, PartialEq)]
pub enum FetchResult<T> {
    Ok(T),
    Err(String),
    Cancelled,
}

/// A single log line republished by the log follower
#[derive(Clone, Debug, PartialEq)]
pub struct LogLine {
    pub text: String,
}

/// Event on the log delivery channel
///
/// `Ended` is the normal end of the upstream stream; `Failed` is a read error
/// that terminated this follower instance. Both are followed by channel close.
#[derive(Clone, Debug, PartialEq)]
pub enum LogEvent {
    Line(LogLine),
    Ended,
    Failed(String),
}

/// Snapshot of a pod's spec and status, copied at fetch time
///
/// Collaborator response fields are carried as-is (the k8s-openapi types are
/// serializable), with no defaults substituted: an absent priority stays
/// absent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub priority: Option<i32>,
    pub node: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub container_statuses: Vec<ContainerStatus>,
    pub ip: Option<String>,
    pub ips: Vec<PodIP>,
    pub containers: Vec<Container>,
    pub conditions: Vec<PodCondition>,
    pub volumes: Vec<Volume>,
    pub qos_class: Option<String>,
    pub node_selectors: BTreeMap<String, String>,
    pub tolerations: Vec<Toleration>,
}

impl PodInfo {
    /// Copy the fields we display out of a full Pod object
    pub fn from_pod(pod: &Pod) -> Self {
        let meta = &pod.metadata;
        let spec = pod.spec.as_ref();
        let status = pod.status.as_ref();

        Self {
            name: meta.name.clone().unwrap_or_default(),
            namespace: meta.namespace.clone().unwrap_or_default(),
            priority: spec.and_then(|s| s.priority),
            node: spec.and_then(|s| s.node_name.clone()),
            start_time: meta.creation_timestamp.as_ref().map(|t| t.0),
            labels: meta.labels.clone().unwrap_or_default(),
            annotations: meta.annotations.clone().unwrap_or_default(),
            container_statuses: status
                .and_then(|s| s.container_statuses.clone())
                .unwrap_or_default(),
            ip: status.and_then(|s| s.pod_ip.clone()),
            ips: status.and_then(|s| s.pod_ips.clone()).unwrap_or_default(),
            containers: spec.map(|s| s.containers.clone()).unwrap_or_default(),
            conditions: status
                .and_then(|s| s.conditions.clone())
                .unwrap_or_default(),
            volumes: spec.and_then(|s| s.volumes.clone()).unwrap_or_default(),
            qos_class: status.and_then(|s| s.qos_class.clone()),
            node_selectors: spec
                .and_then(|s| s.node_selector.clone())
                .unwrap_or_default(),
            tolerations: spec.and_then(|s| s.tolerations.clone()).unwrap_or_default(),
        }
    }
}

/// Snapshot of a cluster event attached to a pod
#[derive(Clone, Debug, Default, Serialize)]
pub struct PodEvent {
    pub name: String,
    pub event_type: String,
    pub reason: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub message: String,
}

impl PodEvent {
    pub fn from_event(event: &Event) -> Self {
        Self {
            name: event.metadata.name.clone().unwrap_or_default(),
            event_type: event.type_.clone().unwrap_or_default(),
            reason: event.reason.clone().unwrap_or_default(),
            creation_time: event.metadata.creation_timestamp.as_ref().map(|t| t.0),
            message: event.message.clone().unwrap_or_default(),
        }
    }

    /// Warning and other non-Normal events get highlighted in the events table
    pub fn is_normal(&self) -> bool {
        self.event_type == "Normal"
    }
}
