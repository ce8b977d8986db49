//! pod9s - A K9s-inspired terminal UI for browsing pods and following their logs
//!
//! The heart of the crate is the hierarchical live-view controller in
//! [`controller`]: selecting a namespace, pod, or detail tab starts
//! background fetch tasks under nested cancellation scopes, and changing any
//! selection cancels and discards the in-flight work for the previous one.
//! The cluster accessor and the terminal UI are thin collaborators around it.

pub mod cli;
pub mod controller;
pub mod kube;
pub mod models;
#[cfg(feature = "tui")]
pub mod tui;

// Re-export commonly used types for convenience
pub use controller::{ControllerError, ScopeManager};
pub use kube::{ClientError, KubeResourceClient, LogOptions, ResourceClient};
pub use models::{FetchResult, LogEvent, LogLine, PodEvent, PodInfo, Selection, Tab};
