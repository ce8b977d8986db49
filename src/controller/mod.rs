//! Hierarchical live-view controller
//!
//! Ties the operator's selection (namespace -> pod -> detail tab) to
//! background fetch tasks. Each selection level owns a cancellation scope;
//! changing a selection cancels and replaces the scope at that level and
//! everything nested under it, so an in-flight fetch for the previous
//! selection can never reach the view.

mod fetch;
mod follower;
mod manager;
mod scope;

pub use manager::ScopeManager;

use thiserror::Error;

/// Bounded tail of historical lines requested when a log stream opens
pub const DEFAULT_LOG_TAIL_LINES: i64 = 200;

/// Capacity of the log delivery channel
///
/// Deliberately tiny: when the view hasn't drained it the follower blocks on
/// push, which in turn pauses the upstream read. Lines are never dropped.
pub(crate) const LOG_CHANNEL_CAPACITY: usize = 1;

/// Contract violations in the selection protocol
///
/// Selecting a pod without a namespace, or a tab without a pod, is a
/// programming error in the caller, not a cluster condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}
