//! Shared types used across autoterm crates.
//!
//! Everything here is a per-cycle snapshot: rebuilt from the live tag set
//! and power state on every evaluation, never cached between cycles.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tags;

/// Unique identifier of a compute instance (e.g. `i-0abc123`).
pub type ResourceId = String;

/// Flat tag mapping attached to a resource. Keys are unique.
pub type TagSet = BTreeMap<String, String>;

// ── Power state ───────────────────────────────────────────────────

/// Coarse power state of a compute instance.
///
/// Only `Running` and `Stopped` are acted upon; transitional provider
/// states (pending, stopping, shutting-down) collapse into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    Running,
    Stopped,
    Terminated,
    Other,
}

impl PowerState {
    pub fn label(&self) -> &'static str {
        match self {
            PowerState::Running => "running",
            PowerState::Stopped => "stopped",
            PowerState::Terminated => "terminated",
            PowerState::Other => "other",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Target groups ─────────────────────────────────────────────────

/// A (load-balancer target group, port) pair a resource can be bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetGroupBinding {
    pub name: String,
    pub port: u16,
}

impl TargetGroupBinding {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }
}

impl fmt::Display for TargetGroupBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.port)
    }
}

// ── Resource ──────────────────────────────────────────────────────

/// Live view of one compute instance as reported by the lister.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub id: ResourceId,
    pub power_state: PowerState,
    #[serde(default)]
    pub tags: TagSet,
    /// Target groups the instance is currently registered in.
    #[serde(default)]
    pub target_groups: Vec<TargetGroupBinding>,
}

impl ResourceState {
    /// Tag value for `key`, if present.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Display name from the `Name` tag, or an empty string.
    pub fn display_name(&self) -> &str {
        self.tag(tags::NAME).unwrap_or_default()
    }
}

// ── Policy ────────────────────────────────────────────────────────

/// The five schedule expressions a policy may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySchedules {
    pub on: Option<String>,
    pub off: Option<String>,
    pub kill: Option<String>,
    /// Register into the resource's target groups.
    pub tgr: Option<String>,
    /// Deregister from the resource's target groups.
    pub tgd: Option<String>,
}

impl PolicySchedules {
    pub fn is_empty(&self) -> bool {
        self.on.is_none()
            && self.off.is_none()
            && self.kill.is_none()
            && self.tgr.is_none()
            && self.tgd.is_none()
    }
}

/// One numbered scheduling slot on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// 0-based ordinal. Index `n > 0` reads tags suffixed with `" {n + 1}"`.
    pub index: usize,
    pub disabled: bool,
    pub schedules: PolicySchedules,
}

// ── Actions ───────────────────────────────────────────────────────

/// An operation the engine asks the provider to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Start,
    Stop,
    Terminate,
    RegisterToTargetGroup(TargetGroupBinding),
    DeregisterFromTargetGroup(TargetGroupBinding),
    NoOp,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Start => f.write_str("start"),
            Action::Stop => f.write_str("stop"),
            Action::Terminate => f.write_str("terminate"),
            Action::RegisterToTargetGroup(b) => write!(f, "register {b}"),
            Action::DeregisterFromTargetGroup(b) => write!(f, "deregister {b}"),
            Action::NoOp => f.write_str("no-op"),
        }
    }
}

/// Result of a power call, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub previous: PowerState,
    pub current: PowerState,
}

/// Opaque reference to a provider target group, returned by lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroupHandle {
    pub name: String,
    /// Provider-side identifier (an ARN on AWS).
    pub arn: String,
}
