//! Fleet file records and the call journal.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use autoterm_core::{PowerState, ResourceId, ResourceState, TagSet, TargetGroupBinding};

use crate::error::{InventoryError, InventoryResult};

/// Contents of a fleet file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetFile {
    #[serde(default)]
    pub target_groups: Vec<TargetGroupRecord>,
    #[serde(default)]
    pub instances: Vec<InstanceRecord>,
}

impl FleetFile {
    /// Reject duplicate instance ids and target-group names.
    pub fn validate(&self) -> InventoryResult<()> {
        let mut ids = HashSet::new();
        for instance in &self.instances {
            if !ids.insert(instance.id.as_str()) {
                return Err(InventoryError::DuplicateInstance(instance.id.clone()));
            }
        }
        let mut names = HashSet::new();
        for group in &self.target_groups {
            if !names.insert(group.name.as_str()) {
                return Err(InventoryError::DuplicateTargetGroup(group.name.clone()));
            }
        }
        Ok(())
    }
}

/// A load-balancer target group known to the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroupRecord {
    pub name: String,
    /// Defaults to a synthetic `arn:autoterm:targetgroup/{name}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

impl TargetGroupRecord {
    pub fn arn(&self) -> String {
        self.arn
            .clone()
            .unwrap_or_else(|| format!("arn:autoterm:targetgroup/{}", self.name))
    }
}

/// One instance as written in the fleet file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub id: ResourceId,
    pub state: PowerState,
    #[serde(default)]
    pub tags: TagSet,
    /// Current memberships, updated by register/deregister calls.
    #[serde(default)]
    pub target_groups: Vec<TargetGroupBinding>,
}

impl InstanceRecord {
    pub fn to_resource(&self) -> ResourceState {
        ResourceState {
            id: self.id.clone(),
            power_state: self.state,
            tags: self.tags.clone(),
            target_groups: self.target_groups.clone(),
        }
    }
}

/// A provider call that changed the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum JournalEntry {
    Stop { id: ResourceId },
    Start { id: ResourceId, note: String },
    Terminate { id: ResourceId },
    Register { group: String, id: ResourceId, port: u16 },
    Deregister { group: String, id: ResourceId },
}

impl JournalEntry {
    pub fn id(&self) -> &str {
        match self {
            JournalEntry::Stop { id }
            | JournalEntry::Start { id, .. }
            | JournalEntry::Terminate { id }
            | JournalEntry::Register { id, .. }
            | JournalEntry::Deregister { id, .. } => id,
        }
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalEntry::Stop { id } => write!(f, "stop {id}"),
            JournalEntry::Start { id, note } => write!(f, "start {id} ({note})"),
            JournalEntry::Terminate { id } => write!(f, "terminate {id}"),
            JournalEntry::Register { group, id, port } => {
                write!(f, "register {id} into {group}:{port}")
            }
            JournalEntry::Deregister { group, id } => write!(f, "deregister {id} from {group}"),
        }
    }
}
