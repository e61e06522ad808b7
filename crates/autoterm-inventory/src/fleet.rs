//! In-memory provider collaborators over a loaded fleet file.
//!
//! Power transitions follow the provider's rules: stop needs `Running`,
//! start needs `Stopped`, terminate accepts either. Anything else is an
//! `InvalidState` error and leaves the instance untouched.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use autoterm_core::{
    PowerControl, PowerState, ProviderError, ProviderFuture, ProviderResult, ResourceLister,
    ResourceState, StateChange, TargetGroupBinding, TargetGroupControl, TargetGroupHandle,
};

use crate::error::InventoryResult;
use crate::types::{FleetFile, InstanceRecord, JournalEntry, TargetGroupRecord};

struct Inner {
    target_groups: Vec<TargetGroupRecord>,
    instances: Vec<InstanceRecord>,
    journal: Vec<JournalEntry>,
    failing: HashSet<String>,
    fail_listing: bool,
}

impl Inner {
    fn instance_mut(&mut self, id: &str) -> ProviderResult<&mut InstanceRecord> {
        if self.failing.contains(id) {
            return Err(ProviderError::Api(format!("injected failure for {id}")));
        }
        self.instances
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    fn transition(
        &mut self,
        id: &str,
        operation: &'static str,
        allowed: &[PowerState],
        next: PowerState,
    ) -> ProviderResult<StateChange> {
        let instance = self.instance_mut(id)?;
        let previous = instance.state;
        if !allowed.contains(&previous) {
            return Err(ProviderError::InvalidState {
                id: id.to_string(),
                state: previous.to_string(),
                operation,
            });
        }
        instance.state = next;
        if next == PowerState::Terminated {
            instance.target_groups.clear();
        }
        debug!(resource = %id, %previous, current = %next, "power transition");
        Ok(StateChange {
            previous,
            current: next,
        })
    }
}

/// Shared, mutable fleet. Cloning yields another handle to the same fleet.
#[derive(Clone)]
pub struct InMemoryFleet {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryFleet {
    pub fn new(file: FleetFile) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                target_groups: file.target_groups,
                instances: file.instances,
                journal: Vec::new(),
                failing: HashSet::new(),
                fail_listing: false,
            })),
        }
    }

    /// Load a fleet file from disk.
    pub fn open(path: &Path) -> InventoryResult<Self> {
        Ok(Self::new(FleetFile::from_file(path)?))
    }

    /// Current fleet contents, including every applied change.
    pub async fn snapshot(&self) -> FleetFile {
        let inner = self.inner.read().await;
        FleetFile {
            target_groups: inner.target_groups.clone(),
            instances: inner.instances.clone(),
        }
    }

    /// Write the current fleet contents to `path`.
    pub async fn save(&self, path: &Path) -> InventoryResult<()> {
        self.snapshot().await.save(path)
    }

    pub async fn instance(&self, id: &str) -> Option<InstanceRecord> {
        let inner = self.inner.read().await;
        inner.instances.iter().find(|i| i.id == id).cloned()
    }

    /// Every successful call, in the order it was applied.
    pub async fn journal(&self) -> Vec<JournalEntry> {
        self.inner.read().await.journal.clone()
    }

    /// Instance ids grouped by target-group name.
    pub async fn memberships(&self) -> BTreeMap<String, Vec<String>> {
        let inner = self.inner.read().await;
        let mut members: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for instance in &inner.instances {
            for binding in &instance.target_groups {
                members
                    .entry(binding.name.clone())
                    .or_default()
                    .push(instance.id.clone());
            }
        }
        members
    }

    /// Make every power and target-group call for `id` fail.
    pub async fn fail_on(&self, id: &str) {
        self.inner.write().await.failing.insert(id.to_string());
    }

    /// Make `list` fail until reset.
    pub async fn fail_listing(&self, fail: bool) {
        self.inner.write().await.fail_listing = fail;
    }

    /// Overwrite an instance's power state without journaling.
    pub async fn set_state(&self, id: &str, state: PowerState) -> bool {
        let mut inner = self.inner.write().await;
        match inner.instances.iter_mut().find(|i| i.id == id) {
            Some(instance) => {
                instance.state = state;
                true
            }
            None => false,
        }
    }
}

impl ResourceLister for InMemoryFleet {
    fn list(&self) -> ProviderFuture<'_, Vec<ResourceState>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            if inner.fail_listing {
                return Err(ProviderError::Api("injected listing failure".to_string()));
            }
            Ok(inner.instances.iter().map(InstanceRecord::to_resource).collect())
        })
    }
}

impl PowerControl for InMemoryFleet {
    fn stop<'a>(&'a self, id: &'a str) -> ProviderFuture<'a, StateChange> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let change = inner.transition(id, "stop", &[PowerState::Running], PowerState::Stopped)?;
            inner.journal.push(JournalEntry::Stop { id: id.to_string() });
            Ok(change)
        })
    }

    fn start<'a>(&'a self, id: &'a str, note: &'a str) -> ProviderFuture<'a, StateChange> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let change =
                inner.transition(id, "start", &[PowerState::Stopped], PowerState::Running)?;
            inner.journal.push(JournalEntry::Start {
                id: id.to_string(),
                note: note.to_string(),
            });
            Ok(change)
        })
    }

    fn terminate<'a>(&'a self, id: &'a str) -> ProviderFuture<'a, StateChange> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let change = inner.transition(
                id,
                "terminate",
                &[PowerState::Running, PowerState::Stopped],
                PowerState::Terminated,
            )?;
            inner.journal.push(JournalEntry::Terminate { id: id.to_string() });
            Ok(change)
        })
    }
}

impl TargetGroupControl for InMemoryFleet {
    fn lookup<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, Option<TargetGroupHandle>> {
        Box::pin(async move {
            let inner = self.inner.read().await;
            Ok(inner
                .target_groups
                .iter()
                .find(|g| g.name == name)
                .map(|g| TargetGroupHandle {
                    name: g.name.clone(),
                    arn: g.arn(),
                }))
        })
    }

    fn register<'a>(
        &'a self,
        group: &'a TargetGroupHandle,
        id: &'a str,
        port: u16,
    ) -> ProviderFuture<'a, ()> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let instance = inner.instance_mut(id)?;
            let binding = TargetGroupBinding::new(group.name.clone(), port);
            if !instance.target_groups.contains(&binding) {
                instance.target_groups.push(binding);
            }
            inner.journal.push(JournalEntry::Register {
                group: group.name.clone(),
                id: id.to_string(),
                port,
            });
            Ok(())
        })
    }

    fn deregister<'a>(
        &'a self,
        group: &'a TargetGroupHandle,
        id: &'a str,
    ) -> ProviderFuture<'a, ()> {
        Box::pin(async move {
            let mut inner = self.inner.write().await;
            let instance = inner.instance_mut(id)?;
            instance.target_groups.retain(|b| b.name != group.name);
            inner.journal.push(JournalEntry::Deregister {
                group: group.name.clone(),
                id: id.to_string(),
            });
            Ok(())
        })
    }
}
