//! Pooled-instance tags
//!
//! Every instance a pool creates gets an entry in a side table keyed by its
//! node id. The entry records the originating key and owning manager, plus the
//! instance's current lifecycle state.

use slotmap::SecondaryMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::TemplateKey;
use crate::foundation::collections::NodeId;

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a pool manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManagerId(u64);

impl ManagerId {
    /// Allocate a process-unique id
    pub(crate) fn next() -> Self {
        Self(NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle state of a pooled instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceState {
    /// Queued, inactive, parented under its group
    Available,
    /// Handed out by a spawn
    InUse,
}

/// Immutable pool metadata carried by an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTag {
    key: TemplateKey,
    manager: ManagerId,
    epoch: u32,
}

impl PoolTag {
    pub(crate) fn new(key: TemplateKey, manager: ManagerId, epoch: u32) -> Self {
        Self { key, manager, epoch }
    }

    /// Key of the pool this instance belongs to
    pub fn key(&self) -> &TemplateKey {
        &self.key
    }

    /// Manager that created this instance
    pub fn manager(&self) -> ManagerId {
        self.manager
    }

    /// Pool generation the instance was created in; bumped by every clear
    pub fn epoch(&self) -> u32 {
        self.epoch
    }
}

#[derive(Debug)]
struct TagEntry {
    tag: PoolTag,
    state: InstanceState,
    spawn_serial: u64,
}

/// Side table of instance tags
#[derive(Debug, Default)]
pub struct InstanceTags {
    entries: SecondaryMap<NodeId, TagEntry>,
    next_serial: u64,
}

impl InstanceTags {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a freshly created instance as available
    pub fn attach(&mut self, node: NodeId, tag: PoolTag) {
        self.entries.insert(
            node,
            TagEntry {
                tag,
                state: InstanceState::Available,
                spawn_serial: 0,
            },
        );
    }

    /// Tag of an instance
    pub fn get(&self, node: NodeId) -> Option<&PoolTag> {
        self.entries.get(node).map(|entry| &entry.tag)
    }

    /// Lifecycle state of an instance
    pub fn state(&self, node: NodeId) -> Option<InstanceState> {
        self.entries.get(node).map(|entry| entry.state)
    }

    /// Serial of the spawn that last handed this instance out
    pub fn spawn_serial(&self, node: NodeId) -> Option<u64> {
        self.entries.get(node).map(|entry| entry.spawn_serial)
    }

    /// `Available → InUse`; returns `false` for any other transition
    pub fn mark_in_use(&mut self, node: NodeId) -> bool {
        match self.entries.get_mut(node) {
            Some(entry) if entry.state == InstanceState::Available => {
                self.next_serial += 1;
                entry.state = InstanceState::InUse;
                entry.spawn_serial = self.next_serial;
                true
            }
            _ => false,
        }
    }

    /// `InUse → Available`; returns `false` for any other transition
    pub fn mark_available(&mut self, node: NodeId) -> bool {
        match self.entries.get_mut(node) {
            Some(entry) if entry.state == InstanceState::InUse => {
                entry.state = InstanceState::Available;
                true
            }
            _ => false,
        }
    }

    /// Drop the tag of a destroyed instance
    pub fn remove(&mut self, node: NodeId) -> Option<PoolTag> {
        self.entries.remove(node).map(|entry| entry.tag)
    }

    /// In-use instances with their tags and spawn serials
    pub fn in_use(&self) -> impl Iterator<Item = (NodeId, &PoolTag, u64)> + '_ {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.state == InstanceState::InUse)
            .map(|(node, entry)| (node, &entry.tag, entry.spawn_serial))
    }

    /// Number of tagged instances
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no instance is tagged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
