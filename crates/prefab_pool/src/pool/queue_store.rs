//! Per-key instance queues
//!
//! Each key owns a FIFO of available instances and a group node they are
//! parented under while idle. The store also owns the tag table, so every
//! instance it creates is tagged before anyone can see it.

use std::collections::{HashMap, HashSet, VecDeque};

use super::error::ReturnError;
use super::tag::{InstanceTags, ManagerId, PoolTag};
use crate::assets::TemplateKey;
use crate::foundation::collections::NodeId;
use crate::scene::{SceneHost, Template};

/// Name of the group node holding idle instances of `key`
pub fn group_name(key: &TemplateKey) -> String {
    format!("{key} Pool Group")
}

#[derive(Debug)]
struct PoolQueue {
    group: NodeId,
    available: VecDeque<NodeId>,
    queued: HashSet<NodeId>,
    total: usize,
}

impl PoolQueue {
    fn new(group: NodeId) -> Self {
        Self {
            group,
            available: VecDeque::new(),
            queued: HashSet::new(),
            total: 0,
        }
    }

    fn push(&mut self, node: NodeId) -> bool {
        if !self.queued.insert(node) {
            return false;
        }
        self.available.push_back(node);
        true
    }

    fn pop(&mut self) -> Option<NodeId> {
        let node = self.available.pop_front()?;
        self.queued.remove(&node);
        Some(node)
    }
}

/// Queues, groups and tags for every key of one manager
#[derive(Debug)]
pub struct InstanceQueueStore {
    queues: HashMap<TemplateKey, PoolQueue>,
    tags: InstanceTags,
    manager: ManagerId,
    epoch: u32,
}

impl InstanceQueueStore {
    /// Create an empty store for `manager`
    pub fn new(manager: ManagerId) -> Self {
        Self {
            queues: HashMap::new(),
            tags: InstanceTags::new(),
            manager,
            epoch: 0,
        }
    }

    /// Manager that owns the instances
    pub fn manager(&self) -> ManagerId {
        self.manager
    }

    /// Current pool generation
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Tag table
    pub fn tags(&self) -> &InstanceTags {
        &self.tags
    }

    /// Whether `key` has a queue
    pub fn has_queue(&self, key: &TemplateKey) -> bool {
        self.queues.contains_key(key)
    }

    /// Group node of `key`
    pub fn group(&self, key: &TemplateKey) -> Option<NodeId> {
        self.queues.get(key).map(|queue| queue.group)
    }

    /// Number of keys with a queue
    pub fn group_count(&self) -> usize {
        self.queues.len()
    }

    /// Keys with a queue, sorted
    pub fn keys(&self) -> Vec<TemplateKey> {
        let mut keys: Vec<_> = self.queues.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Idle instances of `key`
    pub fn available_count(&self, key: &TemplateKey) -> usize {
        self.queues.get(key).map_or(0, |queue| queue.available.len())
    }

    /// Instances of `key` handed out and not yet returned
    pub fn in_use_count(&self, key: &TemplateKey) -> usize {
        self.queues
            .get(key)
            .map_or(0, |queue| queue.total - queue.available.len())
    }

    /// Every instance of `key` created since the last clear
    pub fn total_count(&self, key: &TemplateKey) -> usize {
        self.queues.get(key).map_or(0, |queue| queue.total)
    }

    /// Whether `node` is the group node of any key
    pub fn is_group(&self, node: NodeId) -> bool {
        self.queues.values().any(|queue| queue.group == node)
    }

    /// Whether `node` is sitting in its queue
    pub fn is_queued(&self, key: &TemplateKey, node: NodeId) -> bool {
        self.queues
            .get(key)
            .is_some_and(|queue| queue.queued.contains(&node))
    }

    /// Clone `count` tagged, inactive instances of `template` into `key`'s queue
    ///
    /// Creates the queue and its group under `root` if needed, so a count of
    /// zero still leaves an empty pool behind. The template's active flag is
    /// restored once the copies are made.
    pub fn materialize<H: SceneHost>(
        &mut self,
        key: &TemplateKey,
        template: &mut H::Template,
        count: usize,
        host: &mut H,
        root: NodeId,
    ) -> Vec<NodeId> {
        let group = self.ensure_queue(key, host, root);

        let was_active = template.is_active();
        template.set_active(false);

        let mut created = Vec::with_capacity(count);
        for _ in 0..count {
            let node = host.instantiate(template);
            host.set_parent(node, Some(group), false);
            self.tags
                .attach(node, PoolTag::new(key.clone(), self.manager, self.epoch));
            created.push(node);
        }

        template.set_active(was_active);

        if let Some(queue) = self.queues.get_mut(key) {
            for node in &created {
                queue.push(*node);
            }
            queue.total += created.len();
        }

        log::debug!("Materialized {} instance(s) of {}", created.len(), key);
        created
    }

    /// Dequeue the oldest idle instance of `key` and mark it in use
    pub fn take(&mut self, key: &TemplateKey) -> Option<NodeId> {
        let node = self.queues.get_mut(key)?.pop()?;
        self.tags.mark_in_use(node);
        Some(node)
    }

    /// Enqueue `node` back into `key`'s queue
    ///
    /// The queue is left untouched when the node is already in it.
    pub fn give(&mut self, key: &TemplateKey, node: NodeId) -> Result<(), ReturnError> {
        let queue = self
            .queues
            .get_mut(key)
            .ok_or_else(|| ReturnError::UnknownPool(key.clone()))?;
        if !queue.push(node) {
            return Err(ReturnError::DuplicateReturn(key.clone()));
        }
        self.tags.mark_available(node);
        Ok(())
    }

    /// Count an in-use instance from an earlier generation as part of `key`'s
    /// current pool
    ///
    /// The instance is re-tagged for the current generation and marked in
    /// use, ready for [`InstanceQueueStore::give`].
    pub fn adopt(&mut self, key: &TemplateKey, node: NodeId) -> Result<(), ReturnError> {
        let queue = self
            .queues
            .get_mut(key)
            .ok_or_else(|| ReturnError::UnknownPool(key.clone()))?;
        queue.total += 1;
        self.tags
            .attach(node, PoolTag::new(key.clone(), self.manager, self.epoch));
        self.tags.mark_in_use(node);
        Ok(())
    }

    /// Destroy every idle instance and group, then start a new generation
    ///
    /// Instances in use are left alive; their tags now name a stale
    /// generation. Returns the number of instances destroyed.
    pub fn clear<H: SceneHost>(&mut self, host: &mut H) -> usize {
        let mut destroyed = 0;
        for (key, mut queue) in self.queues.drain() {
            while let Some(node) = queue.pop() {
                self.tags.remove(node);
                host.destroy(node);
                destroyed += 1;
            }
            host.destroy(queue.group);
            log::debug!("Cleared pool group for {}", key);
        }
        self.epoch = self.epoch.wrapping_add(1);
        destroyed
    }

    fn ensure_queue<H: SceneHost>(&mut self, key: &TemplateKey, host: &mut H, root: NodeId) -> NodeId {
        if let Some(queue) = self.queues.get(key) {
            return queue.group;
        }
        let group = host.create_container(&group_name(key), Some(root));
        self.queues.insert(key.clone(), PoolQueue::new(group));
        group
    }
}
