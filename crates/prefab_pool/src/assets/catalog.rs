//! In-memory prefab catalog loader
//!
//! Serves [`Prefab`] templates registered up front. Each load resolves after a
//! configurable number of `update()` frames so callers see the same deferred
//! completion as a disk or network backed loader. Unknown keys fail with
//! [`LoadError::NotFound`].

use std::collections::HashMap;

use super::{AssetLoader, LoadCompleter, LoadError, LoadHandle, LoadRequest, TemplateKey};
use crate::scene::Prefab;

struct PendingLoad {
    completer: LoadCompleter<Prefab>,
    frames_left: u32,
}

/// Catalog-backed asset loader
pub struct PrefabCatalog {
    prefabs: HashMap<TemplateKey, Prefab>,
    latency_frames: u32,
    pending: Vec<PendingLoad>,
    live: HashMap<u64, TemplateKey>,
    load_counts: HashMap<TemplateKey, usize>,
    next_id: u64,
}

impl PrefabCatalog {
    /// Create an empty catalog whose loads resolve on the next `update()`
    pub fn new() -> Self {
        Self::with_latency(1)
    }

    /// Create an empty catalog whose loads resolve after `latency_frames` updates
    ///
    /// With zero latency a load is already resolved when `load` returns.
    pub fn with_latency(latency_frames: u32) -> Self {
        Self {
            prefabs: HashMap::new(),
            latency_frames,
            pending: Vec::new(),
            live: HashMap::new(),
            load_counts: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a prefab under `key`, replacing any earlier entry
    pub fn insert(&mut self, key: impl Into<TemplateKey>, prefab: Prefab) {
        self.prefabs.insert(key.into(), prefab);
    }

    /// Builder-style registration
    #[must_use]
    pub fn with_prefab(mut self, key: impl Into<TemplateKey>, prefab: Prefab) -> Self {
        self.insert(key, prefab);
        self
    }

    /// Number of loads issued for `key` since creation
    pub fn load_count(&self, key: &str) -> usize {
        self.load_counts.get(key).copied().unwrap_or(0)
    }

    /// Number of loads not yet released
    pub fn live_loads(&self) -> usize {
        self.live.len()
    }

    /// Number of loads still waiting to resolve
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    fn resolve(&self, completer: LoadCompleter<Prefab>) {
        let result = self
            .prefabs
            .get(completer.key())
            .cloned()
            .ok_or_else(|| LoadError::NotFound(completer.key().clone()));

        if result.is_err() {
            log::error!("Prefab catalog has no entry for {}", completer.key());
        }
        if !completer.complete(result) {
            log::debug!("Load finished after its request was released");
        }
    }
}

impl Default for PrefabCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader for PrefabCatalog {
    type Asset = Prefab;

    fn load(&mut self, key: &TemplateKey) -> LoadRequest<Prefab> {
        let handle = LoadHandle::new(self.next_id, key.clone());
        self.next_id += 1;
        self.live.insert(handle.id(), key.clone());
        *self.load_counts.entry(key.clone()).or_insert(0) += 1;

        log::debug!("Loading prefab {} (load #{})", key, handle.id());

        let (request, completer) = LoadRequest::channel(handle);
        if self.latency_frames == 0 {
            self.resolve(completer);
        } else {
            self.pending.push(PendingLoad {
                completer,
                frames_left: self.latency_frames,
            });
        }
        request
    }

    fn release(&mut self, handle: LoadHandle) {
        if self.live.remove(&handle.id()).is_none() {
            log::warn!("Release of unknown load #{} for {}", handle.id(), handle.key());
            return;
        }
        // Dropping the receiver already cancels a pending load; forget it here too.
        self.pending.retain(|pending| !pending.completer.is_released());
    }

    fn update(&mut self) {
        let mut ready = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());

        for mut pending in self.pending.drain(..) {
            if pending.completer.is_released() {
                continue;
            }
            pending.frames_left = pending.frames_left.saturating_sub(1);
            if pending.frames_left == 0 {
                ready.push(pending.completer);
            } else {
                waiting.push(pending);
            }
        }

        self.pending = waiting;
        for completer in ready {
            self.resolve(completer);
        }
    }
}
