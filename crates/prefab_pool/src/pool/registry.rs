//! Template registry
//!
//! Tracks which keys are waiting to be preloaded and owns the loaded master
//! copies. A key is loaded at most once: repeated resolves while a load is in
//! flight reuse the outstanding request.
//!
//! ```text
//! register_preload ──► pending ──take_unstarted──► resolve ──► Loading ──poll──► Loaded
//!                                                                  │
//!                                                                  └── failure: key dropped, load released
//! ```

use std::collections::HashMap;

use crate::assets::{AssetLoader, LoadError, LoadHandle, LoadRequest, TemplateKey};
use crate::scene::Template;

#[derive(Debug, Clone, Copy)]
struct PendingPreload {
    count: usize,
    started: bool,
}

enum Slot<T> {
    Loading(LoadRequest<T>),
    Loaded { template: T, handle: LoadHandle },
}

/// Outcome of asking the registry for a key's template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The template is loaded and can be instantiated now
    Ready,
    /// A load is in flight; the key settles in a later [`TemplateRegistry::poll`]
    Pending,
}

/// Key → template store with pending preload bookkeeping
pub struct TemplateRegistry<T> {
    pending: HashMap<TemplateKey, PendingPreload>,
    slots: HashMap<TemplateKey, Slot<T>>,
}

impl<T: Template> TemplateRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            slots: HashMap::new(),
        }
    }

    /// Queue `count` instances of `key` for the next preload
    ///
    /// Returns `false` and changes nothing when the key is already pending.
    pub fn register_preload(&mut self, key: TemplateKey, count: usize) -> bool {
        if self.pending.contains_key(&key) {
            log::debug!("Preload of {} already registered", key);
            return false;
        }
        self.pending.insert(key, PendingPreload { count, started: false });
        true
    }

    /// Snapshot the requests no preload has picked up yet and mark them started
    ///
    /// Sorted by key so batches run in a stable order.
    pub fn take_unstarted(&mut self) -> Vec<(TemplateKey, usize)> {
        let mut requests: Vec<_> = self
            .pending
            .iter_mut()
            .filter(|(_, pending)| !pending.started)
            .map(|(key, pending)| {
                pending.started = true;
                (key.clone(), pending.count)
            })
            .collect();
        requests.sort_by(|a, b| a.0.cmp(&b.0));
        requests
    }

    /// Forget the pending request for a settled key
    pub fn finish_request(&mut self, key: &TemplateKey) {
        self.pending.remove(key);
    }

    /// Whether a preload request for `key` is registered or running
    pub fn is_pending(&self, key: &TemplateKey) -> bool {
        self.pending.contains_key(key)
    }

    /// Number of registered requests, started or not
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Make sure a template for `key` is loaded or loading
    pub fn resolve<L>(&mut self, key: &TemplateKey, loader: &mut L) -> Resolution
    where
        L: AssetLoader<Asset = T>,
    {
        match self.slots.get(key) {
            Some(Slot::Loaded { .. }) => Resolution::Ready,
            Some(Slot::Loading(_)) => Resolution::Pending,
            None => {
                let request = loader.load(key);
                self.slots.insert(key.clone(), Slot::Loading(request));
                Resolution::Pending
            }
        }
    }

    /// Collect finished loads
    ///
    /// Loaded templates are stored with the active flag the loader gave them;
    /// cloning deactivates them only for the duration of the copy. A failed
    /// key is removed and its load released, leaving no trace of it in the
    /// registry.
    pub fn poll<L>(&mut self, loader: &mut L) -> Vec<(TemplateKey, Result<(), LoadError>)>
    where
        L: AssetLoader<Asset = T>,
    {
        let mut finished = Vec::new();
        for (key, slot) in self.slots.iter_mut() {
            if let Slot::Loading(request) = slot {
                if let Some(result) = request.poll() {
                    finished.push((key.clone(), result));
                }
            }
        }
        finished.sort_by(|a, b| a.0.cmp(&b.0));

        let mut settled = Vec::with_capacity(finished.len());
        for (key, result) in finished {
            let Some(Slot::Loading(request)) = self.slots.remove(&key) else {
                continue;
            };
            let handle = request.into_handle();

            match result {
                Ok(template) => {
                    self.slots.insert(key.clone(), Slot::Loaded { template, handle });
                    log::debug!("Loaded template {}", key);
                    settled.push((key, Ok(())));
                }
                Err(error) => {
                    log::error!("Template {} failed to load: {}", key, error);
                    loader.release(handle);
                    settled.push((key, Err(error)));
                }
            }
        }
        settled
    }

    /// Loaded template for `key`
    pub fn template(&self, key: &TemplateKey) -> Option<&T> {
        match self.slots.get(key) {
            Some(Slot::Loaded { template, .. }) => Some(template),
            _ => None,
        }
    }

    /// Mutable access to the loaded template for `key`
    pub fn template_mut(&mut self, key: &TemplateKey) -> Option<&mut T> {
        match self.slots.get_mut(key) {
            Some(Slot::Loaded { template, .. }) => Some(template),
            _ => None,
        }
    }

    /// Whether a template for `key` is loaded
    pub fn is_loaded(&self, key: &TemplateKey) -> bool {
        matches!(self.slots.get(key), Some(Slot::Loaded { .. }))
    }

    /// Whether a load for `key` is in flight
    pub fn is_loading(&self, key: &TemplateKey) -> bool {
        matches!(self.slots.get(key), Some(Slot::Loading(_)))
    }

    /// Release every load and drop every template
    ///
    /// Requests already picked up by a preload are dropped with them; requests
    /// registered but not yet preloaded stay queued for the next preload.
    /// Returns the keys whose loads were still in flight.
    pub fn release_all<L>(&mut self, loader: &mut L) -> Vec<TemplateKey>
    where
        L: AssetLoader<Asset = T>,
    {
        let mut cancelled = Vec::new();
        for (key, slot) in self.slots.drain() {
            match slot {
                Slot::Loading(request) => {
                    loader.release(request.into_handle());
                    cancelled.push(key);
                }
                Slot::Loaded { handle, .. } => loader.release(handle),
            }
        }
        self.pending.retain(|_, pending| !pending.started);
        cancelled.sort();
        cancelled
    }
}

impl<T: Template> Default for TemplateRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
