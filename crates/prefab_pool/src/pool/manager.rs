//! Pool Manager
//!
//! Facade over the template registry, the per-key instance queues and the
//! preload pipeline. Owns the scene host and asset loader it drives.
//!
//! # Architecture
//!
//! ```text
//! PoolManager
//!     ├── TemplateRegistry (key → master copy, one load per key)
//!     ├── PreloadPipeline  (batches of (key, count), completion callbacks)
//!     └── InstanceQueueStore
//!             ├── "coin Pool Group" ── FIFO of idle instances
//!             └── InstanceTags (node → key, manager, state)
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use prefab_pool::prelude::*;
//!
//! let config = PoolConfig::default().with_preload("coin", 3);
//! let catalog = PrefabCatalog::new().with_prefab("coin", Prefab::new("Coin"));
//! let mut pool = PoolManager::new(config, Scene::new(), catalog)?;
//!
//! pool.preload_instances(|| log::info!("coins ready"), |error| log::error!("{error}"));
//! pool.update();
//!
//! pool.spawn_from_pool("coin", SpawnParams::default(), |coin| log::info!("{coin:?}"), |_| {});
//! # Ok::<(), prefab_pool::config::ConfigError>(())
//! ```
//!
//! Loads only progress inside [`PoolManager::update`], which the host calls
//! once per frame.

use std::any::{type_name, TypeId};

use super::error::{PoolError, ReturnError, ReturnResult};
use super::preload::{CompleteCallback, ErrorCallback, PreloadPipeline};
use super::queue_store::InstanceQueueStore;
use super::registry::{Resolution, TemplateRegistry};
use super::spawn_params::SpawnParams;
use super::tag::{InstanceState, ManagerId, PoolTag};
use crate::assets::{AssetLoader, LoadError, TemplateKey};
use crate::config::{ConfigError, PoolConfig};
use crate::foundation::collections::{NodeId, TypedHandle};
use crate::scene::{Component, SceneHost};

/// Continuation receiving the outcome of a spawn
type SpawnCallback<H, L> = Box<dyn FnOnce(&mut PoolManager<H, L>, Result<NodeId, PoolError>)>;

/// Continuation parked until a key's load settles
type Deferred<H, L> = Box<dyn FnOnce(&mut PoolManager<H, L>, Result<(), PoolError>)>;

/// Counters for monitoring pool behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Keys with a live pool
    pub pools: usize,
    /// Idle instances across all pools
    pub available: usize,
    /// Instances handed out and not yet returned
    pub in_use: usize,
    /// Successful spawns since creation
    pub total_spawned: u64,
    /// Successful returns since creation
    pub total_returned: u64,
    /// Instances created because a pool was empty at spawn time
    pub grown_on_demand: u64,
    /// Preloads started because a spawn named an unknown key
    pub auto_preloads: u64,
    /// Template loads that failed or were cancelled
    pub load_failures: u64,
    /// Returns of instances this manager never created
    pub untracked_returns: u64,
}

/// Object pool for template instances
pub struct PoolManager<H, L>
where
    H: SceneHost,
    L: AssetLoader<Asset = H::Template>,
{
    config: PoolConfig,
    scene: H,
    loader: L,
    registry: TemplateRegistry<H::Template>,
    store: InstanceQueueStore,
    pipeline: PreloadPipeline,
    root: Option<NodeId>,
    deferred: Vec<(TemplateKey, Deferred<H, L>)>,
    stats: PoolStats,
}

impl<H, L> PoolManager<H, L>
where
    H: SceneHost + 'static,
    L: AssetLoader<Asset = H::Template> + 'static,
{
    /// Create a manager and register the configured preloads
    ///
    /// Nothing is loaded until [`PoolManager::preload_instances`] runs.
    pub fn new(config: PoolConfig, scene: H, loader: L) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut manager = Self {
            registry: TemplateRegistry::new(),
            store: InstanceQueueStore::new(ManagerId::next()),
            pipeline: PreloadPipeline::new(),
            root: None,
            deferred: Vec::new(),
            stats: PoolStats::default(),
            config,
            scene,
            loader,
        };

        let preloads = manager.config.preload.clone();
        for entry in preloads {
            manager.register_preload(&entry.key, entry.count);
        }

        log::info!(
            "Created pool manager {} with {} preload request(s)",
            manager.id().get(),
            manager.registry.pending_count()
        );
        Ok(manager)
    }

    /// Identity stamped on every instance this manager creates
    pub fn id(&self) -> ManagerId {
        self.store.manager()
    }

    /// Configuration the manager was created with
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Scene host
    pub fn scene(&self) -> &H {
        &self.scene
    }

    /// Mutable scene host
    pub fn scene_mut(&mut self) -> &mut H {
        &mut self.scene
    }

    /// Asset loader
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Register `count` instances of `key` for the next preload
    ///
    /// Returns `false` when the key is empty or already registered.
    pub fn register_preload(&mut self, key: &str, count: usize) -> bool {
        if key.is_empty() {
            log::warn!("Ignoring preload registration with an empty key");
            return false;
        }
        self.registry.register_preload(TemplateKey::from(key), count)
    }

    /// Load and materialize every registered request
    ///
    /// `on_complete` fires once after every key of this batch settled, and
    /// `on_error` fires for each key whose load failed. Loads progress in
    /// [`PoolManager::update`]; keys whose template is already loaded are
    /// materialized right away.
    pub fn preload_instances<C, E>(&mut self, on_complete: C, on_error: E)
    where
        C: FnOnce() + 'static,
        E: FnMut(PoolError) + 'static,
    {
        self.run_preload(Box::new(on_complete), Some(Box::new(on_error)));
    }

    /// Advance loads and settle the ones that finished
    ///
    /// Call once per frame.
    pub fn update(&mut self) {
        self.loader.update();
        for (key, result) in self.registry.poll(&mut self.loader) {
            self.settle_key(&key, result);
        }
    }

    /// Hand out an instance of `key`
    ///
    /// An empty key reports [`PoolError::InvalidArgument`]. An unknown key is
    /// preloaded with one instance and the spawn retried once that load
    /// settles. An exhausted pool grows by one instance.
    pub fn spawn_from_pool<S, E>(&mut self, key: &str, params: SpawnParams, on_spawn: S, on_error: E)
    where
        S: FnOnce(NodeId) + 'static,
        E: FnOnce(PoolError) + 'static,
    {
        self.spawn_with(
            key,
            params,
            Box::new(move |_, result| match result {
                Ok(node) => on_spawn(node),
                Err(error) => on_error(error),
            }),
        );
    }

    /// Hand out an instance of `key` that must carry component `C`
    ///
    /// On a miss the instance goes straight back to its pool and only
    /// `on_error` fires, with [`PoolError::CapabilityMissing`].
    pub fn spawn_component_from_pool<C, S, E>(
        &mut self,
        key: &str,
        params: SpawnParams,
        on_spawn: S,
        on_error: E,
    ) where
        C: Component,
        S: FnOnce(TypedHandle<C>) + 'static,
        E: FnOnce(PoolError) + 'static,
    {
        self.spawn_with(
            key,
            params,
            Box::new(move |pool, result| {
                let node = match result {
                    Ok(node) => node,
                    Err(error) => return on_error(error),
                };
                if pool.scene.has_component(node, TypeId::of::<C>()) {
                    return on_spawn(TypedHandle::new(node));
                }

                let key = pool
                    .store
                    .tags()
                    .get(node)
                    .map(|tag| tag.key().clone())
                    .unwrap_or_else(|| TemplateKey::from(""));
                log::error!("Could not spawn {} by component type {}", key, type_name::<C>());
                if let Err(error) = pool.return_to_pool(node) {
                    log::warn!("Instance without {} was not re-pooled: {}", type_name::<C>(), error);
                }
                on_error(PoolError::CapabilityMissing {
                    key,
                    component: type_name::<C>(),
                });
            }),
        );
    }

    /// Put an instance back into its pool
    ///
    /// An instance this manager never created is destroyed. Every failure
    /// other than that leaves the pool and the instance untouched. An
    /// instance spawned before a clear is taken back once its key's pool has
    /// been rebuilt.
    pub fn return_to_pool(&mut self, node: NodeId) -> ReturnResult {
        let Some(tag) = self.store.tags().get(node).cloned() else {
            if Some(node) == self.root || self.store.is_group(node) {
                log::error!("{:?} is a pool container and cannot be returned", node);
                return Err(ReturnError::PoolContainer);
            }
            log::warn!("{:?} was never pooled; destroying it instead", node);
            self.scene.destroy(node);
            self.stats.untracked_returns += 1;
            return Err(ReturnError::Untracked);
        };
        let key = tag.key().clone();

        let Some(group) = self.store.group(&key) else {
            log::warn!("No pool for {} to take {:?} back", key, node);
            return Err(ReturnError::UnknownPool(key));
        };
        if tag.epoch() != self.store.epoch() {
            log::info!("Pool for {} was rebuilt since {:?} was spawned; adopting it", key, node);
            self.store.adopt(&key, node)?;
        } else if self.store.is_queued(&key, node) {
            log::error!("{:?} already exists in the {} pool queue", node, key);
            return Err(ReturnError::DuplicateReturn(key));
        }

        self.scene.set_active(node, false);
        self.scene.set_parent(node, Some(group), true);
        self.store.give(&key, node)?;
        self.stats.total_returned += 1;
        Ok(())
    }

    /// Put the instance carrying a component back into its pool
    pub fn return_component_to_pool<C: Component>(&mut self, handle: TypedHandle<C>) -> ReturnResult {
        self.return_to_pool(handle.node())
    }

    /// Tear every pool down
    ///
    /// Idle instances, groups and the root are destroyed and every template
    /// load is released. Loads still in flight settle as cancelled, so their
    /// batches complete and parked spawns report failure. Instances in use
    /// stay alive; returning one fails until its key is preloaded again. A
    /// no-op before the first preload.
    pub fn clear_pool(&mut self) {
        let Some(root) = self.root.take() else {
            log::debug!("Nothing to clear; no pool was ever created");
            return;
        };

        let cancelled = self.registry.release_all(&mut self.loader);
        let destroyed = self.store.clear(&mut self.scene);
        self.scene.destroy(root);

        log::info!(
            "Cleared pool: destroyed {} idle instance(s), cancelled {} load(s)",
            destroyed,
            cancelled.len()
        );

        for key in self.pipeline.in_flight_keys() {
            let error = LoadError::Cancelled(key.clone());
            self.settle_key(&key, Err(error));
        }
    }

    /// Idle instances of `key`
    pub fn available_count(&self, key: &str) -> usize {
        self.store.available_count(&TemplateKey::from(key))
    }

    /// Instances of `key` handed out and not yet returned
    pub fn in_use_count(&self, key: &str) -> usize {
        self.store.in_use_count(&TemplateKey::from(key))
    }

    /// Whether `key` has a live pool
    pub fn has_pool(&self, key: &str) -> bool {
        self.store.has_queue(&TemplateKey::from(key))
    }

    /// Whether the template for `key` is loaded
    pub fn is_loaded(&self, key: &str) -> bool {
        self.registry.is_loaded(&TemplateKey::from(key))
    }

    /// Loaded template for `key`
    pub fn template(&self, key: &str) -> Option<&H::Template> {
        self.registry.template(&TemplateKey::from(key))
    }

    /// Whether the pool root container exists
    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Pool root container
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Group node holding idle instances of `key`
    pub fn group(&self, key: &str) -> Option<NodeId> {
        self.store.group(&TemplateKey::from(key))
    }

    /// Pool tag of an instance
    pub fn tag(&self, node: NodeId) -> Option<&PoolTag> {
        self.store.tags().get(node)
    }

    /// Lifecycle state of an instance
    pub fn instance_state(&self, node: NodeId) -> Option<InstanceState> {
        self.store.tags().state(node)
    }

    /// Instances currently handed out, with their tags and spawn serials
    ///
    /// The serial changes every time an instance is spawned again.
    pub fn in_use_instances(&self) -> impl Iterator<Item = (NodeId, &PoolTag, u64)> + '_ {
        let epoch = self.store.epoch();
        self.store
            .tags()
            .in_use()
            .filter(move |(_, tag, _)| tag.epoch() == epoch)
    }

    /// Snapshot of the pool counters
    pub fn stats(&self) -> PoolStats {
        let keys = self.store.keys();
        PoolStats {
            pools: keys.len(),
            available: keys.iter().map(|key| self.store.available_count(key)).sum(),
            in_use: keys.iter().map(|key| self.store.in_use_count(key)).sum(),
            ..self.stats.clone()
        }
    }

    fn ensure_root(&mut self) -> NodeId {
        if let Some(root) = self.root {
            return root;
        }
        let root = self.scene.create_container(&self.config.root_name, None);
        log::debug!("Created pool root '{}'", self.config.root_name);
        self.root = Some(root);
        root
    }

    fn run_preload(&mut self, on_complete: CompleteCallback, on_error: Option<ErrorCallback>) {
        self.ensure_root();

        let requests = self.registry.take_unstarted();
        log::debug!("Preloading {} key(s)", requests.len());
        self.pipeline.begin(&requests, on_complete, on_error);

        for (key, _) in &requests {
            if self.registry.resolve(key, &mut self.loader) == Resolution::Ready {
                self.settle_key(key, Ok(()));
            }
        }
    }

    fn settle_key(&mut self, key: &TemplateKey, result: Result<(), LoadError>) {
        match &result {
            Ok(()) => {
                if let Some(ready) = self.pipeline.ready(key) {
                    let root = self.ensure_root();
                    if let Some(template) = self.registry.template_mut(key) {
                        self.store
                            .materialize(key, template, ready.count, &mut self.scene, root);
                    }
                }
            }
            Err(_) => self.stats.load_failures += 1,
        }

        self.registry.finish_request(key);
        self.pipeline.settle(key, result.clone());

        let outcome = result.map_err(|source| PoolError::LoadFailure {
            key: key.clone(),
            source,
        });
        self.resume_deferred(key, outcome);
    }

    fn resume_deferred(&mut self, key: &TemplateKey, outcome: Result<(), PoolError>) {
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred)
            .into_iter()
            .partition(|(parked, _)| parked == key);
        self.deferred = waiting;

        for (_, continuation) in ready {
            continuation(self, outcome.clone());
        }
    }

    fn spawn_with(&mut self, key: &str, params: SpawnParams, callback: SpawnCallback<H, L>) {
        if key.is_empty() {
            log::error!("Spawn requested with an empty template key");
            return callback(self, Err(PoolError::InvalidArgument("template key is empty".to_string())));
        }
        let key = TemplateKey::from(key);

        if !self.registry.is_loaded(&key) || !self.store.has_queue(&key) {
            return self.defer_spawn(key, params, callback);
        }

        let node = match self.store.take(&key) {
            Some(node) => node,
            None => match self.grow(&key) {
                Some(node) => node,
                None => return self.defer_spawn(key, params, callback),
            },
        };

        self.place(node, &params);
        self.stats.total_spawned += 1;
        callback(self, Ok(node));
    }

    fn defer_spawn(&mut self, key: TemplateKey, params: SpawnParams, callback: SpawnCallback<H, L>) {
        let needs_preload = !self.pipeline.is_in_flight(&key);
        let retry_key = key.clone();

        self.deferred.push((
            key.clone(),
            Box::new(move |pool, outcome| match outcome {
                Ok(()) => pool.spawn_with(retry_key.as_str(), params, callback),
                Err(error) => callback(pool, Err(error)),
            }),
        ));

        if needs_preload {
            log::warn!("Pool for {} did not exist; preloading one instance", key);
            self.stats.auto_preloads += 1;
            self.registry.register_preload(key, 1);
            self.run_preload(Box::new(|| {}), None);
        }
    }

    fn grow(&mut self, key: &TemplateKey) -> Option<NodeId> {
        let root = self.ensure_root();
        let template = self.registry.template_mut(key)?;
        self.store.materialize(key, template, 1, &mut self.scene, root);
        log::warn!("Needed to instantiate a new instance of {}", key);
        self.stats.grown_on_demand += 1;
        self.store.take(key)
    }

    fn place(&mut self, node: NodeId, params: &SpawnParams) {
        self.scene.set_world_position(node, params.position);
        self.scene.set_world_rotation(node, params.rotation);
        self.scene.set_local_scale(node, params.scale);
        self.scene
            .set_parent(node, params.parent, !params.transforms_relative_to_parent);
        self.scene.set_active(node, true);
    }
}
