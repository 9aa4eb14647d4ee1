//! Pool manager scenarios driven through the in-memory scene and catalog

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use approx::assert_relative_eq;

use super::*;
use crate::assets::{LoadError, PrefabCatalog, TemplateKey};
use crate::config::{ConfigError, PoolConfig};
use crate::foundation::collections::{NodeId, TypedHandle};
use crate::foundation::math::{Transform, Vec3};
use crate::scene::{Component, Prefab, Scene, SceneHost, Template};

const EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, PartialEq)]
struct CoinValue(u32);
impl Component for CoinValue {}

#[derive(Debug, Clone, PartialEq)]
struct Emitter;
impl Component for Emitter {}

type TestPool = PoolManager<Scene, PrefabCatalog>;

fn catalog() -> PrefabCatalog {
    PrefabCatalog::with_latency(1)
        .with_prefab("coin", Prefab::new("Coin").with_component(CoinValue(5)))
        .with_prefab("gem", Prefab::new("Gem"))
        .with_prefab("spark", Prefab::new("Spark").with_component(Emitter))
}

fn pool(config: PoolConfig) -> TestPool {
    crate::foundation::logging::init_with_level(log::LevelFilter::Debug);
    PoolManager::new(config, Scene::new(), catalog()).expect("valid config")
}

/// Captures everything the pool reports through callbacks
#[derive(Default)]
struct Recorder {
    spawned: Rc<RefCell<Vec<NodeId>>>,
    errors: Rc<RefCell<Vec<PoolError>>>,
    completions: Rc<Cell<usize>>,
}

impl Recorder {
    fn on_spawn(&self) -> impl FnOnce(NodeId) + 'static {
        let spawned = Rc::clone(&self.spawned);
        move |node| spawned.borrow_mut().push(node)
    }

    fn on_error(&self) -> impl FnMut(PoolError) + 'static {
        let errors = Rc::clone(&self.errors);
        move |error| errors.borrow_mut().push(error)
    }

    fn on_complete(&self) -> impl FnOnce() + 'static {
        let completions = Rc::clone(&self.completions);
        move || completions.set(completions.get() + 1)
    }

    fn spawned(&self) -> Vec<NodeId> {
        self.spawned.borrow().clone()
    }

    fn errors(&self) -> Vec<PoolError> {
        self.errors.borrow().clone()
    }

    fn completions(&self) -> usize {
        self.completions.get()
    }
}

fn preload(pool: &mut TestPool) -> Recorder {
    let recorder = Recorder::default();
    pool.preload_instances(recorder.on_complete(), recorder.on_error());
    pool.update();
    recorder
}

fn spawn(pool: &mut TestPool, key: &str) -> Recorder {
    spawn_with(pool, key, SpawnParams::default())
}

fn spawn_with(pool: &mut TestPool, key: &str, params: SpawnParams) -> Recorder {
    let recorder = Recorder::default();
    pool.spawn_from_pool(key, params, recorder.on_spawn(), recorder.on_error());
    recorder
}

fn spawn_one(pool: &mut TestPool, key: &str) -> NodeId {
    let spawned = spawn(pool, key).spawned();
    assert_eq!(spawned.len(), 1, "spawn of {key} should deliver immediately");
    spawned[0]
}

#[test]
fn test_coin_scenario() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3));
    let preloaded = preload(&mut pool);
    assert_eq!(preloaded.completions(), 1);

    let first = spawn_one(&mut pool, "coin");
    let _second = spawn_one(&mut pool, "coin");
    assert_eq!(pool.available_count("coin"), 1);
    assert_eq!(pool.in_use_count("coin"), 2);

    assert_eq!(pool.return_to_pool(first), Ok(()));
    assert_eq!(pool.available_count("coin"), 2);
    assert_eq!(pool.in_use_count("coin"), 1);

    pool.clear_pool();
    assert_eq!(pool.available_count("coin"), 0);
    assert!(!pool.is_loaded("coin"));
}

#[test]
fn test_preload_materializes_requested_counts() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3).with_preload("gem", 2));
    assert!(!pool.has_root(), "root is created lazily");

    let recorder = preload(&mut pool);

    assert_eq!(recorder.completions(), 1);
    assert!(recorder.errors().is_empty());
    assert_eq!(pool.available_count("coin"), 3);
    assert_eq!(pool.available_count("gem"), 2);
    assert_eq!(pool.in_use_count("coin"), 0);

    let root = pool.root().expect("root created by preload");
    assert_eq!(pool.scene().name(root), Some("Pooled Instances"));

    let group = pool.group("coin").expect("coin group");
    assert_eq!(pool.scene().name(group), Some("coin Pool Group"));
    assert_eq!(pool.scene().parent(group), Some(root));

    for node in pool.scene().children(group) {
        assert!(!pool.scene().is_active(*node));
        assert_eq!(pool.instance_state(*node), Some(InstanceState::Available));
        let tag = pool.tag(*node).expect("pooled instances are tagged");
        assert_eq!(tag.key().as_str(), "coin");
        assert_eq!(tag.manager(), pool.id());
    }
}

#[test]
fn test_preload_waits_for_loader() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3));
    let recorder = Recorder::default();

    pool.preload_instances(recorder.on_complete(), recorder.on_error());
    assert_eq!(recorder.completions(), 0);
    assert!(!pool.has_pool("coin"));

    pool.update();
    assert_eq!(recorder.completions(), 1);
    assert!(pool.is_loaded("coin"));
}

#[test]
fn test_preload_with_nothing_registered_completes() {
    let mut pool = pool(PoolConfig::default());
    let recorder = Recorder::default();

    pool.preload_instances(recorder.on_complete(), recorder.on_error());

    assert_eq!(recorder.completions(), 1);
    assert!(pool.has_root());
}

#[test]
fn test_load_failure_reports_and_completes_batch() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 2).with_preload("ghost", 4));

    let recorder = preload(&mut pool);

    let ghost = TemplateKey::from("ghost");
    assert_eq!(recorder.completions(), 1);
    assert_eq!(
        recorder.errors(),
        vec![PoolError::LoadFailure {
            key: ghost.clone(),
            source: LoadError::NotFound(ghost),
        }]
    );
    assert_eq!(pool.available_count("coin"), 2);
    assert!(!pool.has_pool("ghost"));
    assert!(!pool.is_loaded("ghost"));
    assert_eq!(pool.stats().load_failures, 1);
}

#[test]
fn test_overlapping_preloads_load_once() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3));
    let first = Recorder::default();
    let second = Recorder::default();

    pool.preload_instances(first.on_complete(), first.on_error());
    assert!(!pool.register_preload("coin", 3), "already running");
    pool.preload_instances(second.on_complete(), second.on_error());
    pool.update();

    assert_eq!(pool.loader().load_count("coin"), 1);
    assert_eq!(first.completions(), 1);
    assert_eq!(second.completions(), 1);
    assert_eq!(pool.available_count("coin"), 3);
}

#[test]
fn test_preload_of_loaded_key_materializes_immediately() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3));
    preload(&mut pool);

    assert!(pool.register_preload("coin", 2));
    let recorder = Recorder::default();
    pool.preload_instances(recorder.on_complete(), recorder.on_error());

    assert_eq!(recorder.completions(), 1);
    assert_eq!(pool.available_count("coin"), 5);
    assert_eq!(pool.loader().load_count("coin"), 1);
}

#[test]
fn test_spawn_return_restores_available_count() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3));
    preload(&mut pool);

    let node = spawn_one(&mut pool, "coin");
    assert_eq!(pool.available_count("coin"), 2);
    assert!(pool.scene().is_active(node));
    assert_eq!(pool.instance_state(node), Some(InstanceState::InUse));

    assert_eq!(pool.return_to_pool(node), Ok(()));

    assert_eq!(pool.available_count("coin"), 3);
    assert_eq!(pool.tag(node).map(|tag| tag.key().as_str()), Some("coin"));
    assert_eq!(pool.instance_state(node), Some(InstanceState::Available));
    assert!(!pool.scene().is_active(node));
    assert_eq!(pool.scene().parent(node), pool.group("coin"));
}

#[test]
fn test_spawn_is_fifo() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 2));
    preload(&mut pool);

    let first = spawn_one(&mut pool, "coin");
    pool.return_to_pool(first).expect("returned");
    let second = spawn_one(&mut pool, "coin");

    assert_ne!(first, second, "the returned instance queues behind the idle one");
}

#[test]
fn test_empty_pool_grows_by_one() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 1));
    preload(&mut pool);

    let first = spawn_one(&mut pool, "coin");
    let second = spawn_one(&mut pool, "coin");

    assert_ne!(first, second);
    assert!(pool.scene().is_active(second));
    assert_eq!(pool.scene().name(second), Some("Coin"));
    assert_eq!(pool.scene().component::<CoinValue>(second), Some(&CoinValue(5)));
    assert_eq!(pool.available_count("coin"), 0);
    assert_eq!(pool.in_use_count("coin"), 2);
    assert_eq!(pool.stats().grown_on_demand, 1);
    assert_eq!(pool.loader().load_count("coin"), 1);
}

#[test]
fn test_unknown_key_preloads_and_retries() {
    let mut pool = pool(PoolConfig::default());

    let recorder = spawn(&mut pool, "coin");
    assert!(recorder.spawned().is_empty(), "delivered after the load settles");
    assert_eq!(pool.loader().load_count("coin"), 1);

    pool.update();

    assert_eq!(recorder.spawned().len(), 1);
    assert!(recorder.errors().is_empty());
    assert_eq!(pool.available_count("coin"), 0);
    assert_eq!(pool.in_use_count("coin"), 1);
    assert_eq!(pool.stats().auto_preloads, 1);
    assert_eq!(pool.stats().grown_on_demand, 0);
}

#[test]
fn test_unknown_key_spawned_twice_loads_once() {
    let mut pool = pool(PoolConfig::default());

    let first = spawn(&mut pool, "gem");
    let second = spawn(&mut pool, "gem");
    pool.update();

    assert_eq!(pool.loader().load_count("gem"), 1);
    assert_eq!(first.spawned().len(), 1);
    assert_eq!(second.spawned().len(), 1);
    assert_ne!(first.spawned(), second.spawned());
    assert_eq!(pool.in_use_count("gem"), 2);
    assert_eq!(pool.stats().auto_preloads, 1);
}

#[test]
fn test_unknown_key_that_fails_to_load() {
    let mut pool = pool(PoolConfig::default());

    let recorder = spawn(&mut pool, "ghost");
    pool.update();

    let ghost = TemplateKey::from("ghost");
    assert!(recorder.spawned().is_empty());
    assert_eq!(
        recorder.errors(),
        vec![PoolError::LoadFailure {
            key: ghost.clone(),
            source: LoadError::NotFound(ghost),
        }]
    );
    assert!(!pool.has_pool("ghost"));
    assert_eq!(pool.loader().live_loads(), 0);
}

#[test]
fn test_unknown_key_starts_registered_preloads() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 2));

    let recorder = spawn(&mut pool, "coin");
    pool.update();

    assert_eq!(recorder.spawned().len(), 1);
    assert_eq!(pool.available_count("coin"), 1, "registered count wins over the automatic one");
    assert_eq!(pool.loader().load_count("coin"), 1);
}

#[test]
fn test_empty_key_is_invalid_argument() {
    let mut pool = pool(PoolConfig::default());

    let recorder = spawn(&mut pool, "");

    assert!(recorder.spawned().is_empty());
    assert!(matches!(recorder.errors().as_slice(), [PoolError::InvalidArgument(_)]));
    assert!(!pool.has_root());
}

#[test]
fn test_return_untracked_instance_destroys_it() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 2));
    preload(&mut pool);
    let stray = pool.scene_mut().spawn_node("stray");

    assert_eq!(pool.return_to_pool(stray), Err(ReturnError::Untracked));

    assert!(!pool.scene().contains(stray));
    assert_eq!(pool.available_count("coin"), 2);
    assert_eq!(pool.stats().untracked_returns, 1);
}

#[test]
fn test_duplicate_return_is_rejected() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 2));
    preload(&mut pool);
    let node = spawn_one(&mut pool, "coin");
    pool.return_to_pool(node).expect("first return succeeds");

    let result = pool.return_to_pool(node);

    assert_eq!(result, Err(ReturnError::DuplicateReturn("coin".into())));
    assert_eq!(pool.available_count("coin"), 2);
    assert_eq!(pool.stats().total_returned, 1);
}

#[test]
fn test_return_of_never_spawned_instance_is_duplicate() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 1));
    preload(&mut pool);
    let idle = pool.scene().children(pool.group("coin").expect("group"))[0];

    assert_eq!(pool.return_to_pool(idle), Err(ReturnError::DuplicateReturn("coin".into())));
    assert_eq!(pool.available_count("coin"), 1);
}

#[test]
fn test_clear_without_preload_is_noop() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3));

    pool.clear_pool();

    assert!(!pool.has_root());
    assert_eq!(pool.scene().node_count(), 0);
    assert_eq!(pool.loader().load_count("coin"), 0);
}

#[test]
fn test_clear_tears_down_and_preload_rebuilds() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3).with_preload("gem", 2));
    preload(&mut pool);

    pool.clear_pool();

    assert!(!pool.has_root());
    assert!(!pool.has_pool("coin"));
    assert!(!pool.has_pool("gem"));
    assert_eq!(pool.stats().pools, 0);
    assert_eq!(pool.scene().node_count(), 0);
    assert_eq!(pool.loader().live_loads(), 0);

    pool.register_preload("coin", 3);
    let recorder = preload(&mut pool);

    assert_eq!(recorder.completions(), 1);
    assert!(pool.has_root());
    assert_eq!(pool.available_count("coin"), 3);
    assert_eq!(pool.loader().load_count("coin"), 2);
}

#[test]
fn test_in_use_instance_survives_clear_and_returns_after_rebuild() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 2));
    preload(&mut pool);
    let node = spawn_one(&mut pool, "coin");

    pool.clear_pool();
    assert!(pool.scene().contains(node));
    assert_eq!(pool.in_use_instances().count(), 0);

    assert_eq!(pool.return_to_pool(node), Err(ReturnError::UnknownPool("coin".into())));
    assert!(pool.scene().is_active(node), "left untouched");
    assert_eq!(pool.scene().parent(node), None);

    pool.register_preload("coin", 1);
    preload(&mut pool);

    assert_eq!(pool.return_to_pool(node), Ok(()));
    assert!(pool.scene().contains(node));
    assert!(!pool.scene().is_active(node));
    assert_eq!(pool.scene().parent(node), pool.group("coin"));
    assert_eq!(pool.instance_state(node), Some(InstanceState::Available));
    assert_eq!(pool.available_count("coin"), 2);
    assert_eq!(pool.in_use_count("coin"), 0);

    let first = spawn_one(&mut pool, "coin");
    let second = spawn_one(&mut pool, "coin");
    assert_eq!(second, node, "adopted instance joins the back of the queue");
    assert_ne!(first, node);
}

#[test]
fn test_returning_pool_containers_is_refused() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 2));
    preload(&mut pool);
    let root = pool.root().expect("root");
    let group = pool.group("coin").expect("group");

    assert_eq!(pool.return_to_pool(root), Err(ReturnError::PoolContainer));
    assert_eq!(pool.return_to_pool(group), Err(ReturnError::PoolContainer));

    assert!(pool.scene().contains(root));
    assert!(pool.scene().contains(group));
    assert_eq!(pool.available_count("coin"), 2);
    assert_eq!(pool.stats().untracked_returns, 0);

    let node = spawn_one(&mut pool, "coin");
    assert!(pool.scene().contains(node));
    assert!(pool.scene().is_active(node));
}

#[test]
fn test_template_keeps_loader_flag_while_instances_start_inactive() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 2));
    preload(&mut pool);

    let template = pool.template("coin").expect("coin loaded");
    assert!(template.is_active(), "loader's flag restored after cloning");

    let group = pool.group("coin").expect("group");
    for node in pool.scene().children(group) {
        assert!(!pool.scene().is_active(*node));
    }
}

#[test]
fn test_clear_cancels_loads_in_flight() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 3));
    let batch = Recorder::default();
    pool.preload_instances(batch.on_complete(), batch.on_error());
    let waiting = spawn(&mut pool, "gem");

    pool.clear_pool();
    pool.update();

    let coin = TemplateKey::from("coin");
    let gem = TemplateKey::from("gem");
    assert_eq!(batch.completions(), 1);
    assert_eq!(
        batch.errors(),
        vec![PoolError::LoadFailure {
            key: coin.clone(),
            source: LoadError::Cancelled(coin),
        }]
    );
    assert!(waiting.spawned().is_empty());
    assert_eq!(
        waiting.errors(),
        vec![PoolError::LoadFailure {
            key: gem.clone(),
            source: LoadError::Cancelled(gem),
        }]
    );
    assert_eq!(pool.loader().live_loads(), 0);
    assert_eq!(pool.loader().pending_loads(), 0);
    assert_eq!(pool.scene().node_count(), 0);
}

#[test]
fn test_spawn_component_delivers_typed_handle() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 1));
    preload(&mut pool);
    let handles: Rc<RefCell<Vec<TypedHandle<CoinValue>>>> = Rc::default();
    let captured = Rc::clone(&handles);
    let recorder = Recorder::default();

    pool.spawn_component_from_pool::<CoinValue, _, _>(
        "coin",
        SpawnParams::default(),
        move |handle| captured.borrow_mut().push(handle),
        recorder.on_error(),
    );

    let handle = handles.borrow()[0];
    assert!(recorder.errors().is_empty());
    assert_eq!(pool.scene().component::<CoinValue>(handle.node()), Some(&CoinValue(5)));

    assert_eq!(pool.return_component_to_pool(handle), Ok(()));
    assert_eq!(pool.available_count("coin"), 1);
}

#[test]
fn test_spawn_component_missing_capability() {
    let mut pool = pool(PoolConfig::default().with_preload("gem", 2));
    preload(&mut pool);
    let delivered = Rc::new(Cell::new(false));
    let captured = Rc::clone(&delivered);
    let recorder = Recorder::default();

    pool.spawn_component_from_pool::<Emitter, _, _>(
        "gem",
        SpawnParams::default(),
        move |_| captured.set(true),
        recorder.on_error(),
    );

    assert!(!delivered.get(), "success callback never fires on a miss");
    assert_eq!(
        recorder.errors(),
        vec![PoolError::CapabilityMissing {
            key: "gem".into(),
            component: type_name::<Emitter>(),
        }]
    );
    assert_eq!(pool.available_count("gem"), 2, "instance went back to its pool");
    assert_eq!(pool.in_use_count("gem"), 0);
}

#[test]
fn test_spawn_component_for_unknown_key() {
    let mut pool = pool(PoolConfig::default());
    let handles: Rc<RefCell<Vec<TypedHandle<Emitter>>>> = Rc::default();
    let captured = Rc::clone(&handles);
    let recorder = Recorder::default();

    pool.spawn_component_from_pool::<Emitter, _, _>(
        "spark",
        SpawnParams::default(),
        move |handle| captured.borrow_mut().push(handle),
        recorder.on_error(),
    );
    pool.update();

    assert_eq!(handles.borrow().len(), 1);
    assert!(recorder.errors().is_empty());
}

#[test]
fn test_spawn_places_in_world_space_under_parent() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 1));
    preload(&mut pool);
    let parent = pool.scene_mut().spawn_node("holder");
    pool.scene_mut()
        .set_local_transform(parent, Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));

    let params = SpawnParams::at(Vec3::new(1.0, 2.0, 3.0))
        .with_scale(Vec3::new(2.0, 2.0, 2.0))
        .with_parent(parent, false);
    let node = spawn_with(&mut pool, "coin", params).spawned()[0];

    let world = pool.scene().world_transform(node).expect("instance exists");
    assert_eq!(pool.scene().parent(node), Some(parent));
    assert_relative_eq!(world.position, Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
    assert_relative_eq!(world.scale, Vec3::new(2.0, 2.0, 2.0), epsilon = EPSILON);
}

#[test]
fn test_spawn_places_relative_to_parent() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 1));
    preload(&mut pool);
    let parent = pool.scene_mut().spawn_node("holder");
    pool.scene_mut()
        .set_local_transform(parent, Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));

    let params = SpawnParams::at(Vec3::new(1.0, 2.0, 3.0)).with_parent(parent, true);
    let node = spawn_with(&mut pool, "coin", params).spawned()[0];

    let local = pool.scene().local_transform(node).expect("instance exists");
    let world = pool.scene().world_transform(node).expect("instance exists");
    assert_relative_eq!(local.position, Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
    assert_relative_eq!(world.position, Vec3::new(11.0, 2.0, 3.0), epsilon = EPSILON);
}

#[test]
fn test_returned_instance_keeps_world_placement() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 1));
    preload(&mut pool);
    let node = spawn_with(&mut pool, "coin", SpawnParams::at(Vec3::new(4.0, 5.0, 6.0))).spawned()[0];

    pool.return_to_pool(node).expect("returned");

    let world = pool.scene().world_transform(node).expect("instance exists");
    assert_relative_eq!(world.position, Vec3::new(4.0, 5.0, 6.0), epsilon = EPSILON);
}

#[test]
fn test_lifetime_return_recycles_expired_instances() {
    let config = PoolConfig::default()
        .with_preload("coin", 1)
        .with_preload("spark", 1)
        .with_auto_return("spark", 1.0);
    let mut system = LifetimeReturn::from_config(&config);
    let mut pool = pool(config);
    preload(&mut pool);
    let coin = spawn_one(&mut pool, "coin");
    let spark = spawn_one(&mut pool, "spark");

    assert_eq!(system.update(&mut pool, 0.5), 0);
    assert_eq!(system.tracked_count(), 1);
    assert_relative_eq!(system.remaining(spark).unwrap_or_default(), 0.5, epsilon = EPSILON);

    assert_eq!(system.update(&mut pool, 0.5), 1);
    assert_eq!(pool.available_count("spark"), 1);
    assert_eq!(pool.instance_state(coin), Some(InstanceState::InUse), "coins are not timed");
}

#[test]
fn test_lifetime_restarts_on_respawn() {
    let config = PoolConfig::default()
        .with_preload("spark", 1)
        .with_auto_return("spark", 1.0);
    let mut system = LifetimeReturn::from_config(&config);
    let mut pool = pool(config);
    preload(&mut pool);

    let spark = spawn_one(&mut pool, "spark");
    system.update(&mut pool, 0.75);
    pool.return_to_pool(spark).expect("returned early");
    let again = spawn_one(&mut pool, "spark");
    assert_eq!(again, spark);

    assert_eq!(system.update(&mut pool, 0.5), 0, "fresh lifetime after respawn");
    assert_eq!(system.update(&mut pool, 0.5), 1);
}

#[test]
fn test_stats_track_activity() {
    let mut pool = pool(PoolConfig::default().with_preload("coin", 1));
    preload(&mut pool);
    let first = spawn_one(&mut pool, "coin");
    spawn_one(&mut pool, "coin");
    pool.return_to_pool(first).expect("returned");

    let stats = pool.stats();

    assert_eq!(
        stats,
        PoolStats {
            pools: 1,
            available: 1,
            in_use: 1,
            total_spawned: 2,
            total_returned: 1,
            grown_on_demand: 1,
            auto_preloads: 0,
            load_failures: 0,
            untracked_returns: 0,
        }
    );
    assert_eq!(pool.in_use_instances().count(), 1);
}

#[test]
fn test_custom_root_name() {
    let config = PoolConfig {
        root_name: "Recycled".to_string(),
        ..PoolConfig::default().with_preload("gem", 1)
    };
    let mut pool = pool(config);
    preload(&mut pool);

    let root = pool.root().expect("root");
    assert_eq!(pool.scene().name(root), Some("Recycled"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = PoolConfig::default().with_auto_return("spark", 0.0);

    let result = PoolManager::new(config, Scene::new(), catalog());

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_managers_tag_with_their_own_id() {
    let mut first = pool(PoolConfig::default().with_preload("coin", 1));
    let second = pool(PoolConfig::default());
    preload(&mut first);
    let node = spawn_one(&mut first, "coin");

    assert_ne!(first.id(), second.id());
    assert_eq!(first.tag(node).map(PoolTag::manager), Some(first.id()));
}
