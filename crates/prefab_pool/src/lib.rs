//! # Prefab Pool
//!
//! Runtime object pooling for a game engine. Templates are loaded
//! asynchronously, warmed into per-key pools of disabled instances, and
//! recycled on return instead of being destroyed.
//!
//! ## Features
//!
//! - **Async Preload**: One load per template, batched completion callbacks
//! - **On-Demand Growth**: Exhausted or unknown pools grow instead of failing
//! - **Tagged Instances**: Every pooled instance knows its key and manager
//! - **Lifetime Return**: Timed recycling for fire-and-forget effects
//! - **File Config**: Preload lists in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prefab_pool::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     prefab_pool::foundation::logging::init();
//!
//!     let config = PoolConfig::load_from_file("pools.toml")?;
//!     let catalog = PrefabCatalog::new().with_prefab("coin", Prefab::new("Coin"));
//!     let mut pool = PoolManager::new(config, Scene::new(), catalog)?;
//!
//!     pool.preload_instances(|| log::info!("Pools warm"), |error| log::error!("{error}"));
//!     loop {
//!         pool.update();
//!         // Game frame...
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod assets;
pub mod pool;

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        foundation::{
            collections::{NodeId, TypedHandle},
            math::{Quat, Transform, Vec3},
        },
        config::{Config, ConfigError, PoolConfig},
        scene::{Component, Prefab, Scene, SceneHost, Template},
        assets::{AssetLoader, LoadError, PrefabCatalog, TemplateKey},
        pool::{
            LifetimeReturn, PoolError, PoolManager, PoolStats, PoolTag, ReturnError,
            ReturnResult, SpawnParams,
        },
    };
}
