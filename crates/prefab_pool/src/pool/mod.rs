//! Instance pooling
//!
//! Preloads reusable instances of templates keyed by a [`TemplateKey`], hands
//! them out on demand and takes them back instead of destroying them.
//!
//! An instance is always either available (queued, inactive, parented under
//! its key's group) or in use. It is never handed out twice or queued twice.
//!
//! [`TemplateKey`]: crate::assets::TemplateKey

pub mod auto_return;
pub mod error;
pub mod manager;
pub mod preload;
pub mod queue_store;
pub mod registry;
pub mod spawn_params;
pub mod tag;

#[cfg(test)]
mod tests;

pub use auto_return::{Lifetime, LifetimeReturn};
pub use error::{PoolError, ReturnError, ReturnResult};
pub use manager::{PoolManager, PoolStats};
pub use spawn_params::SpawnParams;
pub use tag::{InstanceState, ManagerId, PoolTag};
