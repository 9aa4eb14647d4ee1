//! Lifetime auto-return
//!
//! Returns in-use instances of configured keys to their pool once they have
//! been out for a fixed time. Suited to fire-and-forget effects such as
//! particle bursts. The timer restarts every time an instance is spawned
//! again.

use std::collections::HashMap;

use super::manager::PoolManager;
use crate::assets::{AssetLoader, TemplateKey};
use crate::config::PoolConfig;
use crate::foundation::collections::NodeId;
use crate::scene::SceneHost;

/// Time an instance has been allowed to stay out of its pool
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    /// Clock time when the instance was first seen in use (seconds)
    pub created_at: f32,
    /// How long the instance may stay in use (seconds)
    pub duration: f32,
}

impl Lifetime {
    /// Create a new lifetime
    pub fn new(created_at: f32, duration: f32) -> Self {
        Self {
            created_at,
            duration,
        }
    }

    /// Check if this lifetime has run out
    pub fn is_expired(&self, current_time: f32) -> bool {
        if self.duration <= 0.0 {
            false // Infinite lifetime
        } else {
            current_time >= self.created_at + self.duration
        }
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self, current_time: f32) -> f32 {
        if self.duration <= 0.0 {
            f32::INFINITY
        } else {
            (self.created_at + self.duration - current_time).max(0.0)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    serial: u64,
    lifetime: Lifetime,
}

/// Per-frame system that recycles expired instances
#[derive(Debug, Default)]
pub struct LifetimeReturn {
    lifetimes: HashMap<TemplateKey, f32>,
    tracked: HashMap<NodeId, Tracked>,
    clock: f32,
}

impl LifetimeReturn {
    /// Create a system with no keys configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a system from the `auto_return` entries of a pool configuration
    pub fn from_config(config: &PoolConfig) -> Self {
        config
            .auto_return
            .iter()
            .fold(Self::new(), |system, entry| system.with_lifetime(entry.key.as_str(), entry.lifetime_secs))
    }

    /// Recycle instances of `key` after `lifetime_secs`
    #[must_use]
    pub fn with_lifetime(mut self, key: impl Into<TemplateKey>, lifetime_secs: f32) -> Self {
        self.lifetimes.insert(key.into(), lifetime_secs);
        self
    }

    /// Seconds accumulated by `update`
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Number of in-use instances being timed
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Seconds left before `node` is returned
    pub fn remaining(&self, node: NodeId) -> Option<f32> {
        self.tracked
            .get(&node)
            .map(|tracked| tracked.lifetime.remaining(self.clock))
    }

    /// Advance the clock by `delta_time` and return expired instances
    ///
    /// Instances spawned since the last update start their lifetime at the
    /// previous clock value. Returns how many instances went back to a pool.
    pub fn update<H, L>(&mut self, pool: &mut PoolManager<H, L>, delta_time: f32) -> usize
    where
        H: SceneHost + 'static,
        L: AssetLoader<Asset = H::Template> + 'static,
    {
        let started = self.clock;
        self.clock += delta_time;

        let mut live = HashMap::new();
        for (node, tag, serial) in pool.in_use_instances() {
            let Some(&duration) = self.lifetimes.get(tag.key()) else {
                continue;
            };
            let lifetime = match self.tracked.get(&node) {
                Some(tracked) if tracked.serial == serial => tracked.lifetime,
                _ => Lifetime::new(started, duration),
            };
            live.insert(node, Tracked { serial, lifetime });
        }
        self.tracked = live;

        let mut expired: Vec<NodeId> = self
            .tracked
            .iter()
            .filter(|(_, tracked)| tracked.lifetime.is_expired(self.clock))
            .map(|(node, _)| *node)
            .collect();
        expired.sort();

        let mut returned = 0;
        for node in expired {
            self.tracked.remove(&node);
            match pool.return_to_pool(node) {
                Ok(()) => returned += 1,
                Err(error) => log::warn!("Lifetime return of {:?} failed: {}", node, error),
            }
        }

        if returned > 0 {
            log::debug!("Returned {} expired instance(s) to their pools", returned);
        }
        returned
    }
}
