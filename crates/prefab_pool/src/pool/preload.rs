//! Preload batch bookkeeping
//!
//! A batch is a set of (key, count) requests with one completion callback and
//! an optional error callback. Keys settle independently and in any order;
//! once the last key of a batch settles the completion callback fires exactly
//! once. Each failed key additionally reports to the error callback.

use std::collections::HashMap;

use super::error::PoolError;
use crate::assets::{LoadError, TemplateKey};

/// Fires once when every key of a batch has settled
pub type CompleteCallback = Box<dyn FnOnce()>;

/// Fires once per key whose load failed
pub type ErrorCallback = Box<dyn FnMut(PoolError)>;

/// Identifier of a preload batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(u64);

struct Batch {
    remaining: usize,
    on_complete: CompleteCallback,
    on_error: Option<ErrorCallback>,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    count: usize,
    batch: BatchId,
}

/// Key to materialize after its template has loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyKey {
    /// Key whose load succeeded
    pub key: TemplateKey,
    /// Instances to create
    pub count: usize,
}

/// Tracks running preload batches
pub struct PreloadPipeline {
    batches: HashMap<BatchId, Batch>,
    in_flight: HashMap<TemplateKey, InFlight>,
    next_batch: u64,
}

impl PreloadPipeline {
    /// Create an idle pipeline
    pub fn new() -> Self {
        Self {
            batches: HashMap::new(),
            in_flight: HashMap::new(),
            next_batch: 1,
        }
    }

    /// Start a batch over `requests`
    ///
    /// A batch with no requests completes before this returns. Keys already
    /// in flight for another batch are skipped.
    pub fn begin(
        &mut self,
        requests: &[(TemplateKey, usize)],
        on_complete: CompleteCallback,
        on_error: Option<ErrorCallback>,
    ) -> BatchId {
        let batch = BatchId(self.next_batch);
        self.next_batch += 1;

        let mut remaining = 0;
        for (key, count) in requests {
            if self.in_flight.contains_key(key) {
                log::warn!("Preload of {} is already running; not loading it twice", key);
                continue;
            }
            self.in_flight.insert(key.clone(), InFlight { count: *count, batch });
            remaining += 1;
        }

        if remaining == 0 {
            log::debug!("Preload batch {:?} had nothing to load", batch);
            on_complete();
        } else {
            self.batches.insert(
                batch,
                Batch {
                    remaining,
                    on_complete,
                    on_error,
                },
            );
        }
        batch
    }

    /// Whether `key` belongs to a running batch
    pub fn is_in_flight(&self, key: &TemplateKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Keys of every running batch, sorted
    pub fn in_flight_keys(&self) -> Vec<TemplateKey> {
        let mut keys: Vec<_> = self.in_flight.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of batches still waiting on keys
    pub fn running_batches(&self) -> usize {
        self.batches.len()
    }

    /// Instance count requested for an in-flight key whose load succeeded
    ///
    /// The key stays in flight until [`PreloadPipeline::settle`] is called, so
    /// the caller can materialize before the batch may complete.
    pub fn ready(&self, key: &TemplateKey) -> Option<ReadyKey> {
        self.in_flight.get(key).map(|in_flight| ReadyKey {
            key: key.clone(),
            count: in_flight.count,
        })
    }

    /// Settle `key` and fire whatever callbacks its batch owes
    ///
    /// Returns `false` when the key was not in flight.
    pub fn settle(&mut self, key: &TemplateKey, result: Result<(), LoadError>) -> bool {
        let Some(in_flight) = self.in_flight.remove(key) else {
            return false;
        };
        let Some(batch) = self.batches.get_mut(&in_flight.batch) else {
            return true;
        };

        if let Err(source) = result {
            if let Some(on_error) = batch.on_error.as_mut() {
                on_error(PoolError::LoadFailure {
                    key: key.clone(),
                    source,
                });
            }
        }

        batch.remaining -= 1;
        if batch.remaining == 0 {
            if let Some(batch) = self.batches.remove(&in_flight.batch) {
                log::info!("Preload batch {:?} complete", in_flight.batch);
                (batch.on_complete)();
            }
        }
        true
    }
}

impl Default for PreloadPipeline {
    fn default() -> Self {
        Self::new()
    }
}
