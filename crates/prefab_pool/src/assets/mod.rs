//! Asset loading interface
//!
//! Templates are loaded asynchronously by an [`AssetLoader`]. Every load hands
//! back a [`LoadRequest`]: a one-shot channel the pool polls once per frame.
//! Dropping the request before it resolves is how a load is cancelled.
//!
//! ```text
//! PoolManager ──load(key)──► AssetLoader
//!      ▲                          │
//!      └──── LoadRequest ◄── LoadCompleter::complete(Ok(template))
//! ```

pub mod catalog;

pub use catalog::PrefabCatalog;

use futures::channel::oneshot;
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Identifier of a poolable template
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateKey(String);

impl TemplateKey {
    /// Create a key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty (never a valid pool key)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TemplateKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TemplateKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for TemplateKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Asset loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No asset is known under the key
    #[error("Asset not found: {0}")]
    NotFound(TemplateKey),

    /// The loader failed while producing the asset
    #[error("Failed to load asset {key}: {reason}")]
    LoadFailed {
        /// Key being loaded
        key: TemplateKey,
        /// Loader-specific reason
        reason: String,
    },

    /// The load was released before it finished, or the loader dropped it
    #[error("Load of {0} was cancelled")]
    Cancelled(TemplateKey),
}

/// Identity of one outstanding or completed load, used to release it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadHandle {
    id: u64,
    key: TemplateKey,
}

impl LoadHandle {
    /// Create a handle; loaders pick unique ids
    pub fn new(id: u64, key: TemplateKey) -> Self {
        Self { id, key }
    }

    /// Loader-assigned id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Key this load was issued for
    pub fn key(&self) -> &TemplateKey {
        &self.key
    }
}

/// Receiving side of an asynchronous load
#[derive(Debug)]
pub struct LoadRequest<T> {
    handle: LoadHandle,
    receiver: oneshot::Receiver<Result<T, LoadError>>,
}

/// Sending side of an asynchronous load, held by the loader
#[derive(Debug)]
pub struct LoadCompleter<T> {
    key: TemplateKey,
    sender: oneshot::Sender<Result<T, LoadError>>,
}

impl<T> LoadRequest<T> {
    /// Open a load channel for `handle`
    pub fn channel(handle: LoadHandle) -> (Self, LoadCompleter<T>) {
        let (sender, receiver) = oneshot::channel();
        let completer = LoadCompleter {
            key: handle.key.clone(),
            sender,
        };
        (Self { handle, receiver }, completer)
    }

    /// Handle identifying this load
    pub fn handle(&self) -> &LoadHandle {
        &self.handle
    }

    /// Check for a result without blocking
    ///
    /// Returns `None` while the load is in flight. A completer dropped without
    /// sending resolves as [`LoadError::Cancelled`].
    pub fn poll(&mut self) -> Option<Result<T, LoadError>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(LoadError::Cancelled(self.handle.key.clone()))),
        }
    }

    /// Split into the handle, dropping the receiver
    pub fn into_handle(self) -> LoadHandle {
        self.handle
    }
}

impl<T> LoadCompleter<T> {
    /// Key this completer resolves
    pub fn key(&self) -> &TemplateKey {
        &self.key
    }

    /// Whether the requesting side has been dropped (load released)
    pub fn is_released(&self) -> bool {
        self.sender.is_canceled()
    }

    /// Deliver the load result
    ///
    /// Returns `false` when the request was already released.
    pub fn complete(self, result: Result<T, LoadError>) -> bool {
        self.sender.send(result).is_ok()
    }
}

/// Asynchronous template loader
///
/// At most one outstanding load per key is requested by the pool.
pub trait AssetLoader {
    /// Template type produced by this loader
    type Asset;

    /// Begin loading the asset for `key`
    fn load(&mut self, key: &TemplateKey) -> LoadRequest<Self::Asset>;

    /// Free a previously issued load, finished or not
    fn release(&mut self, handle: LoadHandle);

    /// Advance in-flight loads; called once per frame by the pool
    fn update(&mut self) {}
}
