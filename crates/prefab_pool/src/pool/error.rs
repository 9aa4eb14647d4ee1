//! Pool error types

use thiserror::Error;

use crate::assets::{LoadError, TemplateKey};

/// Errors escalated to a caller's error callback
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Caller passed an unusable argument, such as an empty key
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The loader could not produce the template for a key
    #[error("Failed to load template for {key}: {source}")]
    LoadFailure {
        /// Key whose preload was aborted
        key: TemplateKey,
        /// Loader error
        #[source]
        source: LoadError,
    },

    /// A spawned instance lacks the requested component
    #[error("Instance spawned from {key} has no {component} component")]
    CapabilityMissing {
        /// Key the instance was spawned from
        key: TemplateKey,
        /// Type name of the missing component
        component: &'static str,
    },
}

/// Reasons a return to the pool was refused
///
/// These are status results, not escalated errors: the pool is left consistent
/// in every case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReturnError {
    /// The instance was never issued by this pool; it has been destroyed
    #[error("Instance was never pooled and has been destroyed")]
    Untracked,

    /// The instance is already sitting in its pool queue
    #[error("Instance is already in the {0} pool")]
    DuplicateReturn(TemplateKey),

    /// The instance's pool was cleared or never created
    #[error("No pool exists for {0}")]
    UnknownPool(TemplateKey),

    /// The node is the pool root or a group container; nothing was touched
    #[error("Node is a pool container, not a pooled instance")]
    PoolContainer,
}

/// Result alias for pool returns
pub type ReturnResult = Result<(), ReturnError>;
