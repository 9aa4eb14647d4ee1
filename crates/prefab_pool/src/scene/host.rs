//! Scene host interface consumed by the pool

use std::any::TypeId;

use crate::foundation::collections::NodeId;
use crate::foundation::math::{Quat, Vec3};

/// A loaded prototype that instances are cloned from
pub trait Template {
    /// Whether the prototype itself is flagged active
    fn is_active(&self) -> bool;

    /// Flip the prototype's active flag
    fn set_active(&mut self, active: bool);
}

/// Scene-graph and transform primitives the pool orchestrates
///
/// Every operation is synchronous. Operations on nodes that no longer exist
/// are ignored by implementations.
pub trait SceneHost {
    /// Prototype type produced by the asset loader
    type Template: Template;

    /// Create an empty container node
    fn create_container(&mut self, name: &str, parent: Option<NodeId>) -> NodeId;

    /// Clone a template into a new root-level node
    ///
    /// The new node copies the template's active flag.
    fn instantiate(&mut self, template: &Self::Template) -> NodeId;

    /// Reparent a node
    ///
    /// With `keep_world_transform` the node keeps its world placement and its
    /// local transform is recomputed; otherwise the local transform is kept.
    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>, keep_world_transform: bool);

    /// Set the world-space position of a node
    fn set_world_position(&mut self, node: NodeId, position: Vec3);

    /// Set the world-space rotation of a node
    fn set_world_rotation(&mut self, node: NodeId, rotation: Quat);

    /// Set the local scale of a node
    fn set_local_scale(&mut self, node: NodeId, scale: Vec3);

    /// Activate or deactivate a node
    fn set_active(&mut self, node: NodeId, active: bool);

    /// Whether a node is flagged active
    fn is_active(&self, node: NodeId) -> bool;

    /// Destroy a node and everything parented under it
    fn destroy(&mut self, node: NodeId);

    /// Whether a node exists
    fn contains(&self, node: NodeId) -> bool;

    /// Whether a node carries a component of the given type
    fn has_component(&self, node: NodeId, component: TypeId) -> bool;
}
