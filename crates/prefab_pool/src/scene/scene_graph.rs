//! In-memory scene graph
//!
//! A node arena with a parent/child hierarchy, local transforms, an active flag
//! and typed components. Implements [`SceneHost`] for [`Prefab`] templates.

use std::any::TypeId;
use std::collections::HashMap;

use super::component::{Component, ComponentBox};
use super::host::{SceneHost, Template};
use super::prefab::Prefab;
use crate::foundation::collections::{NodeId, NodeMap};
use crate::foundation::math::{Mat4, Quat, Transform, Vec3};

/// A single scene node
#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Transform,
    active: bool,
    components: HashMap<TypeId, Box<dyn ComponentBox>>,
}

impl Node {
    fn new(name: &str, local: Transform, active: bool) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            local,
            active,
            components: HashMap::new(),
        }
    }
}

/// In-memory scene graph
#[derive(Debug, Default)]
pub struct Scene {
    nodes: NodeMap<Node>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an active, root-level node
    pub fn spawn_node(&mut self, name: &str) -> NodeId {
        self.nodes.insert(Node::new(name, Transform::identity(), true))
    }

    /// Number of live nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Name of a node
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|n| n.name.as_str())
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// Children of a node, in insertion order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Local transform of a node
    pub fn local_transform(&self, node: NodeId) -> Option<Transform> {
        self.nodes.get(node).map(|n| n.local)
    }

    /// Overwrite the local transform of a node
    pub fn set_local_transform(&mut self, node: NodeId, transform: Transform) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.local = transform;
        }
    }

    /// World transform of a node, composed through its ancestors
    pub fn world_transform(&self, node: NodeId) -> Option<Transform> {
        let n = self.nodes.get(node)?;
        let parent_world = n
            .parent
            .and_then(|parent| self.world_transform(parent))
            .unwrap_or_default();
        Some(parent_world.combine(&n.local))
    }

    /// World matrix of a node, for handing placement to a renderer
    pub fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        self.world_transform(node).map(|world| world.to_matrix())
    }

    /// Whether the node and all of its ancestors are active
    pub fn is_active_in_hierarchy(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            match self.nodes.get(id) {
                Some(n) if n.active => current = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// Attach or replace a component on a node
    pub fn insert_component<C: Component + Clone>(&mut self, node: NodeId, component: C) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.components.insert(TypeId::of::<C>(), Box::new(component));
        }
    }

    /// Borrow a component of a node
    pub fn component<C: Component>(&self, node: NodeId) -> Option<&C> {
        self.nodes
            .get(node)?
            .components
            .get(&TypeId::of::<C>())?
            .as_any()
            .downcast_ref::<C>()
    }

    /// Mutably borrow a component of a node
    pub fn component_mut<C: Component>(&mut self, node: NodeId) -> Option<&mut C> {
        self.nodes
            .get_mut(node)?
            .components
            .get_mut(&TypeId::of::<C>())?
            .as_any_mut()
            .downcast_mut::<C>()
    }

    fn parent_world(&self, node: NodeId) -> Transform {
        self.parent(node)
            .and_then(|parent| self.world_transform(parent))
            .unwrap_or_default()
    }

    /// Whether `candidate` is `node` or sits below it
    fn is_self_or_descendant(&self, node: NodeId, candidate: NodeId) -> bool {
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == node {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|child| *child != node);
            }
        }
        if let Some(n) = self.nodes.get_mut(node) {
            n.parent = None;
        }
    }
}

impl SceneHost for Scene {
    type Template = Prefab;

    fn create_container(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        let node = self.spawn_node(name);
        if parent.is_some() {
            self.set_parent(node, parent, false);
        }
        node
    }

    fn instantiate(&mut self, template: &Prefab) -> NodeId {
        let mut node = Node::new(template.name(), *template.transform(), template.is_active());
        for component in template.components() {
            node.components.insert(component.component_type(), component.clone());
        }
        self.nodes.insert(node)
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>, keep_world_transform: bool) {
        if !self.nodes.contains_key(node) {
            return;
        }
        if let Some(parent) = parent {
            if !self.nodes.contains_key(parent) || self.is_self_or_descendant(node, parent) {
                log::warn!("Rejected reparenting {:?} under {:?}", node, parent);
                return;
            }
        }

        let world = self.world_transform(node).unwrap_or_default();
        self.detach(node);

        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.push(node);
            }
            if let Some(n) = self.nodes.get_mut(node) {
                n.parent = Some(parent);
            }
        }

        if keep_world_transform {
            let local = self.parent_world(node).relative_to_local(&world);
            self.set_local_transform(node, local);
        }
    }

    fn set_world_position(&mut self, node: NodeId, position: Vec3) {
        let local = self.parent_world(node).inverse_transform_point(position);
        if let Some(n) = self.nodes.get_mut(node) {
            n.local.position = local;
        }
    }

    fn set_world_rotation(&mut self, node: NodeId, rotation: Quat) {
        let local = self.parent_world(node).rotation.inverse() * rotation;
        if let Some(n) = self.nodes.get_mut(node) {
            n.local.rotation = local;
        }
    }

    fn set_local_scale(&mut self, node: NodeId, scale: Vec3) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.local.scale = scale;
        }
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.active = active;
        }
    }

    fn is_active(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.active)
    }

    fn destroy(&mut self, node: NodeId) {
        if !self.nodes.contains_key(node) {
            return;
        }
        self.detach(node);

        let mut doomed = vec![node];
        while let Some(id) = doomed.pop() {
            if let Some(n) = self.nodes.remove(id) {
                doomed.extend(n.children);
            }
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    fn has_component(&self, node: NodeId, component: TypeId) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|n| n.components.contains_key(&component))
    }
}
