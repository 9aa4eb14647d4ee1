//! Prefab: the master copy a pooled instance is cloned from

use std::any::TypeId;

use super::component::{Component, ComponentBox};
use super::host::Template;
use crate::foundation::math::Transform;

/// Loaded prototype node with its components
#[derive(Debug, Clone)]
pub struct Prefab {
    name: String,
    active: bool,
    transform: Transform,
    components: Vec<Box<dyn ComponentBox>>,
}

impl Prefab {
    /// Create an active prefab with an identity transform and no components
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            transform: Transform::identity(),
            components: Vec::new(),
        }
    }

    /// Attach a component that every instance receives a copy of
    ///
    /// A component of the same type replaces the previous one.
    #[must_use]
    pub fn with_component<C: Component + Clone>(mut self, component: C) -> Self {
        self.components.retain(|existing| existing.component_type() != TypeId::of::<C>());
        self.components.push(Box::new(component));
        self
    }

    /// Set the local transform instances start with
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the initial active flag
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Prefab name, copied to instances
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local transform copied to instances
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Components copied to instances
    pub fn components(&self) -> &[Box<dyn ComponentBox>] {
        &self.components
    }

    /// Whether the prefab carries a component of type `C`
    pub fn has_component<C: Component>(&self) -> bool {
        self.components
            .iter()
            .any(|component| component.component_type() == TypeId::of::<C>())
    }
}

impl Template for Prefab {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
