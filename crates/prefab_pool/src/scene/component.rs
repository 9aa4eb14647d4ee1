//! Component trait and type-erased component storage

use std::any::{Any, TypeId};

/// Marker trait for components
pub trait Component: 'static + Send + Sync {}

/// Type-erased component that can be cloned onto a new instance
pub trait ComponentBox: Any + Send + Sync {
    /// Clone into a new box
    fn clone_box(&self) -> Box<dyn ComponentBox>;

    /// Type id of the concrete component
    fn component_type(&self) -> TypeId;

    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any` for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component + Clone> ComponentBox for T {
    fn clone_box(&self) -> Box<dyn ComponentBox> {
        Box::new(self.clone())
    }

    fn component_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn ComponentBox> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

impl std::fmt::Debug for dyn ComponentBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentBox")
            .field("type", &self.component_type())
            .finish()
    }
}
