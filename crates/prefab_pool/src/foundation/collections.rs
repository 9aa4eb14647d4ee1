//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a node owned by a scene host
    pub struct NodeId;
}

/// Handle-based map of scene nodes
pub type NodeMap<T> = SlotMap<NodeId, T>;

/// Typed node handle: a node known to carry a component of type `T`
pub struct TypedHandle<T> {
    node: NodeId,
    _phantom: std::marker::PhantomData<fn() -> T>,
}

impl<T> TypedHandle<T> {
    /// Create a new typed handle from a node
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Get the underlying node
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl<T> Clone for TypedHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedHandle<T> {}

impl<T> PartialEq for TypedHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for TypedHandle<T> {}

impl<T> std::hash::Hash for TypedHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl<T> std::fmt::Debug for TypedHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedHandle")
            .field("node", &self.node)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
