//! Scene management system
//!
//! The pool treats the host engine's scene graph as a collaborator reached
//! through [`SceneHost`]. [`Scene`] is the in-memory implementation used by
//! tools and tests.
//!
//! ## Architecture
//!
//! ```text
//! PoolManager
//!      ↓
//! SceneHost (instantiate / parent / place / activate / destroy)
//!      ↓
//! Scene (node arena + transform hierarchy)
//! ```

mod component;
mod host;
mod prefab;
mod scene_graph;

pub use component::{Component, ComponentBox};
pub use host::{SceneHost, Template};
pub use prefab::Prefab;
pub use scene_graph::Scene;
