//! Placement parameters applied to an instance when it leaves the pool

use crate::foundation::collections::NodeId;
use crate::foundation::math::{Quat, Vec3};

/// Spawn placement
///
/// By default position and rotation are world values and the instance keeps
/// its world placement when reparented. With `transforms_relative_to_parent`
/// the values are kept as the local transform under `parent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    /// Position
    pub position: Vec3,
    /// Rotation
    pub rotation: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Parent to attach to; `None` leaves the instance at scene root
    pub parent: Option<NodeId>,
    /// Interpret the values relative to `parent` instead of world space
    pub transforms_relative_to_parent: bool,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            parent: None,
            transforms_relative_to_parent: false,
        }
    }
}

impl SpawnParams {
    /// World-space placement at `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the rotation
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Attach under `parent`, choosing how the transform values are read
    #[must_use]
    pub fn with_parent(mut self, parent: NodeId, relative: bool) -> Self {
        self.parent = Some(parent);
        self.transforms_relative_to_parent = relative;
        self
    }
}
