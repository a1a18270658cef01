//! Accumulated joint movement for one attachment joint.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use sidekick_types::BlendShapeRigMovement;

use crate::interpolate::{blended_offset, blended_rotation, blended_scale};
use crate::weights::BlendWeights;

/// Offset, rotation and scale delta to apply to a joint's rest pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointAdjustment {
    pub offset: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for JointAdjustment {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl JointAdjustment {
    pub const IDENTITY: Self = Self {
        offset: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ZERO,
    };

    /// Add one movement blended by `t`: offsets and scales sum, rotations multiply.
    pub fn accumulate(&mut self, movement: &BlendShapeRigMovement, t: f32) {
        self.offset += blended_offset(Vec3::from_array(movement.max_offset), t);
        self.rotation *= blended_rotation(Vec3::from_array(movement.max_rotation), t);
        self.scale += blended_scale(Vec3::from_array(movement.max_scale), t);
    }

    /// Combine every movement with the scalar of its blend type.
    pub fn from_movements<'a>(
        movements: impl IntoIterator<Item = &'a BlendShapeRigMovement>,
        weights: &BlendWeights,
    ) -> Self {
        let mut adjustment = Self::IDENTITY;
        for movement in movements {
            adjustment.accumulate(movement, weights.get(movement.blend_type));
        }
        adjustment
    }

    pub fn is_identity(&self) -> bool {
        self.offset == Vec3::ZERO && self.rotation == Quat::IDENTITY && self.scale == Vec3::ZERO
    }
}
