//! Body shape presets and blend-shape driven rig movements.

use serde::{Deserialize, Serialize};

use crate::enums::{BlendShapeType, CharacterPartType};
use crate::{TypeError, NO_ID};

/// Lower bound of every body shape value.
pub const BODY_SHAPE_MIN: i32 = -100;
/// Upper bound of every body shape value.
pub const BODY_SHAPE_MAX: i32 = 100;

/// Stored body sliders, each in `[-100, 100]`.
///
/// `body_type` runs masculine (-100) to feminine (100). `body_size` is skinny
/// below zero and heavy above it. `musculature` runs lean to bulky.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyShapePreset {
    pub id: i64,
    pub name: String,
    pub body_type: i32,
    pub body_size: i32,
    pub musculature: i32,
}

impl BodyShapePreset {
    pub fn new(name: impl Into<String>, body_type: i32, body_size: i32, musculature: i32) -> Self {
        Self {
            id: NO_ID,
            name: name.into(),
            body_type,
            body_size,
            musculature,
        }
    }

    /// Check every value lies in `[-100, 100]`.
    pub fn validate(&self) -> Result<(), TypeError> {
        for (field, value) in [
            ("body_type", self.body_type),
            ("body_size", self.body_size),
            ("musculature", self.musculature),
        ] {
            if !(BODY_SHAPE_MIN..=BODY_SHAPE_MAX).contains(&value) {
                return Err(TypeError::OutOfRange {
                    field,
                    value: value.into(),
                    min: BODY_SHAPE_MIN.into(),
                    max: BODY_SHAPE_MAX.into(),
                });
            }
        }
        Ok(())
    }
}

/// Maximum joint movement for one attachment part type under one blend shape.
///
/// Rotations are Euler angles in degrees, applied Z then X then Y.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlendShapeRigMovement {
    pub id: i64,
    pub part_type: CharacterPartType,
    pub blend_type: BlendShapeType,
    pub max_offset: [f32; 3],
    pub max_rotation: [f32; 3],
    pub max_scale: [f32; 3],
}

impl BlendShapeRigMovement {
    /// A movement that does nothing, used when none is stored.
    pub fn zero(part_type: CharacterPartType, blend_type: BlendShapeType) -> Self {
        Self {
            id: NO_ID,
            part_type,
            blend_type,
            max_offset: [0.0; 3],
            max_rotation: [0.0; 3],
            max_scale: [0.0; 3],
        }
    }
}
