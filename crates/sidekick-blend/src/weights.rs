//! Body shape sliders turned into per-blend-shape scalars.

use serde::{Deserialize, Serialize};
use sidekick_types::{BlendShapeType, BodyShapePreset};

/// Mesh blend shape driven by the body type slider.
pub const FEMININE_BLEND_SHAPE: &str = "masculineFeminine";
/// Mesh blend shape driven by positive body size.
pub const HEAVY_BLEND_SHAPE: &str = "defaultHeavy";
/// Mesh blend shape driven by negative body size.
pub const SKINNY_BLEND_SHAPE: &str = "defaultSkinny";
/// Mesh blend shape driven by musculature.
pub const BULK_BLEND_SHAPE: &str = "defaultBuff";

/// Interpolation factor in `[0, 1]` for each blend shape type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub feminine: f32,
    pub heavy: f32,
    pub skinny: f32,
    pub bulk: f32,
}

impl BlendWeights {
    /// Weights from sliders in `[-1, 1]`; values outside are clamped.
    ///
    /// Body size drives heavy above zero and skinny below it, never both.
    pub fn from_sliders(body_type: f32, body_size: f32, musculature: f32) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        let (t, s, m) = (clamp(body_type), clamp(body_size), clamp(musculature));
        Self {
            feminine: (t + 1.0) / 2.0,
            heavy: s.max(0.0),
            skinny: (-s).max(0.0),
            bulk: (m + 1.0) / 2.0,
        }
    }

    /// Weights from stored slider values in `[-100, 100]`.
    pub fn from_preset(preset: &BodyShapePreset) -> Self {
        Self::from_sliders(
            preset.body_type as f32 / 100.0,
            preset.body_size as f32 / 100.0,
            preset.musculature as f32 / 100.0,
        )
    }

    pub fn get(&self, blend_type: BlendShapeType) -> f32 {
        match blend_type {
            BlendShapeType::Feminine => self.feminine,
            BlendShapeType::Heavy => self.heavy,
            BlendShapeType::Skinny => self.skinny,
            BlendShapeType::Bulk => self.bulk,
        }
    }

    /// Mesh blend shape weights on the 0-100 scale, keyed by blend shape name.
    pub fn mesh_weights(&self) -> [(&'static str, f32); 4] {
        [
            (FEMININE_BLEND_SHAPE, self.feminine * 100.0),
            (HEAVY_BLEND_SHAPE, self.heavy * 100.0),
            (SKINNY_BLEND_SHAPE, self.skinny * 100.0),
            (BULK_BLEND_SHAPE, self.bulk * 100.0),
        ]
    }
}
