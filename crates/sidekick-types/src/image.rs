//! Thumbnail images attached to catalog entities.

use serde::{Deserialize, Serialize};

use crate::NO_ID;

/// Entity kind a thumbnail belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Species,
    Part,
    /// Keyed by preset and part group.
    PartPreset,
    ColorSet,
    /// Keyed by preset and color group.
    ColorPreset,
    BodyShapePreset,
}

impl ImageKind {
    pub const ALL: [ImageKind; 6] = [
        Self::Species,
        Self::Part,
        Self::PartPreset,
        Self::ColorSet,
        Self::ColorPreset,
        Self::BodyShapePreset,
    ];

    /// Whether images of this kind also carry a group discriminant.
    pub fn is_grouped(self) -> bool {
        matches!(self, Self::PartPreset | Self::ColorPreset)
    }
}

/// Raw image bytes plus dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub id: i64,
    pub kind: ImageKind,
    pub owner_id: i64,
    /// Part group or color group discriminant for grouped kinds.
    pub group: Option<i32>,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    pub fn new(kind: ImageKind, owner_id: i64, data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            id: NO_ID,
            kind,
            owner_id,
            group: None,
            data,
            width,
            height,
        }
    }

    pub fn with_group(mut self, group: i32) -> Self {
        self.group = Some(group);
        self
    }
}
