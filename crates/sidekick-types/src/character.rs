//! Saved character documents.
//!
//! A serialized character references parts by name and colors by property id
//! so it stays valid across catalog rebuilds. Field names are PascalCase to
//! stay readable by existing character files.

use serde::{Deserialize, Serialize};

use crate::color::{ColorChannels, ColorRow, ColorSet, HexColor, TexturePaths};
use crate::enums::CharacterPartType;
use crate::TypeError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerializedCharacter {
    pub name: String,
    /// Species id.
    pub species: i64,
    #[serde(default)]
    pub parts: Vec<SerializedPart>,
    #[serde(default)]
    pub color_set: Option<SerializedColorSet>,
    #[serde(default)]
    pub color_rows: Vec<SerializedColorRow>,
    #[serde(default)]
    pub blend_shapes: SerializedBlendShapeValues,
}

impl SerializedCharacter {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerializedPart {
    pub name: String,
    /// Part type discriminant.
    pub part_type: i32,
    #[serde(default)]
    pub part_version: String,
}

impl SerializedPart {
    pub fn new(name: impl Into<String>, part_type: CharacterPartType) -> Self {
        Self {
            name: name.into(),
            part_type: part_type.as_i32(),
            part_version: String::new(),
        }
    }

    pub fn part_type(&self) -> Result<CharacterPartType, TypeError> {
        CharacterPartType::try_from(self.part_type)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerializedColorSet {
    pub species: i64,
    pub name: String,
    #[serde(default)]
    pub source_color_path: String,
    #[serde(default)]
    pub source_metallic_path: String,
    #[serde(default)]
    pub source_smoothness_path: String,
    #[serde(default)]
    pub source_reflection_path: String,
    #[serde(default)]
    pub source_emission_path: String,
    #[serde(default)]
    pub source_opacity_path: String,
}

impl From<&ColorSet> for SerializedColorSet {
    fn from(set: &ColorSet) -> Self {
        Self {
            species: set.species_id,
            name: set.name.clone(),
            source_color_path: set.textures.color.clone(),
            source_metallic_path: set.textures.metallic.clone(),
            source_smoothness_path: set.textures.smoothness.clone(),
            source_reflection_path: set.textures.reflection.clone(),
            source_emission_path: set.textures.emission.clone(),
            source_opacity_path: set.textures.opacity.clone(),
        }
    }
}

impl SerializedColorSet {
    /// Unsaved color set carrying these values.
    pub fn to_color_set(&self) -> ColorSet {
        let mut set = ColorSet::new(self.name.clone(), self.species);
        set.textures = TexturePaths {
            color: self.source_color_path.clone(),
            metallic: self.source_metallic_path.clone(),
            smoothness: self.source_smoothness_path.clone(),
            reflection: self.source_reflection_path.clone(),
            emission: self.source_emission_path.clone(),
            opacity: self.source_opacity_path.clone(),
        };
        set
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerializedColorRow {
    /// Color property id.
    pub color_property: i64,
    pub main_color: String,
    pub metallic: String,
    pub smoothness: String,
    pub reflection: String,
    pub emission: String,
    pub opacity: String,
}

impl From<&ColorRow> for SerializedColorRow {
    fn from(row: &ColorRow) -> Self {
        let c = &row.channels;
        Self {
            color_property: row.color_property_id,
            main_color: c.color.as_str().to_string(),
            metallic: c.metallic.as_str().to_string(),
            smoothness: c.smoothness.as_str().to_string(),
            reflection: c.reflection.as_str().to_string(),
            emission: c.emission.as_str().to_string(),
            opacity: c.opacity.as_str().to_string(),
        }
    }
}

impl SerializedColorRow {
    /// Unsaved color row in `color_set_id`.
    pub fn to_color_row(&self, color_set_id: i64) -> ColorRow {
        ColorRow::new(
            color_set_id,
            self.color_property,
            ColorChannels {
                color: HexColor::new(self.main_color.clone()),
                metallic: HexColor::new(self.metallic.clone()),
                smoothness: HexColor::new(self.smoothness.clone()),
                reflection: HexColor::new(self.reflection.clone()),
                emission: HexColor::new(self.emission.clone()),
                opacity: HexColor::new(self.opacity.clone()),
            },
        )
    }
}

/// Body sliders as saved by the editor.
///
/// `body_type_value` and `muscle_value` run 0 to 100 with 50 neutral;
/// `body_size_value` runs -100 (skinny) to 100 (heavy).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerializedBlendShapeValues {
    pub body_type_value: f32,
    pub body_size_value: f32,
    pub muscle_value: f32,
}

impl Default for SerializedBlendShapeValues {
    fn default() -> Self {
        Self {
            body_type_value: 50.0,
            body_size_value: 0.0,
            muscle_value: 50.0,
        }
    }
}
