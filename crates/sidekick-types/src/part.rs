//! Parts, part presets and species links.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::enums::{CharacterPartType, PartGroup};
use crate::species::Species;
use crate::{naming, NO_ID};

/// A single modular mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,
    pub species_id: i64,
    pub part_type: CharacterPartType,
    pub part_group: PartGroup,
    pub name: String,
    pub file_name: String,
    /// Asset path of the mesh, relative to the asset root.
    pub location: String,
    pub uses_wrap: bool,
    /// Cached result of the last [`Part::is_file_available`] check.
    pub file_exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
}

impl Part {
    /// An unsaved part. The group is derived from the part type.
    pub fn new(
        species_id: i64,
        part_type: CharacterPartType,
        name: impl Into<String>,
        file_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: NO_ID,
            species_id,
            part_type,
            part_group: part_type.part_group(),
            name: name.into(),
            file_name: file_name.into(),
            location: location.into(),
            uses_wrap: false,
            file_exists: false,
            species: None,
        }
    }

    /// Re-stat the mesh file under `asset_root` and cache the answer in `file_exists`.
    pub fn is_file_available(&mut self, asset_root: &Path) -> bool {
        self.file_exists = !self.location.is_empty() && asset_root.join(&self.location).is_file();
        self.file_exists
    }

    /// Resource path used to load the mesh, see [`naming::resource_path`].
    pub fn resource_path(&self) -> Option<String> {
        naming::resource_path(&self.location)
    }

    pub fn is_base_part(&self) -> bool {
        naming::is_base_part(&self.name) || naming::is_base_part(&self.file_name)
    }
}

/// A named bundle of parts covering one part group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartPreset {
    pub id: i64,
    pub name: String,
    pub part_group: PartGroup,
    pub species_id: i64,
    pub outfit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
}

impl PartPreset {
    pub fn new(name: impl Into<String>, part_group: PartGroup, species_id: i64) -> Self {
        Self {
            id: NO_ID,
            name: name.into(),
            part_group,
            species_id,
            outfit: String::new(),
            species: None,
        }
    }
}

/// One slot of a part preset.
///
/// `part_id` is `-1` when the row was imported by name only; the part is then
/// resolved by [`PartPresetRow::part_name`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartPresetRow {
    pub id: i64,
    pub preset_id: i64,
    pub part_name: String,
    pub part_id: i64,
    /// Shortcode of the slot, e.g. `10TORS`.
    pub part_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<Part>,
}

impl PartPresetRow {
    pub fn new(preset_id: i64, part_name: impl Into<String>, part_type: CharacterPartType) -> Self {
        Self {
            id: NO_ID,
            preset_id,
            part_name: part_name.into(),
            part_id: NO_ID,
            part_type: part_type.shortcode().to_string(),
            part: None,
        }
    }

    /// Row pointing at an existing part.
    pub fn for_part(preset_id: i64, part: &Part) -> Self {
        Self {
            part_id: part.id,
            ..Self::new(preset_id, part.name.clone(), part.part_type)
        }
    }

    pub fn slot(&self) -> Option<CharacterPartType> {
        CharacterPartType::from_shortcode(&self.part_type).ok()
    }

    /// A part is usable when it is resolved and its file was last seen on disk.
    pub fn has_available_part(&self) -> bool {
        self.part.as_ref().is_some_and(|p| p.file_exists)
    }
}

/// Marks a part as usable by an additional species.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSpeciesLink {
    pub id: i64,
    pub species_id: i64,
    pub part_id: i64,
}

impl PartSpeciesLink {
    pub fn new(species_id: i64, part_id: i64) -> Self {
        Self {
            id: NO_ID,
            species_id,
            part_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_part_derives_group() {
        let part = Part::new(1, CharacterPartType::Torso, "SK_Torso_HU", "SK_Torso_HU.prefab", "");
        assert_eq!(part.part_group, PartGroup::UpperBody);
        assert!(!part.file_exists);
    }

    #[test]
    fn test_is_file_available_tracks_filesystem() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut part = Part::new(
            1,
            CharacterPartType::Torso,
            "SK_Torso_HU",
            "SK_Torso_HU.prefab",
            "Resources/Meshes/SK_Torso_HU.prefab",
        );

        assert!(!part.is_file_available(dir.path()));
        assert!(!part.file_exists);

        let mesh = dir.path().join("Resources/Meshes/SK_Torso_HU.prefab");
        std::fs::create_dir_all(mesh.parent().expect("parent")).expect("mkdir");
        std::fs::write(&mesh, b"mesh").expect("write");
        assert!(part.is_file_available(dir.path()));
        assert!(part.file_exists);

        std::fs::remove_file(&mesh).expect("remove");
        assert!(!part.is_file_available(dir.path()));
    }

    #[test]
    fn test_empty_location_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut part = Part::new(1, CharacterPartType::Head, "h", "h", "");
        assert!(!part.is_file_available(dir.path()));
    }

    #[test]
    fn test_preset_row_slot() {
        let row = PartPresetRow::new(3, "SK_X_10TORS_HU", CharacterPartType::Torso);
        assert_eq!(row.part_type, "10TORS");
        assert_eq!(row.slot(), Some(CharacterPartType::Torso));
        assert_eq!(row.part_id, NO_ID);
        assert!(!row.has_available_part());
    }
}
