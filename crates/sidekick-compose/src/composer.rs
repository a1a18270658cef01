//! Turn a [`CharacterRequest`] into a composed [`Character`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use rusqlite::Connection;
use serde::Serialize;
use sidekick_blend::{BlendWeights, JointAdjustment};
use sidekick_db::integrity;
use sidekick_db::queries::{
    body_shape_preset, color_preset, color_preset_row, color_row, color_set, part, part_preset,
    part_preset_row, rig_movement, species,
};
use sidekick_types::{CharacterPartType, ColorRow, Part, Species, NO_ID};

use crate::atlas::{ColorAtlas, DEFAULT_ATLAS_SIZE};
use crate::mesh::{Mesh, MeshSource};
use crate::request::{BodyShapeInput, CharacterRequest, ColorSelection, PartSelection};
use crate::{ComposeError, Result};

#[derive(Clone, Debug)]
pub struct ComposeOptions {
    /// Directory part locations are relative to.
    pub asset_root: PathBuf,
    pub atlas_size: u32,
    /// Write refreshed `file_exists` flags back to the catalog.
    pub persist_file_checks: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            atlas_size: DEFAULT_ATLAS_SIZE,
            persist_file_checks: false,
        }
    }
}

/// Something skipped while composing. Composition still succeeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompositionWarning {
    #[error("no part matches {selection}")]
    UnresolvedPart { selection: String },

    #[error("mesh file for {part} is missing")]
    MissingFile { part: String },

    #[error("mesh for {part} could not be loaded")]
    MissingMesh { part: String },

    #[error("color property {property_id} is unknown")]
    UnknownColorProperty { property_id: i64 },

    #[error("color property {property_id} lies outside the atlas")]
    OutsideAtlas { property_id: i64 },
}

#[derive(Clone, Debug, Serialize)]
pub struct ComposedPart {
    pub part: Part,
    pub mesh: Mesh,
}

/// A composed character, ready to be instantiated.
#[derive(Clone, Debug, Serialize)]
pub struct Character {
    pub name: String,
    pub species: Option<Species>,
    /// Ordered by part type.
    pub parts: Vec<ComposedPart>,
    /// Keyed by joint name.
    pub joints: BTreeMap<String, JointAdjustment>,
    /// Mesh blend shape weights on the 0-100 scale.
    pub blend_shape_weights: BTreeMap<String, f32>,
    #[serde(skip)]
    pub atlas: ColorAtlas,
    pub warnings: Vec<CompositionWarning>,
}

impl Character {
    pub fn part(&self, part_type: CharacterPartType) -> Option<&ComposedPart> {
        self.parts.iter().find(|p| p.part.part_type == part_type)
    }
}

/// Composes characters from one catalog.
pub struct Composer<'a, M> {
    conn: &'a Connection,
    meshes: M,
    options: ComposeOptions,
}

impl<'a, M: MeshSource> Composer<'a, M> {
    pub fn new(conn: &'a Connection, meshes: M, options: ComposeOptions) -> Self {
        Self {
            conn,
            meshes,
            options,
        }
    }

    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    pub fn compose(&self, request: &CharacterRequest) -> Result<Character> {
        let mut warnings = Vec::new();

        let selected = self.resolve_parts(request, &mut warnings)?;
        let parts = self.load_meshes(selected, &mut warnings)?;

        let weights = self.blend_weights(&request.body_shape)?;
        let joints = self.joint_adjustments(&parts, &weights)?;
        let blend_shape_weights = weights
            .mesh_weights()
            .into_iter()
            .map(|(name, weight)| (name.to_string(), weight))
            .collect();

        let atlas = self.paint_colors(&request.colors, &mut warnings)?;

        let species_id = if request.species_id != NO_ID {
            request.species_id
        } else {
            parts.first().map_or(NO_ID, |p| p.part.species_id)
        };
        let species = if species_id > 0 {
            species::get(self.conn, species_id)?
        } else {
            None
        };

        tracing::info!(
            name = %request.output_name,
            parts = parts.len(),
            joints = joints.len(),
            warnings = warnings.len(),
            "Composed character"
        );

        Ok(Character {
            name: request.output_name.clone(),
            species,
            parts,
            joints,
            blend_shape_weights,
            atlas,
            warnings,
        })
    }

    /// One part per slot, later selections replacing earlier ones.
    fn resolve_parts(
        &self,
        request: &CharacterRequest,
        warnings: &mut Vec<CompositionWarning>,
    ) -> Result<BTreeMap<CharacterPartType, Part>> {
        let mut slots = BTreeMap::new();
        let mut place = |found: Option<Part>, selection: String| match found {
            Some(part) => {
                slots.insert(part.part_type, part);
            }
            None => {
                tracing::warn!(%selection, "No part matches selection");
                warnings.push(CompositionWarning::UnresolvedPart { selection });
            }
        };

        for selection in &request.parts {
            match selection {
                PartSelection::Part(id) => place(part::get(self.conn, *id)?, format!("part {id}")),
                PartSelection::Named(name) => place(part::search_by_name(self.conn, name)?, name.clone()),
                PartSelection::Preset(id) => {
                    if part_preset::get(self.conn, *id)?.is_none() {
                        return Err(ComposeError::UnknownPreset {
                            kind: "part preset",
                            id: *id,
                        });
                    }
                    for row in part_preset_row::list_by_preset(self.conn, *id)? {
                        place(row.part, row.part_name);
                    }
                }
            }
        }
        Ok(slots)
    }

    fn load_meshes(
        &self,
        selected: BTreeMap<CharacterPartType, Part>,
        warnings: &mut Vec<CompositionWarning>,
    ) -> Result<Vec<ComposedPart>> {
        let mut parts = Vec::with_capacity(selected.len());
        for (_, mut part) in selected {
            let available = if self.options.persist_file_checks {
                integrity::refresh_part_availability(self.conn, &self.options.asset_root, &mut part)?
            } else {
                part.is_file_available(&self.options.asset_root)
            };
            if !available {
                tracing::warn!(part = %part.name, location = %part.location, "Part file missing");
                warnings.push(CompositionWarning::MissingFile { part: part.name });
                continue;
            }

            match self.meshes.load(&part) {
                Ok(Some(mesh)) => parts.push(ComposedPart { part, mesh }),
                Ok(None) => {
                    tracing::warn!(part = %part.name, "No mesh for part");
                    warnings.push(CompositionWarning::MissingMesh { part: part.name });
                }
                Err(e) => {
                    tracing::warn!(part = %part.name, "Failed to load mesh: {e}");
                    warnings.push(CompositionWarning::MissingMesh { part: part.name });
                }
            }
        }
        Ok(parts)
    }

    fn blend_weights(&self, input: &BodyShapeInput) -> Result<BlendWeights> {
        match input {
            BodyShapeInput::Preset(id) => {
                let preset = body_shape_preset::get(self.conn, *id)?
                    .ok_or(ComposeError::UnknownBodyShape(*id))?;
                Ok(BlendWeights::from_preset(&preset))
            }
            BodyShapeInput::Sliders {
                body_type,
                body_size,
                musculature,
            } => Ok(BlendWeights::from_sliders(*body_type, *body_size, *musculature)),
        }
    }

    fn joint_adjustments(
        &self,
        parts: &[ComposedPart],
        weights: &BlendWeights,
    ) -> Result<BTreeMap<String, JointAdjustment>> {
        let mut joints = BTreeMap::new();
        if !parts.iter().any(|p| p.part.part_type.joint_name().is_some()) {
            return Ok(joints);
        }

        let library = rig_movement::library(self.conn)?;
        for composed in parts {
            let part_type = composed.part.part_type;
            let (Some(joint), Some(movements)) = (part_type.joint_name(), library.get(&part_type)) else {
                continue;
            };
            let adjustment = JointAdjustment::from_movements(movements.values().flatten(), weights);
            joints.insert(joint.to_string(), adjustment);
        }
        Ok(joints)
    }

    fn paint_colors(
        &self,
        selections: &[ColorSelection],
        warnings: &mut Vec<CompositionWarning>,
    ) -> Result<ColorAtlas> {
        let mut atlas = ColorAtlas::new(self.options.atlas_size);
        for selection in selections {
            let rows = match selection {
                ColorSelection::Preset(id) => {
                    if color_preset::get(self.conn, *id)?.is_none() {
                        return Err(ComposeError::UnknownPreset {
                            kind: "color preset",
                            id: *id,
                        });
                    }
                    color_preset_row::list_by_preset(self.conn, *id)?
                        .iter()
                        .map(|row| ColorRow::from_preset_row(NO_ID, row))
                        .collect()
                }
                ColorSelection::Set(id) => {
                    if color_set::get(self.conn, *id)?.is_none() {
                        return Err(ComposeError::UnknownPreset {
                            kind: "color set",
                            id: *id,
                        });
                    }
                    color_row::list_by_set(self.conn, *id)?
                }
                ColorSelection::Rows(rows) => {
                    let mut rows = rows.clone();
                    for row in &mut rows {
                        color_row::hydrate(self.conn, row)?;
                    }
                    rows
                }
            };

            for row in rows {
                let Some(property) = &row.color_property else {
                    tracing::warn!(property = row.color_property_id, "Unknown color property");
                    warnings.push(CompositionWarning::UnknownColorProperty {
                        property_id: row.color_property_id,
                    });
                    continue;
                };
                if !atlas.paint(property, &row.channels) {
                    tracing::warn!(property = property.id, u = property.u, v = property.v, "Color property outside atlas");
                    warnings.push(CompositionWarning::OutsideAtlas {
                        property_id: property.id,
                    });
                }
            }
        }
        Ok(atlas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FsMeshSource;
    use glam::Vec3;
    use sidekick_db::queries::color_property;
    use sidekick_types::{
        BlendShapeRigMovement, BlendShapeType, BodyShapePreset, Color, ColorChannel, ColorChannels,
        ColorGroup, ColorPreset, ColorPresetRow, ColorProperty, HexColor, PartGroup, PartPreset,
        PartPresetRow,
    };

    struct Fixture {
        conn: Connection,
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                conn: sidekick_db::open_memory().expect("open test db"),
                dir: tempfile::tempdir().expect("tempdir"),
            }
        }

        fn part(&self, part_type: CharacterPartType, name: &str, on_disk: bool) -> Part {
            let location = format!("Resources/Meshes/{name}.prefab");
            if on_disk {
                let file = self.dir.path().join(&location);
                std::fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
                std::fs::write(&file, b"mesh").expect("write");
            }
            let mut part = Part::new(-1, part_type, name, format!("{name}.prefab"), location);
            part.file_exists = on_disk;
            part::save(&self.conn, &mut part).expect("save part");
            part
        }

        fn composer(&self) -> Composer<'_, FsMeshSource> {
            let options = ComposeOptions {
                asset_root: self.dir.path().to_path_buf(),
                atlas_size: 8,
                persist_file_checks: false,
            };
            Composer::new(&self.conn, FsMeshSource::new(self.dir.path()), options)
        }
    }

    #[test]
    fn test_later_selection_replaces_slot() {
        let fx = Fixture::new();
        let first = fx.part(CharacterPartType::Torso, "SK_A_01_10TORS_HU01", true);
        let second = fx.part(CharacterPartType::Torso, "SK_B_01_10TORS_HU01", true);
        let head = fx.part(CharacterPartType::Head, "SK_A_01_01HEAD_HU01", true);

        let request = CharacterRequest::new("Hero")
            .with_part(PartSelection::Part(first.id))
            .with_part(PartSelection::Part(head.id))
            .with_part(PartSelection::Named(second.name.clone()));
        let character = fx.composer().compose(&request).expect("compose");

        let types: Vec<_> = character.parts.iter().map(|p| p.part.part_type).collect();
        assert_eq!(types, vec![CharacterPartType::Head, CharacterPartType::Torso]);
        assert_eq!(
            character.part(CharacterPartType::Torso).map(|p| p.part.id),
            Some(second.id)
        );
        assert!(character.warnings.is_empty());
    }

    #[test]
    fn test_missing_assets_are_warnings() {
        let fx = Fixture::new();
        let missing = fx.part(CharacterPartType::Hips, "SK_A_01_17HIPS_HU01", false);
        let request = CharacterRequest::new("Hero")
            .with_part(PartSelection::Part(missing.id))
            .with_part(PartSelection::Named("SK_NONE_01_18LEGL_HU01".into()));

        let character = fx.composer().compose(&request).expect("compose");
        assert!(character.parts.is_empty());
        assert_eq!(
            character.warnings,
            vec![
                CompositionWarning::UnresolvedPart {
                    selection: "SK_NONE_01_18LEGL_HU01".into()
                },
                CompositionWarning::MissingFile {
                    part: missing.name.clone()
                },
            ]
        );
        assert!(!part::get(&fx.conn, missing.id).expect("get").expect("part").file_exists);
    }

    #[test]
    fn test_persisted_file_checks() {
        let fx = Fixture::new();
        let mut torso = fx.part(CharacterPartType::Torso, "SK_A_01_10TORS_HU01", true);
        torso.file_exists = false;
        part::save(&fx.conn, &mut torso).expect("mark missing");

        let options = ComposeOptions {
            asset_root: fx.dir.path().to_path_buf(),
            persist_file_checks: true,
            ..ComposeOptions::default()
        };
        let composer = Composer::new(&fx.conn, FsMeshSource::new(fx.dir.path()), options);
        composer
            .compose(&CharacterRequest::new("Hero").with_part(PartSelection::Part(torso.id)))
            .expect("compose");
        assert!(part::get(&fx.conn, torso.id).expect("get").expect("part").file_exists);
    }

    #[test]
    fn test_preset_expands_rows() {
        let fx = Fixture::new();
        let torso = fx.part(CharacterPartType::Torso, "SK_A_01_10TORS_HU01", true);
        let hips = fx.part(CharacterPartType::Hips, "SK_A_01_17HIPS_HU01", true);
        let mut preset = PartPreset::new("Outfit A", PartGroup::UpperBody, -1);
        part_preset::save(&fx.conn, &mut preset).expect("preset");
        part_preset_row::save(&fx.conn, &mut PartPresetRow::for_part(preset.id, &torso)).expect("row");
        part_preset_row::save(
            &fx.conn,
            &mut PartPresetRow::new(preset.id, hips.name.clone(), CharacterPartType::Hips),
        )
        .expect("named row");

        let character = fx
            .composer()
            .compose(&CharacterRequest::new("Hero").with_part(PartSelection::Preset(preset.id)))
            .expect("compose");
        assert_eq!(character.parts.len(), 2);

        let err = fx
            .composer()
            .compose(&CharacterRequest::new("Hero").with_part(PartSelection::Preset(404)))
            .expect_err("unknown preset");
        assert!(matches!(err, ComposeError::UnknownPreset { kind: "part preset", id: 404 }));
    }

    #[test]
    fn test_joint_adjustments_and_weights() {
        let fx = Fixture::new();
        let back = fx.part(CharacterPartType::AttachmentBack, "SK_A_01_24ABAC_HU01", true);
        fx.part(CharacterPartType::Torso, "SK_A_01_10TORS_HU01", true);
        let mut movement =
            BlendShapeRigMovement::zero(CharacterPartType::AttachmentBack, BlendShapeType::Feminine);
        movement.max_offset = [0.0, 0.5, 0.0];
        rig_movement::save(&fx.conn, &mut movement).expect("movement");

        let request = CharacterRequest::new("Hero")
            .with_part(PartSelection::Part(back.id))
            .with_body_shape(BodyShapeInput::Sliders {
                body_type: 0.0,
                body_size: -0.4,
                musculature: 1.0,
            });
        let character = fx.composer().compose(&request).expect("compose");

        assert_eq!(character.joints.len(), 1);
        let joint = character.joints["backAttach"];
        assert!(joint.offset.abs_diff_eq(Vec3::new(0.0, 0.25, 0.0), 1e-6));
        assert_eq!(character.blend_shape_weights["masculineFeminine"], 50.0);
        assert_eq!(character.blend_shape_weights["defaultSkinny"], 40.0);
        assert_eq!(character.blend_shape_weights["defaultHeavy"], 0.0);
        assert_eq!(character.blend_shape_weights["defaultBuff"], 100.0);
    }

    #[test]
    fn test_body_shape_preset() {
        let fx = Fixture::new();
        let mut preset = BodyShapePreset::new("Heavy", 0, 100, 0);
        body_shape_preset::save(&fx.conn, &mut preset).expect("preset");

        let composer = fx.composer();
        let character = composer
            .compose(&CharacterRequest::new("Hero").with_body_shape(BodyShapeInput::Preset(preset.id)))
            .expect("compose");
        assert_eq!(character.blend_shape_weights["defaultHeavy"], 100.0);

        let err = composer
            .compose(&CharacterRequest::new("Hero").with_body_shape(BodyShapeInput::Preset(77)))
            .expect_err("unknown body shape");
        assert!(matches!(err, ComposeError::UnknownBodyShape(77)));
    }

    #[test]
    fn test_colors_layer_in_order() {
        let fx = Fixture::new();
        let mut skin = ColorProperty {
            id: 1,
            group: ColorGroup::Species,
            name: "Skin".into(),
            u: 0,
            v: 0,
        };
        color_property::save(&fx.conn, &mut skin).expect("property");

        let mut preset = ColorPreset::new("Pale", ColorGroup::Species, -1);
        color_preset::save(&fx.conn, &mut preset).expect("preset");
        let mut pale = ColorChannels::default();
        pale.color = HexColor::new("EEDDCC");
        color_preset_row::save(&fx.conn, &mut ColorPresetRow::new(preset.id, skin.id, pale))
            .expect("row");

        let mut tan = ColorChannels::default();
        tan.color = HexColor::new("AA8866");
        let override_row = ColorRow::new(NO_ID, skin.id, tan);
        let unknown = ColorRow::new(NO_ID, 55, ColorChannels::default());

        let request = CharacterRequest::new("Hero")
            .with_colors(ColorSelection::Preset(preset.id))
            .with_colors(ColorSelection::Rows(vec![override_row, unknown]));
        let character = fx.composer().compose(&request).expect("compose");

        assert_eq!(
            character.atlas.texel(ColorChannel::Color, 1, 1),
            Color::from_hex("AA8866")
        );
        assert_eq!(
            character.warnings,
            vec![CompositionWarning::UnknownColorProperty { property_id: 55 }]
        );
    }
}
