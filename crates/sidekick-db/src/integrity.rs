//! Cascading deletes, preset availability and the orphan sweep.
//!
//! The schema has no foreign keys, so every delete of an owning entity also
//! removes the rows that point at it. Each cascade runs inside one savepoint.

use std::path::Path;

use rusqlite::Connection;
use serde::Serialize;
use sidekick_types::{
    BodyShapePreset, ColorPreset, ColorSet, ImageKind, Part, PartFilter, PartPreset, PresetFilter,
    Species,
};

use crate::queries::{
    body_shape_preset, color_preset, color_preset_row, color_row, color_set, image, part,
    part_filter, part_filter_row, part_preset, part_preset_row, part_species_link, preset_filter,
    preset_filter_row, species,
};
use crate::{with_savepoint, Result};

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

/// Delete a part with its filter memberships, preset rows, species links and image.
pub fn delete_part(conn: &Connection, part: &Part) -> Result<()> {
    with_savepoint(conn, "delete_part", |conn| {
        let filter_rows = part_filter_row::delete_for_part(conn, part.id)?;
        let preset_rows = part_preset_row::delete_for_part(conn, part.id)?;
        let links = part_species_link::delete_for_part(conn, part.id)?;
        image::delete_for_owner(conn, ImageKind::Part, part.id, None)?;
        part::delete_row(conn, part.id)?;
        tracing::debug!(id = part.id, filter_rows, preset_rows, links, "Deleted part");
        Ok(())
    })
}

/// Delete a part preset with its rows, filter memberships and images.
pub fn delete_part_preset(conn: &Connection, preset: &PartPreset) -> Result<()> {
    with_savepoint(conn, "delete_part_preset", |conn| {
        part_preset_row::delete_for_preset(conn, preset.id)?;
        preset_filter_row::delete_for_preset(conn, preset.id)?;
        image::delete_for_owner(conn, ImageKind::PartPreset, preset.id, None)?;
        part_preset::delete_row(conn, preset.id)
    })
}

/// Delete a color preset with its rows and images.
pub fn delete_color_preset(conn: &Connection, preset: &ColorPreset) -> Result<()> {
    with_savepoint(conn, "delete_color_preset", |conn| {
        color_preset_row::delete_for_preset(conn, preset.id)?;
        image::delete_for_owner(conn, ImageKind::ColorPreset, preset.id, None)?;
        color_preset::delete_row(conn, preset.id)
    })
}

/// Delete a color set with its rows and image.
pub fn delete_color_set(conn: &Connection, set: &ColorSet) -> Result<()> {
    with_savepoint(conn, "delete_color_set", |conn| {
        color_row::delete_for_set(conn, set.id)?;
        image::delete_for_owner(conn, ImageKind::ColorSet, set.id, None)?;
        color_set::delete_row(conn, set.id)
    })
}

/// Delete a species with its image and part links.
///
/// Parts, presets and color sets keep their species id and simply stop
/// resolving it.
pub fn delete_species(conn: &Connection, species: &Species) -> Result<()> {
    with_savepoint(conn, "delete_species", |conn| {
        image::delete_for_owner(conn, ImageKind::Species, species.id, None)?;
        part_species_link::delete_for_species(conn, species.id)?;
        species::delete_row(conn, species.id)
    })
}

/// Delete a part filter with its memberships.
pub fn delete_part_filter(conn: &Connection, filter: &PartFilter) -> Result<()> {
    with_savepoint(conn, "delete_part_filter", |conn| {
        part_filter_row::delete_for_filter(conn, filter.id)?;
        part_filter::delete_row(conn, filter.id)
    })
}

/// Delete a preset filter with its memberships.
pub fn delete_preset_filter(conn: &Connection, filter: &PresetFilter) -> Result<()> {
    with_savepoint(conn, "delete_preset_filter", |conn| {
        preset_filter_row::delete_for_filter(conn, filter.id)?;
        preset_filter::delete_row(conn, filter.id)
    })
}

/// Delete a body shape preset with its image.
pub fn delete_body_shape_preset(conn: &Connection, preset: &BodyShapePreset) -> Result<()> {
    with_savepoint(conn, "delete_body_shape_preset", |conn| {
        image::delete_for_owner(conn, ImageKind::BodyShapePreset, preset.id, None)?;
        body_shape_preset::delete_row(conn, preset.id)
    })
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Whether a preset has at least one row and every row resolves to a part on disk.
///
/// Rows whose part cannot be resolved count as unavailable.
pub fn has_all_parts_available(conn: &Connection, preset: &PartPreset) -> Result<bool> {
    let rows = part_preset_row::list_by_preset(conn, preset.id)?;
    Ok(!rows.is_empty() && rows.iter().all(|row| row.has_available_part()))
}

/// Like [`has_all_parts_available`], and every part is a base part.
pub fn has_only_base_parts_and_all_available(conn: &Connection, preset: &PartPreset) -> Result<bool> {
    let rows = part_preset_row::list_by_preset(conn, preset.id)?;
    Ok(!rows.is_empty()
        && rows.iter().all(|row| {
            row.part
                .as_ref()
                .is_some_and(|p| p.file_exists && p.is_base_part())
        }))
}

/// Whether a filter holds at least one non-base part, on disk when `require_file`.
pub fn part_filter_has_parts(conn: &Connection, filter: &PartFilter, require_file: bool) -> Result<bool> {
    Ok(part_filter_row::list_for_filter(conn, filter.id, require_file)?
        .iter()
        .any(|row| row.part.as_ref().is_some_and(|p| !p.is_base_part())))
}

pub fn part_filter_is_empty(conn: &Connection, filter: &PartFilter, require_file: bool) -> Result<bool> {
    Ok(!part_filter_has_parts(conn, filter, require_file)?)
}

/// Whether a filter has no presets, or none with every part available when
/// `require_available`.
pub fn preset_filter_is_empty(
    conn: &Connection,
    filter: &PresetFilter,
    require_available: bool,
) -> Result<bool> {
    Ok(preset_filter_row::list_for_filter(conn, filter.id, require_available)?.is_empty())
}

/// Counts from a file presence refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    pub checked: usize,
    pub available: usize,
    /// Parts whose stored flag flipped.
    pub changed: usize,
}

/// Re-stat one part's mesh under `asset_root` and persist the flag if it changed.
pub fn refresh_part_availability(conn: &Connection, asset_root: &Path, part: &mut Part) -> Result<bool> {
    let before = part.file_exists;
    let now = part.is_file_available(asset_root);
    if before != now && part.id > 0 {
        part::set_file_exists(conn, part.id, now)?;
    }
    Ok(now)
}

/// Re-stat every part and write the changed flags in one savepoint.
pub fn refresh_all_part_availability(conn: &Connection, asset_root: &Path) -> Result<AvailabilityReport> {
    with_savepoint(conn, "refresh_availability", |conn| {
        let mut report = AvailabilityReport::default();
        for mut part in part::list(conn)? {
            let before = part.file_exists;
            if refresh_part_availability(conn, asset_root, &mut part)? {
                report.available += 1;
            }
            if before != part.file_exists {
                report.changed += 1;
            }
            report.checked += 1;
        }
        tracing::info!(
            checked = report.checked,
            available = report.available,
            changed = report.changed,
            "Refreshed part availability"
        );
        Ok(report)
    })
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

/// Rows removed or repaired by [`sweep`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub part_species_links: usize,
    pub part_preset_rows: usize,
    /// Preset rows whose part id dangled and now resolve by name.
    pub relinked_preset_rows: usize,
    pub part_filter_rows: usize,
    pub preset_filter_rows: usize,
    pub color_rows: usize,
    pub color_preset_rows: usize,
    pub images: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.part_species_links
            + self.part_preset_rows
            + self.relinked_preset_rows
            + self.part_filter_rows
            + self.preset_filter_rows
            + self.color_rows
            + self.color_preset_rows
            + self.images
    }
}

/// Delete every row whose owner is gone.
pub fn sweep(conn: &Connection) -> Result<SweepReport> {
    with_savepoint(conn, "integrity_sweep", |conn| {
        let mut report = SweepReport {
            part_species_links: conn.execute(
                "DELETE FROM sk_part_species_link
                 WHERE ptr_species NOT IN (SELECT id FROM sk_species)
                    OR ptr_part NOT IN (SELECT id FROM sk_part)",
                [],
            )?,
            part_preset_rows: conn.execute(
                "DELETE FROM sk_part_preset_row
                 WHERE ptr_part_preset NOT IN (SELECT id FROM sk_part_preset)",
                [],
            )?,
            relinked_preset_rows: conn.execute(
                "UPDATE sk_part_preset_row SET ptr_part = -1
                 WHERE ptr_part > 0 AND ptr_part NOT IN (SELECT id FROM sk_part)",
                [],
            )?,
            part_filter_rows: conn.execute(
                "DELETE FROM sk_part_filter_row
                 WHERE ptr_filter NOT IN (SELECT id FROM sk_part_filter)
                    OR ptr_part NOT IN (SELECT id FROM sk_part)",
                [],
            )?,
            preset_filter_rows: conn.execute(
                "DELETE FROM sk_preset_filter_row
                 WHERE ptr_filter NOT IN (SELECT id FROM sk_preset_filter)
                    OR ptr_preset NOT IN (SELECT id FROM sk_part_preset)",
                [],
            )?,
            color_rows: conn.execute(
                "DELETE FROM sk_color_row
                 WHERE ptr_color_set NOT IN (SELECT id FROM sk_color_set)
                    OR ptr_color_property NOT IN (SELECT id FROM sk_color_property)",
                [],
            )?,
            color_preset_rows: conn.execute(
                "DELETE FROM sk_color_preset_row
                 WHERE ptr_color_preset NOT IN (SELECT id FROM sk_color_preset)
                    OR ptr_color_property NOT IN (SELECT id FROM sk_color_property)",
                [],
            )?,
            images: 0,
        };
        for kind in ImageKind::ALL {
            report.images += image::delete_orphans(conn, kind)?;
        }
        if report.total() > 0 {
            tracing::debug!(?report, "Integrity sweep changed rows");
        }
        Ok(report)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;
    use sidekick_types::{
        CharacterPartType, ColorChannels, ColorGroup, ColorPresetRow, ColorProperty, FilterType,
        PartFilterRow, PartGroup, PartPresetRow, PartSpeciesLink, PresetFilterRow, Thumbnail,
    };

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count")
    }

    fn saved_part(conn: &Connection, name: &str, file_exists: bool) -> Part {
        let mut p = Part::new(
            -1,
            CharacterPartType::Torso,
            name,
            name,
            format!("Meshes/{name}.fbx"),
        );
        p.file_exists = file_exists;
        part::save(conn, &mut p).expect("save part");
        p
    }

    #[test]
    fn test_delete_part_cascades() {
        let conn = test_db();
        let torso = saved_part(&conn, "SK_HUMN_BASE_01_10TORS_HU01", true);

        let mut human = Species::new("Human", "HU");
        species::save(&conn, &mut human).expect("species");
        part_species_link::save(&conn, &mut PartSpeciesLink::new(human.id, torso.id)).expect("link");

        let mut filter = PartFilter::new(FilterType::Outfit, "Base");
        part_filter::save(&conn, &mut filter).expect("filter");
        part_filter_row::save(&conn, &mut PartFilterRow::new(filter.id, torso.id)).expect("row");

        let mut preset = PartPreset::new("Base", PartGroup::UpperBody, human.id);
        part_preset::save(&conn, &mut preset).expect("preset");
        part_preset_row::save(&conn, &mut PartPresetRow::for_part(preset.id, &torso)).expect("row");

        image::save(&conn, &mut Thumbnail::new(ImageKind::Part, torso.id, vec![1], 1, 1))
            .expect("image");

        part::delete(&conn, &torso).expect("delete");

        assert!(part::get(&conn, torso.id).expect("get").is_none());
        assert_eq!(count(&conn, "sk_part_filter_row"), 0);
        assert_eq!(count(&conn, "sk_part_preset_row"), 0);
        assert_eq!(count(&conn, "sk_part_species_link"), 0);
        assert_eq!(count(&conn, "sk_part_image"), 0);
        assert_eq!(count(&conn, "sk_part_preset"), 1);
    }

    #[test]
    fn test_failed_cascade_rolls_back() {
        let conn = test_db();
        let torso = saved_part(&conn, "SK_HUMN_BASE_01_10TORS_HU01", true);
        let mut filter = PartFilter::new(FilterType::Outfit, "Base");
        part_filter::save(&conn, &mut filter).expect("filter");
        part_filter_row::save(&conn, &mut PartFilterRow::new(filter.id, torso.id)).expect("row");

        let mut ghost = torso.clone();
        ghost.id = 9999;
        conn.execute("UPDATE sk_part_filter_row SET ptr_part = 9999", [])
            .expect("repoint");

        let result = delete_part(&conn, &ghost);
        assert!(matches!(result, Err(DbError::Integrity { entity: "part", .. })));
        assert_eq!(count(&conn, "sk_part_filter_row"), 1);
    }

    #[test]
    fn test_delete_color_preset_leaves_nothing() {
        let conn = test_db();
        let mut preset = ColorPreset::new("Ember", ColorGroup::Outfits, -1);
        color_preset::save(&conn, &mut preset).expect("preset");
        for id in 1..=3 {
            let mut property = ColorProperty {
                id,
                group: ColorGroup::Outfits,
                name: format!("Cloth {id}"),
                u: id as i32,
                v: 0,
            };
            crate::queries::color_property::save(&conn, &mut property).expect("property");
            color_preset_row::save(
                &conn,
                &mut ColorPresetRow::new(preset.id, id, ColorChannels::default()),
            )
            .expect("row");
        }
        image::save(
            &conn,
            &mut Thumbnail::new(ImageKind::ColorPreset, preset.id, vec![7], 1, 1)
                .with_group(ColorGroup::Outfits.as_i32()),
        )
        .expect("image");

        color_preset::delete(&conn, &preset).expect("delete");

        assert_eq!(count(&conn, "sk_color_preset"), 0);
        assert_eq!(count(&conn, "sk_color_preset_row"), 0);
        assert_eq!(count(&conn, "sk_color_preset_image"), 0);
    }

    #[test]
    fn test_delete_species_keeps_parts() {
        let conn = test_db();
        let mut elf = Species::new("Elf", "EL");
        species::save(&conn, &mut elf).expect("species");
        let mut ear = Part::new(elf.id, CharacterPartType::EarLeft, "SK_ELF_01_05EARL_EL01", "f", "l");
        part::save(&conn, &mut ear).expect("part");
        part_species_link::save(&conn, &mut PartSpeciesLink::new(elf.id, ear.id)).expect("link");
        image::save(&conn, &mut Thumbnail::new(ImageKind::Species, elf.id, vec![1], 1, 1))
            .expect("image");

        species::delete(&conn, &elf).expect("delete");

        let ear = part::get(&conn, ear.id).expect("get").expect("part kept");
        assert_eq!(ear.species_id, elf.id);
        assert!(ear.species.is_none());
        assert_eq!(count(&conn, "sk_part_species_link"), 0);
        assert_eq!(count(&conn, "sk_species_image"), 0);
    }

    #[test]
    fn test_delete_filters_and_sets() {
        let conn = test_db();
        let torso = saved_part(&conn, "SK_APOC_01_10TORS_HU01", true);
        let mut pf = PartFilter::new(FilterType::Outfit, "Apocalypse");
        part_filter::save(&conn, &mut pf).expect("filter");
        part_filter_row::save(&conn, &mut PartFilterRow::new(pf.id, torso.id)).expect("row");
        part_filter::delete(&conn, &pf).expect("delete filter");
        assert_eq!(count(&conn, "sk_part_filter_row"), 0);

        let mut preset = PartPreset::new("Apoc", PartGroup::UpperBody, -1);
        part_preset::save(&conn, &mut preset).expect("preset");
        let mut qf = PresetFilter::new("Apocalypse");
        preset_filter::save(&conn, &mut qf).expect("filter");
        preset_filter_row::save(&conn, &mut PresetFilterRow::new(qf.id, preset.id)).expect("row");
        preset_filter::delete(&conn, &qf).expect("delete filter");
        assert_eq!(count(&conn, "sk_preset_filter_row"), 0);
        assert_eq!(count(&conn, "sk_part_preset"), 1);

        let mut set = ColorSet::new("Dusty", -1);
        color_set::save(&conn, &mut set).expect("set");
        color_row::save(&conn, &mut sidekick_types::ColorRow::new(set.id, 1, ColorChannels::default()))
            .expect("row");
        color_set::delete(&conn, &set).expect("delete set");
        assert_eq!(count(&conn, "sk_color_row"), 0);

        let mut shape = BodyShapePreset::new("Slim", 0, -50, 0);
        body_shape_preset::save(&conn, &mut shape).expect("shape");
        image::save(&conn, &mut Thumbnail::new(ImageKind::BodyShapePreset, shape.id, vec![1], 1, 1))
            .expect("image");
        body_shape_preset::delete(&conn, &shape).expect("delete shape");
        assert_eq!(count(&conn, "sk_body_shape_preset_image"), 0);
    }

    #[test]
    fn test_preset_availability() {
        let conn = test_db();
        let mut preset = PartPreset::new("Casual", PartGroup::UpperBody, -1);
        part_preset::save(&conn, &mut preset).expect("preset");
        assert!(!has_all_parts_available(&conn, &preset).expect("empty"));

        let mut torso = saved_part(&conn, "SK_CASU_01_10TORS_HU01", false);
        part_preset_row::save(&conn, &mut PartPresetRow::for_part(preset.id, &torso)).expect("row");
        assert!(!has_all_parts_available(&conn, &preset).expect("missing file"));

        torso.file_exists = true;
        part::save(&conn, &mut torso).expect("update");
        assert!(has_all_parts_available(&conn, &preset).expect("available"));
        assert!(!has_only_base_parts_and_all_available(&conn, &preset).expect("not base"));

        part_preset_row::save(
            &conn,
            &mut PartPresetRow::new(preset.id, "SK_NOPE_01_11AUPL_HU01", CharacterPartType::ArmUpperLeft),
        )
        .expect("unresolved row");
        assert!(!has_all_parts_available(&conn, &preset).expect("unresolved"));
    }

    #[test]
    fn test_base_only_preset() {
        let conn = test_db();
        let mut preset = PartPreset::new("Base", PartGroup::UpperBody, -1);
        part_preset::save(&conn, &mut preset).expect("preset");
        let torso = saved_part(&conn, "SK_HUMN_BASE_01_10TORS_HU01", true);
        part_preset_row::save(&conn, &mut PartPresetRow::for_part(preset.id, &torso)).expect("row");
        assert!(has_only_base_parts_and_all_available(&conn, &preset).expect("base"));
    }

    #[test]
    fn test_filter_emptiness() {
        let conn = test_db();
        let mut filter = PartFilter::new(FilterType::Outfit, "Base");
        part_filter::save(&conn, &mut filter).expect("filter");
        let base = saved_part(&conn, "SK_HUMN_BASE_01_10TORS_HU01", true);
        part_filter_row::save(&conn, &mut PartFilterRow::new(filter.id, base.id)).expect("row");
        assert!(part_filter_is_empty(&conn, &filter, true).expect("only base"));

        let missing = saved_part(&conn, "SK_SCIF_01_10TORS_HU01", false);
        part_filter_row::save(&conn, &mut PartFilterRow::new(filter.id, missing.id)).expect("row");
        assert!(part_filter_is_empty(&conn, &filter, true).expect("not on disk"));
        assert!(part_filter_has_parts(&conn, &filter, false).expect("any"));

        let mut presets = PresetFilter::new("Sci-Fi");
        preset_filter::save(&conn, &mut presets).expect("filter");
        assert!(preset_filter_is_empty(&conn, &presets, false).expect("empty"));
    }

    #[test]
    fn test_refresh_availability() {
        let conn = test_db();
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("Meshes")).expect("mkdir");
        std::fs::write(dir.path().join("Meshes/SK_A_01_10TORS_HU01.fbx"), b"mesh").expect("write");

        let mut present = saved_part(&conn, "SK_A_01_10TORS_HU01", false);
        saved_part(&conn, "SK_B_01_10TORS_HU01", true);

        assert!(refresh_part_availability(&conn, dir.path(), &mut present).expect("refresh"));
        assert!(part::get(&conn, present.id).expect("get").expect("part").file_exists);

        let report = refresh_all_part_availability(&conn, dir.path()).expect("refresh all");
        assert_eq!(
            report,
            AvailabilityReport {
                checked: 2,
                available: 1,
                changed: 1
            }
        );
    }

    #[test]
    fn test_sweep_removes_orphans() {
        let conn = test_db();
        let torso = saved_part(&conn, "SK_HUMN_BASE_01_10TORS_HU01", true);
        let mut preset = PartPreset::new("Base", PartGroup::UpperBody, -1);
        part_preset::save(&conn, &mut preset).expect("preset");
        part_preset_row::save(&conn, &mut PartPresetRow::for_part(preset.id, &torso)).expect("row");

        conn.execute_batch(
            "INSERT INTO sk_part_species_link (ptr_species, ptr_part) VALUES (404, 404);
             INSERT INTO sk_part_preset_row (part_name, ptr_part_preset, ptr_part, part_type)
                 VALUES ('x', 404, -1, '10TORS');
             INSERT INTO sk_color_row (ptr_color_set, ptr_color_property, color, metallic,
                 smoothness, reflection, emission, opacity)
                 VALUES (404, 1, 'FFFFFF', '000000', '000000', '000000', '000000', 'FFFFFF');
             INSERT INTO sk_species_image (ptr_species, img_data, img_width, img_height)
                 VALUES (404, x'00', 1, 1);",
        )
        .expect("orphans");
        conn.execute("DELETE FROM sk_part WHERE id = ?1", [torso.id])
            .expect("raw delete");

        let report = sweep(&conn).expect("sweep");
        assert_eq!(report.part_species_links, 1);
        assert_eq!(report.part_preset_rows, 1);
        assert_eq!(report.relinked_preset_rows, 1);
        assert_eq!(report.color_rows, 1);
        assert_eq!(report.images, 1);
        assert_eq!(report.total(), 5);

        let rows = part_preset_row::list_by_preset(&conn, preset.id).expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].part_id, -1);
        assert!(sweep(&conn).expect("second sweep").total() == 0);
    }
}
