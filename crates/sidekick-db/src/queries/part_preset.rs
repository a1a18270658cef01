//! Part preset query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::{PartGroup, PartPreset};

use crate::integrity::has_all_parts_available;
use crate::{enum_column, Result};

pub use crate::integrity::delete_part_preset as delete;

const COLUMNS: &str = "id, name, part_group, ptr_species, outfit";

fn from_row(row: &Row<'_>) -> rusqlite::Result<PartPreset> {
    Ok(PartPreset {
        id: row.get(0)?,
        name: row.get(1)?,
        part_group: enum_column(row, 2)?,
        species_id: row.get(3)?,
        outfit: row.get(4)?,
        species: None,
    })
}

fn query_list(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<PartPreset>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_part_preset {filter}"))?;
    let mut presets = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for preset in &mut presets {
        hydrate(conn, preset)?;
    }
    Ok(presets)
}

/// Fill in the preset's species.
pub fn hydrate(conn: &Connection, preset: &mut PartPreset) -> Result<()> {
    super::species::hydrate_ref(conn, preset.species_id, &mut preset.species)
}

/// Get a preset by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<PartPreset>> {
    let preset = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_part_preset WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    match preset {
        Some(mut preset) => {
            hydrate(conn, &mut preset)?;
            Ok(Some(preset))
        }
        None => Ok(None),
    }
}

/// Get a preset by name.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<PartPreset>> {
    Ok(query_list(conn, "WHERE name = ?1 ORDER BY id LIMIT 1", [name])?
        .into_iter()
        .next())
}

/// List every preset.
pub fn list(conn: &Connection) -> Result<Vec<PartPreset>> {
    query_list(conn, "ORDER BY id", [])
}

/// List presets of one species.
pub fn list_by_species(conn: &Connection, species_id: i64) -> Result<Vec<PartPreset>> {
    query_list(conn, "WHERE ptr_species = ?1 ORDER BY name", [species_id])
}

/// List presets of one group, optionally dropping those with unavailable parts.
pub fn list_by_group(
    conn: &Connection,
    group: PartGroup,
    exclude_missing_parts: bool,
) -> Result<Vec<PartPreset>> {
    let presets = query_list(conn, "WHERE part_group = ?1 ORDER BY name", [group.as_i32()])?;
    if !exclude_missing_parts {
        return Ok(presets);
    }
    let mut available = Vec::with_capacity(presets.len());
    for preset in presets {
        if has_all_parts_available(conn, &preset)? {
            available.push(preset);
        }
    }
    Ok(available)
}

/// List presets of one species and group.
pub fn list_by_species_and_group(
    conn: &Connection,
    species_id: i64,
    group: PartGroup,
) -> Result<Vec<PartPreset>> {
    query_list(
        conn,
        "WHERE ptr_species = ?1 AND part_group = ?2 ORDER BY name",
        rusqlite::params![species_id, group.as_i32()],
    )
}

/// Insert or update a preset. Returns its id.
pub fn save(conn: &Connection, preset: &mut PartPreset) -> Result<i64> {
    if preset.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_part_preset SET name = ?2, part_group = ?3, ptr_species = ?4, outfit = ?5
             WHERE id = ?1",
            rusqlite::params![
                preset.id,
                preset.name,
                preset.part_group.as_i32(),
                preset.species_id,
                preset.outfit,
            ],
        )?;
        super::expect_changed(changed, "part preset", preset.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_part_preset (name, part_group, ptr_species, outfit)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                preset.name,
                preset.part_group.as_i32(),
                preset.species_id,
                preset.outfit,
            ],
        )?;
        preset.id = conn.last_insert_rowid();
    }
    Ok(preset.id)
}

pub(crate) fn delete_row(conn: &Connection, id: i64) -> Result<()> {
    super::delete_by_id(conn, "sk_part_preset", "part preset", id)
}
