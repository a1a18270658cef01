//! Color preset query functions.

use rusqlite::{Connection, Row};
use sidekick_types::{ColorGroup, ColorPreset};

use crate::{enum_column, Result};

pub use crate::integrity::delete_color_preset as delete;

const COLUMNS: &str = "id, name, color_group, ptr_species";

fn from_row(row: &Row<'_>) -> rusqlite::Result<ColorPreset> {
    Ok(ColorPreset {
        id: row.get(0)?,
        name: row.get(1)?,
        group: enum_column(row, 2)?,
        species_id: row.get(3)?,
        species: None,
    })
}

fn query_list(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<ColorPreset>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_color_preset {filter}"))?;
    let mut presets = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for preset in &mut presets {
        hydrate(conn, preset)?;
    }
    Ok(presets)
}

/// Fill in the preset's species.
pub fn hydrate(conn: &Connection, preset: &mut ColorPreset) -> Result<()> {
    super::species::hydrate_ref(conn, preset.species_id, &mut preset.species)
}

/// Get a preset by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<ColorPreset>> {
    Ok(query_list(conn, "WHERE id = ?1", [id])?.into_iter().next())
}

/// Get a preset by name.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<ColorPreset>> {
    Ok(query_list(conn, "WHERE name = ?1 ORDER BY id LIMIT 1", [name])?
        .into_iter()
        .next())
}

/// List every preset.
pub fn list(conn: &Connection) -> Result<Vec<ColorPreset>> {
    query_list(conn, "ORDER BY id", [])
}

/// List presets of one species.
pub fn list_by_species(conn: &Connection, species_id: i64) -> Result<Vec<ColorPreset>> {
    query_list(conn, "WHERE ptr_species = ?1 ORDER BY name", [species_id])
}

/// List presets of one color group.
pub fn list_by_color_group(conn: &Connection, group: ColorGroup) -> Result<Vec<ColorPreset>> {
    query_list(conn, "WHERE color_group = ?1 ORDER BY name", [group.as_i32()])
}

/// List presets of one color group for one species.
pub fn list_by_color_group_and_species(
    conn: &Connection,
    group: ColorGroup,
    species_id: i64,
) -> Result<Vec<ColorPreset>> {
    query_list(
        conn,
        "WHERE color_group = ?1 AND ptr_species = ?2 ORDER BY name",
        rusqlite::params![group.as_i32(), species_id],
    )
}

/// Insert or update a preset. Returns its id.
pub fn save(conn: &Connection, preset: &mut ColorPreset) -> Result<i64> {
    if preset.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_color_preset SET name = ?2, color_group = ?3, ptr_species = ?4 WHERE id = ?1",
            rusqlite::params![preset.id, preset.name, preset.group.as_i32(), preset.species_id],
        )?;
        super::expect_changed(changed, "color preset", preset.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_color_preset (name, color_group, ptr_species) VALUES (?1, ?2, ?3)",
            rusqlite::params![preset.name, preset.group.as_i32(), preset.species_id],
        )?;
        preset.id = conn.last_insert_rowid();
    }
    Ok(preset.id)
}

pub(crate) fn delete_row(conn: &Connection, id: i64) -> Result<()> {
    super::delete_by_id(conn, "sk_color_preset", "color preset", id)
}
