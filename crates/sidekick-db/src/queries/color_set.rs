//! Color set query functions.

use rusqlite::{Connection, Row};
use sidekick_types::{ColorSet, TexturePaths, NO_ID};

use crate::{DbError, Result};

pub use crate::integrity::delete_color_set as delete;

const COLUMNS: &str = "id, ptr_species, name, src_color, src_metallic, src_smoothness, \
                       src_reflection, src_emission, src_opacity";

fn from_row(row: &Row<'_>) -> rusqlite::Result<ColorSet> {
    Ok(ColorSet {
        id: row.get(0)?,
        species_id: row.get(1)?,
        name: row.get(2)?,
        textures: TexturePaths {
            color: row.get(3)?,
            metallic: row.get(4)?,
            smoothness: row.get(5)?,
            reflection: row.get(6)?,
            emission: row.get(7)?,
            opacity: row.get(8)?,
        },
        species: None,
    })
}

fn query_list(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<ColorSet>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_color_set {filter}"))?;
    let mut sets = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for set in &mut sets {
        hydrate(conn, set)?;
    }
    Ok(sets)
}

/// Fill in the set's species.
pub fn hydrate(conn: &Connection, set: &mut ColorSet) -> Result<()> {
    super::species::hydrate_ref(conn, set.species_id, &mut set.species)
}

/// Get a set by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<ColorSet>> {
    Ok(query_list(conn, "WHERE id = ?1", [id])?.into_iter().next())
}

/// The global default set.
pub fn get_default(conn: &Connection) -> Result<ColorSet> {
    query_list(conn, "WHERE ptr_species = ?1 ORDER BY id LIMIT 1", [NO_ID])?
        .into_iter()
        .next()
        .ok_or_else(|| DbError::NotFound("default color set".into()))
}

/// Get a set by name.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<ColorSet>> {
    Ok(query_list(conn, "WHERE name = ?1 ORDER BY id LIMIT 1", [name])?
        .into_iter()
        .next())
}

/// True when a set called `name` exists.
pub fn name_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sk_color_set WHERE name = ?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// List every set.
pub fn list(conn: &Connection) -> Result<Vec<ColorSet>> {
    query_list(conn, "ORDER BY id", [])
}

/// List the sets of one species.
pub fn list_by_species(conn: &Connection, species_id: i64) -> Result<Vec<ColorSet>> {
    query_list(conn, "WHERE ptr_species = ?1 ORDER BY name", [species_id])
}

/// Number of sets of one species.
pub fn count_by_species(conn: &Connection, species_id: i64) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sk_color_set WHERE ptr_species = ?1",
        [species_id],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Insert or update a set. Returns its id.
pub fn save(conn: &Connection, set: &mut ColorSet) -> Result<i64> {
    let t = &set.textures;
    if set.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_color_set SET ptr_species = ?2, name = ?3, src_color = ?4,
                 src_metallic = ?5, src_smoothness = ?6, src_reflection = ?7,
                 src_emission = ?8, src_opacity = ?9
             WHERE id = ?1",
            rusqlite::params![
                set.id,
                set.species_id,
                set.name,
                t.color,
                t.metallic,
                t.smoothness,
                t.reflection,
                t.emission,
                t.opacity,
            ],
        )?;
        super::expect_changed(changed, "color set", set.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_color_set (ptr_species, name, src_color, src_metallic,
                 src_smoothness, src_reflection, src_emission, src_opacity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                set.species_id,
                set.name,
                t.color,
                t.metallic,
                t.smoothness,
                t.reflection,
                t.emission,
                t.opacity,
            ],
        )?;
        set.id = conn.last_insert_rowid();
    }
    Ok(set.id)
}

pub(crate) fn delete_row(conn: &Connection, id: i64) -> Result<()> {
    super::delete_by_id(conn, "sk_color_set", "color set", id)
}
