//! Part query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::{CharacterPartType, Part, BASE_PART_MARKER};

use crate::{enum_column, with_savepoint, Result};

pub use crate::integrity::delete_part as delete;

const COLUMNS: &str =
    "id, ptr_species, type, part_group, name, part_file_name, part_location, uses_wrap, file_exists";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Part> {
    Ok(Part {
        id: row.get(0)?,
        species_id: row.get(1)?,
        part_type: enum_column(row, 2)?,
        part_group: enum_column(row, 3)?,
        name: row.get(4)?,
        file_name: row.get(5)?,
        location: row.get(6)?,
        uses_wrap: row.get(7)?,
        file_exists: row.get(8)?,
        species: None,
    })
}

fn query_list(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<Part>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_part {filter}"))?;
    let mut parts = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for part in &mut parts {
        hydrate(conn, part)?;
    }
    Ok(parts)
}

fn query_one(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Option<Part>> {
    let part = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_part {filter}"),
            params,
            from_row,
        )
        .optional()?;
    match part {
        Some(mut part) => {
            hydrate(conn, &mut part)?;
            Ok(Some(part))
        }
        None => Ok(None),
    }
}

/// Fill in the part's species.
pub fn hydrate(conn: &Connection, part: &mut Part) -> Result<()> {
    super::species::hydrate_ref(conn, part.species_id, &mut part.species)
}

/// Get a part by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<Part>> {
    query_one(conn, "WHERE id = ?1", [id])
}

/// List every part.
pub fn list(conn: &Connection) -> Result<Vec<Part>> {
    query_list(conn, "ORDER BY id", [])
}

/// List parts filling one slot.
pub fn list_for_part_type(conn: &Connection, part_type: CharacterPartType) -> Result<Vec<Part>> {
    query_list(conn, "WHERE type = ?1 ORDER BY name", [part_type.as_i32()])
}

/// List parts owned by a species, optionally only those found on disk.
pub fn list_for_species(conn: &Connection, species_id: i64, only_with_file: bool) -> Result<Vec<Part>> {
    if only_with_file {
        query_list(
            conn,
            "WHERE ptr_species = ?1 AND file_exists = 1 ORDER BY name",
            [species_id],
        )
    } else {
        query_list(conn, "WHERE ptr_species = ?1 ORDER BY name", [species_id])
    }
}

/// Get a part by its mesh file name.
pub fn get_by_file_name(conn: &Connection, file_name: &str) -> Result<Option<Part>> {
    query_one(conn, "WHERE part_file_name = ?1 LIMIT 1", [file_name])
}

/// Get a part by exact name.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Part>> {
    query_one(conn, "WHERE name = ?1 LIMIT 1", [name])
}

/// First part whose name equals `name` or whose file name contains it.
pub fn search_by_name(conn: &Connection, name: &str) -> Result<Option<Part>> {
    if name.is_empty() {
        return Ok(None);
    }
    query_one(
        conn,
        "WHERE name = ?1 OR instr(part_file_name, ?1) > 0 ORDER BY name <> ?1, id LIMIT 1",
        [name],
    )
}

/// List base species parts.
pub fn list_base_parts(conn: &Connection) -> Result<Vec<Part>> {
    query_list(
        conn,
        "WHERE instr(part_file_name, ?1) > 0 ORDER BY name",
        [BASE_PART_MARKER],
    )
}

/// True when no part is called `name`.
pub fn is_name_unique(conn: &Connection, name: &str) -> Result<bool> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sk_part WHERE name = ?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(!taken)
}

/// Insert or update a part. Returns its id.
pub fn save(conn: &Connection, part: &mut Part) -> Result<i64> {
    if part.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_part SET ptr_species = ?2, type = ?3, part_group = ?4, name = ?5,
                 part_file_name = ?6, part_location = ?7, uses_wrap = ?8, file_exists = ?9
             WHERE id = ?1",
            rusqlite::params![
                part.id,
                part.species_id,
                part.part_type.as_i32(),
                part.part_group.as_i32(),
                part.name,
                part.file_name,
                part.location,
                part.uses_wrap,
                part.file_exists,
            ],
        )?;
        super::expect_changed(changed, "part", part.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_part (ptr_species, type, part_group, name, part_file_name,
                 part_location, uses_wrap, file_exists)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                part.species_id,
                part.part_type.as_i32(),
                part.part_group.as_i32(),
                part.name,
                part.file_name,
                part.location,
                part.uses_wrap,
                part.file_exists,
            ],
        )?;
        part.id = conn.last_insert_rowid();
    }
    Ok(part.id)
}

/// Save many parts in one savepoint. Either all are written or none.
pub fn update_all(conn: &Connection, parts: &mut [Part]) -> Result<()> {
    with_savepoint(conn, "part_update_all", |conn| {
        for part in parts.iter_mut() {
            save(conn, part)?;
        }
        Ok(())
    })
}

/// Persist only the `file_exists` flag.
pub fn set_file_exists(conn: &Connection, id: i64, file_exists: bool) -> Result<()> {
    let changed = conn.execute(
        "UPDATE sk_part SET file_exists = ?2 WHERE id = ?1",
        rusqlite::params![id, file_exists],
    )?;
    super::expect_changed(changed, "part", id, "update")
}

/// Remove the part row itself. Callers go through [`delete`] for the cascade.
pub(crate) fn delete_row(conn: &Connection, id: i64) -> Result<()> {
    super::delete_by_id(conn, "sk_part", "part", id)
}
