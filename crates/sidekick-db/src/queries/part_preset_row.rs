//! Part preset row query functions.
//!
//! Rows imported by name carry `ptr_part = -1`; hydration resolves those
//! through [`part::search_by_name`].

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::PartPresetRow;

use crate::queries::{exists, part};
use crate::Result;

const COLUMNS: &str = "id, part_name, ptr_part_preset, ptr_part, part_type";

fn from_row(row: &Row<'_>) -> rusqlite::Result<PartPresetRow> {
    Ok(PartPresetRow {
        id: row.get(0)?,
        part_name: row.get(1)?,
        preset_id: row.get(2)?,
        part_id: row.get(3)?,
        part_type: row.get(4)?,
        part: None,
    })
}

/// Load rows, dropping (and deleting) those whose preset is gone.
fn query_valid(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<PartPresetRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_part_preset_row {filter}"))?;
    let rows = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut valid = Vec::with_capacity(rows.len());
    for mut row in rows {
        if !exists(conn, "sk_part_preset", row.preset_id)? {
            tracing::debug!(id = row.id, preset = row.preset_id, "Removing orphaned part preset row");
            delete(conn, &row)?;
            continue;
        }
        hydrate(conn, &mut row)?;
        valid.push(row);
    }
    Ok(valid)
}

/// Resolve the row's part, by id when set and by name otherwise.
pub fn hydrate(conn: &Connection, row: &mut PartPresetRow) -> Result<()> {
    if row.part.is_some() {
        return Ok(());
    }
    row.part = if row.part_id > 0 {
        part::get(conn, row.part_id)?
    } else {
        part::search_by_name(conn, &row.part_name)?
    };
    Ok(())
}

/// Get a row by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<PartPresetRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_part_preset_row WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    match row {
        Some(mut row) => {
            hydrate(conn, &mut row)?;
            Ok(Some(row))
        }
        None => Ok(None),
    }
}

/// List every row.
pub fn list(conn: &Connection) -> Result<Vec<PartPresetRow>> {
    query_valid(conn, "ORDER BY id", [])
}

/// List the rows of one preset.
pub fn list_by_preset(conn: &Connection, preset_id: i64) -> Result<Vec<PartPresetRow>> {
    query_valid(conn, "WHERE ptr_part_preset = ?1 ORDER BY id", [preset_id])
}

/// List rows pointing at one part.
pub fn list_by_part(conn: &Connection, part_id: i64) -> Result<Vec<PartPresetRow>> {
    query_valid(conn, "WHERE ptr_part = ?1 ORDER BY id", [part_id])
}

/// Insert or update a row. Returns its id.
pub fn save(conn: &Connection, row: &mut PartPresetRow) -> Result<i64> {
    if row.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_part_preset_row SET part_name = ?2, ptr_part_preset = ?3, ptr_part = ?4,
                 part_type = ?5
             WHERE id = ?1",
            rusqlite::params![row.id, row.part_name, row.preset_id, row.part_id, row.part_type],
        )?;
        super::expect_changed(changed, "part preset row", row.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_part_preset_row (part_name, ptr_part_preset, ptr_part, part_type)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.part_name, row.preset_id, row.part_id, row.part_type],
        )?;
        row.id = conn.last_insert_rowid();
    }
    Ok(row.id)
}

/// Delete a row.
pub fn delete(conn: &Connection, row: &PartPresetRow) -> Result<()> {
    super::delete_by_id(conn, "sk_part_preset_row", "part preset row", row.id)
}

pub(crate) fn delete_for_preset(conn: &Connection, preset_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM sk_part_preset_row WHERE ptr_part_preset = ?1",
        [preset_id],
    )?)
}

pub(crate) fn delete_for_part(conn: &Connection, part_id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM sk_part_preset_row WHERE ptr_part = ?1", [part_id])?)
}
