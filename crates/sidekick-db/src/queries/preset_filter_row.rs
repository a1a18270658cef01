//! Preset filter membership query functions.

use rusqlite::{Connection, Row};
use sidekick_types::PresetFilterRow;

use crate::integrity::has_all_parts_available;
use crate::queries::{exists, part_preset};
use crate::Result;

const COLUMNS: &str = "id, ptr_filter, ptr_preset";

fn from_row(row: &Row<'_>) -> rusqlite::Result<PresetFilterRow> {
    Ok(PresetFilterRow {
        id: row.get(0)?,
        filter_id: row.get(1)?,
        preset_id: row.get(2)?,
        preset: None,
    })
}

fn query_valid(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<PresetFilterRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_preset_filter_row {filter}"))?;
    let rows = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut valid = Vec::with_capacity(rows.len());
    for mut row in rows {
        hydrate(conn, &mut row)?;
        if row.preset.is_none() || !exists(conn, "sk_preset_filter", row.filter_id)? {
            tracing::debug!(id = row.id, preset = row.preset_id, "Removing orphaned preset filter row");
            delete(conn, &row)?;
            continue;
        }
        valid.push(row);
    }
    Ok(valid)
}

/// Fill in the row's preset.
pub fn hydrate(conn: &Connection, row: &mut PresetFilterRow) -> Result<()> {
    if row.preset.is_none() && row.preset_id > 0 {
        row.preset = part_preset::get(conn, row.preset_id)?;
    }
    Ok(())
}

/// List every membership.
pub fn list(conn: &Connection) -> Result<Vec<PresetFilterRow>> {
    query_valid(conn, "ORDER BY id", [])
}

/// List the memberships of a filter, optionally only presets with every part available.
pub fn list_for_filter(
    conn: &Connection,
    filter_id: i64,
    exclude_missing_parts: bool,
) -> Result<Vec<PresetFilterRow>> {
    let rows = query_valid(conn, "WHERE ptr_filter = ?1 ORDER BY id", [filter_id])?;
    if !exclude_missing_parts {
        return Ok(rows);
    }
    let mut available = Vec::with_capacity(rows.len());
    for row in rows {
        let ready = match &row.preset {
            Some(preset) => has_all_parts_available(conn, preset)?,
            None => false,
        };
        if ready {
            available.push(row);
        }
    }
    Ok(available)
}

/// List the filters a preset belongs to.
pub fn list_for_preset(conn: &Connection, preset_id: i64) -> Result<Vec<PresetFilterRow>> {
    query_valid(conn, "WHERE ptr_preset = ?1 ORDER BY id", [preset_id])
}

/// Get the membership of one preset in one filter.
pub fn get_for_filter_and_preset(
    conn: &Connection,
    filter_id: i64,
    preset_id: i64,
) -> Result<Option<PresetFilterRow>> {
    Ok(query_valid(
        conn,
        "WHERE ptr_filter = ?1 AND ptr_preset = ?2 LIMIT 1",
        [filter_id, preset_id],
    )?
    .into_iter()
    .next())
}

/// Insert or update a membership. Returns its id.
pub fn save(conn: &Connection, row: &mut PresetFilterRow) -> Result<i64> {
    if row.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_preset_filter_row SET ptr_filter = ?2, ptr_preset = ?3 WHERE id = ?1",
            rusqlite::params![row.id, row.filter_id, row.preset_id],
        )?;
        super::expect_changed(changed, "preset filter row", row.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_preset_filter_row (ptr_filter, ptr_preset) VALUES (?1, ?2)",
            rusqlite::params![row.filter_id, row.preset_id],
        )?;
        row.id = conn.last_insert_rowid();
    }
    Ok(row.id)
}

/// Delete a membership.
pub fn delete(conn: &Connection, row: &PresetFilterRow) -> Result<()> {
    super::delete_by_id(conn, "sk_preset_filter_row", "preset filter row", row.id)
}

pub(crate) fn delete_for_preset(conn: &Connection, preset_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM sk_preset_filter_row WHERE ptr_preset = ?1",
        [preset_id],
    )?)
}

pub(crate) fn delete_for_filter(conn: &Connection, filter_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM sk_preset_filter_row WHERE ptr_filter = ?1",
        [filter_id],
    )?)
}
