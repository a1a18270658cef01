//! Color row query functions.
//!
//! Rows whose set or property no longer exists are deleted when read.

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::{ColorChannels, ColorRow, HexColor};

use crate::queries::{color_property, exists};
use crate::Result;

const COLUMNS: &str = "id, ptr_color_set, ptr_color_property, \
                       color, metallic, smoothness, reflection, emission, opacity";

/// Read six channel columns starting at `start`.
pub(crate) fn channels_from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<ColorChannels> {
    let hex = |offset: usize| row.get::<_, String>(start + offset).map(HexColor::new);
    Ok(ColorChannels {
        color: hex(0)?,
        metallic: hex(1)?,
        smoothness: hex(2)?,
        reflection: hex(3)?,
        emission: hex(4)?,
        opacity: hex(5)?,
    })
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<ColorRow> {
    Ok(ColorRow {
        id: row.get(0)?,
        color_set_id: row.get(1)?,
        color_property_id: row.get(2)?,
        channels: channels_from_row(row, 3)?,
        color_property: None,
    })
}

fn query_valid(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<ColorRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_color_row {filter}"))?;
    let rows = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut valid = Vec::with_capacity(rows.len());
    for mut row in rows {
        hydrate(conn, &mut row)?;
        if row.color_property.is_none() || !exists(conn, "sk_color_set", row.color_set_id)? {
            tracing::debug!(id = row.id, "Removing orphaned color row");
            delete(conn, &row)?;
            continue;
        }
        valid.push(row);
    }
    Ok(valid)
}

/// Fill in the row's color property.
pub fn hydrate(conn: &Connection, row: &mut ColorRow) -> Result<()> {
    if row.color_property.is_none() && row.color_property_id >= 0 {
        row.color_property = color_property::get(conn, row.color_property_id)?;
    }
    Ok(())
}

/// Get a row by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<ColorRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_color_row WHERE id = ?1"),
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
pub fn list(conn: &Connection) -> Result<Vec<ColorRow>> {
    query_valid(conn, "ORDER BY id", [])
}

/// List the rows of one set.
pub fn list_by_set(conn: &Connection, color_set_id: i64) -> Result<Vec<ColorRow>> {
    query_valid(conn, "WHERE ptr_color_set = ?1 ORDER BY id", [color_set_id])
}

/// List rows for one property across all sets.
pub fn list_by_property(conn: &Connection, color_property_id: i64) -> Result<Vec<ColorRow>> {
    query_valid(conn, "WHERE ptr_color_property = ?1 ORDER BY id", [color_property_id])
}

/// List rows of one set for one property.
pub fn list_by_set_and_property(
    conn: &Connection,
    color_set_id: i64,
    color_property_id: i64,
) -> Result<Vec<ColorRow>> {
    query_valid(
        conn,
        "WHERE ptr_color_set = ?1 AND ptr_color_property = ?2 ORDER BY id",
        [color_set_id, color_property_id],
    )
}

/// Insert or update a row. Returns its id.
pub fn save(conn: &Connection, row: &mut ColorRow) -> Result<i64> {
    let c = &row.channels;
    if row.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_color_row SET ptr_color_set = ?2, ptr_color_property = ?3, color = ?4,
                 metallic = ?5, smoothness = ?6, reflection = ?7, emission = ?8, opacity = ?9
             WHERE id = ?1",
            rusqlite::params![
                row.id,
                row.color_set_id,
                row.color_property_id,
                c.color.as_str(),
                c.metallic.as_str(),
                c.smoothness.as_str(),
                c.reflection.as_str(),
                c.emission.as_str(),
                c.opacity.as_str(),
            ],
        )?;
        super::expect_changed(changed, "color row", row.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_color_row (ptr_color_set, ptr_color_property, color, metallic,
                 smoothness, reflection, emission, opacity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.color_set_id,
                row.color_property_id,
                c.color.as_str(),
                c.metallic.as_str(),
                c.smoothness.as_str(),
                c.reflection.as_str(),
                c.emission.as_str(),
                c.opacity.as_str(),
            ],
        )?;
        row.id = conn.last_insert_rowid();
    }
    Ok(row.id)
}

/// Delete a row.
pub fn delete(conn: &Connection, row: &ColorRow) -> Result<()> {
    super::delete_by_id(conn, "sk_color_row", "color row", row.id)
}

pub(crate) fn delete_for_set(conn: &Connection, color_set_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM sk_color_row WHERE ptr_color_set = ?1",
        [color_set_id],
    )?)
}
