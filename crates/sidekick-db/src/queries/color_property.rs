//! Color property query functions.
//!
//! Property ids are assigned by the importer and kept stable across catalog
//! rebuilds, because saved characters reference them.

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::{ColorGroup, ColorProperty};

use crate::{enum_column, Result};

const COLUMNS: &str = "id, color_group, name, u, v";

fn from_row(row: &Row<'_>) -> rusqlite::Result<ColorProperty> {
    Ok(ColorProperty {
        id: row.get(0)?,
        group: enum_column(row, 1)?,
        name: row.get(2)?,
        u: row.get(3)?,
        v: row.get(4)?,
    })
}

fn query_list(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<ColorProperty>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_color_property {filter}"))?;
    let rows = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Get a property by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<ColorProperty>> {
    let property = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_color_property WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(property)
}

/// List every property.
pub fn list(conn: &Connection) -> Result<Vec<ColorProperty>> {
    query_list(conn, "ORDER BY id", [])
}

/// List the properties of one color group.
pub fn list_by_group(conn: &Connection, group: ColorGroup) -> Result<Vec<ColorProperty>> {
    query_list(conn, "WHERE color_group = ?1 ORDER BY id", [group.as_i32()])
}

/// List properties sharing one atlas texel.
pub fn list_by_uvs(conn: &Connection, u: i32, v: i32) -> Result<Vec<ColorProperty>> {
    query_list(conn, "WHERE u = ?1 AND v = ?2 ORDER BY id", [u, v])
}

/// Insert or replace a property.
///
/// A non-negative id (0 included) is kept as given; otherwise the store
/// assigns one.
pub fn save(conn: &Connection, property: &mut ColorProperty) -> Result<i64> {
    if property.id >= 0 {
        conn.execute(
            "INSERT INTO sk_color_property (id, color_group, name, u, v)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                 color_group = excluded.color_group,
                 name = excluded.name,
                 u = excluded.u,
                 v = excluded.v",
            rusqlite::params![
                property.id,
                property.group.as_i32(),
                property.name,
                property.u,
                property.v,
            ],
        )?;
    } else {
        conn.execute(
            "INSERT INTO sk_color_property (color_group, name, u, v) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![property.group.as_i32(), property.name, property.u, property.v],
        )?;
        property.id = conn.last_insert_rowid();
    }
    Ok(property.id)
}

/// Delete a property. Rows that used it are dropped on their next read.
pub fn delete(conn: &Connection, property: &ColorProperty) -> Result<()> {
    super::delete_by_id(conn, "sk_color_property", "color property", property.id)
}
