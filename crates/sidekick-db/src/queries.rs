//! Query functions organized by entity.
//!
//! Every module follows the same shape: `get` returns `Ok(None)` for a
//! missing id, `save` inserts when the entity has no id yet and updates
//! otherwise, and read functions return hydrated values (related entities
//! filled in through the module's `hydrate`).

pub mod body_shape_preset;
pub mod color_preset;
pub mod color_preset_row;
pub mod color_property;
pub mod color_row;
pub mod color_set;
pub mod filter_group;
pub mod image;
pub mod part;
pub mod part_filter;
pub mod part_filter_row;
pub mod part_preset;
pub mod part_preset_row;
pub mod part_species_link;
pub mod preset_filter;
pub mod preset_filter_row;
pub mod rig_movement;
pub mod species;
pub mod version;

use rusqlite::Connection;

use crate::{DbError, Result};

/// Turn a zero row count from an update or delete into an integrity error.
pub(crate) fn expect_changed(
    changed: usize,
    entity: &'static str,
    id: i64,
    action: &'static str,
) -> Result<()> {
    if changed == 0 {
        return Err(DbError::Integrity { entity, id, action });
    }
    Ok(())
}

/// Delete exactly one row by id.
pub(crate) fn delete_by_id(
    conn: &Connection,
    table: &'static str,
    entity: &'static str,
    id: i64,
) -> Result<()> {
    let changed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
    expect_changed(changed, entity, id, "delete")
}

/// Whether a row with `id` exists in `table`.
pub(crate) fn exists(conn: &Connection, table: &'static str, id: i64) -> Result<bool> {
    if id <= 0 {
        return Ok(false);
    }
    let found: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
        [id],
        |row| row.get(0),
    )?;
    Ok(found)
}
