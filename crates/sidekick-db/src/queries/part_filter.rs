//! Part filter query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::{FilterType, PartFilter};

use crate::integrity::part_filter_has_parts;
use crate::{enum_column, Result};

pub use crate::integrity::delete_part_filter as delete;

const COLUMNS: &str = "id, filter_type, filter_term";

fn from_row(row: &Row<'_>) -> rusqlite::Result<PartFilter> {
    Ok(PartFilter {
        id: row.get(0)?,
        filter_type: enum_column(row, 1)?,
        term: row.get(2)?,
    })
}

/// Get a filter by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<PartFilter>> {
    let filter = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_part_filter WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(filter)
}

/// Get a filter by term and type.
pub fn get_by_term_and_type(
    conn: &Connection,
    term: &str,
    filter_type: FilterType,
) -> Result<Option<PartFilter>> {
    let filter = conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM sk_part_filter
                 WHERE filter_term = ?1 AND filter_type = ?2 LIMIT 1"
            ),
            rusqlite::params![term, filter_type.as_i32()],
            from_row,
        )
        .optional()?;
    Ok(filter)
}

/// List every filter.
pub fn list(conn: &Connection) -> Result<Vec<PartFilter>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_part_filter ORDER BY filter_term"))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// List filters of one type.
///
/// With `exclude_empty`, filters without at least one non-base part on disk
/// are dropped.
pub fn list_for_filter_type(
    conn: &Connection,
    filter_type: FilterType,
    exclude_empty: bool,
) -> Result<Vec<PartFilter>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM sk_part_filter WHERE filter_type = ?1 ORDER BY filter_term"
    ))?;
    let filters = stmt
        .query_map([filter_type.as_i32()], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if !exclude_empty {
        return Ok(filters);
    }

    let mut non_empty = Vec::with_capacity(filters.len());
    for filter in filters {
        if part_filter_has_parts(conn, &filter, true)? {
            non_empty.push(filter);
        }
    }
    Ok(non_empty)
}

/// Insert or update a filter. Returns its id.
pub fn save(conn: &Connection, filter: &mut PartFilter) -> Result<i64> {
    if filter.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_part_filter SET filter_type = ?2, filter_term = ?3 WHERE id = ?1",
            rusqlite::params![filter.id, filter.filter_type.as_i32(), filter.term],
        )?;
        super::expect_changed(changed, "part filter", filter.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_part_filter (filter_type, filter_term) VALUES (?1, ?2)",
            rusqlite::params![filter.filter_type.as_i32(), filter.term],
        )?;
        filter.id = conn.last_insert_rowid();
    }
    Ok(filter.id)
}

pub(crate) fn delete_row(conn: &Connection, id: i64) -> Result<()> {
    super::delete_by_id(conn, "sk_part_filter", "part filter", id)
}
