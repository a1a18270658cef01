//! Preset filter query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::{PartPreset, PresetFilter};

use crate::queries::preset_filter_row;
use crate::Result;

pub use crate::integrity::delete_preset_filter as delete;

const COLUMNS: &str = "id, filter_term";

fn from_row(row: &Row<'_>) -> rusqlite::Result<PresetFilter> {
    Ok(PresetFilter {
        id: row.get(0)?,
        term: row.get(1)?,
    })
}

/// Get a filter by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<PresetFilter>> {
    let filter = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_preset_filter WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(filter)
}

/// Get a filter by term.
pub fn get_by_term(conn: &Connection, term: &str) -> Result<Option<PresetFilter>> {
    let filter = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_preset_filter WHERE filter_term = ?1 LIMIT 1"),
            [term],
            from_row,
        )
        .optional()?;
    Ok(filter)
}

/// List filters, optionally only those holding at least one available preset.
pub fn list(conn: &Connection, exclude_empty: bool) -> Result<Vec<PresetFilter>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM sk_preset_filter ORDER BY filter_term"
    ))?;
    let filters = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if !exclude_empty {
        return Ok(filters);
    }

    let mut non_empty = Vec::with_capacity(filters.len());
    for filter in filters {
        if !presets_for_filter(conn, &filter, true)?.is_empty() {
            non_empty.push(filter);
        }
    }
    Ok(non_empty)
}

/// Presets in a filter, optionally only those with every part available.
pub fn presets_for_filter(
    conn: &Connection,
    filter: &PresetFilter,
    exclude_missing_parts: bool,
) -> Result<Vec<PartPreset>> {
    Ok(
        preset_filter_row::list_for_filter(conn, filter.id, exclude_missing_parts)?
            .into_iter()
            .filter_map(|row| row.preset)
            .collect(),
    )
}

/// Insert or update a filter. Returns its id.
pub fn save(conn: &Connection, filter: &mut PresetFilter) -> Result<i64> {
    if filter.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_preset_filter SET filter_term = ?2 WHERE id = ?1",
            rusqlite::params![filter.id, filter.term],
        )?;
        super::expect_changed(changed, "preset filter", filter.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_preset_filter (filter_term) VALUES (?1)",
            [&filter.term],
        )?;
        filter.id = conn.last_insert_rowid();
    }
    Ok(filter.id)
}

pub(crate) fn delete_row(conn: &Connection, id: i64) -> Result<()> {
    super::delete_by_id(conn, "sk_preset_filter", "preset filter", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{part, part_preset, part_preset_row};
    use sidekick_types::{CharacterPartType, Part, PartGroup, PartPresetRow, PresetFilterRow};

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_exclude_empty_uses_preset_availability() {
        let conn = test_db();
        let mut ready = PresetFilter::new("Ready");
        let mut broken = PresetFilter::new("Broken");
        save(&conn, &mut ready).expect("filter");
        save(&conn, &mut broken).expect("filter");

        for (filter, on_disk) in [(&ready, true), (&broken, false)] {
            let mut p = Part::new(-1, CharacterPartType::Torso, filter.term.clone(), "f", "l");
            p.file_exists = on_disk;
            part::save(&conn, &mut p).expect("part");
            let mut preset = PartPreset::new(filter.term.clone(), PartGroup::UpperBody, -1);
            part_preset::save(&conn, &mut preset).expect("preset");
            part_preset_row::save(&conn, &mut PartPresetRow::for_part(preset.id, &p)).expect("row");
            preset_filter_row::save(&conn, &mut PresetFilterRow::new(filter.id, preset.id))
                .expect("membership");
        }

        assert_eq!(list(&conn, false).expect("all").len(), 2);
        assert_eq!(list(&conn, true).expect("non-empty"), vec![ready.clone()]);
        assert_eq!(presets_for_filter(&conn, &broken, false).expect("presets").len(), 1);
        assert!(presets_for_filter(&conn, &broken, true).expect("presets").is_empty());
        assert_eq!(get_by_term(&conn, "Ready").expect("q"), Some(ready));
    }
}
