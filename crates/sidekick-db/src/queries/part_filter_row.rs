//! Part filter membership query functions.
//!
//! A membership whose filter or part has been removed is deleted when read.

use rusqlite::{Connection, Row};
use sidekick_types::{CharacterPartType, PartFilterRow};

use crate::queries::{exists, part};
use crate::Result;

const COLUMNS: &str = "id, ptr_filter, ptr_part";

fn from_row(row: &Row<'_>) -> rusqlite::Result<PartFilterRow> {
    Ok(PartFilterRow {
        id: row.get(0)?,
        filter_id: row.get(1)?,
        part_id: row.get(2)?,
        part: None,
    })
}

fn query_valid(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<PartFilterRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_part_filter_row {filter}"))?;
    let rows = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut valid = Vec::with_capacity(rows.len());
    for mut row in rows {
        hydrate(conn, &mut row)?;
        if row.part.is_none() || !exists(conn, "sk_part_filter", row.filter_id)? {
            tracing::debug!(id = row.id, part = row.part_id, "Removing orphaned part filter row");
            delete(conn, &row)?;
            continue;
        }
        valid.push(row);
    }
    Ok(valid)
}

/// Fill in the row's part.
pub fn hydrate(conn: &Connection, row: &mut PartFilterRow) -> Result<()> {
    if row.part.is_none() && row.part_id > 0 {
        row.part = part::get(conn, row.part_id)?;
    }
    Ok(())
}

/// List every membership.
pub fn list(conn: &Connection) -> Result<Vec<PartFilterRow>> {
    query_valid(conn, "ORDER BY id", [])
}

/// List the memberships of a filter, optionally only for parts found on disk.
pub fn list_for_filter(
    conn: &Connection,
    filter_id: i64,
    exclude_missing_parts: bool,
) -> Result<Vec<PartFilterRow>> {
    let mut rows = query_valid(conn, "WHERE ptr_filter = ?1 ORDER BY id", [filter_id])?;
    if exclude_missing_parts {
        rows.retain(|row| row.part.as_ref().is_some_and(|p| p.file_exists));
    }
    Ok(rows)
}

/// List the filters a part belongs to.
pub fn list_for_part(conn: &Connection, part_id: i64) -> Result<Vec<PartFilterRow>> {
    query_valid(conn, "WHERE ptr_part = ?1 ORDER BY id", [part_id])
}

/// Get the membership of one part in one filter.
pub fn get_for_filter_and_part(
    conn: &Connection,
    filter_id: i64,
    part_id: i64,
) -> Result<Option<PartFilterRow>> {
    Ok(query_valid(
        conn,
        "WHERE ptr_filter = ?1 AND ptr_part = ?2 LIMIT 1",
        [filter_id, part_id],
    )?
    .into_iter()
    .next())
}

/// Names of parts on disk in a filter, usable by a species, of one type.
pub fn part_names_for_filter_species_and_type(
    conn: &Connection,
    filter_id: i64,
    species_id: i64,
    part_type: CharacterPartType,
) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT p.name FROM sk_part_filter_row AS fr
         JOIN sk_part AS p ON fr.ptr_part = p.id
         JOIN sk_part_species_link AS s ON p.id = s.ptr_part
         WHERE fr.ptr_filter = ?1 AND s.ptr_species = ?2 AND p.type = ?3 AND p.file_exists = 1
         ORDER BY p.name",
    )?;
    let names = stmt
        .query_map(
            rusqlite::params![filter_id, species_id, part_type.as_i32()],
            |row| row.get(0),
        )?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Insert or update a membership. Returns its id.
pub fn save(conn: &Connection, row: &mut PartFilterRow) -> Result<i64> {
    if row.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_part_filter_row SET ptr_filter = ?2, ptr_part = ?3 WHERE id = ?1",
            rusqlite::params![row.id, row.filter_id, row.part_id],
        )?;
        super::expect_changed(changed, "part filter row", row.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_part_filter_row (ptr_filter, ptr_part) VALUES (?1, ?2)",
            rusqlite::params![row.filter_id, row.part_id],
        )?;
        row.id = conn.last_insert_rowid();
    }
    Ok(row.id)
}

/// Delete a membership.
pub fn delete(conn: &Connection, row: &PartFilterRow) -> Result<()> {
    super::delete_by_id(conn, "sk_part_filter_row", "part filter row", row.id)
}

pub(crate) fn delete_for_part(conn: &Connection, part_id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM sk_part_filter_row WHERE ptr_part = ?1", [part_id])?)
}

pub(crate) fn delete_for_filter(conn: &Connection, filter_id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM sk_part_filter_row WHERE ptr_filter = ?1", [filter_id])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{part_filter, part_species_link, species};
    use sidekick_types::{FilterType, Part, PartFilter, PartSpeciesLink, Species};

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    fn filter(conn: &Connection) -> PartFilter {
        let mut f = PartFilter::new(FilterType::Outfit, "Apocalypse");
        part_filter::save(conn, &mut f).expect("filter");
        f
    }

    fn part_on_disk(conn: &Connection, name: &str, file_exists: bool) -> Part {
        let mut p = Part::new(-1, CharacterPartType::Torso, name, name, name);
        p.file_exists = file_exists;
        part::save(conn, &mut p).expect("part");
        p
    }

    #[test]
    fn test_list_for_filter_excludes_missing_parts() {
        let conn = test_db();
        let f = filter(&conn);
        let on_disk = part_on_disk(&conn, "A", true);
        let missing = part_on_disk(&conn, "B", false);
        save(&conn, &mut PartFilterRow::new(f.id, on_disk.id)).expect("row");
        save(&conn, &mut PartFilterRow::new(f.id, missing.id)).expect("row");

        assert_eq!(list_for_filter(&conn, f.id, false).expect("all").len(), 2);
        let present = list_for_filter(&conn, f.id, true).expect("present");
        assert_eq!(present.len(), 1);
        assert_eq!(present[0].part_id, on_disk.id);
        assert!(get_for_filter_and_part(&conn, f.id, missing.id).expect("get").is_some());
    }

    #[test]
    fn test_row_for_deleted_part_heals() {
        let conn = test_db();
        let f = filter(&conn);
        save(&conn, &mut PartFilterRow::new(f.id, 12345)).expect("row");

        assert!(list_for_filter(&conn, f.id, false).expect("list").is_empty());
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM sk_part_filter_row", [], |row| row.get(0))
            .expect("count");
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_part_names_for_filter_species_and_type() {
        let conn = test_db();
        let f = filter(&conn);
        let mut human = Species::new("Human", "HU");
        species::save(&conn, &mut human).expect("species");

        let linked = part_on_disk(&conn, "SK_LINKED", true);
        let unlinked = part_on_disk(&conn, "SK_UNLINKED", true);
        let absent = part_on_disk(&conn, "SK_ABSENT", false);
        for p in [&linked, &unlinked, &absent] {
            save(&conn, &mut PartFilterRow::new(f.id, p.id)).expect("row");
        }
        for p in [&linked, &absent] {
            part_species_link::save(&conn, &mut PartSpeciesLink::new(human.id, p.id)).expect("link");
        }

        let names =
            part_names_for_filter_species_and_type(&conn, f.id, human.id, CharacterPartType::Torso)
                .expect("names");
        assert_eq!(names, vec!["SK_LINKED".to_string()]);
    }
}
