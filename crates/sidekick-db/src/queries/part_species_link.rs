//! Part/species link query functions.
//!
//! Links whose species or part no longer exists are deleted when read.

use rusqlite::{Connection, Row};
use sidekick_types::PartSpeciesLink;

use crate::queries::exists;
use crate::Result;

const COLUMNS: &str = "id, ptr_species, ptr_part";

fn from_row(row: &Row<'_>) -> rusqlite::Result<PartSpeciesLink> {
    Ok(PartSpeciesLink {
        id: row.get(0)?,
        species_id: row.get(1)?,
        part_id: row.get(2)?,
    })
}

fn query_valid(conn: &Connection, filter: &str, params: impl rusqlite::Params) -> Result<Vec<PartSpeciesLink>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_part_species_link {filter}"))?;
    let links = stmt
        .query_map(params, from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut valid = Vec::with_capacity(links.len());
    for link in links {
        if exists(conn, "sk_species", link.species_id)? && exists(conn, "sk_part", link.part_id)? {
            valid.push(link);
        } else {
            tracing::debug!(id = link.id, "Removing orphaned part species link");
            delete(conn, &link)?;
        }
    }
    Ok(valid)
}

/// List all links.
pub fn list(conn: &Connection) -> Result<Vec<PartSpeciesLink>> {
    query_valid(conn, "ORDER BY id", [])
}

/// List links granting parts to a species.
pub fn list_for_species(conn: &Connection, species_id: i64) -> Result<Vec<PartSpeciesLink>> {
    query_valid(conn, "WHERE ptr_species = ?1 ORDER BY id", [species_id])
}

/// List links for a part.
pub fn list_for_part(conn: &Connection, part_id: i64) -> Result<Vec<PartSpeciesLink>> {
    query_valid(conn, "WHERE ptr_part = ?1 ORDER BY id", [part_id])
}

/// Get the link between one species and one part.
pub fn get_for_species_and_part(
    conn: &Connection,
    species_id: i64,
    part_id: i64,
) -> Result<Option<PartSpeciesLink>> {
    Ok(query_valid(
        conn,
        "WHERE ptr_species = ?1 AND ptr_part = ?2 LIMIT 1",
        [species_id, part_id],
    )?
    .into_iter()
    .next())
}

/// Insert or update a link. Returns its id.
pub fn save(conn: &Connection, link: &mut PartSpeciesLink) -> Result<i64> {
    if link.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_part_species_link SET ptr_species = ?2, ptr_part = ?3 WHERE id = ?1",
            rusqlite::params![link.id, link.species_id, link.part_id],
        )?;
        super::expect_changed(changed, "part species link", link.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_part_species_link (ptr_species, ptr_part) VALUES (?1, ?2)",
            rusqlite::params![link.species_id, link.part_id],
        )?;
        link.id = conn.last_insert_rowid();
    }
    Ok(link.id)
}

/// Delete a link.
pub fn delete(conn: &Connection, link: &PartSpeciesLink) -> Result<()> {
    super::delete_by_id(conn, "sk_part_species_link", "part species link", link.id)
}

pub(crate) fn delete_for_part(conn: &Connection, part_id: i64) -> Result<usize> {
    Ok(conn.execute("DELETE FROM sk_part_species_link WHERE ptr_part = ?1", [part_id])?)
}

pub(crate) fn delete_for_species(conn: &Connection, species_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM sk_part_species_link WHERE ptr_species = ?1",
        [species_id],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{part, species};
    use sidekick_types::{CharacterPartType, Part, Species};

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_link_and_list() {
        let conn = test_db();
        let mut s = Species::new("Human", "HU");
        species::save(&conn, &mut s).expect("species");
        let mut p = Part::new(s.id, CharacterPartType::Hair, "hair", "hair", "");
        part::save(&conn, &mut p).expect("part");

        let mut link = PartSpeciesLink::new(s.id, p.id);
        save(&conn, &mut link).expect("link");

        assert_eq!(list_for_species(&conn, s.id).expect("list"), vec![link.clone()]);
        assert_eq!(list_for_part(&conn, p.id).expect("list").len(), 1);
        assert!(get_for_species_and_part(&conn, s.id, p.id).expect("get").is_some());
    }

    #[test]
    fn test_orphaned_link_is_purged_on_read() {
        let conn = test_db();
        let mut s = Species::new("Human", "HU");
        species::save(&conn, &mut s).expect("species");
        let mut link = PartSpeciesLink::new(s.id, 999);
        save(&conn, &mut link).expect("link");

        assert!(list_for_species(&conn, s.id).expect("list").is_empty());
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM sk_part_species_link", [], |row| row.get(0))
            .expect("count");
        assert_eq!(remaining, 0);
    }
}
