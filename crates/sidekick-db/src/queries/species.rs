//! Species query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::Species;

use crate::Result;

pub use crate::integrity::delete_species as delete;

const COLUMNS: &str = "id, name, code";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Species> {
    Ok(Species {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
    })
}

/// Get a species by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<Species>> {
    let species = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_species WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(species)
}

/// Get a species by name, ignoring case.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<Species>> {
    let species = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_species WHERE name = ?1 COLLATE NOCASE LIMIT 1"),
            [name],
            from_row,
        )
        .optional()?;
    Ok(species)
}

/// List all species in id order.
pub fn list(conn: &Connection) -> Result<Vec<Species>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_species ORDER BY id"))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// List species, optionally dropping those without any part on disk.
///
/// The `Unrestricted` species is always kept.
pub fn list_with_parts(conn: &Connection, exclude_without_parts: bool) -> Result<Vec<Species>> {
    if !exclude_without_parts {
        return list(conn);
    }
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM sk_species s
         WHERE s.name = ?1 COLLATE NOCASE
            OR EXISTS (SELECT 1 FROM sk_part p WHERE p.ptr_species = s.id AND p.file_exists = 1)
         ORDER BY s.id"
    ))?;
    let rows = stmt
        .query_map([sidekick_types::UNRESTRICTED_SPECIES], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Insert or update a species. Returns its id.
pub fn save(conn: &Connection, species: &mut Species) -> Result<i64> {
    if species.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_species SET name = ?2, code = ?3 WHERE id = ?1",
            rusqlite::params![species.id, species.name, species.code],
        )?;
        super::expect_changed(changed, "species", species.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_species (name, code) VALUES (?1, ?2)",
            rusqlite::params![species.name, species.code],
        )?;
        species.id = conn.last_insert_rowid();
    }
    Ok(species.id)
}

pub(crate) fn delete_row(conn: &Connection, id: i64) -> Result<()> {
    super::delete_by_id(conn, "sk_species", "species", id)
}

/// Fill `slot` with the species `species_id` unless already present.
pub(crate) fn hydrate_ref(
    conn: &Connection,
    species_id: i64,
    slot: &mut Option<Species>,
) -> Result<()> {
    if slot.is_none() && species_id > 0 {
        *slot = get(conn, species_id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;
    use sidekick_types::{CharacterPartType, Part};

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_save_and_get() {
        let conn = test_db();
        let mut human = Species::new("Human", "HU");
        let id = save(&conn, &mut human).expect("save");
        assert!(id > 0);
        assert_eq!(human.id, id);

        let loaded = get(&conn, id).expect("get").expect("exists");
        assert_eq!(loaded, human);
        assert!(get(&conn, 999).expect("get").is_none());
    }

    #[test]
    fn test_update() {
        let conn = test_db();
        let mut s = Species::new("Goblin", "GO");
        save(&conn, &mut s).expect("insert");
        s.name = "Goblins".into();
        save(&conn, &mut s).expect("update");
        assert_eq!(get(&conn, s.id).expect("get").expect("exists").name, "Goblins");
    }

    #[test]
    fn test_update_missing_row_fails() {
        let conn = test_db();
        let mut ghost = Species::new("Ghost", "GH");
        ghost.id = 42;
        let result = save(&conn, &mut ghost);
        assert!(matches!(result, Err(DbError::Integrity { entity: "species", id: 42, .. })));
    }

    #[test]
    fn test_get_by_name_ignores_case() {
        let conn = test_db();
        save(&conn, &mut Species::new("Human", "HU")).expect("save");
        let found = get_by_name(&conn, "hUMAN").expect("query").expect("found");
        assert_eq!(found.code, "HU");
        assert!(get_by_name(&conn, "Elf").expect("query").is_none());
    }

    #[test]
    fn test_list_with_parts() {
        let conn = test_db();
        let mut human = Species::new("Human", "HU");
        save(&conn, &mut human).expect("save");
        let mut elf = Species::new("Elf", "EL");
        save(&conn, &mut elf).expect("save");
        save(&conn, &mut Species::new("Unrestricted", "UN")).expect("save");

        let mut torso = Part::new(human.id, CharacterPartType::Torso, "t", "t", "t");
        torso.file_exists = true;
        crate::queries::part::save(&conn, &mut torso).expect("part");
        let mut missing = Part::new(elf.id, CharacterPartType::Torso, "e", "e", "e");
        crate::queries::part::save(&conn, &mut missing).expect("part");

        let names: Vec<String> = list_with_parts(&conn, true)
            .expect("list")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Human", "Unrestricted"]);
        assert_eq!(list_with_parts(&conn, false).expect("list").len(), 3);
    }
}
