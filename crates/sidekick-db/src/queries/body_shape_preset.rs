//! Body shape preset query functions.

use rusqlite::{Connection, OptionalExtension, Row};
use sidekick_types::BodyShapePreset;

use crate::Result;

pub use crate::integrity::delete_body_shape_preset as delete;

const COLUMNS: &str = "id, name, body_type, body_size, musculature";

fn from_row(row: &Row<'_>) -> rusqlite::Result<BodyShapePreset> {
    Ok(BodyShapePreset {
        id: row.get(0)?,
        name: row.get(1)?,
        body_type: row.get(2)?,
        body_size: row.get(3)?,
        musculature: row.get(4)?,
    })
}

/// Get a preset by id.
pub fn get(conn: &Connection, id: i64) -> Result<Option<BodyShapePreset>> {
    let preset = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_body_shape_preset WHERE id = ?1"),
            [id],
            from_row,
        )
        .optional()?;
    Ok(preset)
}

/// Get a preset by name.
pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<BodyShapePreset>> {
    let preset = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM sk_body_shape_preset WHERE name = ?1 LIMIT 1"),
            [name],
            from_row,
        )
        .optional()?;
    Ok(preset)
}

/// List every preset.
pub fn list(conn: &Connection) -> Result<Vec<BodyShapePreset>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM sk_body_shape_preset ORDER BY name"))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Insert or update a preset after range-checking its values. Returns its id.
pub fn save(conn: &Connection, preset: &mut BodyShapePreset) -> Result<i64> {
    preset.validate()?;
    if preset.id > 0 {
        let changed = conn.execute(
            "UPDATE sk_body_shape_preset SET name = ?2, body_type = ?3, body_size = ?4,
                 musculature = ?5
             WHERE id = ?1",
            rusqlite::params![
                preset.id,
                preset.name,
                preset.body_type,
                preset.body_size,
                preset.musculature,
            ],
        )?;
        super::expect_changed(changed, "body shape preset", preset.id, "update")?;
    } else {
        conn.execute(
            "INSERT INTO sk_body_shape_preset (name, body_type, body_size, musculature)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![preset.name, preset.body_type, preset.body_size, preset.musculature],
        )?;
        preset.id = conn.last_insert_rowid();
    }
    Ok(preset.id)
}

pub(crate) fn delete_row(conn: &Connection, id: i64) -> Result<()> {
    super::delete_by_id(conn, "sk_body_shape_preset", "body shape preset", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_save_and_get() {
        let conn = test_db();
        let mut preset = BodyShapePreset::new("Brute", -40, 80, 100);
        save(&conn, &mut preset).expect("save");
        assert_eq!(get(&conn, preset.id).expect("get"), Some(preset.clone()));
        assert_eq!(get_by_name(&conn, "Brute").expect("q"), Some(preset));
        assert_eq!(list(&conn).expect("list").len(), 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let conn = test_db();
        let mut preset = BodyShapePreset::new("Impossible", 0, 0, -101);
        assert!(matches!(save(&conn, &mut preset), Err(DbError::Constraint(_))));
        assert!(list(&conn).expect("list").is_empty());
    }
}
