//! Catalog upkeep: file presence refresh and the orphan sweep.

use std::path::Path;

use rusqlite::Connection;
use sidekick_db::integrity;

use super::Result;

pub fn refresh(conn: &Connection, asset_root: &Path) -> Result {
    let report = integrity::refresh_all_part_availability(conn, asset_root)?;
    Ok(serde_json::to_value(report)?)
}

pub fn sweep(conn: &Connection) -> Result {
    let report = integrity::sweep(conn)?;
    Ok(serde_json::json!({
        "removed": report.total(),
        "report": report,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidekick_db::queries::part;
    use sidekick_types::{CharacterPartType, Part};

    #[test]
    fn test_refresh_reports_counts() {
        let conn = sidekick_db::open_memory().expect("open test db");
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("torso.prefab"), b"mesh").expect("write");
        let mut torso = Part::new(-1, CharacterPartType::Torso, "SK_A_10TORS_HU01", "torso", "torso.prefab");
        part::save(&conn, &mut torso).expect("part");

        let report = refresh(&conn, dir.path()).expect("refresh");
        assert_eq!(report["checked"], 1);
        assert_eq!(report["available"], 1);
        assert_eq!(report["changed"], 1);
    }

    #[test]
    fn test_sweep_on_clean_catalog() {
        let conn = sidekick_db::open_memory().expect("open test db");
        let report = sweep(&conn).expect("sweep");
        assert_eq!(report["removed"], 0);
    }
}
