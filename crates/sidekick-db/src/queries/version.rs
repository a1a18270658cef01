//! Catalog content version marker.

use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Semantic version of the catalog content and when it was written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVersion {
    pub id: i64,
    pub semantic_version: String,
    /// Unix seconds.
    pub update_time: i64,
}

/// The most recent version marker, if any.
pub fn get(conn: &Connection) -> Result<Option<CatalogVersion>> {
    let version = conn
        .query_row(
            "SELECT id, semantic_version, update_time FROM sk_vdata ORDER BY id DESC LIMIT 1",
            [],
            |row| {
                Ok(CatalogVersion {
                    id: row.get(0)?,
                    semantic_version: row.get(1)?,
                    update_time: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(version)
}

/// Record `version` as the current catalog version.
pub fn stamp(conn: &Connection, version: &str) -> Result<CatalogVersion> {
    let update_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();
    conn.execute(
        "INSERT INTO sk_vdata (semantic_version, update_time) VALUES (?1, ?2)",
        rusqlite::params![version, update_time],
    )?;
    tracing::info!(version, "Stamped catalog version");
    Ok(CatalogVersion {
        id: conn.last_insert_rowid(),
        semantic_version: version.to_string(),
        update_time,
    })
}
