//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are forward-only.
//! Catalogs shipped with asset packs report version 0 but already contain the
//! `sk_*` tables; the v1 schema uses `IF NOT EXISTS` so it applies cleanly on
//! top of them.

use rusqlite::{Connection, OptionalExtension};
use sidekick_types::{ColorSet, TexturePaths, CATALOG_VERSION, DEFAULT_COLOR_SET_NAME, NO_ID};

use crate::queries::{color_set, version};
use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Directory holding the default color set's source textures.
pub const DEFAULT_TEXTURE_DIR: &str = "Assets/Synty/Tools/SidekickCharacters/Resources/Textures";

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<()> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Sqlite)?;

    if current_version == 0 {
        tracing::info!("Initializing catalog schema v{SCHEMA_VERSION}");
        conn.execute_batch(schema::SCHEMA_V1)
            .map_err(DbError::Sqlite)?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(DbError::Sqlite)?;
    } else if current_version < SCHEMA_VERSION {
        for version in (current_version + 1)..=SCHEMA_VERSION {
            tracing::info!("Running migration to v{version}");
            run_migration(conn, version)?;
            conn.pragma_update(None, "user_version", version)
                .map_err(DbError::Sqlite)?;
        }
    } else if current_version > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "Catalog version {current_version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    insert_defaults(conn)
}

/// Ensure the version marker and the global default color set exist.
fn insert_defaults(conn: &Connection) -> Result<()> {
    if version::get(conn)?.is_none() {
        version::stamp(conn, CATALOG_VERSION)?;
    }

    let has_default: Option<i64> = conn
        .query_row(
            "SELECT id FROM sk_color_set WHERE ptr_species = ?1 LIMIT 1",
            [NO_ID],
            |row| row.get(0),
        )
        .optional()?;
    if has_default.is_none() {
        tracing::info!("Creating default color set");
        let mut set = ColorSet::new(DEFAULT_COLOR_SET_NAME, NO_ID);
        set.textures = TexturePaths::in_directory(DEFAULT_TEXTURE_DIR);
        color_set::save(conn, &mut set)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(_conn: &Connection, version: u32) -> Result<()> {
    Err(DbError::Migration(format!(
        "Unknown migration version: {version}"
    )))
}
