//! # sidekick-db
//!
//! Catalog store for Sidekick characters: a single SQLite file holding
//! species, parts, presets, colors, filters, body shapes and thumbnails.
//!
//! ## Layout
//!
//! - [`queries`]: one module per entity, free functions over `&Connection`
//! - [`integrity`]: cascading deletes, preset availability, orphan sweep
//! - [`migrations`]: schema creation and default rows
//!
//! ## Conventions
//!
//! - WAL mode, `busy_timeout` for concurrent readers
//! - Ids `<= 0` on an entity mean "not yet saved"
//! - Schema version stored in `PRAGMA user_version`

pub mod integrity;
pub mod migrations;
pub mod queries;
pub mod schema;

use std::path::Path;

use rusqlite::Connection;
use sidekick_types::TypeError;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// A save or delete touched no rows.
    #[error("{action} {entity} {id} affected no rows")]
    Integrity {
        entity: &'static str,
        id: i64,
        action: &'static str,
    },

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TypeError> for DbError {
    fn from(e: TypeError) -> Self {
        DbError::Constraint(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Options applied when opening a catalog.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Purge orphaned rows once the schema is in place.
    pub sweep_on_open: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            sweep_on_open: true,
        }
    }
}

/// Open or create a catalog at the given path.
///
/// Configures pragmas, runs pending migrations and sweeps orphans.
pub fn open(path: &Path) -> Result<Connection> {
    open_with(path, &OpenOptions::default())
}

/// Open or create a catalog with explicit options.
pub fn open_with(path: &Path, options: &OpenOptions) -> Result<Connection> {
    let conn = Connection::open(path)?;
    prepare(&conn, options)?;
    Ok(conn)
}

/// Open an in-memory catalog (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    prepare(&conn, &OpenOptions::default())?;
    Ok(conn)
}

fn prepare(conn: &Connection, options: &OpenOptions) -> Result<()> {
    configure(conn)?;
    migrations::run(conn)?;
    if options.sweep_on_open {
        let report = integrity::sweep(conn)?;
        if report.total() > 0 {
            tracing::info!(removed = report.total(), "Swept orphaned catalog rows");
        }
    }
    Ok(())
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;
         PRAGMA cache_size = -8000;",
    )?;
    Ok(())
}

/// Run `f` inside a named savepoint, rolling back everything it did on error.
///
/// Savepoints nest, so callers may already be inside a transaction.
pub(crate) fn with_savepoint<T>(
    conn: &Connection,
    name: &str,
    f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    conn.execute_batch(&format!("SAVEPOINT {name}"))?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {name}"))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) =
                conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"))
            {
                tracing::error!("Savepoint {name} rollback failed: {rollback}");
            }
            Err(e)
        }
    }
}

/// Decode an integer column into one of the persisted enums.
pub(crate) fn enum_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: TryFrom<i32, Error = TypeError>,
{
    let raw: i32 = row.get(idx)?;
    T::try_from(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Integer, Box::new(e))
    })
}
