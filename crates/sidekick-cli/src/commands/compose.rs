//! Compose a saved character document against the catalog.

use std::path::Path;

use anyhow::Context;
use rusqlite::Connection;
use sidekick_compose::{CharacterRequest, ComposeOptions, Composer, FsMeshSource};
use sidekick_types::character::SerializedCharacter;

use super::Result;

pub fn compose(conn: &Connection, options: ComposeOptions, document: &Path) -> Result {
    let json = std::fs::read_to_string(document)
        .with_context(|| format!("reading {}", document.display()))?;
    let saved = SerializedCharacter::from_json(&json)
        .with_context(|| format!("parsing {}", document.display()))?;

    let request = CharacterRequest::from_serialized(conn, &saved)?;
    let meshes = FsMeshSource::new(options.asset_root.clone());
    let character = Composer::new(conn, meshes, options).compose(&request)?;

    for warning in &character.warnings {
        tracing::warn!("{}: {warning}", character.name);
    }
    Ok(serde_json::to_value(&character)?)
}
