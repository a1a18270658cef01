//! Read-only catalog listings and the version stamp.

use std::path::Path;

use anyhow::Context;
use rusqlite::Connection;
use sidekick_db::queries::filter_group::FilterGroup;
use sidekick_db::queries::{part, part_filter, part_preset, preset_filter, species, version};
use sidekick_types::{FilterCombineType, FilterType, PartGroup, CATALOG_VERSION};

use super::Result;

/// Report a freshly opened catalog, optionally writing a new version stamp.
pub fn init(conn: &Connection, path: &Path, stamp: Option<&str>) -> Result {
    let stamp = match (stamp, version::get(conn)?) {
        (Some(new), _) => version::stamp(conn, new)?,
        (None, Some(existing)) => existing,
        (None, None) => version::stamp(conn, CATALOG_VERSION)?,
    };
    Ok(serde_json::json!({
        "path": path.display().to_string(),
        "version": stamp,
    }))
}

pub fn species(conn: &Connection, all: bool) -> Result {
    Ok(serde_json::to_value(species::list_with_parts(conn, !all)?)?)
}

/// Parts of one species, or of every species. Without `all` only parts
/// whose file was last seen on disk are listed.
pub fn parts(conn: &Connection, species_name: Option<&str>, all: bool) -> Result {
    let parts = match species_name {
        Some(name) => {
            let species = species::get_by_name(conn, name)?
                .with_context(|| format!("no species named {name}"))?;
            part::list_for_species(conn, species.id, !all)?
        }
        None => part::list(conn)?
            .into_iter()
            .filter(|p| all || p.file_exists)
            .collect(),
    };
    Ok(serde_json::to_value(parts)?)
}

pub fn presets(conn: &Connection, group: PartGroup, all: bool) -> Result {
    Ok(serde_json::to_value(part_preset::list_by_group(conn, group, !all)?)?)
}

pub fn filters(conn: &Connection, all: bool) -> Result {
    Ok(serde_json::json!({
        "part_filters": part_filter::list(conn)?,
        "preset_filters": preset_filter::list(conn, !all)?,
    }))
}

/// Part names of a species selected by combining filters, per part type.
/// Types with nothing selected are left out.
pub fn browse(
    conn: &Connection,
    species_name: &str,
    terms: &[String],
    combine: FilterCombineType,
) -> Result {
    let species = species::get_by_name(conn, species_name)?
        .with_context(|| format!("no species named {species_name}"))?;
    let mut group = FilterGroup::new(combine);
    for term in terms {
        let filter = match part_filter::get_by_term_and_type(conn, term, FilterType::Outfit)? {
            Some(filter) => filter,
            None => part_filter::get_by_term_and_type(conn, term, FilterType::Species)?
                .with_context(|| format!("no part filter named {term}"))?,
        };
        group.add_filter(filter, combine);
    }

    let mut names = group.part_names(conn, species.id)?;
    names.retain(|_, set| !set.is_empty());
    Ok(serde_json::to_value(names)?)
}

pub fn version(conn: &Connection) -> Result {
    Ok(serde_json::json!({
        "tool": env!("CARGO_PKG_VERSION"),
        "schema": sidekick_db::SCHEMA_VERSION,
        "catalog": version::get(conn)?,
    }))
}
