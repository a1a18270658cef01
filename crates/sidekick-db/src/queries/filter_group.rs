//! Part filter combination.
//!
//! A [`FilterGroup`] folds the parts of several filters, and of nested
//! groups, into one part-name map per [`CharacterPartType`]. Every item in
//! a group shares one combine type, and so does every sub-group.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::Connection;
use sidekick_types::{CharacterPartType, FilterCombineType, PartFilter, BASE_PART_MARKER};

use crate::queries::part_filter_row;
use crate::{enum_column, Result};

/// Part names on disk, keyed by part type. Every part type has an entry.
pub type PartNameMap = BTreeMap<CharacterPartType, BTreeSet<String>>;

/// One filter and how it joins the rest of its group.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterItem {
    pub filter: PartFilter,
    pub combine: FilterCombineType,
}

/// A set of filters and nested groups evaluated against one species.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterGroup {
    /// How this group joins its parent.
    pub combine: FilterCombineType,
    items: Vec<FilterItem>,
    sub_groups: Vec<FilterGroup>,
}

impl FilterGroup {
    pub fn new(combine: FilterCombineType) -> Self {
        Self {
            combine,
            items: Vec::new(),
            sub_groups: Vec::new(),
        }
    }

    pub fn items(&self) -> &[FilterItem] {
        &self.items
    }

    pub fn sub_groups(&self) -> &[FilterGroup] {
        &self.sub_groups
    }

    /// Add a filter. Refused when it does not share the combine type of the
    /// filters already in the group.
    pub fn add_filter(&mut self, filter: PartFilter, combine: FilterCombineType) -> bool {
        if self.items.first().is_some_and(|first| first.combine != combine) {
            tracing::warn!(filter = %filter.term, ?combine, "Filter combine type differs from group");
            return false;
        }
        self.items.push(FilterItem { filter, combine });
        true
    }

    /// Remove every item for the filter with `filter_id`.
    pub fn remove_filter(&mut self, filter_id: i64) {
        self.items.retain(|item| item.filter.id != filter_id);
    }

    /// Nest a group. Refused when its combine type differs from the
    /// sub-groups already present.
    pub fn add_sub_group(&mut self, group: FilterGroup) -> bool {
        if self.sub_groups.first().is_some_and(|first| first.combine != group.combine) {
            tracing::warn!(combine = ?group.combine, "Sub-group combine type differs from siblings");
            return false;
        }
        self.sub_groups.push(group);
        true
    }

    /// Part names this group selects for a species.
    ///
    /// Without filters the species' base parts are selected. Several `Or`
    /// filters start from nothing; `And` and `Not` start from every part on
    /// disk.
    pub fn part_names(&self, conn: &Connection, species_id: i64) -> Result<PartNameMap> {
        let mut selected = match self.items.as_slice() {
            [] => base_part_names(conn, species_id)?,
            [only] => filter_part_names(conn, &only.filter, species_id)?,
            [first, ..] => {
                let mut folded = match first.combine {
                    FilterCombineType::Or => empty_map(),
                    FilterCombineType::And | FilterCombineType::Not => all_part_names(conn)?,
                };
                for item in &self.items {
                    let names = filter_part_names(conn, &item.filter, species_id)?;
                    fold(&mut folded, names, first.combine);
                }
                folded
            }
        };

        for group in &self.sub_groups {
            let names = group.part_names(conn, species_id)?;
            fold(&mut selected, names, group.combine);
        }
        Ok(selected)
    }
}

fn empty_map() -> PartNameMap {
    CharacterPartType::all().map(|t| (t, BTreeSet::new())).collect()
}

fn fold(into: &mut PartNameMap, from: PartNameMap, combine: FilterCombineType) {
    for (part_type, names) in from {
        let current = into.entry(part_type).or_default();
        match combine {
            FilterCombineType::And => current.retain(|name| names.contains(name)),
            FilterCombineType::Or => current.extend(names),
            FilterCombineType::Not => current.retain(|name| !names.contains(name)),
        }
    }
}

/// Parts of one filter usable by a species, per type.
pub fn filter_part_names(
    conn: &Connection,
    filter: &PartFilter,
    species_id: i64,
) -> Result<PartNameMap> {
    let mut names = empty_map();
    for (part_type, set) in names.iter_mut() {
        set.extend(part_filter_row::part_names_for_filter_species_and_type(
            conn, filter.id, species_id, *part_type,
        )?);
    }
    Ok(names)
}

/// Base parts of a species found on disk, per type.
pub fn base_part_names(conn: &Connection, species_id: i64) -> Result<PartNameMap> {
    collect_names(
        conn,
        "SELECT type, name FROM sk_part
         WHERE file_exists = 1 AND ptr_species = ?1 AND instr(name, ?2) > 0",
        rusqlite::params![species_id, BASE_PART_MARKER],
    )
}

/// Every part found on disk, per type.
pub fn all_part_names(conn: &Connection) -> Result<PartNameMap> {
    collect_names(conn, "SELECT type, name FROM sk_part WHERE file_exists = 1", [])
}

fn collect_names(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<PartNameMap> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok((enum_column::<CharacterPartType>(row, 0)?, row.get::<_, String>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut names = empty_map();
    for (part_type, name) in rows {
        names.entry(part_type).or_default().insert(name);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{part, part_filter, part_species_link, species};
    use sidekick_types::{FilterType, Part, PartFilterRow, PartSpeciesLink, Species};

    const TORSO: CharacterPartType = CharacterPartType::Torso;

    struct Fixture {
        conn: Connection,
        human: Species,
        viking: PartFilter,
        winter: PartFilter,
    }

    fn add_part(conn: &Connection, human: &Species, name: &str, filters: &[&PartFilter]) {
        let mut p = Part::new(human.id, TORSO, name, format!("{name}.fbx"), "");
        p.file_exists = true;
        part::save(conn, &mut p).expect("part");
        part_species_link::save(conn, &mut PartSpeciesLink::new(human.id, p.id)).expect("link");
        for f in filters {
            part_filter_row::save(conn, &mut PartFilterRow::new(f.id, p.id)).expect("row");
        }
    }

    // Viking: A, B. Winter: B, C. Neither: D. Base: SK_HUMN_BASE_01.
    fn fixture() -> Fixture {
        let conn = crate::open_memory().expect("open test db");
        let mut human = Species::new("Human", "HU");
        species::save(&conn, &mut human).expect("species");
        let mut viking = PartFilter::new(FilterType::Outfit, "Viking");
        let mut winter = PartFilter::new(FilterType::Outfit, "Winter");
        part_filter::save(&conn, &mut viking).expect("filter");
        part_filter::save(&conn, &mut winter).expect("filter");

        add_part(&conn, &human, "SK_A", &[&viking]);
        add_part(&conn, &human, "SK_B", &[&viking, &winter]);
        add_part(&conn, &human, "SK_C", &[&winter]);
        add_part(&conn, &human, "SK_D", &[]);
        add_part(&conn, &human, "SK_HUMN_BASE_01", &[]);
        Fixture {
            conn,
            human,
            viking,
            winter,
        }
    }

    fn torso_names(f: &Fixture, group: &FilterGroup) -> Vec<String> {
        let names = group.part_names(&f.conn, f.human.id).expect("names");
        assert_eq!(names.len(), CharacterPartType::all().count());
        names[&TORSO].iter().cloned().collect()
    }

    #[test]
    fn test_empty_group_selects_base_parts() {
        let f = fixture();
        let group = FilterGroup::new(FilterCombineType::And);
        assert_eq!(torso_names(&f, &group), vec!["SK_HUMN_BASE_01"]);
    }

    #[test]
    fn test_single_filter() {
        let f = fixture();
        let mut group = FilterGroup::new(FilterCombineType::And);
        assert!(group.add_filter(f.winter.clone(), FilterCombineType::Not));
        assert_eq!(torso_names(&f, &group), vec!["SK_B", "SK_C"]);
    }

    #[test]
    fn test_and_keeps_shared_parts() {
        let f = fixture();
        let mut group = FilterGroup::new(FilterCombineType::And);
        assert!(group.add_filter(f.viking.clone(), FilterCombineType::And));
        assert!(group.add_filter(f.winter.clone(), FilterCombineType::And));
        assert_eq!(torso_names(&f, &group), vec!["SK_B"]);
    }

    #[test]
    fn test_or_unites_parts() {
        let f = fixture();
        let mut group = FilterGroup::new(FilterCombineType::And);
        assert!(group.add_filter(f.viking.clone(), FilterCombineType::Or));
        assert!(group.add_filter(f.winter.clone(), FilterCombineType::Or));
        assert_eq!(torso_names(&f, &group), vec!["SK_A", "SK_B", "SK_C"]);
    }

    #[test]
    fn test_not_removes_filtered_parts() {
        let f = fixture();
        let mut group = FilterGroup::new(FilterCombineType::And);
        assert!(group.add_filter(f.viking.clone(), FilterCombineType::Not));
        assert!(group.add_filter(f.winter.clone(), FilterCombineType::Not));
        assert_eq!(torso_names(&f, &group), vec!["SK_D", "SK_HUMN_BASE_01"]);
    }

    #[test]
    fn test_mixed_combine_types_refused() {
        let f = fixture();
        let mut group = FilterGroup::new(FilterCombineType::And);
        assert!(group.add_filter(f.viking.clone(), FilterCombineType::Or));
        assert!(!group.add_filter(f.winter.clone(), FilterCombineType::And));
        assert_eq!(group.items().len(), 1);

        assert!(group.add_sub_group(FilterGroup::new(FilterCombineType::Not)));
        assert!(!group.add_sub_group(FilterGroup::new(FilterCombineType::Or)));
        assert_eq!(group.sub_groups().len(), 1);

        group.remove_filter(f.viking.id);
        assert!(group.items().is_empty());
    }

    #[test]
    fn test_sub_groups_fold_with_their_own_combine_type() {
        let f = fixture();

        let mut without_winter = FilterGroup::new(FilterCombineType::Not);
        without_winter.add_filter(f.winter.clone(), FilterCombineType::And);
        let mut group = FilterGroup::new(FilterCombineType::And);
        group.add_filter(f.viking.clone(), FilterCombineType::And);
        group.add_sub_group(without_winter);
        assert_eq!(torso_names(&f, &group), vec!["SK_A"]);

        let mut with_winter = FilterGroup::new(FilterCombineType::And);
        with_winter.add_filter(f.winter.clone(), FilterCombineType::And);
        let mut group = FilterGroup::new(FilterCombineType::And);
        group.add_filter(f.viking.clone(), FilterCombineType::And);
        group.add_sub_group(with_winter);
        assert_eq!(torso_names(&f, &group), vec!["SK_B"]);

        let mut or_winter = FilterGroup::new(FilterCombineType::Or);
        or_winter.add_filter(f.winter.clone(), FilterCombineType::And);
        let mut group = FilterGroup::new(FilterCombineType::And);
        group.add_filter(f.viking.clone(), FilterCombineType::And);
        group.add_sub_group(or_winter);
        assert_eq!(torso_names(&f, &group), vec!["SK_A", "SK_B", "SK_C"]);
    }
}
