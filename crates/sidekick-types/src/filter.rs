//! Browse filters over parts and presets.

use serde::{Deserialize, Serialize};

use crate::enums::FilterType;
use crate::part::{Part, PartPreset};
use crate::NO_ID;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartFilter {
    pub id: i64,
    pub filter_type: FilterType,
    pub term: String,
}

impl PartFilter {
    pub fn new(filter_type: FilterType, term: impl Into<String>) -> Self {
        Self {
            id: NO_ID,
            filter_type,
            term: term.into(),
        }
    }
}

/// Membership of a part in a part filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartFilterRow {
    pub id: i64,
    pub filter_id: i64,
    pub part_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<Part>,
}

impl PartFilterRow {
    pub fn new(filter_id: i64, part_id: i64) -> Self {
        Self {
            id: NO_ID,
            filter_id,
            part_id,
            part: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetFilter {
    pub id: i64,
    pub term: String,
}

impl PresetFilter {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            id: NO_ID,
            term: term.into(),
        }
    }
}

/// Membership of a part preset in a preset filter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetFilterRow {
    pub id: i64,
    pub filter_id: i64,
    pub preset_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<PartPreset>,
}

impl PresetFilterRow {
    pub fn new(filter_id: i64, preset_id: i64) -> Self {
        Self {
            id: NO_ID,
            filter_id,
            preset_id,
            preset: None,
        }
    }
}
