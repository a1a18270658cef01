//! Species.

use serde::{Deserialize, Serialize};

use crate::NO_ID;

/// A character species, e.g. `Human` with code `HU`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: i64,
    pub name: String,
    /// Two letter code found at the end of part names.
    pub code: String,
}

impl Species {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: NO_ID,
            name: name.into(),
            code: code.into(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.name.eq_ignore_ascii_case(crate::UNRESTRICTED_SPECIES)
    }
}
