//! # sidekick-types
//!
//! Shared domain types for the Sidekick character catalog.
//!
//! Every entity here is plain data. Relationships are stored as numeric ids
//! (`species_id`, `part_id`, ...) next to an optional, explicitly hydrated copy
//! of the related entity. Nothing in this crate holds a database handle.
//!
//! Identifiers are `i64` values assigned by the store on first insert; any
//! value `<= 0` means "not yet persisted".

pub mod body;
pub mod character;
pub mod color;
pub mod enums;
pub mod filter;
pub mod image;
pub mod naming;
pub mod part;
pub mod species;

pub use body::{BlendShapeRigMovement, BodyShapePreset};
pub use color::{
    Color, ColorChannel, ColorChannels, ColorPreset, ColorPresetRow, ColorProperty, ColorRow,
    ColorSet, HexColor, TexturePaths,
};
pub use enums::{
    BlendShapeType, CharacterPartType, ColorGroup, FilterCombineType, FilterType, PartGroup,
};
pub use filter::{PartFilter, PartFilterRow, PresetFilter, PresetFilterRow};
pub use image::{ImageKind, Thumbnail};
pub use part::{Part, PartPreset, PartPresetRow, PartSpeciesLink};
pub use species::Species;

/// Id carried by entities that have never been saved.
pub const NO_ID: i64 = -1;

/// Semantic version stamped into a freshly created catalog.
pub const CATALOG_VERSION: &str = "1.0.2";

/// Marker found in the name of every base species part.
pub const BASE_PART_MARKER: &str = "_BASE_";

/// Species that is listed even when it owns no parts.
pub const UNRESTRICTED_SPECIES: &str = "Unrestricted";

/// Name of the global default color set.
pub const DEFAULT_COLOR_SET_NAME: &str = "Default";

/// Returns true when `id` was assigned by the store.
pub fn is_persisted(id: i64) -> bool {
    id > 0
}

/// Errors raised when decoding persisted values into typed ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("invalid {kind} value: {value}")]
    InvalidDiscriminant { kind: &'static str, value: i64 },

    #[error("invalid part type shortcode: {0}")]
    InvalidShortcode(String),

    #[error("{field} out of range [{min}, {max}]: {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
