//! What to build: part, body shape and color selections.

use rusqlite::Connection;
use sidekick_db::queries::{color_property, color_set};
use sidekick_types::character::SerializedCharacter;
use sidekick_types::{ColorRow, NO_ID};

use crate::{ComposeError, Result};

/// One entry of a character's part list.
#[derive(Clone, Debug, PartialEq)]
pub enum PartSelection {
    Part(i64),
    /// Every row of a part preset.
    Preset(i64),
    /// Resolved like a preset row imported by name.
    Named(String),
}

/// Body sliders, either stored or given directly.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyShapeInput {
    Preset(i64),
    /// Each value in `[-1, 1]`; values outside are clamped.
    Sliders {
        body_type: f32,
        body_size: f32,
        musculature: f32,
    },
}

impl Default for BodyShapeInput {
    fn default() -> Self {
        Self::Sliders {
            body_type: 0.0,
            body_size: 0.0,
            musculature: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ColorSelection {
    Preset(i64),
    Set(i64),
    Rows(Vec<ColorRow>),
}

/// A full description of a character to compose.
///
/// Selections apply in order: a later part replaces an earlier one in the
/// same slot and later colors overwrite earlier texels.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterRequest {
    pub output_name: String,
    /// `NO_ID` to take the species of the first composed part.
    pub species_id: i64,
    pub parts: Vec<PartSelection>,
    pub body_shape: BodyShapeInput,
    pub colors: Vec<ColorSelection>,
}

impl CharacterRequest {
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            species_id: NO_ID,
            parts: Vec::new(),
            body_shape: BodyShapeInput::default(),
            colors: Vec::new(),
        }
    }

    pub fn with_part(mut self, selection: PartSelection) -> Self {
        self.parts.push(selection);
        self
    }

    pub fn with_body_shape(mut self, body_shape: BodyShapeInput) -> Self {
        self.body_shape = body_shape;
        self
    }

    pub fn with_colors(mut self, selection: ColorSelection) -> Self {
        self.colors.push(selection);
        self
    }

    /// Build a request from a saved character document.
    ///
    /// Parts are selected by name. A color set is used when one with the
    /// saved name exists; the saved rows are painted over it.
    pub fn from_serialized(conn: &Connection, saved: &SerializedCharacter) -> Result<Self> {
        let mut request = Self::new(saved.name.clone());
        request.species_id = saved.species;

        for part in &saved.parts {
            part.part_type()
                .map_err(|e| ComposeError::InvalidCharacter(format!("part {}: {e}", part.name)))?;
            request.parts.push(PartSelection::Named(part.name.clone()));
        }

        if let Some(saved_set) = &saved.color_set {
            match color_set::get_by_name(conn, &saved_set.name)? {
                Some(set) => request.colors.push(ColorSelection::Set(set.id)),
                None => tracing::debug!(name = %saved_set.name, "Saved color set not in catalog"),
            }
        }

        if !saved.color_rows.is_empty() {
            let mut rows = Vec::with_capacity(saved.color_rows.len());
            for saved_row in &saved.color_rows {
                let mut row = saved_row.to_color_row(NO_ID);
                row.color_property = color_property::get(conn, row.color_property_id)?;
                rows.push(row);
            }
            request.colors.push(ColorSelection::Rows(rows));
        }

        let values = &saved.blend_shapes;
        request.body_shape = BodyShapeInput::Sliders {
            body_type: values.body_type_value / 50.0 - 1.0,
            body_size: values.body_size_value / 100.0,
            musculature: values.muscle_value / 50.0 - 1.0,
        };
        Ok(request)
    }
}
