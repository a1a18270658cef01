//! # sidekick-compose
//!
//! Builds characters out of catalog entries: picks one part per slot, loads
//! meshes, derives joint adjustments and blend shape weights from the body
//! sliders and paints the color atlas.
//!
//! Missing files and unknown rows never fail a composition; they are
//! reported as [`CompositionWarning`]s on the result. Only references the
//! caller named explicitly (a preset id, a body shape id) are hard errors.

pub mod atlas;
pub mod composer;
pub mod mesh;
pub mod request;
pub mod session;

pub use atlas::{ColorAtlas, DEFAULT_ATLAS_SIZE};
pub use composer::{Character, ComposeOptions, ComposedPart, Composer, CompositionWarning};
pub use mesh::{FsMeshSource, Mesh, MeshSource};
pub use request::{BodyShapeInput, CharacterRequest, ColorSelection, PartSelection};
pub use session::Session;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Db(#[from] sidekick_db::DbError),

    #[error("{kind} {id} does not exist")]
    UnknownPreset { kind: &'static str, id: i64 },

    #[error("body shape preset {0} does not exist")]
    UnknownBodyShape(i64),

    #[error("invalid character: {0}")]
    InvalidCharacter(String),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
