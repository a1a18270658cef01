//! Mesh loading seam.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use sidekick_types::Part;

/// A part mesh located on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Mesh {
    /// Location relative to the resources root, without extension.
    pub resource_path: String,
    pub file: PathBuf,
    pub byte_len: u64,
}

/// Loads the mesh behind a part.
///
/// `Ok(None)` means the part has no loadable mesh; the composer records a
/// warning and leaves the slot empty.
pub trait MeshSource {
    fn load(&self, part: &Part) -> io::Result<Option<Mesh>>;
}

/// Reads meshes straight from an asset root on the filesystem.
#[derive(Clone, Debug)]
pub struct FsMeshSource {
    root: PathBuf,
}

impl FsMeshSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MeshSource for FsMeshSource {
    fn load(&self, part: &Part) -> io::Result<Option<Mesh>> {
        let Some(resource_path) = part.resource_path() else {
            return Ok(None);
        };
        let file = self.root.join(&part.location);
        match std::fs::metadata(&file) {
            Ok(meta) if meta.is_file() => Ok(Some(Mesh {
                resource_path,
                file,
                byte_len: meta.len(),
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
