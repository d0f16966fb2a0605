//! PIG model decoding.
//!
//! A PIG file is a flat scene-graph node list followed by a sequence of
//! renderable objects. Decoding is all-or-nothing: any truncated read or
//! marker mismatch aborts the whole model, since downstream consumers need
//! structurally complete index/vertex data.

pub mod inspect;

mod geometry;
mod nodes;
mod object;
mod types;

pub use geometry::{
    FVF_COLOR, FVF_NORMAL, FVF_POSITION, FVF_TANGENT, FVF_TEXTURE0, FVF_TEXTURE1, FVF_UNKNOWN3,
    FVF_UNKNOWN4, FVF_UNKNOWN5, FVF_UNKNOWN9, FVF_UNKNOWN10,
};
pub use types::{PigMaterial, PigMesh, PigModel, PigNode, PigObject, PigTexture};

use std::path::Path;

use crate::error::Result;
use crate::reader::{PigReader, PigRevision};
use crate::texture::{DirectoryLookup, TextureLookup};

impl PigModel {
    /// Decode a PIG file from disk.
    ///
    /// The format revision is auto-detected and textures are looked up with
    /// a [`DirectoryLookup`] rooted at the file's parent directory.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or has an invalid
    /// format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let lookup = DirectoryLookup::new(base);
        Self::from_bytes(&data, &lookup)
    }

    /// Decode a PIG model from memory, auto-detecting the format revision
    /// from the first marker word.
    ///
    /// # Errors
    /// Returns an error if the data has an invalid PIG format.
    pub fn from_bytes(data: &[u8], lookup: &dyn TextureLookup) -> Result<Self> {
        let revision = PigRevision::detect(data)?;
        Self::from_bytes_with_revision(data, revision, lookup)
    }

    /// Decode a PIG model from memory with an explicit format revision.
    ///
    /// # Errors
    /// Returns an error if the data has an invalid PIG format.
    pub fn from_bytes_with_revision(
        data: &[u8],
        revision: PigRevision,
        lookup: &dyn TextureLookup,
    ) -> Result<Self> {
        let mut reader = PigReader::new(data, revision);

        let nodes = nodes::read_nodes(&mut reader)?;
        let _reserved = reader.read_u8()?;
        let object_count = reader.read_i16()?.max(0) as usize;
        tracing::debug!(
            ?revision,
            nodes = nodes.len(),
            objects = object_count,
            "decoding PIG model"
        );

        let mut objects = Vec::with_capacity(object_count);
        for index in 0..object_count {
            objects.push(object::read_object(&mut reader, index, lookup)?);
        }

        Ok(Self { nodes, objects })
    }
}
