//! Error types for `piglib`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `piglib` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error (length-prefixed strings).
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// JSON serialization error (model inspection dumps).
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== PIG Decode Errors ====================
    /// A read ran past the end of the available data.
    #[error("truncated data: read past end of buffer at offset {offset}")]
    TruncatedData {
        /// Cursor position when the read failed.
        offset: u64,
    },

    /// A structural marker did not match the sentinel for the format revision.
    #[error("invalid marker at offset {offset}: expected {expected}, received {received}")]
    InvalidMarker {
        /// The sentinel value the revision requires.
        expected: i32,
        /// The value actually read.
        received: i32,
        /// Offset of the marker word in the stream.
        offset: u64,
    },

    /// The first marker word matched neither known revision sentinel.
    #[error("unknown format revision: first marker word is {received}")]
    UnknownRevision {
        /// The value found where the node-count marker should be.
        received: i32,
    },

    /// A compressed block failed to decompress to its declared length.
    #[error("corrupt block at offset {offset}: expected {expected} bytes: {message}")]
    CorruptBlock {
        /// Offset of the compressed span in the stream.
        offset: u64,
        /// The declared uncompressed length.
        expected: usize,
        /// The underlying codec error.
        message: String,
    },

    /// Decode failure inside a specific mesh, with its location in the model.
    #[error("object {object}, LOD {lod}, mesh {mesh}: {source}")]
    MeshDecode {
        /// Index of the object being decoded.
        object: usize,
        /// LOD number the mesh belongs to.
        lod: u8,
        /// Index of the mesh within the LOD.
        mesh: usize,
        /// The underlying decode error.
        source: Box<Error>,
    },

    // ==================== Texture Container Errors ====================
    /// The texture container magic was not recognized.
    ///
    /// Non-fatal during model decode: the file is renamed as-is and the
    /// stripped path recorded. Surfaced only when the decompressor is
    /// invoked directly.
    #[error("unrecognized texture container magic {magic:#010x} in {path}")]
    UnrecognizedContainer {
        /// The first four bytes of the file as a little-endian word.
        magic: u32,
        /// The container file path.
        path: PathBuf,
    },

    /// The texture container is too small to hold its declared header.
    #[error("texture container too small: {path}")]
    ContainerTooSmall {
        /// The container file path.
        path: PathBuf,
    },
}

/// A specialized Result type for `piglib` operations.
pub type Result<T> = std::result::Result<T, Error>;
