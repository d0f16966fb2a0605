//! # piglib
//!
//! A pure-Rust library for decoding PIG packed 3D model containers.
//!
//! A PIG file holds a scene graph (flat node list with transforms) plus one
//! or more renderable objects, each carrying level-of-detail mesh groups,
//! materials, and texture references. The layout is reverse-engineered:
//! vertex attribute channels are declared by an FVF bitmask, component
//! widths are detected heuristically (quantized 16-bit vs. 32-bit float),
//! and geometry buffers may be stored as LZ4 blocks. Referenced textures
//! living in PVR/KTX containers with LZ4-compressed mip chains can be
//! decompressed to usable files on the side.
//!
//! ## Quick Start
//!
//! ```no_run
//! use piglib::model::PigModel;
//!
//! // Decode a PIG file, resolving textures next to it
//! let model = PigModel::from_file("car_ford_mustang_2015.pig")?;
//! println!("{} objects", model.objects.len());
//!
//! // Summarize the contents
//! let info = piglib::model::inspect::inspect_model(&model);
//! println!("{}", info.describe());
//! # Ok::<(), piglib::Error>(())
//! ```
//!
//! ## Using the Prelude
//!
//! ```
//! use piglib::prelude::*;
//! // PigModel, PigRevision, TextureLookup, Error, Result, and more
//! ```

pub mod compression;
pub mod error;
pub mod model;
pub mod reader;
pub mod texture;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::model::inspect::{ModelInfo, inspect_model};
    pub use crate::model::{
        PigMaterial, PigMesh, PigModel, PigNode, PigObject, PigTexture,
    };
    pub use crate::reader::{PigReader, PigRevision};
    pub use crate::texture::{DirectoryLookup, TextureLookup, decompress_container};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
