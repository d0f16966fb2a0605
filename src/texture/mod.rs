//! Texture reference resolution.
//!
//! The decoder hands texture names to a [`TextureLookup`] and records
//! whatever path comes back. Lookup misses are non-fatal: geometry decodes
//! fine without its textures, so the reference is kept with an empty path.

pub mod container;
pub mod lookup;

pub use container::decompress_container;
pub use lookup::{DirectoryLookup, TextureLookup};

use crate::error::{Error, Result};

/// Resolve a texture name to a usable file path, or an empty string when
/// nothing matches.
///
/// A hit that already carries a `.pvr`/`.ktx` extension is used directly.
/// Anything else is assumed to be an un-stripped container and run through
/// [`decompress_container`]; a container with an unrecognized magic is
/// renamed to its extension-stripped path and used as-is.
pub(crate) fn resolve_texture(name: &str, lookup: &dyn TextureLookup) -> Result<String> {
    let Some(found) = lookup.find(name) else {
        tracing::debug!(texture = name, "no matching texture file");
        return Ok(String::new());
    };

    let ext = found
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if matches!(ext.as_deref(), Some("pvr" | "ktx")) {
        return Ok(found.to_string_lossy().into_owned());
    }

    match decompress_container(&found) {
        Ok(out) => Ok(out.to_string_lossy().into_owned()),
        Err(Error::UnrecognizedContainer { magic, .. }) => {
            tracing::warn!(
                texture = name,
                magic = format!("{magic:#010x}"),
                "unrecognized texture container, renaming as-is"
            );
            let stripped = found.with_extension("");
            std::fs::rename(&found, &stripped)?;
            Ok(stripped.to_string_lossy().into_owned())
        }
        Err(e) => Err(e),
    }
}
