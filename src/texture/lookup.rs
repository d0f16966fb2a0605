//! Texture file lookup.
//!
//! PIG files reference textures by name only; finding the matching file on
//! disk is a policy concern kept behind [`TextureLookup`] so it can be
//! replaced (with an index, a pre-built map in tests, and so on) without
//! touching the decoder.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Maps a texture name from the file to at most one candidate path.
pub trait TextureLookup {
    /// Return the best candidate file for `name`, or `None`.
    fn find(&self, name: &str) -> Option<PathBuf>;
}

/// Recursive filesystem lookup under a base directory.
///
/// Tries, in order: the name's stem with a `.pvr` extension, the stem with
/// `.ktx`, then the exact name as stored in the file. Each candidate is
/// searched recursively under the base directory first and its parent
/// directory as a fallback. Comparisons ignore ASCII case (the source data
/// comes from a case-insensitive filesystem).
pub struct DirectoryLookup {
    base: PathBuf,
}

impl DirectoryLookup {
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn find_in(dir: &Path, file_name: &str) -> Option<PathBuf> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .find(|entry| {
                entry.file_type().is_file()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|n| n.eq_ignore_ascii_case(file_name))
            })
            .map(walkdir::DirEntry::into_path)
    }
}

impl TextureLookup for DirectoryLookup {
    fn find(&self, name: &str) -> Option<PathBuf> {
        let stem = Path::new(name)
            .file_stem()
            .map_or_else(|| name.to_string(), |s| s.to_string_lossy().into_owned());

        let candidates = [format!("{stem}.pvr"), format!("{stem}.ktx"), name.to_string()];
        let parent = self.base.parent();

        for candidate in &candidates {
            if let Some(found) = Self::find_in(&self.base, candidate) {
                return Some(found);
            }
            if let Some(found) = parent.and_then(|p| Self::find_in(p, candidate)) {
                return Some(found);
            }
        }
        None
    }
}
