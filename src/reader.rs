//! Low-level cursor over PIG file data.
//!
//! `PigReader` wraps an in-memory byte buffer with position tracking,
//! little-endian primitive reads, length-prefixed UTF-8 strings, and the
//! marker protocol used at structural boundaries. Reads past the end of the
//! buffer fail with [`Error::TruncatedData`]; seeks may land anywhere,
//! including past the end (the format seeks over declared-but-unused
//! regions), and only a subsequent read fails.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

/// The two known marker conventions across PIG format revisions.
///
/// Revision 1 files write sentinel `100` before structural records,
/// revision 2 files write `64`. Everything else about the layout is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PigRevision {
    /// Sentinel 100.
    V1,
    /// Sentinel 64.
    V2,
}

impl PigRevision {
    /// The marker sentinel this revision writes before structural records.
    #[must_use]
    pub const fn marker(self) -> i32 {
        match self {
            Self::V1 => 100,
            Self::V2 => 64,
        }
    }

    /// Detect the revision by trial-matching the file's first marker word
    /// (the node-count marker) against both sentinels.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] if the buffer holds fewer than four
    /// bytes, or [`Error::UnknownRevision`] if neither sentinel matches.
    pub fn detect(data: &[u8]) -> Result<Self> {
        let word: [u8; 4] = data
            .get(0..4)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::TruncatedData { offset: 0 })?;
        match i32::from_le_bytes(word) {
            100 => Ok(Self::V1),
            64 => Ok(Self::V2),
            received => Err(Error::UnknownRevision { received }),
        }
    }
}

/// Position-tracked reader over an in-memory PIG buffer.
pub struct PigReader<'a> {
    cursor: Cursor<&'a [u8]>,
    revision: PigRevision,
}

impl<'a> PigReader<'a> {
    /// Create a reader over `data` using the given marker convention.
    #[must_use]
    pub fn new(data: &'a [u8], revision: PigRevision) -> Self {
        Self {
            cursor: Cursor::new(data),
            revision,
        }
    }

    /// The marker convention this reader checks against.
    #[must_use]
    pub fn revision(&self) -> PigRevision {
        self.revision
    }

    /// Current cursor position in bytes.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Move to an absolute position. May land beyond the end of the buffer;
    /// only a subsequent read fails.
    pub fn seek(&mut self, position: u64) {
        self.cursor.set_position(position);
    }

    /// Move relative to the current position.
    pub fn skip(&mut self, delta: i64) {
        let pos = self.cursor.position() as i64 + delta;
        self.cursor.set_position(pos.max(0) as u64);
    }

    fn truncated(&self) -> Error {
        Error::TruncatedData {
            offset: self.cursor.position(),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(|_| self.truncated())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.cursor.read_i8().map_err(|_| self.truncated())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| self.truncated())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.cursor
            .read_i16::<LittleEndian>()
            .map_err(|_| self.truncated())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| self.truncated())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| self.truncated())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.cursor
            .read_f32::<LittleEndian>()
            .map_err(|_| self.truncated())
    }

    /// Borrow `count` bytes from the buffer and advance past them.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let end = start.checked_add(count).ok_or_else(|| self.truncated())?;
        let bytes = data.get(start..end).ok_or_else(|| self.truncated())?;
        self.cursor.set_position(end as u64);
        Ok(bytes)
    }

    /// Read a length-prefixed UTF-8 string: a 16-bit length followed by that
    /// many bytes, no terminator.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Peek the 16-bit value `ahead` bytes past the current position without
    /// moving the cursor. Used by the quantized-vs-float layout heuristic.
    pub fn peek_i16_ahead(&self, ahead: u64) -> Result<i16> {
        let start = (self.cursor.position() + ahead) as usize;
        let bytes: [u8; 2] = self
            .cursor
            .get_ref()
            .get(start..start + 2)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::TruncatedData {
                offset: start as u64,
            })?;
        Ok(i16::from_le_bytes(bytes))
    }

    /// Read a structural marker and check it against the revision sentinel.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMarker`] on mismatch, carrying the offset of
    /// the marker word.
    pub fn read_marker(&mut self) -> Result<()> {
        let offset = self.cursor.position();
        let received = self.read_i32()?;
        let expected = self.revision.marker();
        if received == expected {
            Ok(())
        } else {
            Err(Error::InvalidMarker {
                expected,
                received,
                offset,
            })
        }
    }
}
