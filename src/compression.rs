//! Compression utilities
//!
//! PIG files store mesh geometry buffers and PVR mip levels as independent
//! LZ4 blocks, each declared as a `(compressed size, uncompressed size)`
//! pair followed by the compressed bytes.

use crate::error::{Error, Result};
use crate::reader::PigReader;

/// Compress data as a single LZ4 block.
#[must_use]
pub fn compress_block(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress(data)
}

/// Decompress a single LZ4 block to exactly `uncompressed_len` bytes.
///
/// `offset` is the position of the compressed span in the containing
/// stream, carried into the error for diagnostics.
///
/// # Errors
/// Returns [`Error::CorruptBlock`] if the codec fails or produces a
/// different number of bytes than declared.
pub fn decompress_block(data: &[u8], uncompressed_len: usize, offset: u64) -> Result<Vec<u8>> {
    let out = lz4_flex::decompress(data, uncompressed_len).map_err(|e| Error::CorruptBlock {
        offset,
        expected: uncompressed_len,
        message: e.to_string(),
    })?;
    if out.len() == uncompressed_len {
        Ok(out)
    } else {
        Err(Error::CorruptBlock {
            offset,
            expected: uncompressed_len,
            message: format!("decompressed to {} bytes", out.len()),
        })
    }
}

/// Read a compressed-block size header: compressed size then uncompressed
/// size, both 32-bit.
///
/// Some files pad or misalign the header so the compressed-size field
/// decodes as zero or negative. Recovery path: walk forward from the end of
/// the bogus field over the run of zero bytes, step back one byte, and
/// re-read both sizes from there.
pub fn read_block_sizes(reader: &mut PigReader<'_>) -> Result<(usize, usize)> {
    let mut compressed = reader.read_i32()?;
    if compressed <= 0 {
        tracing::warn!(
            offset = reader.position(),
            declared = compressed,
            "non-positive compressed size, resynchronizing block header"
        );
        while reader.read_u8()? == 0 {}
        reader.skip(-1);
        compressed = reader.read_i32()?;
    }
    let uncompressed = reader.read_i32()?;
    Ok((compressed.max(0) as usize, uncompressed.max(0) as usize))
}
