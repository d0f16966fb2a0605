//! PVR/KTX texture container decompression.
//!
//! Referenced textures ship inside a container file recognized by its
//! 4-byte magic. KTX containers are stored plain and only need their real
//! extension back. PVR v3 containers may carry a metadata descriptor
//! declaring that each mip level is an independently LZ4-compressed block;
//! those are decompressed and reassembled into one contiguous image.

use std::fs;
use std::path::{Path, PathBuf};

use crate::compression::decompress_block;
use crate::error::{Error, Result};

const KTX_MAGIC: u32 = u32::from_le_bytes([0xAB, b'K', b'T', b'X']);
const PVR3_MAGIC: u32 = u32::from_le_bytes(*b"PVR\x03");

/// Metadata fourcc pair declaring LZ4-compressed mip blocks.
const META_FOURCC_JET: u32 = u32::from_le_bytes(*b"\0JET");
const META_FOURCC_LZ4: u32 = u32::from_le_bytes(*b"\0LZ4");

/// PVR v3 header is 52 bytes; mip count and metadata size sit at its tail.
const PVR3_HEADER_LEN: usize = 52;
const PVR3_MIP_COUNT_OFFSET: usize = 44;

struct MipBlock {
    offset: usize,
    compressed_len: usize,
    uncompressed_len: usize,
}

fn read_i32_at(data: &[u8], path: &Path, offset: usize) -> Result<i32> {
    data.get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .map(i32::from_le_bytes)
        .ok_or_else(|| Error::ContainerTooSmall {
            path: path.to_path_buf(),
        })
}

fn read_u32_at(data: &[u8], path: &Path, offset: usize) -> Result<u32> {
    read_i32_at(data, path, offset).map(|v| v as u32)
}

/// The source path with its extension stripped and `ext` appended.
fn stripped_with_ext(path: &Path, ext: &str) -> PathBuf {
    let mut out = path.with_extension("").into_os_string();
    out.push(".");
    out.push(ext);
    PathBuf::from(out)
}

/// Decompress (or just re-extend) a texture container file.
///
/// Recognized kinds:
/// - **KTX**: renamed to the stripped path with `.ktx` appended, unchanged.
/// - **PVR v3**: if its metadata declares LZ4-compressed mips, every mip is
///   decompressed and the reassembled image written to the stripped path
///   with `.pvr` appended (the source file is left in place); otherwise the
///   file is renamed to that path unchanged.
///
/// Returns the path of the usable texture file.
///
/// # Errors
/// [`Error::UnrecognizedContainer`] if the magic matches neither kind (the
/// file is left untouched), [`Error::ContainerTooSmall`] or
/// [`Error::CorruptBlock`] on malformed compressed containers.
pub fn decompress_container(path: &Path) -> Result<PathBuf> {
    let data = fs::read(path)?;
    let magic = data
        .get(0..4)
        .and_then(|b| b.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or_else(|| Error::ContainerTooSmall {
            path: path.to_path_buf(),
        })?;

    match magic {
        KTX_MAGIC => {
            let out = stripped_with_ext(path, "ktx");
            fs::rename(path, &out)?;
            Ok(out)
        }
        PVR3_MAGIC => decompress_pvr(path, &data),
        magic => Err(Error::UnrecognizedContainer {
            magic,
            path: path.to_path_buf(),
        }),
    }
}

fn decompress_pvr(path: &Path, data: &[u8]) -> Result<PathBuf> {
    let out = stripped_with_ext(path, "pvr");
    let mip_count = read_i32_at(data, path, PVR3_MIP_COUNT_OFFSET)?.max(0) as usize;
    let meta_size = read_i32_at(data, path, PVR3_MIP_COUNT_OFFSET + 4)?.max(0) as usize;

    if meta_size > 0
        && read_u32_at(data, path, PVR3_HEADER_LEN)? == META_FOURCC_JET
        && read_u32_at(data, path, PVR3_HEADER_LEN + 4)? == META_FOURCC_LZ4
    {
        let _declared_data_len = read_i32_at(data, path, PVR3_HEADER_LEN + 8)?;

        let mut mips = Vec::with_capacity(mip_count);
        let mut image_len = PVR3_HEADER_LEN;
        let table = PVR3_HEADER_LEN + 12;
        for i in 0..mip_count {
            // No surface/face dimensions observed in these files: the table
            // is one (offset, compressed, uncompressed) triple per mip.
            let entry = table + i * 12;
            let mip = MipBlock {
                offset: read_i32_at(data, path, entry)?.max(0) as usize,
                compressed_len: read_i32_at(data, path, entry + 4)?.max(0) as usize,
                uncompressed_len: read_i32_at(data, path, entry + 8)?.max(0) as usize,
            };
            image_len += mip.uncompressed_len;
            mips.push(mip);
        }

        tracing::debug!(
            path = %path.display(),
            mips = mip_count,
            total = image_len,
            "decompressing PVR mip chain"
        );

        // Header carried over verbatim except the metadata-size field,
        // which becomes zero in the output.
        let mut image = vec![0u8; image_len];
        image[..PVR3_HEADER_LEN - 4].copy_from_slice(&data[..PVR3_HEADER_LEN - 4]);

        let mut image_offset = PVR3_HEADER_LEN;
        for mip in &mips {
            let start = PVR3_HEADER_LEN + meta_size + mip.offset;
            let compressed =
                data.get(start..start + mip.compressed_len)
                    .ok_or_else(|| Error::ContainerTooSmall {
                        path: path.to_path_buf(),
                    })?;
            let decompressed = decompress_block(compressed, mip.uncompressed_len, start as u64)?;
            image[image_offset..image_offset + mip.uncompressed_len].copy_from_slice(&decompressed);
            image_offset += mip.uncompressed_len;
        }

        fs::write(&out, &image)?;
        return Ok(out);
    }

    // Not compression-flagged: the container is already usable as-is.
    fs::rename(path, &out)?;
    Ok(out)
}
