//! FVF-driven decode of a mesh geometry buffer.
//!
//! The geometry buffer is a sub-stream of its own: a sequence of vertex
//! attribute channels, one per set FVF bit, each preceded by a 16-bit
//! alignment value (padding to skip before the channel data), followed by
//! the 16-bit index buffer at the very end.
//!
//! The format does not declare component widths. Position and UV channels
//! are stored either as raw 32-bit floats or as signed 16-bit integers
//! quantized to `[-1, 1]`; which one is in use is detected per channel by
//! predicting where the next alignment field would land under the
//! quantized stride and peeking whether the value there matches.

use crate::error::{Error, Result};
use crate::reader::{PigReader, PigRevision};

/// FVF bit: vertex positions, 3 components.
pub const FVF_POSITION: u32 = 1;
/// FVF bit: vertex normals, 3 byte-quantized components.
pub const FVF_NORMAL: u32 = 1 << 1;
/// FVF bit: believed tangent data; 4 bytes per vertex, skipped.
pub const FVF_TANGENT: u32 = 1 << 2;
/// FVF bits 3-5: unknown 4-byte-per-vertex channels, skipped.
pub const FVF_UNKNOWN3: u32 = 1 << 3;
pub const FVF_UNKNOWN4: u32 = 1 << 4;
pub const FVF_UNKNOWN5: u32 = 1 << 5;
/// FVF bit: nominally vertex color; 4 bytes per vertex, skipped.
pub const FVF_COLOR: u32 = 1 << 6;
/// FVF bit: first UV channel, 2 components.
pub const FVF_TEXTURE0: u32 = 1 << 7;
/// FVF bit: second UV channel, 2 components.
pub const FVF_TEXTURE1: u32 = 1 << 8;
/// FVF bit 9: unknown channel, 4 bytes per vertex with a wide variant.
pub const FVF_UNKNOWN9: u32 = 1 << 9;
/// FVF bit 10: unknown channel, 8 bytes per vertex, skipped.
pub const FVF_UNKNOWN10: u32 = 1 << 10;

/// Component width of a position or UV channel, detected per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelLayout {
    /// Signed 16-bit components divided by 32767.
    Quantized16,
    /// Raw little-endian 32-bit floats.
    Float32,
}

/// Decoded attribute arrays and indices of one geometry buffer.
#[derive(Debug, Default)]
pub(crate) struct GeometryBuffers {
    pub vertices: Option<Vec<f32>>,
    pub normals: Option<Vec<f32>>,
    pub texture0: Option<Vec<f32>>,
    pub texture1: Option<Vec<f32>>,
    pub indices: Vec<u16>,
}

/// Where the next alignment field lands after `vertex_count` records of
/// `stride` bytes, as written by the quantized layout.
fn predicted_align(vertex_count: usize, stride: usize) -> i32 {
    16 - ((vertex_count * stride) % 16) as i32 - 2
}

/// Peek past the channel under the quantized stride: if the 16-bit value
/// there matches the predicted alignment, the channel is quantized.
fn detect_layout(geo: &PigReader<'_>, vertex_count: usize, stride: usize) -> ChannelLayout {
    match geo.peek_i16_ahead((vertex_count * stride) as u64) {
        Ok(align) if i32::from(align) == predicted_align(vertex_count, stride) => {
            ChannelLayout::Quantized16
        }
        _ => ChannelLayout::Float32,
    }
}

fn skip_alignment(geo: &mut PigReader<'_>) -> Result<()> {
    let align = geo.read_i16()?;
    geo.skip(i64::from(align));
    Ok(())
}

fn read_positions(geo: &mut PigReader<'_>, vertex_count: usize) -> Result<Vec<f32>> {
    skip_alignment(geo)?;
    let mut out = Vec::with_capacity(vertex_count * 3);
    match detect_layout(geo, vertex_count, 8) {
        ChannelLayout::Quantized16 => {
            for _ in 0..vertex_count {
                for _ in 0..3 {
                    out.push(f32::from(geo.read_i16()?) / 32767.0);
                }
                geo.skip(2); // W component, ignored
            }
        }
        ChannelLayout::Float32 => {
            for _ in 0..vertex_count * 3 {
                out.push(geo.read_f32()?);
            }
        }
    }
    Ok(out)
}

fn read_normals(geo: &mut PigReader<'_>, vertex_count: usize) -> Result<Vec<f32>> {
    skip_alignment(geo)?;
    let mut out = Vec::with_capacity(vertex_count * 3);
    for _ in 0..vertex_count {
        for _ in 0..3 {
            out.push(f32::from(geo.read_i8()?) / 127.0);
        }
        geo.skip(1); // padding byte
    }
    Ok(out)
}

/// Read a two-component UV channel. The V component is stored flipped in
/// texture space and is decoded as `1 - v`.
fn read_uvs(geo: &mut PigReader<'_>, vertex_count: usize) -> Result<Vec<f32>> {
    skip_alignment(geo)?;
    let mut out = Vec::with_capacity(vertex_count * 2);
    match detect_layout(geo, vertex_count, 4) {
        ChannelLayout::Quantized16 => {
            for _ in 0..vertex_count {
                out.push(f32::from(geo.read_i16()?) / 32767.0);
                out.push(1.0 - f32::from(geo.read_i16()?) / 32767.0);
            }
        }
        ChannelLayout::Float32 => {
            for _ in 0..vertex_count {
                out.push(geo.read_f32()?);
                out.push(1.0 - geo.read_f32()?);
            }
        }
    }
    Ok(out)
}

/// Skip a channel of known per-vertex width, content discarded.
fn skip_channel(geo: &mut PigReader<'_>, vertex_count: usize, bytes_per_vertex: usize) -> Result<()> {
    skip_alignment(geo)?;
    geo.skip((vertex_count * bytes_per_vertex) as i64);
    Ok(())
}

/// Skip the bit-9 channel: 4 bytes per vertex, but some files carry a wide
/// variant that takes another 4 bytes per vertex. Detected with the same
/// alignment prediction as the quantized layouts.
fn skip_conditional_channel(geo: &mut PigReader<'_>, vertex_count: usize) -> Result<()> {
    skip_alignment(geo)?;
    geo.skip((vertex_count * 4) as i64);
    if let Ok(next) = geo.peek_i16_ahead(0) {
        if i32::from(next) != predicted_align(vertex_count, 4) {
            geo.skip((vertex_count * 4) as i64);
        }
    }
    Ok(())
}

/// Decode one geometry buffer according to its FVF bitmask.
///
/// Channel decoding can drift on layouts we do not fully know, so the
/// index buffer is not read from the running cursor: it is anchored to
/// `buffer_len - index_count * 2` at the end of the buffer.
pub(crate) fn decode_geometry(
    buffer: &[u8],
    fvf: u32,
    vertex_count: usize,
    index_count: usize,
    revision: PigRevision,
) -> Result<GeometryBuffers> {
    let mut geo = PigReader::new(buffer, revision);
    let mut out = GeometryBuffers::default();

    if fvf & FVF_POSITION != 0 {
        out.vertices = Some(read_positions(&mut geo, vertex_count)?);
    }
    if fvf & FVF_NORMAL != 0 {
        out.normals = Some(read_normals(&mut geo, vertex_count)?);
    }
    for bit in [FVF_TANGENT, FVF_UNKNOWN3, FVF_UNKNOWN4, FVF_UNKNOWN5, FVF_COLOR] {
        if fvf & bit != 0 {
            skip_channel(&mut geo, vertex_count, 4)?;
        }
    }
    if fvf & FVF_TEXTURE0 != 0 {
        out.texture0 = Some(read_uvs(&mut geo, vertex_count)?);
    }
    if fvf & FVF_TEXTURE1 != 0 {
        out.texture1 = Some(read_uvs(&mut geo, vertex_count)?);
    }
    if fvf & FVF_UNKNOWN9 != 0 {
        skip_conditional_channel(&mut geo, vertex_count)?;
    }
    if fvf & FVF_UNKNOWN10 != 0 {
        skip_channel(&mut geo, vertex_count, 8)?;
    }

    let index_bytes = (index_count * 2) as u64;
    let start = geo
        .len()
        .checked_sub(index_bytes)
        .ok_or(Error::TruncatedData { offset: 0 })?;
    geo.seek(start);
    let mut indices = Vec::with_capacity(index_count);
    for _ in 0..index_count {
        indices.push(geo.read_u16()?);
    }
    out.indices = indices;

    Ok(out)
}
