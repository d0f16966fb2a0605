//! Object, LOD, and mesh record decoding.
//!
//! One object is a node link plus a set of LOD groups; each LOD holds
//! meshes whose geometry lives in a per-mesh buffer, stored raw or as an
//! LZ4 block. Materials and textures referenced by the meshes are
//! deduplicated by name into object-scoped tables.

use glam::Vec3;
use indexmap::IndexMap;

use crate::compression::{decompress_block, read_block_sizes};
use crate::error::{Error, Result};
use crate::reader::PigReader;
use crate::texture::{TextureLookup, resolve_texture};

use super::geometry::decode_geometry;
use super::types::{PigMaterial, PigMesh, PigObject, PigTexture};

/// Mesh flags word: only bit 0 ("has pivot") is understood.
const MESH_FLAG_PIVOT: u32 = 1;

/// Texture slot conventions observed in the source data.
const TEXTURE_SLOT_DIFFUSE: i16 = 0;
const TEXTURE_SLOT_NORMAL: i16 = 2;

fn read_vec3(reader: &mut PigReader<'_>) -> Result<Vec3> {
    Ok(Vec3::new(
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
    ))
}

/// Read one object: marker, node index, then every LOD group with its
/// meshes. Any failure aborts the whole object (and with it the model).
pub(crate) fn read_object(
    reader: &mut PigReader<'_>,
    object_index: usize,
    lookup: &dyn TextureLookup,
) -> Result<PigObject> {
    reader.read_marker()?;
    let node_id = reader.read_i32()?;
    let lod_count = reader.read_i16()?.max(0);

    let mut meshes = Vec::new();
    let mut materials: IndexMap<String, PigMaterial> = IndexMap::new();
    let mut textures: IndexMap<String, PigTexture> = IndexMap::new();

    for _ in 0..lod_count {
        let lod = reader.read_u8()?;
        reader.read_marker()?;
        let extra_count = reader.read_i16()?.max(0);
        reader.skip(24); // bounding box
        let mesh_count = reader.read_i16()?.max(0) as usize;
        tracing::debug!(
            object = object_index,
            lod,
            meshes = mesh_count,
            "reading LOD group"
        );

        for mesh_index in 0..mesh_count {
            let mesh = read_mesh(
                reader,
                lod,
                extra_count,
                &mut materials,
                &mut textures,
                lookup,
            )
            .map_err(|e| Error::MeshDecode {
                object: object_index,
                lod,
                mesh: mesh_index,
                source: Box::new(e),
            })?;
            meshes.push(mesh);
        }
    }

    Ok(PigObject {
        node_id,
        meshes,
        materials: materials.into_values().collect(),
        textures: textures.into_values().collect(),
    })
}

fn read_mesh(
    reader: &mut PigReader<'_>,
    lod: u8,
    extra_count: i16,
    materials: &mut IndexMap<String, PigMaterial>,
    textures: &mut IndexMap<String, PigTexture>,
    lookup: &dyn TextureLookup,
) -> Result<PigMesh> {
    reader.read_marker()?;
    let flags = reader.read_u32()?;
    let fvf = reader.read_u32()?;
    reader.skip(12); // reserved

    let (position, scale) = if flags & MESH_FLAG_PIVOT == 0 {
        (Vec3::ZERO, Vec3::ONE)
    } else {
        (read_vec3(reader)?, read_vec3(reader)?)
    };

    let vertex_count = reader.read_u16()?;
    let index_count = reader.read_i32()?.max(0) as usize;
    let material_name = reader.read_string()?;

    let mut material = PigMaterial::new(material_name.clone());

    let texture_count = reader.read_i16()?.max(0);
    for slot in 0..texture_count {
        let texture_name = reader.read_string()?;
        if texture_name.is_empty() {
            continue;
        }
        let texture_id = if let Some(id) = textures.get_index_of(&texture_name) {
            id
        } else {
            let filename = resolve_texture(&texture_name, lookup)?;
            textures.insert(
                texture_name.clone(),
                PigTexture {
                    name: texture_name,
                    filename,
                },
            );
            textures.len() - 1
        };
        match slot {
            TEXTURE_SLOT_DIFFUSE => material.diffuse_id = texture_id as i32,
            TEXTURE_SLOT_NORMAL => material.normal_id = texture_id as i32,
            // Other slots are referenced by the file but not attached to
            // the material; their meaning is unknown.
            _ => {}
        }
    }

    let material_id = if let Some(id) = materials.get_index_of(&material_name) {
        id
    } else {
        materials.insert(material_name.clone(), material);
        materials.len() - 1
    };

    let _reserved = reader.read_u8()?;
    let declared_len = reader.read_i32()?;

    // A zero declared size means the geometry buffer is an LZ4 block.
    let geometry = if declared_len == 0 {
        let (compressed_len, uncompressed_len) = read_block_sizes(reader)?;
        let offset = reader.position();
        let compressed = reader.read_bytes(compressed_len)?;
        decompress_block(compressed, uncompressed_len, offset)?
    } else {
        reader.read_bytes(declared_len.max(0) as usize)?.to_vec()
    };

    let buffers = decode_geometry(
        &geometry,
        fvf,
        vertex_count as usize,
        index_count,
        reader.revision(),
    )?;

    // Per-LOD trailer records; content unknown, consumed to stay aligned.
    for _ in 0..extra_count {
        let _first = reader.read_i16()?;
        let _second = reader.read_i16()?;
        let size = reader.read_i32()?;
        if size == 0 {
            let (compressed_len, _uncompressed_len) = read_block_sizes(reader)?;
            reader.skip(compressed_len as i64);
        } else {
            reader.skip(i64::from(size.max(0)));
        }
    }

    Ok(PigMesh {
        lod,
        position,
        scale,
        vertex_count,
        material_name,
        material_id,
        vertices: buffers.vertices,
        normals: buffers.normals,
        texture0: buffers.texture0,
        texture1: buffers.texture1,
        indices: buffers.indices,
    })
}
