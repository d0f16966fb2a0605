//! End-to-end decode tests over synthetic PIG files.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use piglib::compression::compress_block;
use piglib::model::{FVF_NORMAL, FVF_POSITION, FVF_TEXTURE0, PigModel};
use piglib::reader::PigRevision;
use piglib::texture::TextureLookup;

struct NoTextures;

impl TextureLookup for NoTextures {
    fn find(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

fn push_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u16).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn push_root_node(buf: &mut Vec<u8>, marker: i32) {
    buf.extend_from_slice(&marker.to_le_bytes());
    push_string(buf, "root");
    buf.push(0); // reserved byte
    buf.extend_from_slice(&(-1i16).to_le_bytes()); // parent: none
    for v in [
        0.0f32, 0.0, 0.0, // position
        0.0, 0.0, 0.0, 1.0, // rotation
        1.0, 1.0, 1.0, // scale
    ] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf.extend_from_slice(&0.0f32.to_le_bytes()); // unknown float
    buf.extend_from_slice(&0i16.to_le_bytes()); // unknown short
}

/// Geometry for a unit quad: float positions, byte normals, float UVs,
/// two triangles.
fn quad_geometry() -> Vec<u8> {
    let mut geo = Vec::new();

    // Positions: alignment 0, then 4 vertices of 3 floats.
    geo.extend_from_slice(&0i16.to_le_bytes());
    for v in [
        [0.0f32, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ] {
        for c in v {
            geo.extend_from_slice(&c.to_le_bytes());
        }
    }

    // Normals: alignment 0, then 4 vertices of 3 signed bytes + padding.
    geo.extend_from_slice(&0i16.to_le_bytes());
    for _ in 0..4 {
        geo.extend_from_slice(&[0u8, 0, 127, 0]);
    }

    // Texture0: alignment 0, then 4 vertices of 2 floats.
    geo.extend_from_slice(&0i16.to_le_bytes());
    for uv in [[0.0f32, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]] {
        for c in uv {
            geo.extend_from_slice(&c.to_le_bytes());
        }
    }

    // Index buffer at the very end.
    for i in [0u16, 1, 2, 0, 2, 3] {
        geo.extend_from_slice(&i.to_le_bytes());
    }
    geo
}

/// A complete one-node, one-object, one-mesh file.
fn minimal_file(marker: i32, compress_geometry: bool) -> Vec<u8> {
    let mut buf = Vec::new();

    // Scene graph: marker, count, one root node.
    buf.extend_from_slice(&marker.to_le_bytes());
    buf.extend_from_slice(&1i16.to_le_bytes());
    push_root_node(&mut buf, marker);
    buf.push(0); // reserved byte
    buf.extend_from_slice(&1i16.to_le_bytes()); // object count

    // Object header.
    buf.extend_from_slice(&marker.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes()); // node index
    buf.extend_from_slice(&1i16.to_le_bytes()); // LOD count
    buf.push(0); // LOD number
    buf.extend_from_slice(&marker.to_le_bytes());
    buf.extend_from_slice(&0i16.to_le_bytes()); // no trailer records
    buf.extend_from_slice(&[0u8; 24]); // bounding box
    buf.extend_from_slice(&1i16.to_le_bytes()); // mesh count

    // Mesh header.
    buf.extend_from_slice(&marker.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags: no pivot
    buf.extend_from_slice(&(FVF_POSITION | FVF_NORMAL | FVF_TEXTURE0).to_le_bytes());
    buf.extend_from_slice(&[0u8; 12]); // reserved
    buf.extend_from_slice(&4u16.to_le_bytes()); // vertex count
    buf.extend_from_slice(&6i32.to_le_bytes()); // index count
    push_string(&mut buf, "paint");
    buf.extend_from_slice(&1i16.to_le_bytes()); // one texture reference
    push_string(&mut buf, "body.tga");
    buf.push(0); // reserved byte

    let geo = quad_geometry();
    if compress_geometry {
        let compressed = compress_block(&geo);
        buf.extend_from_slice(&0i32.to_le_bytes()); // zero size: compressed
        buf.extend_from_slice(&(compressed.len() as i32).to_le_bytes());
        buf.extend_from_slice(&(geo.len() as i32).to_le_bytes());
        buf.extend_from_slice(&compressed);
    } else {
        buf.extend_from_slice(&(geo.len() as i32).to_le_bytes());
        buf.extend_from_slice(&geo);
    }
    buf
}

#[test]
fn minimal_file_decodes_end_to_end() {
    // Initialize tracing
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let data = minimal_file(64, false);
    let model = PigModel::from_bytes(&data, &NoTextures).unwrap();

    assert_eq!(model.nodes.len(), 1);
    assert_eq!(model.nodes[0].name, "root");
    assert_eq!(model.nodes[0].parent_id, -1);
    assert_eq!(model.nodes[0].rotation.to_array(), [0.0, 0.0, 0.0, 1.0]);

    assert_eq!(model.objects.len(), 1);
    let object = &model.objects[0];
    assert_eq!(object.meshes.len(), 1);

    let mesh = &object.meshes[0];
    assert_eq!(mesh.vertex_count, 4);
    assert_eq!(mesh.vertices.as_ref().unwrap().len(), 12);
    assert_eq!(mesh.normals.as_ref().unwrap().len(), 12);
    assert_eq!(mesh.texture0.as_ref().unwrap().len(), 8);
    assert!(mesh.texture1.is_none());
    assert_eq!(mesh.indices.len(), 6);
    assert!(mesh.indices.iter().all(|&i| i < 4));
}

#[test]
fn compressed_geometry_matches_uncompressed() {
    // Initialize tracing
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let plain = PigModel::from_bytes(&minimal_file(64, false), &NoTextures).unwrap();
    let compressed = PigModel::from_bytes(&minimal_file(64, true), &NoTextures).unwrap();

    let a = &plain.objects[0].meshes[0];
    let b = &compressed.objects[0].meshes[0];
    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.normals, b.normals);
    assert_eq!(a.texture0, b.texture0);
    assert_eq!(a.indices, b.indices);
}

#[test]
fn both_revisions_auto_detect() {
    for (marker, revision) in [(100, PigRevision::V1), (64, PigRevision::V2)] {
        let data = minimal_file(marker, false);
        assert_eq!(PigRevision::detect(&data).unwrap(), revision);
        let model = PigModel::from_bytes(&data, &NoTextures).unwrap();
        assert_eq!(model.objects[0].meshes[0].indices.len(), 6);
    }
}

#[test]
fn missing_texture_is_non_fatal() {
    let model = PigModel::from_bytes(&minimal_file(64, false), &NoTextures).unwrap();
    let object = &model.objects[0];

    assert_eq!(object.textures.len(), 1);
    assert_eq!(object.textures[0].name, "body.tga");
    assert_eq!(object.textures[0].filename, "");
    assert_eq!(object.materials[0].diffuse_id, 0);
}

#[test]
fn material_texture_indices_are_valid() {
    let model = PigModel::from_bytes(&minimal_file(64, false), &NoTextures).unwrap();
    for object in &model.objects {
        for mesh in &object.meshes {
            assert!(mesh.material_id < object.materials.len());
        }
        for material in &object.materials {
            for id in [material.diffuse_id, material.normal_id] {
                assert!(id == -1 || (id as usize) < object.textures.len());
            }
        }
    }
}

#[test]
fn mismatched_marker_aborts_decode() {
    let mut data = minimal_file(64, false);
    // Corrupt the object marker (right after node list + reserved byte +
    // object count).
    let object_marker = data.len() - minimal_object_len();
    data[object_marker..object_marker + 4].copy_from_slice(&1i32.to_le_bytes());
    let err = PigModel::from_bytes(&data, &NoTextures).unwrap_err();
    assert!(matches!(
        err,
        piglib::Error::InvalidMarker { received: 1, .. }
    ));
}

/// Byte length of the object record emitted by `minimal_file` (everything
/// after the object count).
fn minimal_object_len() -> usize {
    let full = minimal_file(64, false);
    let mut header = Vec::new();
    header.extend_from_slice(&64i32.to_le_bytes());
    header.extend_from_slice(&1i16.to_le_bytes());
    push_root_node(&mut header, 64);
    header.push(0);
    header.extend_from_slice(&1i16.to_le_bytes());
    full.len() - header.len()
}
