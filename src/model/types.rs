//! Decoded PIG model structures.
//!
//! Everything here is built once during decode and immutable afterwards.
//! Materials and textures are scoped per object, not globally: each
//! [`PigObject`] carries its own deduplicated lists, and mesh/material
//! indices point into those.

use glam::{Quat, Vec3};
use serde::Serialize;

/// A scene-graph node: name, parent link, and local transform.
///
/// Nodes appear in the file in dependency order, so a non-negative
/// `parent_id` always references an earlier node.
#[derive(Debug, Clone, Serialize)]
pub struct PigNode {
    pub name: String,
    /// Index of the parent node; `-1` (or out of range) means root.
    pub parent_id: i16,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for PigNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            parent_id: -1,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// One renderable object: a node link plus its LOD meshes and the
/// object-scoped material/texture tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PigObject {
    /// Index into the model's node list.
    pub node_id: i32,
    pub meshes: Vec<PigMesh>,
    /// Deduplicated by name, in first-seen order.
    pub materials: Vec<PigMaterial>,
    /// Deduplicated by name, in first-seen order.
    pub textures: Vec<PigTexture>,
}

/// One mesh of one LOD level.
///
/// Attribute arrays are present iff the corresponding FVF bit was set in
/// the file; every present array has length `vertex_count * components`
/// (3 for positions/normals, 2 for UVs).
#[derive(Debug, Clone, Serialize)]
pub struct PigMesh {
    /// LOD level this mesh belongs to; 0 is highest detail.
    pub lod: u8,
    /// Local pivot offset; zero unless the mesh's pivot flag was set.
    pub position: Vec3,
    /// Local pivot scale; one unless the mesh's pivot flag was set.
    pub scale: Vec3,
    pub vertex_count: u16,
    /// Raw material name as stored in the file, pre-dedup.
    pub material_name: String,
    /// Index into the owning object's `materials`.
    pub material_id: usize,
    pub vertices: Option<Vec<f32>>,
    pub normals: Option<Vec<f32>>,
    pub texture0: Option<Vec<f32>>,
    pub texture1: Option<Vec<f32>>,
    /// Triangle indices into this mesh's own vertex arrays.
    pub indices: Vec<u16>,
}

impl Default for PigMesh {
    fn default() -> Self {
        Self {
            lod: 0,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            vertex_count: 0,
            material_name: String::new(),
            material_id: 0,
            vertices: None,
            normals: None,
            texture0: None,
            texture1: None,
            indices: Vec::new(),
        }
    }
}

/// A material: a name plus texture attachments.
#[derive(Debug, Clone, Serialize)]
pub struct PigMaterial {
    pub name: String,
    /// Index into the owning object's `textures`, or `-1` if none.
    pub diffuse_id: i32,
    /// Index into the owning object's `textures`, or `-1` if none.
    pub normal_id: i32,
}

impl PigMaterial {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            diffuse_id: -1,
            normal_id: -1,
        }
    }
}

/// A texture reference: the name stored in the file plus the resolved
/// filesystem path (empty if the lookup found nothing).
#[derive(Debug, Clone, Serialize)]
pub struct PigTexture {
    pub name: String,
    pub filename: String,
}

/// A fully decoded PIG model: the scene-graph node list plus all objects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PigModel {
    pub nodes: Vec<PigNode>,
    pub objects: Vec<PigObject>,
}
