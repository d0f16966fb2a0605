//! Model inspection utilities.
//!
//! Summaries of a decoded model for tooling and debugging output.

use serde::Serialize;

use crate::error::Result;

use super::types::{PigModel, PigObject};

/// Summary of a decoded PIG model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub node_count: usize,
    pub object_count: usize,
    pub objects: Vec<ObjectInfo>,
}

/// Summary of one object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub node_id: i32,
    /// Distinct LOD levels present, ascending.
    pub lod_levels: Vec<u8>,
    pub mesh_count: usize,
    pub vertex_total: usize,
    pub index_total: usize,
    pub material_count: usize,
    pub texture_count: usize,
}

impl ObjectInfo {
    fn from_object(object: &PigObject) -> Self {
        let mut lod_levels: Vec<u8> = object.meshes.iter().map(|m| m.lod).collect();
        lod_levels.sort_unstable();
        lod_levels.dedup();

        Self {
            node_id: object.node_id,
            lod_levels,
            mesh_count: object.meshes.len(),
            vertex_total: object.meshes.iter().map(|m| m.vertex_count as usize).sum(),
            index_total: object.meshes.iter().map(|m| m.indices.len()).sum(),
            material_count: object.materials.len(),
            texture_count: object.textures.len(),
        }
    }
}

/// Summarize a decoded model.
#[must_use]
pub fn inspect_model(model: &PigModel) -> ModelInfo {
    ModelInfo {
        node_count: model.nodes.len(),
        object_count: model.objects.len(),
        objects: model.objects.iter().map(ObjectInfo::from_object).collect(),
    }
}

impl ModelInfo {
    /// A human-readable one-line description of the model contents.
    #[must_use]
    pub fn describe(&self) -> String {
        let meshes: usize = self.objects.iter().map(|o| o.mesh_count).sum();
        let materials: usize = self.objects.iter().map(|o| o.material_count).sum();
        format!(
            "{} node(s), {} object(s), {} mesh(es), {} material(s)",
            self.node_count, self.object_count, meshes, materials
        )
    }

    /// Pretty-printed JSON dump of the summary.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
