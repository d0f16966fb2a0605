//! Scene-graph node decoding.

use glam::{Quat, Vec3};

use crate::error::Result;
use crate::reader::PigReader;

use super::types::PigNode;

fn read_vec3(reader: &mut PigReader<'_>) -> Result<Vec3> {
    Ok(Vec3::new(
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
    ))
}

fn read_node(reader: &mut PigReader<'_>) -> Result<PigNode> {
    reader.read_marker()?;
    let name = reader.read_string()?;
    let _reserved = reader.read_u8()?;
    let parent_id = reader.read_i16()?;

    let position = read_vec3(reader)?;
    let rotation = Quat::from_xyzw(
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
    );
    let scale = read_vec3(reader)?;

    // Trailing float and 16-bit value, purpose unknown. Consumed to stay
    // aligned with the next record.
    let _unknown_float = reader.read_f32()?;
    let _unknown_short = reader.read_i16()?;

    Ok(PigNode {
        name,
        parent_id,
        position,
        rotation,
        scale,
    })
}

/// Read the flat node list: a marker, a 16-bit count, then that many node
/// records in dependency order (parents before children).
pub(crate) fn read_nodes(reader: &mut PigReader<'_>) -> Result<Vec<PigNode>> {
    reader.read_marker()?;
    let count = reader.read_i16()?.max(0) as usize;
    tracing::debug!(count, "reading scene-graph nodes");

    let mut nodes = Vec::with_capacity(count);
    for _ in 0..count {
        nodes.push(read_node(reader)?);
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::PigRevision;
    use pretty_assertions::assert_eq;

    fn push_node(buf: &mut Vec<u8>, name: &str, parent: i16) {
        buf.extend_from_slice(&64i32.to_le_bytes());
        buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
        buf.extend_from_slice(name.as_bytes());
        buf.push(0); // reserved byte
        buf.extend_from_slice(&parent.to_le_bytes());
        for v in [
            1.0f32, 2.0, 3.0, // position
            0.0, 0.0, 0.0, 1.0, // rotation
            1.0, 1.0, 1.0, // scale
        ] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf.extend_from_slice(&0.0f32.to_le_bytes()); // unknown float
        buf.extend_from_slice(&0i16.to_le_bytes()); // unknown short
    }

    #[test]
    fn decodes_nodes_in_order() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&64i32.to_le_bytes());
        buf.extend_from_slice(&2i16.to_le_bytes());
        push_node(&mut buf, "root", -1);
        push_node(&mut buf, "child", 0);

        let mut r = PigReader::new(&buf, PigRevision::V2);
        let nodes = read_nodes(&mut r).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "root");
        assert_eq!(nodes[0].parent_id, -1);
        assert_eq!(nodes[1].name, "child");
        assert_eq!(nodes[1].parent_id, 0);
        assert_eq!(nodes[0].position, glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(nodes[0].rotation, glam::Quat::IDENTITY);
        assert_eq!(r.position(), buf.len() as u64);
    }

    #[test]
    fn bad_node_marker_aborts() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&64i32.to_le_bytes());
        buf.extend_from_slice(&1i16.to_le_bytes());
        buf.extend_from_slice(&65i32.to_le_bytes()); // wrong per-node marker
        let mut r = PigReader::new(&buf, PigRevision::V2);
        assert!(matches!(
            read_nodes(&mut r).unwrap_err(),
            crate::Error::InvalidMarker { received: 65, .. }
        ));
    }
}
