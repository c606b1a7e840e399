//! 317 model encoding

use byteorder::{BigEndian, WriteBytesExt};

use super::{FORMAT_NAME, Footer, MAX_TEXTURE_COORD, PER_FACE_PRIORITY, TEXTURED_BIT};
use crate::error::{Error, Result};
use crate::formats::common::{encode_triangles, encode_vertices, footer_field};
use crate::model::{Mesh, TextureProjection};

/// Encode a mesh as a 317 model.
///
/// Textured faces store their texture id in the colour slot, so their
/// colour is not written.
///
/// # Errors
///
/// Returns [`Error::AttributeLengthMismatch`] or
/// [`Error::TriangleIndexOutOfRange`] for an inconsistent mesh,
/// [`Error::CountOverflow`] when a count exceeds its footer field,
/// [`Error::UnsupportedProjection`] for non-planar texture triangles,
/// [`Error::TextureIdOutOfRange`] / [`Error::TextureCoordOutOfRange`] for
/// textured faces the flag byte cannot describe, and
/// [`Error::SmartIntOutOfRange`] when a delta is too large.
///
/// [`Error::AttributeLengthMismatch`]: crate::Error::AttributeLengthMismatch
/// [`Error::TriangleIndexOutOfRange`]: crate::Error::TriangleIndexOutOfRange
/// [`Error::CountOverflow`]: crate::Error::CountOverflow
/// [`Error::UnsupportedProjection`]: crate::Error::UnsupportedProjection
/// [`Error::TextureIdOutOfRange`]: crate::Error::TextureIdOutOfRange
/// [`Error::TextureCoordOutOfRange`]: crate::Error::TextureCoordOutOfRange
/// [`Error::SmartIntOutOfRange`]: crate::Error::SmartIntOutOfRange
pub fn encode(mesh: &Mesh) -> Result<Vec<u8>> {
    mesh.validate()?;

    let face_count = mesh.face_count();
    let mut footer = Footer {
        vertex_count: footer_field("vertex count", mesh.vertex_count(), u16::MAX)?,
        face_count: footer_field("face count", face_count, u16::MAX)?,
        texture_triangle_count: footer_field(
            "texture triangle count",
            mesh.texture_triangles.len(),
            u8::MAX,
        )?,
        ..Footer::default()
    };

    for (index, tex) in mesh.texture_triangles.iter().enumerate() {
        if tex.projection != TextureProjection::Planar {
            return Err(Error::UnsupportedProjection {
                index,
                kind: tex.projection.name(),
                format: FORMAT_NAME,
            });
        }
    }

    let textured = mesh.face_texture_ids.is_some()
        || mesh.face_texture_coords.is_some()
        || mesh.face_render_types.is_some()
        || !mesh.texture_triangles.is_empty();
    footer.textured = u8::from(textured);

    // colour slots and texture flag bytes
    let mut color_slots = Vec::with_capacity(face_count);
    let mut texture_flags = Vec::with_capacity(face_count);
    for face in 0..face_count {
        let render_type = mesh.face_render_types.as_ref().map_or(0, |r| r[face] & 1);
        let id = mesh.texture_id(face);
        if id < 0 {
            color_slots.push(mesh.face_colors[face]);
            texture_flags.push(render_type);
            continue;
        }
        let slot = u16::try_from(id).map_err(|_| Error::TextureIdOutOfRange {
            face,
            id,
            format: FORMAT_NAME,
        })?;
        let coord = mesh.texture_coord(face);
        if !(0..=MAX_TEXTURE_COORD).contains(&coord) {
            return Err(Error::TextureCoordOutOfRange {
                face,
                coord,
                format: FORMAT_NAME,
            });
        }
        color_slots.push(slot);
        texture_flags.push(render_type | TEXTURED_BIT | ((coord as u8) << 2));
    }

    let priorities = match &mesh.face_priorities {
        Some(priorities) => Some(priorities.clone()),
        None if mesh.model_priority == PER_FACE_PRIORITY => Some(vec![PER_FACE_PRIORITY; face_count]),
        None => None,
    };
    footer.priority = if priorities.is_some() {
        PER_FACE_PRIORITY
    } else {
        mesh.model_priority
    };
    footer.tskin = u8::from(mesh.face_tskins.is_some());
    footer.vskin = u8::from(mesh.vertex_skins.is_some());
    footer.alpha = u8::from(mesh.face_alphas.is_some());

    let vertices = encode_vertices(&mesh.vertices)?;
    let triangles = encode_triangles(&mesh.triangles)?;
    footer.x_len = footer_field("x stream length", vertices.x.len(), u16::MAX)?;
    footer.y_len = footer_field("y stream length", vertices.y.len(), u16::MAX)?;
    footer.z_len = footer_field("z stream length", vertices.z.len(), u16::MAX)?;
    footer.indices_len = footer_field("triangle index length", triangles.indices.len(), u16::MAX)?;

    tracing::debug!(
        "encoding 317 model: {} vertices, {} faces, textured={}",
        mesh.vertex_count(),
        face_count,
        textured
    );

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(&vertices.flags);
    out.extend_from_slice(&triangles.opcodes);
    if let Some(priorities) = &priorities {
        out.extend_from_slice(priorities);
    }
    if let Some(tskins) = &mesh.face_tskins {
        out.extend_from_slice(tskins);
    }
    if textured {
        out.extend_from_slice(&texture_flags);
    }
    if let Some(skins) = &mesh.vertex_skins {
        out.extend_from_slice(skins);
    }
    if let Some(alphas) = &mesh.face_alphas {
        out.extend_from_slice(alphas);
    }
    out.extend_from_slice(&triangles.indices);
    for slot in color_slots {
        out.write_u16::<BigEndian>(slot)?;
    }
    if textured {
        for tex in &mesh.texture_triangles {
            for index in tex.indices() {
                out.write_u16::<BigEndian>(index)?;
            }
        }
    }
    out.extend_from_slice(&vertices.x);
    out.extend_from_slice(&vertices.y);
    out.extend_from_slice(&vertices.z);
    footer.write(&mut out)?;

    Ok(out)
}
