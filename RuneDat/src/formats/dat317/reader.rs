//! 317 model decoding

use super::{FOOTER_LEN, FORMAT_NAME, Footer, Sections, TEXTURED_BIT};
use crate::error::{Error, Result};
use crate::formats::common::{ByteCursor, SmartFlavor, decode_triangles, decode_vertices};
use crate::model::{Mesh, TextureTriangle};

const FLAVOR: SmartFlavor = SmartFlavor::Masked;

/// Decode a 317 model.
///
/// Malformed triangle indices are clamped into range and sections that end
/// early read as zeros, so only a buffer too short for its own footer
/// counts is rejected.
///
/// # Errors
///
/// Returns [`Error::TruncatedInput`] if the buffer cannot hold the footer,
/// the vertex flags and the face opcodes.
///
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn decode(data: &[u8]) -> Result<Mesh> {
    let footer = Footer::parse(data)?;
    let body = &data[..data.len() - FOOTER_LEN];
    let vertex_count = usize::from(footer.vertex_count);
    let face_count = usize::from(footer.face_count);

    let mandatory = vertex_count + face_count;
    if body.len() < mandatory {
        return Err(Error::TruncatedInput {
            format: FORMAT_NAME,
            needed: mandatory + FOOTER_LEN,
            found: data.len(),
        });
    }

    tracing::debug!(
        "317 footer: {} vertices, {} faces, {} texture triangles",
        vertex_count,
        face_count,
        footer.texture_triangle_count
    );

    let s = Sections::locate(&footer);
    if s.end > body.len() {
        tracing::debug!("317 body is {} bytes, footer describes {}", body.len(), s.end);
    }
    let section = |offset: usize, len: usize| ByteCursor::section(body, offset, len);

    let vertices = decode_vertices(
        vertex_count,
        &mut section(s.vertex_flags, vertex_count),
        &mut section(s.x, usize::from(footer.x_len)),
        &mut section(s.y, usize::from(footer.y_len)),
        &mut section(s.z, usize::from(footer.z_len)),
        FLAVOR,
    );
    tracing::debug!("decoded {} vertices", vertices.len());

    let (triangles, clamped) = decode_triangles(
        face_count,
        vertex_count,
        &mut section(s.face_opcodes, face_count),
        &mut section(s.indices, usize::from(footer.indices_len)),
        FLAVOR,
    );
    if clamped > 0 {
        tracing::warn!("clamped {clamped} out-of-range triangle indices");
    }
    tracing::debug!("decoded {} triangles", triangles.len());

    let mut colors = section(s.colors, face_count * 2);
    let mut face_colors: Vec<u16> = (0..face_count).map(|_| colors.read_u16()).collect();

    let mut mesh = Mesh {
        vertices,
        triangles,
        ..Mesh::default()
    };

    if footer.has_face_priorities() {
        mesh.face_priorities = Some(section(s.priorities, face_count).read_bytes(face_count));
    } else {
        mesh.model_priority = footer.priority;
    }
    if footer.has_tskins() {
        mesh.face_tskins = Some(section(s.tskins, face_count).read_bytes(face_count));
    }
    if footer.has_vertex_skins() {
        mesh.vertex_skins = Some(section(s.vertex_skins, vertex_count).read_bytes(vertex_count));
    }
    if footer.has_alphas() {
        mesh.face_alphas = Some(section(s.alphas, face_count).read_bytes(face_count));
    }

    if footer.has_textures() {
        let flags = section(s.texture_flags, face_count).read_bytes(face_count);
        let mut ids = vec![-1; face_count];
        let mut coords = vec![-1; face_count];
        for (face, &flag) in flags.iter().enumerate() {
            if flag & TEXTURED_BIT != 0 {
                ids[face] = i32::from(face_colors[face]);
                coords[face] = i32::from(flag >> 2);
                face_colors[face] = 0;
            }
        }
        mesh.face_render_types = Some(flags.iter().map(|flag| flag & 1).collect());
        mesh.face_texture_ids = Some(ids);
        mesh.face_texture_coords = Some(coords);

        let count = usize::from(footer.texture_triangle_count);
        let mut records = section(s.texture_triangles, count * 6);
        mesh.texture_triangles = (0..count)
            .map(|_| TextureTriangle::planar(records.read_u16(), records.read_u16(), records.read_u16()))
            .collect();
        tracing::debug!(
            "decoded {} textured faces, {} texture triangles",
            mesh.textured_face_count(),
            count
        );
    }

    mesh.face_colors = face_colors;
    Ok(mesh)
}
