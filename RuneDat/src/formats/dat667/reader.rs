//! 667 model decoding

use super::{FORMAT_NAME, Footer, RECORD_LEN, Sections, TRAILER_LEN, TextureCounts};
use crate::error::{Error, Result};
use crate::formats::common::{ByteCursor, SmartFlavor, decode_triangles, decode_vertices};
use crate::model::{Mesh, TextureProjection, TextureTriangle};

const FLAVOR: SmartFlavor = SmartFlavor::Unmasked;

/// Decode a 667 model.
///
/// # Errors
///
/// Returns [`Error::TruncatedInput`] if the buffer cannot hold the footer,
/// the texture render types, the vertex flags and the triangle opcodes.
///
/// [`Error::TruncatedInput`]: crate::Error::TruncatedInput
pub fn decode(data: &[u8]) -> Result<Mesh> {
    let footer = Footer::parse(data)?;
    let body = &data[..data.len() - TRAILER_LEN];
    let vertex_count = usize::from(footer.vertex_count);
    let face_count = usize::from(footer.triangle_count);
    let texture_count = usize::from(footer.texture_triangle_count);

    let mandatory = texture_count + vertex_count + face_count;
    if body.len() < mandatory {
        return Err(Error::TruncatedInput {
            format: FORMAT_NAME,
            needed: mandatory + TRAILER_LEN,
            found: data.len(),
        });
    }

    let render_types = body[..texture_count].to_vec();
    let counts = TextureCounts::from_render_types(&render_types);
    tracing::debug!(
        "667 footer: {} vertices, {} triangles, {} texture triangles ({} simple, {} complex, {} cube)",
        vertex_count,
        face_count,
        texture_count,
        counts.simple,
        counts.complex,
        counts.cube
    );

    let s = Sections::locate(&footer, &counts);
    if s.end > body.len() {
        tracing::debug!("667 body is {} bytes, footer describes {}", body.len(), s.end);
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
        &mut section(s.opcodes, face_count),
        &mut section(s.indices, usize::from(footer.indices_len)),
        FLAVOR,
    );
    if clamped > 0 {
        tracing::warn!("clamped {clamped} out-of-range triangle indices");
    }
    tracing::debug!("decoded {} triangles", triangles.len());

    let mut colors = section(s.colors, face_count * 2);
    let face_colors = (0..face_count).map(|_| colors.read_u16()).collect();

    let mut mesh = Mesh {
        vertices,
        triangles,
        face_colors,
        ..Mesh::default()
    };

    if footer.has_render_info() {
        mesh.face_render_types = Some(section(s.render_info, face_count).read_bytes(face_count));
    }
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
        let mut materials = section(s.materials, face_count * 2);
        let ids: Vec<i32> = (0..face_count)
            .map(|_| i32::from(materials.read_u16()) - 1)
            .collect();

        // one coordinate byte per textured face, for as long as the section lasts
        let mut coord_bytes = section(s.texture_coords, usize::from(footer.texture_coords_len));
        let coords = ids
            .iter()
            .map(|&id| {
                if id >= 0 && coord_bytes.remaining() > 0 {
                    i32::from(coord_bytes.read_u8()) - 1
                } else {
                    -1
                }
            })
            .collect();

        mesh.face_texture_ids = Some(ids);
        mesh.face_texture_coords = Some(coords);
    }

    mesh.texture_triangles = decode_texture_triangles(body, &s, &render_types);
    tracing::debug!(
        "decoded {} textured faces, {} texture triangles",
        mesh.textured_face_count(),
        mesh.texture_triangles.len()
    );

    Ok(mesh)
}

/// Read the simple and complex records plus the complex parameter regions.
fn decode_texture_triangles(body: &[u8], s: &Sections, render_types: &[u8]) -> Vec<TextureTriangle> {
    let section = |offset: usize, end: usize| ByteCursor::section(body, offset, end - offset);
    let mut simple = section(s.simple, s.complex);
    let mut complex = section(s.complex, s.scales);
    let mut scales = section(s.scales, s.rotations);
    let mut rotations = section(s.rotations, s.directions);
    let mut directions = section(s.directions, s.translations);
    let mut translations = section(s.translations, s.end);

    let mut textures: Vec<TextureTriangle> = render_types
        .iter()
        .map(|&render_type| {
            let mut projection = TextureProjection::from_render_type(render_type);
            let records = match projection {
                TextureProjection::Planar => Some(&mut simple),
                TextureProjection::Other { .. } => None,
                _ => Some(&mut complex),
            };
            // a partial record is left unread
            let [p, m, n] = records
                .filter(|r| r.remaining() >= RECORD_LEN)
                .map_or([0; 3], |r| {
                    [r.read_i16(), r.read_i16(), r.read_i16()].map(|i| i as u16)
                });

            if let Some(params) = projection.params_mut() {
                params.scale_z = scales.read_u16();
                params.speed = scales.read_u16();
                params.scale_x = scales.read_u16();
                params.rotation = rotations.read_i8();
                params.scale_y = directions.read_i8();
                params.direction = translations.read_i8();
            }
            TextureTriangle { p, m, n, projection }
        })
        .collect();

    // cube translations trail the per-entry direction bytes, in complex order
    for texture in &mut textures {
        if let TextureProjection::Cube { translation, .. } = &mut texture.projection {
            *translation = [translations.read_i8(), translations.read_i8()];
        }
    }

    textures
}
