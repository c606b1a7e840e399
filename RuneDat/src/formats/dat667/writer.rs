//! 667 model encoding

use byteorder::{BigEndian, WriteBytesExt};

use super::{FORMAT_NAME, Footer, MAX_TEXTURE_COORD, MAX_TEXTURE_ID, PER_FACE_PRIORITY};
use crate::error::{Error, Result};
use crate::formats::common::{encode_triangles, encode_vertices, footer_field};
use crate::model::{Mesh, TextureProjection};

/// Encode a mesh as a 667 model, followed by the `0xFF 0xFF` marker.
///
/// Texture coordinates are only stored for faces that have a texture id.
///
/// # Errors
///
/// Returns [`Error::AttributeLengthMismatch`] or
/// [`Error::TriangleIndexOutOfRange`] for an inconsistent mesh,
/// [`Error::CountOverflow`] when a count exceeds its footer field,
/// [`Error::TextureIdOutOfRange`] / [`Error::TextureCoordOutOfRange`] for
/// values the material and coordinate slots cannot hold, and
/// [`Error::SmartIntOutOfRange`] when a delta is too large.
///
/// [`Error::AttributeLengthMismatch`]: crate::Error::AttributeLengthMismatch
/// [`Error::TriangleIndexOutOfRange`]: crate::Error::TriangleIndexOutOfRange
/// [`Error::CountOverflow`]: crate::Error::CountOverflow
/// [`Error::TextureIdOutOfRange`]: crate::Error::TextureIdOutOfRange
/// [`Error::TextureCoordOutOfRange`]: crate::Error::TextureCoordOutOfRange
/// [`Error::SmartIntOutOfRange`]: crate::Error::SmartIntOutOfRange
pub fn encode(mesh: &Mesh) -> Result<Vec<u8>> {
    mesh.validate()?;

    let face_count = mesh.face_count();
    let mut footer = Footer {
        vertex_count: footer_field("vertex count", mesh.vertex_count(), u16::MAX)?,
        triangle_count: footer_field("triangle count", face_count, u16::MAX)?,
        texture_triangle_count: footer_field(
            "texture triangle count",
            mesh.texture_triangles.len(),
            u8::MAX,
        )?,
        flags: u8::from(mesh.face_render_types.is_some()),
        alpha: u8::from(mesh.face_alphas.is_some()),
        tskin: u8::from(mesh.face_tskins.is_some()),
        texture: u8::from(mesh.face_texture_ids.is_some()),
        vskin: u8::from(mesh.vertex_skins.is_some()),
        ..Footer::default()
    };

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

    // material slots and coordinate bytes
    let mut materials: Vec<u8> = Vec::new();
    let mut coords: Vec<u8> = Vec::new();
    if let Some(ids) = &mesh.face_texture_ids {
        for (face, &id) in ids.iter().enumerate() {
            if !(-1..=MAX_TEXTURE_ID).contains(&id) {
                return Err(Error::TextureIdOutOfRange {
                    face,
                    id,
                    format: FORMAT_NAME,
                });
            }
            materials.write_u16::<BigEndian>((id + 1) as u16)?;
            if id < 0 || mesh.face_texture_coords.is_none() {
                continue;
            }
            let coord = mesh.texture_coord(face);
            if !(-1..=MAX_TEXTURE_COORD).contains(&coord) {
                return Err(Error::TextureCoordOutOfRange {
                    face,
                    coord,
                    format: FORMAT_NAME,
                });
            }
            coords.push((coord + 1) as u8);
        }
    }
    footer.texture_coords_len = footer_field("texture coordinate length", coords.len(), u16::MAX)?;

    let vertices = encode_vertices(&mesh.vertices)?;
    let triangles = encode_triangles(&mesh.triangles)?;
    footer.x_len = footer_field("x stream length", vertices.x.len(), u16::MAX)?;
    footer.y_len = footer_field("y stream length", vertices.y.len(), u16::MAX)?;
    footer.z_len = footer_field("z stream length", vertices.z.len(), u16::MAX)?;
    footer.indices_len = footer_field("triangle index length", triangles.indices.len(), u16::MAX)?;

    tracing::debug!(
        "encoding 667 model: {} vertices, {} triangles, {} texture triangles",
        mesh.vertex_count(),
        face_count,
        mesh.texture_triangles.len()
    );

    let mut out: Vec<u8> = Vec::new();
    for tex in &mesh.texture_triangles {
        out.write_u8(tex.projection.render_type())?;
    }
    out.extend_from_slice(&vertices.flags);
    if let Some(render_types) = &mesh.face_render_types {
        out.extend_from_slice(render_types);
    }
    out.extend_from_slice(&triangles.opcodes);
    if let Some(priorities) = &priorities {
        out.extend_from_slice(priorities);
    }
    if let Some(tskins) = &mesh.face_tskins {
        out.extend_from_slice(tskins);
    }
    if let Some(skins) = &mesh.vertex_skins {
        out.extend_from_slice(skins);
    }
    if let Some(alphas) = &mesh.face_alphas {
        out.extend_from_slice(alphas);
    }
    out.extend_from_slice(&triangles.indices);
    out.extend_from_slice(&materials);
    out.extend_from_slice(&coords);
    for &color in &mesh.face_colors {
        out.write_u16::<BigEndian>(color)?;
    }
    out.extend_from_slice(&vertices.x);
    out.extend_from_slice(&vertices.y);
    out.extend_from_slice(&vertices.z);
    write_texture_triangles(mesh, &mut out)?;
    footer.write(&mut out)?;

    Ok(out)
}

/// Write the simple records, complex records and the complex parameter regions.
fn write_texture_triangles(mesh: &Mesh, out: &mut Vec<u8>) -> Result<()> {
    let mut simple: Vec<u8> = Vec::new();
    let mut complex: Vec<u8> = Vec::new();
    let mut scales: Vec<u8> = Vec::new();
    let mut rotations: Vec<u8> = Vec::new();
    let mut directions: Vec<u8> = Vec::new();
    let mut translations: Vec<u8> = Vec::new();
    let mut cube_translations: Vec<u8> = Vec::new();

    for tex in &mesh.texture_triangles {
        let records = match tex.projection {
            TextureProjection::Planar => &mut simple,
            TextureProjection::Other { .. } => continue,
            _ => &mut complex,
        };
        for index in tex.indices() {
            records.write_u16::<BigEndian>(index)?;
        }
        if let Some(params) = tex.projection.params() {
            scales.write_u16::<BigEndian>(params.scale_z)?;
            scales.write_u16::<BigEndian>(params.speed)?;
            scales.write_u16::<BigEndian>(params.scale_x)?;
            rotations.write_i8(params.rotation)?;
            directions.write_i8(params.scale_y)?;
            translations.write_i8(params.direction)?;
        }
        if let TextureProjection::Cube { translation, .. } = tex.projection {
            cube_translations.write_i8(translation[0])?;
            cube_translations.write_i8(translation[1])?;
        }
    }

    for region in [simple, complex, scales, rotations, directions, translations, cube_translations] {
        out.extend_from_slice(&region);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::dat667::{MARKER, TRAILER_LEN, decode};
    use crate::model::TextureTriangle;
    use pretty_assertions::assert_eq;

    fn textured_triangle() -> Mesh {
        let mut mesh = Mesh::new(vec![[0, 0, 0], [64, 0, 0], [0, 64, 0]], vec![[0, 1, 2]]);
        mesh.face_colors = vec![0x1234];
        mesh.face_texture_ids = Some(vec![0]);
        mesh.face_texture_coords = Some(vec![0]);
        mesh.texture_triangles = vec![TextureTriangle::planar(0, 1, 2)];
        mesh
    }

    #[test]
    fn test_marker_and_material_slots() {
        let bytes = encode(&textured_triangle()).unwrap();
        assert_eq!(&bytes[bytes.len() - 2..], &MARKER);
        let footer = Footer::parse(&bytes).unwrap();
        assert_eq!(footer.texture, 1);
        assert_eq!(footer.texture_coords_len, 1);
        assert_eq!(footer.texture_triangle_count, 1);
        // render type 0 leads the body
        assert_eq!(bytes[0], 0);
        // the planar record closes the body
        let body_end = bytes.len() - TRAILER_LEN;
        assert_eq!(&bytes[body_end - 6..body_end], &[0, 0, 0, 1, 0, 2]);
    }

    #[test]
    fn test_textured_colour_is_kept() {
        let decoded = decode(&encode(&textured_triangle()).unwrap()).unwrap();
        assert_eq!(decoded.face_colors, vec![0x1234]);
        assert_eq!(decoded.face_texture_ids, Some(vec![0]));
        assert_eq!(decoded.face_texture_coords, Some(vec![0]));
    }

    #[test]
    fn test_missing_coord_round_trips() {
        let mut mesh = textured_triangle();
        mesh.face_texture_coords = Some(vec![-1]);
        let decoded = decode(&encode(&mesh).unwrap()).unwrap();
        assert_eq!(decoded.face_texture_coords, Some(vec![-1]));
    }

    #[test]
    fn test_texture_id_range() {
        let mut mesh = textured_triangle();
        mesh.face_texture_ids = Some(vec![65535]);
        assert!(matches!(
            encode(&mesh),
            Err(Error::TextureIdOutOfRange { id: 65535, .. })
        ));
        mesh.face_texture_ids = Some(vec![-2]);
        assert!(encode(&mesh).is_err());
    }

    #[test]
    fn test_cube_parameters_round_trip() {
        let mut mesh = textured_triangle();
        let params = crate::model::ComplexTextureParams {
            rotation: -3,
            scale_y: 12,
            direction: 5,
            speed: 9,
            ..Default::default()
        };
        mesh.texture_triangles = vec![
            TextureTriangle {
                projection: TextureProjection::Cube {
                    params,
                    translation: [-1, 2],
                },
                ..TextureTriangle::planar(2, 1, 0)
            },
            TextureTriangle::planar(0, 1, 2),
        ];
        let decoded = decode(&encode(&mesh).unwrap()).unwrap();
        assert_eq!(decoded.texture_triangles, mesh.texture_triangles);
    }
}
