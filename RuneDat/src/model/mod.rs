//! In-memory model representation
//!
//! [`Mesh`] is what both codecs produce and consume. Positions are kept in
//! the editor's Z-up axes; the codecs convert to client space on the wire.
//! Optional sections are `Option`s so that "absent" and "present but all
//! default" stay distinguishable across a round trip.

mod projection;
mod uv;

pub use projection::{
    ComplexTextureParams, RENDER_CUBE, RENDER_CYLINDRICAL, RENDER_PLANAR, RENDER_SPHERICAL,
    TextureProjection, TextureTriangle,
};
pub use uv::UvFallback;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formats::common::attributes::{decode_alpha, decode_vertex_skin, unpack_hsl};
use crate::formats::common::check_len;

/// Footer priority written when a mesh has no per-face priorities.
pub const DEFAULT_MODEL_PRIORITY: u8 = 1;

/// Stored alpha byte of a fully opaque face.
pub const OPAQUE_ALPHA: u8 = 255;

fn default_model_priority() -> u8 {
    DEFAULT_MODEL_PRIORITY
}

/// A decoded model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions (Z-up).
    pub vertices: Vec<[i32; 3]>,
    /// Vertex index triples.
    pub triangles: Vec<[u16; 3]>,
    /// Packed 16-bit HSL colour per face.
    pub face_colors: Vec<u16>,
    /// Texture id per face, `-1` for untextured faces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_texture_ids: Option<Vec<i32>>,
    /// Index into `texture_triangles` per face, `-1` for none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_texture_coords: Option<Vec<i32>>,
    #[serde(default)]
    pub texture_triangles: Vec<TextureTriangle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_priorities: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_tskins: Option<Vec<u8>>,
    /// Stored alpha bytes; `255` is fully opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_alphas: Option<Vec<u8>>,
    /// Summed blend weight per vertex, in hundredths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertex_skins: Option<Vec<u8>>,
    /// Shading/render type byte per face.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_render_types: Option<Vec<u8>>,
    /// Priority for every face when `face_priorities` is absent.
    #[serde(default = "default_model_priority")]
    pub model_priority: u8,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            face_colors: Vec::new(),
            face_texture_ids: None,
            face_texture_coords: None,
            texture_triangles: Vec::new(),
            face_priorities: None,
            face_tskins: None,
            face_alphas: None,
            vertex_skins: None,
            face_render_types: None,
            model_priority: DEFAULT_MODEL_PRIORITY,
        }
    }
}

impl Mesh {
    /// Create an untextured mesh with colour 0 on every face.
    pub fn new(vertices: Vec<[i32; 3]>, triangles: Vec<[u16; 3]>) -> Self {
        let face_colors = vec![0; triangles.len()];
        Self {
            vertices,
            triangles,
            face_colors,
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.triangles.len()
    }

    /// Texture id of a face, `-1` when the face is untextured.
    pub fn texture_id(&self, face: usize) -> i32 {
        self.face_texture_ids
            .as_ref()
            .and_then(|ids| ids.get(face).copied())
            .unwrap_or(-1)
    }

    /// Texture coordinate index of a face, `-1` when it has none.
    pub fn texture_coord(&self, face: usize) -> i32 {
        self.face_texture_coords
            .as_ref()
            .and_then(|coords| coords.get(face).copied())
            .unwrap_or(-1)
    }

    pub fn is_textured(&self, face: usize) -> bool {
        self.texture_id(face) >= 0
    }

    /// Number of faces with a texture id.
    pub fn textured_face_count(&self) -> usize {
        self.face_texture_ids
            .as_ref()
            .map_or(0, |ids| ids.iter().filter(|id| **id >= 0).count())
    }

    pub fn priority(&self, face: usize) -> u8 {
        self.face_priorities
            .as_ref()
            .and_then(|p| p.get(face).copied())
            .unwrap_or(self.model_priority)
    }

    pub fn tskin(&self, face: usize) -> u8 {
        self.face_tskins
            .as_ref()
            .and_then(|t| t.get(face).copied())
            .unwrap_or(0)
    }

    /// Stored alpha byte of a face.
    pub fn alpha_byte(&self, face: usize) -> u8 {
        self.face_alphas
            .as_ref()
            .and_then(|a| a.get(face).copied())
            .unwrap_or(OPAQUE_ALPHA)
    }

    /// Opacity of a face in `0..=1`.
    pub fn opacity(&self, face: usize) -> f64 {
        decode_alpha(self.alpha_byte(face))
    }

    /// RGB colour of a face.
    pub fn face_rgb(&self, face: usize) -> [f64; 3] {
        unpack_hsl(self.face_colors.get(face).copied().unwrap_or(0))
    }

    /// Blend channels of a vertex; empty when skins are absent.
    pub fn vertex_skin_channels(&self, vertex: usize) -> Vec<f64> {
        self.vertex_skins
            .as_ref()
            .and_then(|s| s.get(vertex).copied())
            .map(decode_vertex_skin)
            .unwrap_or_default()
    }

    /// Check the structural invariants every encoder relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttributeLengthMismatch`] when an attribute array does
    /// not match the face or vertex count, and
    /// [`Error::TriangleIndexOutOfRange`] when a triangle or texture triangle
    /// references a vertex that does not exist.
    pub fn validate(&self) -> Result<()> {
        let faces = self.face_count();
        let vertices = self.vertex_count();

        check_len("face_colors", Some(self.face_colors.as_slice()), faces)?;
        check_len("face_texture_ids", self.face_texture_ids.as_deref(), faces)?;
        check_len("face_texture_coords", self.face_texture_coords.as_deref(), faces)?;
        check_len("face_priorities", self.face_priorities.as_deref(), faces)?;
        check_len("face_tskins", self.face_tskins.as_deref(), faces)?;
        check_len("face_alphas", self.face_alphas.as_deref(), faces)?;
        check_len("face_render_types", self.face_render_types.as_deref(), faces)?;
        check_len("vertex_skins", self.vertex_skins.as_deref(), vertices)?;

        let out_of_range = |indices: [u16; 3]| indices.into_iter().find(|&i| usize::from(i) >= vertices);
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(index) = out_of_range(*tri) {
                return Err(Error::TriangleIndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices,
                });
            }
        }
        for (triangle, tex) in self.texture_triangles.iter().enumerate() {
            if !tex.projection.has_record() {
                continue;
            }
            if let Some(index) = out_of_range(tex.indices()) {
                return Err(Error::TriangleIndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn quad() -> Mesh {
        Mesh::new(
            vec![[0, 0, 0], [10, 0, 0], [10, 10, 0], [0, 10, 0]],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_defaults_for_absent_sections() {
        let mesh = quad();
        assert_eq!(mesh.face_colors, vec![0, 0]);
        assert_eq!(mesh.priority(1), DEFAULT_MODEL_PRIORITY);
        assert_eq!(mesh.tskin(0), 0);
        assert_eq!(mesh.alpha_byte(0), 255);
        assert_eq!(mesh.texture_id(0), -1);
        assert_eq!(mesh.texture_coord(0), -1);
        assert!(!mesh.is_textured(0));
        assert!(mesh.vertex_skin_channels(0).is_empty());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_length_mismatch() {
        let mut mesh = quad();
        mesh.face_alphas = Some(vec![0]);
        assert!(matches!(
            mesh.validate(),
            Err(Error::AttributeLengthMismatch {
                attribute: "face_alphas",
                expected: 2,
                found: 1
            })
        ));

        let mut mesh = quad();
        mesh.vertex_skins = Some(vec![0; 2]);
        assert!(matches!(
            mesh.validate(),
            Err(Error::AttributeLengthMismatch { attribute: "vertex_skins", .. })
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let mut mesh = quad();
        mesh.triangles[1] = [0, 2, 4];
        assert!(matches!(
            mesh.validate(),
            Err(Error::TriangleIndexOutOfRange { triangle: 1, index: 4, vertex_count: 4 })
        ));

        let mut mesh = quad();
        mesh.texture_triangles.push(TextureTriangle::planar(0, 1, 9));
        assert!(matches!(
            mesh.validate(),
            Err(Error::TriangleIndexOutOfRange { triangle: 0, index: 9, .. })
        ));
    }

    #[test]
    fn test_unknown_projection_is_not_indexed() {
        let mut mesh = quad();
        mesh.texture_triangles.push(TextureTriangle {
            p: 99,
            m: 99,
            n: 99,
            projection: TextureProjection::Other { render_type: 9 },
        });
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_json_skips_absent_sections() {
        let json = serde_json::to_value(quad()).unwrap();
        assert!(json.get("face_alphas").is_none());
        assert_eq!(json["model_priority"], 1);

        let parsed: Mesh =
            serde_json::from_str(r#"{"vertices":[[1,2,3]],"triangles":[],"face_colors":[]}"#)
                .unwrap();
        assert_eq!(parsed.model_priority, DEFAULT_MODEL_PRIORITY);
        assert_eq!(parsed.vertices, vec![[1, 2, 3]]);
    }
}
