//! UV derivation from texture triangles

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::{Mesh, TextureProjection, TextureTriangle};
use crate::formats::common::texture::TextureBasis;

/// What to do with a textured face whose coordinate index is missing or
/// out of range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvFallback {
    /// Project with the face's own corners as P, M and N (317 models).
    #[default]
    FaceVertices,
    /// Leave the face at UV `(0, 0)` (667 models).
    Zero,
}

/// UV assigned when a projection cannot be evaluated: raw `(0, 0)`
/// after the V flip.
const UNPROJECTED: DVec2 = DVec2::new(0.0, 1.0);

impl Mesh {
    /// Position of a vertex as a float vector.
    pub fn position(&self, index: usize) -> Option<DVec3> {
        self.vertices
            .get(index)
            .map(|&[x, y, z]| DVec3::new(f64::from(x), f64::from(y), f64::from(z)))
    }

    fn positions(&self, indices: [u16; 3]) -> Option<[DVec3; 3]> {
        let [a, b, c] = indices.map(|i| self.position(usize::from(i)));
        Some([a?, b?, c?])
    }

    /// Per-corner UVs for every face, `None` for untextured faces.
    ///
    /// Planar placements are projected through their PMN basis. Cylindrical,
    /// cube and spherical placements are not evaluated and map every corner
    /// to the projection origin.
    pub fn face_uvs(&self, fallback: UvFallback) -> Vec<Option<[DVec2; 3]>> {
        let mut degenerate = 0usize;
        let uvs = (0..self.face_count())
            .map(|face| {
                if !self.is_textured(face) {
                    return None;
                }
                let corners = self.positions(self.triangles[face])?;
                let placement = usize::try_from(self.texture_coord(face))
                    .ok()
                    .and_then(|coord| self.texture_triangles.get(coord));

                let pmn = match (placement, fallback) {
                    (Some(tex), _) if tex.projection == TextureProjection::Planar => tex.indices(),
                    (Some(_), _) => return Some([UNPROJECTED; 3]),
                    (None, UvFallback::FaceVertices) => self.triangles[face],
                    (None, UvFallback::Zero) => return Some([DVec2::ZERO; 3]),
                };
                let Some([p, m, n]) = self.positions(pmn) else {
                    return Some([DVec2::ZERO; 3]);
                };
                match TextureBasis::new(p, m, n) {
                    Ok(basis) => Some(corners.map(|q| basis.uv(q))),
                    Err(_) => {
                        degenerate += 1;
                        Some([UNPROJECTED; 3])
                    }
                }
            })
            .collect();

        if degenerate > 0 {
            tracing::warn!("{degenerate} textured faces have a degenerate PMN basis");
        }
        uvs
    }

    /// Index of the vertex closest to `point`, or `None` for an empty mesh.
    ///
    /// Ties keep the lowest index.
    pub fn nearest_vertex(&self, point: DVec3) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for index in 0..self.vertex_count() {
            let Some(position) = self.position(index) else {
                continue;
            };
            let dist = position.distance_squared(point);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((index, dist));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Rebuild a planar texture triangle from a face's UVs.
    ///
    /// Solves for the points where the UV mapping reaches `(0, 0)`, `(1, 0)`
    /// and `(0, 1)` and snaps each to the nearest vertex. Returns `None`
    /// when the face or its UV triangle is degenerate.
    pub fn texture_triangle_from_uvs(&self, face: usize, uvs: [DVec2; 3]) -> Option<TextureTriangle> {
        let corners = self.positions(*self.triangles.get(face)?)?;
        let [p, m, n] = TextureBasis::from_uv_triangle(corners, uvs)?;
        let snap = |point| self.nearest_vertex(point).and_then(|i| u16::try_from(i).ok());
        Some(TextureTriangle::planar(snap(p)?, snap(m)?, snap(n)?))
    }
}
