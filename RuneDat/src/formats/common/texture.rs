//! PMN texture projection
//!
//! A texture triangle names three vertices: P is the UV origin, M lies at
//! `u = 1` and N at `v = 1`. Any point is projected onto that affine frame
//! by solving the 2x2 Gram system of the two edge vectors.

use glam::{DVec2, DVec3};

use crate::error::{Error, Result};

/// Determinants below this are treated as a degenerate basis.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Determinant threshold for the UV triangle in [`TextureBasis::from_uv_triangle`].
pub const UV_EPSILON: f64 = 1e-6;

/// A solved PMN projection frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBasis {
    origin: DVec3,
    f1: DVec3,
    f2: DVec3,
    inv00: f64,
    inv01: f64,
    inv11: f64,
}

impl TextureBasis {
    /// Build a basis from the P, M and N positions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTextureBasis`] when the edges `M - P` and
    /// `N - P` are parallel or zero-length.
    pub fn new(p: DVec3, m: DVec3, n: DVec3) -> Result<Self> {
        let f1 = m - p;
        let f2 = n - p;
        let a = f1.dot(f1);
        let b = f1.dot(f2);
        let c = f2.dot(f2);
        let det = a * c - b * b;
        if det.abs() < DEGENERATE_EPSILON {
            return Err(Error::MalformedTextureBasis { det });
        }
        Ok(Self {
            origin: p,
            f1,
            f2,
            inv00: c / det,
            inv01: -b / det,
            inv11: a / det,
        })
    }

    /// Project `q` into raw texture space (`v` grows towards N).
    pub fn project(&self, q: DVec3) -> DVec2 {
        let d = q - self.origin;
        let d1 = d.dot(self.f1);
        let d2 = d.dot(self.f2);
        DVec2::new(
            self.inv00 * d1 + self.inv01 * d2,
            self.inv01 * d1 + self.inv11 * d2,
        )
    }

    /// Project `q` and flip `v` to the bottom-up UV convention.
    pub fn uv(&self, q: DVec3) -> DVec2 {
        let raw = self.project(q);
        DVec2::new(raw.x, 1.0 - raw.y)
    }

    /// Recover P, M and N positions from a UV-mapped triangle.
    ///
    /// `uvs` are in the bottom-up convention returned by [`Self::uv`].
    /// Returns `None` when the UV triangle has no area.
    pub fn from_uv_triangle(positions: [DVec3; 3], uvs: [DVec2; 3]) -> Option<[DVec3; 3]> {
        let [a, b, c] = positions;
        let [ua, ub, uc] = uvs.map(|uv| DVec2::new(uv.x, 1.0 - uv.y));
        let e1 = ub - ua;
        let e2 = uc - ua;
        let det = e1.x * e2.y - e2.x * e1.y;
        if det.abs() <= UV_EPSILON {
            return None;
        }

        // barycentric-style solve for the point whose UV is `target`
        let locate = |target: DVec2| {
            let t = target - ua;
            let s = (e2.y * t.x - e2.x * t.y) / det;
            let r = (e1.x * t.y - e1.y * t.x) / det;
            a + s * (b - a) + r * (c - a)
        };

        Some([
            locate(DVec2::ZERO),
            locate(DVec2::X),
            locate(DVec2::Y),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_axis_aligned_basis() {
        let basis = TextureBasis::new(
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 10.0),
        )
        .unwrap();
        assert!(near(basis.project(DVec3::new(5.0, 0.0, 5.0)), DVec2::new(0.5, 0.5)));
        assert!(near(basis.uv(DVec3::new(10.0, 3.0, 0.0)), DVec2::new(1.0, 1.0)));
        assert!(near(basis.uv(DVec3::new(0.0, 0.0, 10.0)), DVec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_skewed_basis_hits_corners() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        let m = DVec3::new(4.0, 2.0, 5.0);
        let n = DVec3::new(2.0, 7.0, 3.0);
        let basis = TextureBasis::new(p, m, n).unwrap();
        assert!(near(basis.project(p), DVec2::ZERO));
        assert!(near(basis.project(m), DVec2::X));
        assert!(near(basis.project(n), DVec2::Y));
    }

    #[test]
    fn test_degenerate_basis() {
        let result = TextureBasis::new(
            DVec3::ZERO,
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(2.0, 2.0, 2.0),
        );
        assert!(matches!(result, Err(Error::MalformedTextureBasis { .. })));
        assert!(TextureBasis::new(DVec3::ONE, DVec3::ONE, DVec3::ONE).is_err());
    }

    #[test]
    fn test_uv_triangle_inverse() {
        let p = DVec3::new(0.0, 0.0, 0.0);
        let m = DVec3::new(8.0, 0.0, 0.0);
        let n = DVec3::new(0.0, 8.0, 0.0);
        let basis = TextureBasis::new(p, m, n).unwrap();

        let positions = [
            DVec3::new(2.0, 2.0, 0.0),
            DVec3::new(6.0, 2.0, 0.0),
            DVec3::new(2.0, 6.0, 0.0),
        ];
        let uvs = positions.map(|q| basis.uv(q));
        let [rp, rm, rn] = TextureBasis::from_uv_triangle(positions, uvs).unwrap();
        assert!((rp - p).length() < 1e-9);
        assert!((rm - m).length() < 1e-9);
        assert!((rn - n).length() < 1e-9);
    }

    #[test]
    fn test_uv_triangle_without_area() {
        let positions = [DVec3::ZERO, DVec3::X, DVec3::Y];
        let uvs = [DVec2::ZERO, DVec2::new(0.5, 0.5), DVec2::ONE];
        assert!(TextureBasis::from_uv_triangle(positions, uvs).is_none());
    }
}
