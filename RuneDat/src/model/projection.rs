//! Texture triangles and their projection kinds

use serde::{Deserialize, Serialize};

/// Render type byte of a planar (PMN) texture triangle.
pub const RENDER_PLANAR: u8 = 0;
/// Render type byte of a cylindrical projection.
pub const RENDER_CYLINDRICAL: u8 = 1;
/// Render type byte of a cube projection.
pub const RENDER_CUBE: u8 = 2;
/// Render type byte of a spherical projection.
pub const RENDER_SPHERICAL: u8 = 3;

/// Parameters carried by cylindrical, cube and spherical projections.
///
/// Only the byte layout is known for certain. The field names follow the
/// region each value is read from; how the client interprets rotation,
/// direction and scale-Y is unverified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplexTextureParams {
    pub scale_x: u16,
    /// Read from the direction region.
    pub scale_y: i8,
    pub scale_z: u16,
    pub rotation: i8,
    /// Read from the head of the translation region.
    pub direction: i8,
    pub speed: u16,
}

impl Default for ComplexTextureParams {
    fn default() -> Self {
        Self {
            scale_x: 128,
            scale_y: 0,
            scale_z: 128,
            rotation: 0,
            direction: 0,
            speed: 0,
        }
    }
}

/// How a texture triangle maps texels onto faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureProjection {
    /// Simple PMN projection (render type 0).
    #[default]
    Planar,
    /// Render type 1.
    Cylindrical { params: ComplexTextureParams },
    /// Render type 2, with two extra translation bytes.
    Cube {
        params: ComplexTextureParams,
        translation: [i8; 2],
    },
    /// Render type 3.
    Spherical { params: ComplexTextureParams },
    /// Any other render type. Stores no P/M/N record.
    Other { render_type: u8 },
}

impl TextureProjection {
    /// Build a projection from its render type byte.
    ///
    /// Complex kinds start with default parameters.
    pub fn from_render_type(render_type: u8) -> Self {
        let params = ComplexTextureParams::default();
        match render_type {
            RENDER_PLANAR => Self::Planar,
            RENDER_CYLINDRICAL => Self::Cylindrical { params },
            RENDER_CUBE => Self::Cube {
                params,
                translation: [0, 0],
            },
            RENDER_SPHERICAL => Self::Spherical { params },
            render_type => Self::Other { render_type },
        }
    }

    pub fn render_type(&self) -> u8 {
        match self {
            Self::Planar => RENDER_PLANAR,
            Self::Cylindrical { .. } => RENDER_CYLINDRICAL,
            Self::Cube { .. } => RENDER_CUBE,
            Self::Spherical { .. } => RENDER_SPHERICAL,
            Self::Other { render_type } => *render_type,
        }
    }

    /// Human-readable kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Planar => "planar",
            Self::Cylindrical { .. } => "cylindrical",
            Self::Cube { .. } => "cube",
            Self::Spherical { .. } => "spherical",
            Self::Other { .. } => "unknown",
        }
    }

    /// Complex parameters, if this kind has them.
    pub fn params(&self) -> Option<&ComplexTextureParams> {
        match self {
            Self::Cylindrical { params } | Self::Spherical { params } | Self::Cube { params, .. } => {
                Some(params)
            }
            Self::Planar | Self::Other { .. } => None,
        }
    }

    pub fn params_mut(&mut self) -> Option<&mut ComplexTextureParams> {
        match self {
            Self::Cylindrical { params } | Self::Spherical { params } | Self::Cube { params, .. } => {
                Some(params)
            }
            Self::Planar | Self::Other { .. } => None,
        }
    }

    pub fn is_complex(&self) -> bool {
        self.params().is_some()
    }

    /// Whether the P/M/N indices are stored on the wire.
    pub fn has_record(&self) -> bool {
        !matches!(self, Self::Other { .. })
    }
}

/// A texture placement: three vertex indices and a projection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureTriangle {
    /// UV origin.
    pub p: u16,
    /// End of the U axis.
    pub m: u16,
    /// End of the V axis.
    pub n: u16,
    #[serde(default)]
    pub projection: TextureProjection,
}

impl TextureTriangle {
    /// A planar placement.
    pub fn planar(p: u16, m: u16, n: u16) -> Self {
        Self {
            p,
            m,
            n,
            projection: TextureProjection::Planar,
        }
    }

    pub fn indices(&self) -> [u16; 3] {
        [self.p, self.m, self.n]
    }
}
