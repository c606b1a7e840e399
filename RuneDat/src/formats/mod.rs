//! Model file formats
//!
//! - **317** - the 317/OSRS layout with an 18-byte trailing footer
//! - **667** - the versioned layout with a 21-byte footer and two marker bytes
//!
//! [`ModelFormat`] picks between the two codecs; [`read_model`] and
//! [`write_model`] wrap them with file access.

pub mod common;
pub mod dat317;
pub mod dat667;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Mesh, UvFallback};

/// Binary model layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    Dat317,
    Dat667,
}

impl ModelFormat {
    /// Guess the layout of a model buffer from its trailing marker bytes.
    #[must_use]
    pub fn detect(data: &[u8]) -> Self {
        if data.len() >= dat667::TRAILER_LEN && data.ends_with(&dat667::MARKER) {
            Self::Dat667
        } else {
            Self::Dat317
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Dat317 => dat317::FORMAT_NAME,
            Self::Dat667 => dat667::FORMAT_NAME,
        }
    }

    /// Fallback used for faces without a usable texture coordinate.
    #[must_use]
    pub fn uv_fallback(self) -> UvFallback {
        match self {
            Self::Dat317 => UvFallback::FaceVertices,
            Self::Dat667 => UvFallback::Zero,
        }
    }

    /// Decode a model buffer in this layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedInput`] if the buffer is too short.
    pub fn decode(self, data: &[u8]) -> Result<Mesh> {
        match self {
            Self::Dat317 => dat317::decode(data),
            Self::Dat667 => dat667::decode(data),
        }
    }

    /// Encode a mesh in this layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is inconsistent or does not fit the layout.
    pub fn encode(self, mesh: &Mesh) -> Result<Vec<u8>> {
        match self {
            Self::Dat317 => dat317::encode(mesh),
            Self::Dat667 => dat667::encode(mesh),
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "317" | "osrs" | "dat317" => Ok(Self::Dat317),
            "667" | "dat667" => Ok(Self::Dat667),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Read a model file, detecting its layout unless `format` is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn read_model<P: AsRef<Path>>(path: P, format: Option<ModelFormat>) -> Result<(Mesh, ModelFormat)> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let format = format.unwrap_or_else(|| ModelFormat::detect(&data));
    tracing::info!("Reading {} model: {}", format, path.display());
    let mesh = format.decode(&data)?;
    Ok((mesh, format))
}

/// Encode a mesh and write it to `path`.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn write_model<P: AsRef<Path>>(path: P, mesh: &Mesh, format: ModelFormat) -> Result<()> {
    let path = path.as_ref();
    let data = format.encode(mesh)?;
    tracing::info!("Writing {} model ({} bytes): {}", format, data.len(), path.display());
    std::fs::write(path, data)?;
    Ok(())
}
