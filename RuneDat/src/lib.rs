//! # RuneDat
//!
//! A pure-Rust encoder/decoder for RuneScape binary model (`.dat`) files.
//!
//! ## Supported Formats
//!
//! - **317/OSRS** - 18-byte footer, planar texture triangles
//! - **667** - 21-byte footer, planar plus cylindrical, cube and spherical
//!   texture projections
//! - **JSON** - a serde dump of the decoded mesh
//!
//! ## Quick Start
//!
//! ### Reading and Writing Models
//!
//! ```no_run
//! use runedat::formats::{ModelFormat, read_model, write_model};
//!
//! // Detect the layout from the trailing marker bytes
//! let (mesh, format) = read_model("model.dat", None)?;
//! println!("{format}: {} vertices, {} faces", mesh.vertex_count(), mesh.face_count());
//!
//! // Re-encode in the 317 layout
//! write_model("model_317.dat", &mesh, ModelFormat::Dat317)?;
//! # Ok::<(), runedat::Error>(())
//! ```
//!
//! ### Building a Mesh
//!
//! ```
//! use runedat::prelude::*;
//!
//! let mesh = Mesh::new(vec![[0, 0, 0], [10, 0, 0], [0, 10, 0]], vec![[0, 1, 2]]);
//! let bytes = ModelFormat::Dat317.encode(&mesh)?;
//! assert_eq!(ModelFormat::Dat317.decode(&bytes)?, mesh);
//! # Ok::<(), runedat::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `runedat` command-line binary

pub mod batch;
pub mod converter;
pub mod error;
pub mod formats;
pub mod model;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::{TextureBasis, pack_hsl, unpack_hsl};
    pub use crate::formats::{ModelFormat, read_model, write_model};
    pub use crate::model::{
        ComplexTextureParams, Mesh, TextureProjection, TextureTriangle, UvFallback,
    };

    pub use crate::converter;
    pub use crate::converter::{convert_model, mesh_from_json, mesh_to_json};

    // Batch conversion
    pub use crate::batch::{
        BatchConvertOptions, BatchConvertResult, BatchProgress, convert_directory,
        find_model_files,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
