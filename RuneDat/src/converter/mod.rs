//! Model conversion utilities
//!
//! - 317 ↔ 667 - transcoding between the binary layouts
//! - DAT ↔ JSON - a serde dump of the decoded [`Mesh`](crate::model::Mesh)
//!   for inspection and hand editing

mod dat_json;
mod transcode;

/// Progress callback type for conversion operations.
/// The callback receives a message describing the current step.
pub type ProgressCallback<'a> = &'a dyn Fn(&str);

pub use dat_json::{convert_dat_to_json, convert_json_to_dat, mesh_from_json, mesh_to_json};
pub use transcode::{convert_model, convert_model_bytes, convert_model_with_progress};
