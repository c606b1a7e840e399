//! 317 ↔ 667 transcoding

use std::path::Path;

use super::ProgressCallback;
use crate::error::Result;
use crate::formats::{ModelFormat, read_model, write_model};

/// Decode `data` (detecting its layout unless `from` is given) and re-encode
/// it as `to`.
///
/// # Errors
/// Returns an error if decoding or encoding fails.
pub fn convert_model_bytes(data: &[u8], from: Option<ModelFormat>, to: ModelFormat) -> Result<Vec<u8>> {
    let from = from.unwrap_or_else(|| ModelFormat::detect(data));
    let mesh = from.decode(data)?;
    to.encode(&mesh)
}

/// Convert a model file between layouts.
///
/// # Errors
/// Returns an error if reading, decoding, encoding or writing fails.
pub fn convert_model<P: AsRef<Path>>(source: P, dest: P, from: Option<ModelFormat>, to: ModelFormat) -> Result<()> {
    convert_model_with_progress(source, dest, from, to, &|_| {})
}

/// Convert a model file between layouts, reporting each step.
///
/// # Errors
/// Returns an error if reading, decoding, encoding or writing fails.
pub fn convert_model_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    from: Option<ModelFormat>,
    to: ModelFormat,
    progress: ProgressCallback,
) -> Result<()> {
    progress("Reading model...");
    let (mesh, from) = read_model(&source, from)?;
    tracing::info!("Converting {}→{}: {:?} → {:?}", from, to, source.as_ref(), dest.as_ref());

    progress(&format!("Writing {to} model..."));
    write_model(&dest, &mesh, to)?;

    progress("Complete");
    Ok(())
}
