//! CLI commands for JSON dumps

use std::path::Path;

use crate::converter::{convert_dat_to_json, convert_json_to_dat};
use crate::formats::ModelFormat;

pub fn to_json(source: &Path, destination: &Path, from: Option<ModelFormat>) -> anyhow::Result<()> {
    println!("Converting {} -> {}", source.display(), destination.display());
    convert_dat_to_json(source, destination, from)?;
    println!("Conversion complete");
    Ok(())
}

pub fn from_json(source: &Path, destination: &Path, to: ModelFormat) -> anyhow::Result<()> {
    println!("Converting {} -> {} ({to})", source.display(), destination.display());
    convert_json_to_dat(source, destination, to)?;
    println!("Conversion complete");
    Ok(())
}
