//! CLI interface for 317 ↔ 667 conversion

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step};
use crate::formats::{ModelFormat, read_model};

pub fn execute(
    source: &Path,
    destination: &Path,
    from: Option<ModelFormat>,
    to: ModelFormat,
) -> anyhow::Result<()> {
    let started = Instant::now();

    print_step(1, 3, LOOKING_GLASS, &format!("Reading {}...", source.display()));
    let (mesh, detected) = read_model(source, from)?;

    print_step(
        2,
        3,
        GEAR,
        &format!(
            "Converting {detected} -> {to} ({} vertices, {} faces)",
            mesh.vertex_count(),
            mesh.face_count()
        ),
    );
    let bytes = to.encode(&mesh)?;

    print_step(3, 3, DISK, &format!("Writing {} bytes to {}", bytes.len(), destination.display()));
    std::fs::write(destination, bytes)?;

    print_done(started.elapsed());
    Ok(())
}
