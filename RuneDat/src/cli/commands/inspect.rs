//! CLI command for model inspection

use std::collections::BTreeMap;
use std::path::Path;

use crate::formats::common::skin_channel_count;
use crate::formats::{ModelFormat, dat317, dat667};
use crate::model::Mesh;

pub fn execute(source: &Path, format: Option<ModelFormat>) -> anyhow::Result<()> {
    let data = std::fs::read(source)?;
    let format = format.unwrap_or_else(|| ModelFormat::detect(&data));

    println!("Model: {}", source.display());
    println!("Format: {format} ({} bytes)", data.len());
    println!();

    match format {
        ModelFormat::Dat317 => print_317_footer(&dat317::Footer::parse(&data)?),
        ModelFormat::Dat667 => print_667_footer(&dat667::Footer::parse(&data)?),
    }

    let mesh = format.decode(&data)?;
    println!();
    print_summary(&mesh);
    Ok(())
}

fn print_317_footer(footer: &dat317::Footer) {
    println!("Footer:");
    println!("  Vertices: {}", footer.vertex_count);
    println!("  Faces: {}", footer.face_count);
    println!("  Texture triangles: {}", footer.texture_triangle_count);
    println!("  Textured: {}", footer.has_textures());
    println!("  Priority: {}", priority_label(footer.priority, footer.has_face_priorities()));
    println!("  Alphas: {}", footer.has_alphas());
    println!("  Face skins: {}", footer.has_tskins());
    println!("  Vertex skins: {}", footer.has_vertex_skins());
    println!(
        "  Stream lengths: x={} y={} z={} indices={}",
        footer.x_len, footer.y_len, footer.z_len, footer.indices_len
    );
}

fn print_667_footer(footer: &dat667::Footer) {
    println!("Footer:");
    println!("  Vertices: {}", footer.vertex_count);
    println!("  Triangles: {}", footer.triangle_count);
    println!("  Texture triangles: {}", footer.texture_triangle_count);
    println!("  Render info: {}", footer.has_render_info());
    println!("  Textured: {}", footer.has_textures());
    println!("  Priority: {}", priority_label(footer.priority, footer.has_face_priorities()));
    println!("  Alphas: {}", footer.has_alphas());
    println!("  Face skins: {}", footer.has_tskins());
    println!("  Vertex skins: {}", footer.has_vertex_skins());
    println!(
        "  Stream lengths: x={} y={} z={} indices={} texture coords={}",
        footer.x_len, footer.y_len, footer.z_len, footer.indices_len, footer.texture_coords_len
    );
}

fn priority_label(priority: u8, per_face: bool) -> String {
    if per_face {
        "per face".to_string()
    } else {
        priority.to_string()
    }
}

fn print_summary(mesh: &Mesh) {
    println!("Mesh:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Faces: {}", mesh.face_count());
    println!("  Textured faces: {}", mesh.textured_face_count());

    if let Some((min, max)) = bounds(mesh) {
        println!(
            "  Bounds: ({}, {}, {}) .. ({}, {}, {})",
            min[0], min[1], min[2], max[0], max[1], max[2]
        );
    }

    if !mesh.texture_triangles.is_empty() {
        let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        for tex in &mesh.texture_triangles {
            *by_kind.entry(tex.projection.name()).or_insert(0) += 1;
        }
        let kinds: Vec<String> = by_kind
            .iter()
            .map(|(kind, count)| format!("{count} {kind}"))
            .collect();
        println!(
            "  Texture triangles: {} ({})",
            mesh.texture_triangles.len(),
            kinds.join(", ")
        );
    }

    if let Some(skins) = &mesh.vertex_skins {
        println!("  Skin weight channels: {}", skin_channel_count(skins));
    }
    if let Some(alphas) = &mesh.face_alphas {
        let translucent = alphas.iter().filter(|&&a| a != crate::model::OPAQUE_ALPHA).count();
        println!("  Translucent faces: {translucent}");
    }
}

fn bounds(mesh: &Mesh) -> Option<([i32; 3], [i32; 3])> {
    let first = *mesh.vertices.first()?;
    let (mut min, mut max) = (first, first);
    for vertex in &mesh.vertices {
        for ((lo, hi), &c) in min.iter_mut().zip(max.iter_mut()).zip(vertex) {
            *lo = (*lo).min(c);
            *hi = (*hi).max(c);
        }
    }
    Some((min, max))
}
