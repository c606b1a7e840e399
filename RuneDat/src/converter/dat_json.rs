//! DAT to JSON conversion

use std::path::Path;

use crate::error::Result;
use crate::formats::{ModelFormat, read_model, write_model};
use crate::model::Mesh;

/// Serialise a mesh as pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialisation fails.
pub fn mesh_to_json(mesh: &Mesh) -> Result<String> {
    Ok(serde_json::to_string_pretty(mesh)?)
}

/// Parse a mesh from JSON and check that it is self-consistent.
///
/// # Errors
/// Returns an error if the JSON is malformed or the mesh fails validation.
pub fn mesh_from_json(json: &str) -> Result<Mesh> {
    let mesh: Mesh = serde_json::from_str(json)?;
    mesh.validate()?;
    Ok(mesh)
}

/// Convert a model file to JSON, detecting its layout unless `format` is given.
///
/// # Errors
/// Returns an error if reading, decoding or writing fails.
pub fn convert_dat_to_json<P: AsRef<Path>>(source: P, dest: P, format: Option<ModelFormat>) -> Result<()> {
    tracing::info!("Converting DAT→JSON: {:?} → {:?}", source.as_ref(), dest.as_ref());
    let (mesh, _) = read_model(&source, format)?;
    std::fs::write(dest, mesh_to_json(&mesh)?)?;
    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert a JSON mesh to a model file in `format`.
///
/// # Errors
/// Returns an error if reading, parsing or encoding fails.
pub fn convert_json_to_dat<P: AsRef<Path>>(source: P, dest: P, format: ModelFormat) -> Result<()> {
    tracing::info!("Converting JSON→DAT ({}): {:?} → {:?}", format, source.as_ref(), dest.as_ref());
    let json = std::fs::read_to_string(&source)?;
    let mesh = mesh_from_json(&json)?;
    write_model(dest, &mesh, format)?;
    tracing::info!("Conversion complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::TextureTriangle;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_optional_sections_omitted() {
        let mesh = Mesh::new(vec![[0, 0, 0], [1, 0, 0], [0, 1, 0]], vec![[0, 1, 2]]);
        let json = mesh_to_json(&mesh).unwrap();
        assert!(!json.contains("face_alphas"));
        assert!(json.contains("\"model_priority\": 1"));
        assert_eq!(mesh_from_json(&json).unwrap(), mesh);
    }

    #[test]
    fn test_projection_is_tagged() {
        let mut mesh = Mesh::new(vec![[0, 0, 0], [1, 0, 0], [0, 1, 0]], vec![[0, 1, 2]]);
        mesh.texture_triangles = vec![TextureTriangle::planar(0, 1, 2)];
        let json = mesh_to_json(&mesh).unwrap();
        assert!(json.contains("\"kind\": \"planar\""));
    }

    #[test]
    fn test_invalid_mesh_rejected() {
        let json = r#"{"vertices": [[0, 0, 0]], "triangles": [[0, 0, 5]], "face_colors": [0]}"#;
        assert!(matches!(
            mesh_from_json(json),
            Err(Error::TriangleIndexOutOfRange { index: 5, .. })
        ));
        assert!(matches!(mesh_from_json("{"), Err(Error::JsonError(_))));
    }
}
