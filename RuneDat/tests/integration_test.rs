use runedat::formats::{dat317, dat667};
use runedat::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn pyramid() -> Mesh {
    let mut mesh = Mesh::new(
        vec![
            [0, 0, 0],
            [200, 0, 0],
            [200, 200, 0],
            [0, 200, 0],
            [100, 100, -350],
            [-9000, 4000, 12000],
        ],
        vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4], [0, 2, 1], [5, 0, 3]],
    );
    mesh.face_colors = vec![0, 1234, 0, 0x7FFF, 52, 9];
    mesh
}

fn full_317() -> Mesh {
    let mut mesh = pyramid();
    mesh.face_texture_ids = Some(vec![40, -1, 7, -1, -1, 0]);
    mesh.face_texture_coords = Some(vec![0, -1, 1, -1, -1, 1]);
    mesh.face_render_types = Some(vec![1, 0, 0, 1, 0, 0]);
    mesh.face_colors = vec![0, 1234, 0, 0x7FFF, 52, 0];
    mesh.texture_triangles = vec![TextureTriangle::planar(0, 1, 4), TextureTriangle::planar(2, 3, 4)];
    mesh.face_priorities = Some(vec![0, 5, 10, 2, 2, 1]);
    mesh.face_tskins = Some(vec![1, 1, 2, 2, 3, 0]);
    mesh.face_alphas = Some(vec![255, 128, 0, 255, 200, 255]);
    mesh.vertex_skins = Some(vec![100, 100, 50, 254, 0, 150]);
    mesh
}

fn full_667() -> Mesh {
    let params = ComplexTextureParams {
        scale_x: 300,
        scale_y: -4,
        scale_z: 64,
        rotation: 12,
        direction: -1,
        speed: 7,
    };
    let mut mesh = pyramid();
    mesh.face_texture_ids = Some(vec![40, -1, 65534, 0, -1, 3]);
    mesh.face_texture_coords = Some(vec![0, -1, 3, -1, -1, 254]);
    mesh.face_render_types = Some(vec![0, 1, 2, 3, 0, 0]);
    mesh.texture_triangles = vec![
        TextureTriangle::planar(0, 1, 4),
        TextureTriangle {
            projection: TextureProjection::Cylindrical { params },
            ..TextureTriangle::planar(1, 2, 4)
        },
        TextureTriangle {
            projection: TextureProjection::Cube {
                params: ComplexTextureParams::default(),
                translation: [3, -3],
            },
            ..TextureTriangle::planar(2, 3, 4)
        },
        TextureTriangle {
            projection: TextureProjection::Spherical { params },
            ..TextureTriangle::planar(3, 0, 4)
        },
        TextureTriangle::planar(5, 0, 3),
        TextureTriangle {
            projection: TextureProjection::Other { render_type: 9 },
            ..TextureTriangle::planar(0, 0, 0)
        },
    ];
    mesh.face_priorities = Some(vec![3, 3, 3, 3, 0, 1]);
    mesh.face_tskins = Some(vec![0, 1, 2, 3, 4, 5]);
    mesh.face_alphas = Some(vec![0, 64, 128, 192, 255, 255]);
    mesh.vertex_skins = Some(vec![0, 1, 2, 3, 4, 5]);
    mesh
}

#[test]
fn test_scenario_triangle_317() {
    let mesh = Mesh::new(vec![[0, 0, 0], [10, 0, 0], [0, 10, 0]], vec![[0, 1, 2]]);
    let bytes = dat317::encode(&mesh).unwrap();
    let decoded = dat317::decode(&bytes).unwrap();
    assert_eq!(decoded.vertices, mesh.vertices);
    assert_eq!(decoded.triangles, mesh.triangles);
    assert_eq!(decoded.face_colors, vec![0]);
    assert_eq!(decoded.priority(0), 1);
    assert_eq!(decoded.textured_face_count(), 0);
}

#[test]
fn test_317_round_trip_all_sections() {
    let mesh = full_317();
    let bytes = dat317::encode(&mesh).unwrap();
    let footer = dat317::Footer::parse(&bytes).unwrap();
    assert!(footer.has_textures());
    assert!(footer.has_face_priorities());
    assert!(footer.has_alphas());
    assert!(footer.has_tskins());
    assert!(footer.has_vertex_skins());
    assert_eq!(dat317::decode(&bytes).unwrap(), mesh);
}

#[test]
fn test_667_round_trip_all_projection_kinds() {
    let mesh = full_667();
    let bytes = dat667::encode(&mesh).unwrap();
    let footer = dat667::Footer::parse(&bytes).unwrap();
    assert!(footer.has_render_info());
    assert!(footer.has_textures());
    assert_eq!(footer.texture_triangle_count, 6);
    // one coordinate byte per textured face
    assert_eq!(footer.texture_coords_len, 4);
    assert_eq!(dat667::decode(&bytes).unwrap(), mesh);
}

#[test]
fn test_667_to_317_needs_planar_textures() {
    let mesh = full_667();
    assert!(matches!(
        dat317::encode(&mesh),
        Err(Error::UnsupportedProjection { index: 1, .. })
    ));

    // untextured geometry transcodes freely
    let bytes = dat667::encode(&pyramid()).unwrap();
    let converted = runedat::converter::convert_model_bytes(&bytes, None, ModelFormat::Dat317).unwrap();
    assert_eq!(ModelFormat::detect(&converted), ModelFormat::Dat317);
    assert_eq!(dat317::decode(&converted).unwrap(), pyramid());
}

#[test]
fn test_format_detection() {
    let old = ModelFormat::Dat317.encode(&full_317()).unwrap();
    let new = ModelFormat::Dat667.encode(&full_667()).unwrap();
    assert_eq!(ModelFormat::detect(&old), ModelFormat::Dat317);
    assert_eq!(ModelFormat::detect(&new), ModelFormat::Dat667);
    assert_eq!(ModelFormat::Dat317.uv_fallback(), UvFallback::FaceVertices);
    assert_eq!(ModelFormat::Dat667.uv_fallback(), UvFallback::Zero);
}

#[test]
fn test_truncated_footers_rejected() {
    assert!(matches!(
        dat317::decode(&[0; 10]),
        Err(Error::TruncatedInput { needed: 18, found: 10, .. })
    ));
    assert!(matches!(
        dat667::decode(&[0; 20]),
        Err(Error::TruncatedInput { needed: 23, found: 20, .. })
    ));

    // the footer survives but the counts no longer fit
    let bytes = dat317::encode(&pyramid()).unwrap();
    let footer_only = &bytes[bytes.len() - dat317::FOOTER_LEN..];
    assert!(matches!(
        dat317::decode(footer_only),
        Err(Error::TruncatedInput { .. })
    ));
}

#[test]
fn test_out_of_range_index_clamped_on_decode() {
    let mesh = Mesh::new(vec![[0, 0, 0], [1, 0, 0], [0, 1, 0]], vec![[0, 1, 2]]);
    let mut bytes = dat317::encode(&mesh).unwrap();
    let footer = dat317::Footer::parse(&bytes).unwrap();
    // index deltas were 0, 1, 1; the first becomes 63 so all three run past vertex 2
    let s = usize::from(footer.vertex_count) + usize::from(footer.face_count);
    assert_eq!(&bytes[s..s + 3], &[64, 65, 65]);
    bytes[s] = 0x7F;
    let decoded = dat317::decode(&bytes).unwrap();
    assert_eq!(decoded.triangles, vec![[2, 2, 2]]);
}

#[test]
fn test_huge_index_clamped_to_last_vertex() {
    let footer = dat317::Footer {
        vertex_count: 10,
        face_count: 1,
        indices_len: 5,
        ..dat317::Footer::default()
    };
    let mut bytes = vec![0u8; 10];
    bytes.push(1);
    // index deltas 9999, -9999, 1
    bytes.extend_from_slice(&[0xE7, 0x0F, 0x98, 0xF1, 65]);
    bytes.extend_from_slice(&[0, 0]);
    footer.write(&mut bytes).unwrap();

    let decoded = dat317::decode(&bytes).unwrap();
    assert_eq!(decoded.vertices.len(), 10);
    assert_eq!(decoded.triangles, vec![[9, 0, 1]]);
}

#[test]
fn test_extreme_coordinate_is_an_encode_error() {
    let mesh = Mesh::new(vec![[0, 0, i32::MIN], [0, 0, 0], [1, 0, 0]], vec![[0, 1, 2]]);
    assert!(matches!(
        dat317::encode(&mesh),
        Err(Error::SmartIntOutOfRange { .. })
    ));
    assert!(matches!(
        dat667::encode(&mesh),
        Err(Error::SmartIntOutOfRange { .. })
    ));
}

#[test]
fn test_face_uvs_for_planar_texture() {
    let mut mesh = Mesh::new(vec![[0, 0, 0], [128, 0, 0], [0, 128, 0]], vec![[0, 1, 2]]);
    mesh.face_texture_ids = Some(vec![1]);
    mesh.face_texture_coords = Some(vec![0]);
    mesh.texture_triangles = vec![TextureTriangle::planar(0, 1, 2)];

    let uvs = mesh.face_uvs(UvFallback::FaceVertices);
    let corners = uvs[0].unwrap();
    assert!((corners[0].x - 0.0).abs() < 1e-9 && (corners[0].y - 1.0).abs() < 1e-9);
    assert!((corners[1].x - 1.0).abs() < 1e-9 && (corners[1].y - 1.0).abs() < 1e-9);
    assert!((corners[2].x - 0.0).abs() < 1e-9 && (corners[2].y - 0.0).abs() < 1e-9);
}

#[test]
fn test_json_round_trip() {
    let mesh = full_667();
    let json = mesh_to_json(&mesh).unwrap();
    assert!(json.contains("\"kind\": \"cube\""));
    assert_eq!(mesh_from_json(&json).unwrap(), mesh);
}

#[test]
fn test_file_helpers() {
    let dir = tempdir().unwrap();
    let dat = dir.path().join("pyramid.dat");
    let json = dir.path().join("pyramid.json");
    let back = dir.path().join("pyramid_667.dat");

    write_model(&dat, &full_317(), ModelFormat::Dat317).unwrap();
    converter::convert_dat_to_json(&dat, &json, None).unwrap();
    converter::convert_json_to_dat(&json, &back, ModelFormat::Dat667).unwrap();

    let (mesh, format) = read_model(&back, None).unwrap();
    assert_eq!(format, ModelFormat::Dat667);
    assert_eq!(mesh.vertices, full_317().vertices);
    assert_eq!(mesh.face_texture_ids, full_317().face_texture_ids);
}

#[test]
fn test_batch_convert_directory() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    std::fs::create_dir_all(src.path().join("npcs")).unwrap();
    write_model(src.path().join("a.dat"), &pyramid(), ModelFormat::Dat317).unwrap();
    write_model(src.path().join("npcs/b.dat"), &full_667(), ModelFormat::Dat667).unwrap();
    std::fs::write(src.path().join("npcs/broken.dat"), [1u8, 2, 3]).unwrap();
    std::fs::write(src.path().join("readme.txt"), "not a model").unwrap();

    let options = BatchConvertOptions {
        target: ModelFormat::Dat667,
        source: None,
    };
    let seen = std::sync::atomic::AtomicUsize::new(0);
    let result = convert_directory(src.path(), dst.path(), &options, |progress| {
        assert_eq!(progress.total, 3);
        seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    })
    .unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(result.fail_count, 1);
    assert_eq!(result.results.len(), 3);
    assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 3);

    let (a, format) = read_model(dst.path().join("a.dat"), None).unwrap();
    assert_eq!(format, ModelFormat::Dat667);
    assert_eq!(a, pyramid());
    let (b, _) = read_model(dst.path().join("npcs/b.dat"), None).unwrap();
    assert_eq!(b, full_667());
    assert!(!dst.path().join("npcs/broken.dat").exists());
}
