use std::path::{Path, PathBuf};
use baker_pictor::core::{scan_sources, AssetOutcome, AssetStage, ConfigError, IconBakerConfig, IconBatch};
use baker_pictor::hosts::SoftwareHost;
use image::RgbaImage;
use crate::glb::{temp_dir, write_glb, write_glb_with, CubeLayout, Node};

const ICON_SIZE: u32 = 64;

fn project(name: &str) -> (PathBuf, IconBakerConfig)
{
    let root = temp_dir(name);
    std::fs::create_dir_all(root.join("models")).unwrap();

    let config_text = format!(r#"
        project_root = {:?}
        models_dir = "models"
        textures_dir = "textures"
        output_dir = "icons"
        icon_size = {ICON_SIZE}
    "#, root.to_string_lossy());
    std::fs::write(root.join(IconBakerConfig::DEFAULT_FILE_NAME), config_text).unwrap();

    let config = IconBakerConfig::load_or_default(root.join(IconBakerConfig::DEFAULT_FILE_NAME)).unwrap();
    (root, config)
}

fn bake(config: &IconBakerConfig) -> baker_pictor::core::BatchSummary
{
    let host = SoftwareHost::new(config.render_settings());
    let mut batch = IconBatch::from_config(host, config).unwrap();
    let sources = scan_sources(config.models_path(), config.extensions()).unwrap();
    batch.run(&sources)
}

struct Coverage
{
    opaque: usize,
    min: (u32, u32),
    max: (u32, u32),
}

fn coverage(image: &RgbaImage) -> Coverage
{
    let mut cov = Coverage { opaque: 0, min: (u32::MAX, u32::MAX), max: (0, 0) };
    for (x, y, px) in image.enumerate_pixels()
    {
        if px.0[3] >= 128
        {
            cov.opaque += 1;
            cov.min = (cov.min.0.min(x), cov.min.1.min(y));
            cov.max = (cov.max.0.max(x), cov.max.1.max(y));
        }
    }
    cov
}

fn load_icon(path: &Path) -> RgbaImage
{
    image::open(path).unwrap().to_rgba8()
}

#[test]
fn bakes_a_directory()
{
    let (root, config) = project("bake_dir");
    let models = root.join("models");
    write_glb(models.join("a_cube.glb"), &[Node::cube("Cube")], &[0]);
    write_glb(models.join("b_far_cube.GLB"), &[Node::cube("Big").at([100.0, 0.0, -50.0]).scaled(30.0)], &[0]);
    write_glb(models.join("c_empty.glb"), &[], &[]);
    std::fs::write(models.join("d_broken.glb"), b"not a model").unwrap();
    std::fs::write(models.join("readme.txt"), b"ignored").unwrap();

    let summary = bake(&config);
    assert_eq!(summary.total(), 4);
    assert_eq!(summary.rendered(), 2);
    assert_eq!(summary.empty(), 1);
    assert_eq!(summary.failed(), 1);
    let failures: Vec<_> = summary.failures().map(|(name, err)| (name.to_string(), err.stage)).collect();
    assert_eq!(failures, [("d_broken".to_string(), AssetStage::Imported)]);

    let icons = root.join("icons");
    let mut written: Vec<_> = std::fs::read_dir(&icons).unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, ["a_cube.png", "b_far_cube.png"]);

    let small = load_icon(&icons.join("a_cube.png"));
    let large = load_icon(&icons.join("b_far_cube.png"));
    assert_eq!(small.dimensions(), (ICON_SIZE, ICON_SIZE));
    assert_eq!(large.dimensions(), (ICON_SIZE, ICON_SIZE));

    // same shape, same framing, regardless of size and placement
    let (small_cov, large_cov) = (coverage(&small), coverage(&large));
    assert!(small_cov.opaque > 0);
    assert!(small_cov.opaque.abs_diff(large_cov.opaque) <= small_cov.opaque / 50 + 2,
        "{} vs {}", small_cov.opaque, large_cov.opaque);

    for cov in [small_cov, large_cov]
    {
        // padded away from the border and centered
        assert!(cov.min.0 >= 3 && cov.min.1 >= 3);
        assert!(cov.max.0 < ICON_SIZE - 3 && cov.max.1 < ICON_SIZE - 3);
        let center_x = (cov.min.0 + cov.max.0) as f32 / 2.0;
        let center_y = (cov.min.1 + cov.max.1) as f32 / 2.0;
        assert!((center_x - 31.5).abs() <= 1.5, "{center_x}");
        assert!((center_y - 31.5).abs() <= 1.5, "{center_y}");
    }

    // untextured icons use the imported (default gray) material on a transparent background
    assert_eq!(small.get_pixel(0, 0).0[3], 0);
    let [r, g, b, a] = small.get_pixel(32, 32).0;
    assert_eq!(a, 255);
    assert!(r == g && g == b, "{r} {g} {b}");

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn unreadable_vertex_data_fails_only_that_asset()
{
    let (root, config) = project("bake_accessors");
    let models = root.join("models");
    write_glb_with(models.join("a_quantized.glb"), &[Node::cube("Packed")], &[0], CubeLayout::QuantizedPositions);
    write_glb_with(models.join("b_no_indices.glb"), &[Node::cube("Hollow")], &[0], CubeLayout::EmptyIndices);
    write_glb(models.join("c_cube.glb"), &[Node::cube("Cube")], &[0]);

    let summary = bake(&config);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.failed(), 2);
    assert_eq!(summary.rendered(), 1);
    let failures: Vec<_> = summary.failures().map(|(name, err)| (name.to_string(), err.stage)).collect();
    assert_eq!(failures, [
        ("a_quantized".to_string(), AssetStage::Imported),
        ("b_no_indices".to_string(), AssetStage::Imported),
    ]);
    assert!(root.join("icons").join("c_cube.png").exists());

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn shared_texture_is_applied()
{
    let (root, config) = project("bake_textured");
    write_glb(root.join("models").join("cube.glb"), &[Node::cube("Cube")], &[0]);

    std::fs::create_dir_all(root.join("textures")).unwrap();
    RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]))
        .save(config.texture_path())
        .unwrap();

    let summary = bake(&config);
    assert_eq!(summary.rendered(), 1);
    let Ok(AssetOutcome::Rendered { output, mesh_count, .. }) = &summary.reports[0].result else { panic!("{summary:?}") };
    assert_eq!(*mesh_count, 1);

    let icon = load_icon(output);
    let [r, g, b, a] = icon.get_pixel(32, 32).0;
    assert_eq!(a, 255);
    assert!(r > 0 && g == 0 && b == 0, "{r} {g} {b}");

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn asset_limit_and_rerun()
{
    let (root, mut config) = project("bake_limit");
    for name in ["a", "b", "c"]
    {
        write_glb(root.join("models").join(format!("{name}.glb")), &[Node::cube("Cube")], &[0]);
    }

    config.max_assets = Some(2);
    let summary = bake(&config);
    assert_eq!(summary.rendered(), 2);
    assert_eq!(summary.not_processed, 1);
    assert!(!root.join("icons").join("c.png").exists());

    // existing icons are replaced in place
    config.max_assets = None;
    let summary = bake(&config);
    assert_eq!(summary.rendered(), 3);
    assert_eq!(std::fs::read_dir(root.join("icons")).unwrap().count(), 3);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn configuration_errors_are_fatal()
{
    let (root, config) = project("bake_config");

    let missing_models = IconBakerConfig { models_dir: PathBuf::from("nowhere"), ..config.clone() };
    let host = SoftwareHost::new(missing_models.render_settings());
    assert!(matches!(IconBatch::from_config(host, &missing_models), Err(ConfigError::MissingInputDir(_))));

    let no_padding = IconBakerConfig { padding: 1.0, ..config };
    let host = SoftwareHost::new(no_padding.render_settings());
    assert!(matches!(IconBatch::from_config(host, &no_padding), Err(ConfigError::InvalidFraming(_))));
    assert!(!root.join("icons").exists());

    std::fs::write(root.join(IconBakerConfig::DEFAULT_FILE_NAME), "padding = [1, 2]").unwrap();
    assert!(matches!(
        IconBakerConfig::load_or_default(root.join(IconBakerConfig::DEFAULT_FILE_NAME)),
        Err(ConfigError::Parse(_))));

    let _ = std::fs::remove_dir_all(&root);
}
