use std::fs;
use std::path::{Path, PathBuf};

use depth_effects::assets::{load_depth, load_image};
use depth_effects::effects::{Distortion, Overlay};
use depth_effects::surface::{CpuSurface, PresentationSurface};
use depth_effects::{Compositor, CompositorError, DemoConfig, Effect, PointerState};

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("depth-effects-{}-{}", tag, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a 32x24 gradient photo and a radial depth map next to a config.
fn write_assets(dir: &Path) {
    let photo = image::RgbImage::from_fn(32, 24, |x, y| {
        image::Rgb([(x * 8) as u8, (y * 10) as u8, 96])
    });
    photo.save(dir.join("image.png")).unwrap();

    let depth = image::GrayImage::from_fn(16, 16, |x, y| {
        let dx = x as f32 - 7.5;
        let dy = y as f32 - 7.5;
        image::Luma([(255.0 - (dx * dx + dy * dy).sqrt() * 30.0).max(0.0) as u8])
    });
    depth.save(dir.join("depth.png")).unwrap();
}

#[test]
fn test_shipped_demo_matches_preset() {
    let config = DemoConfig::load(demo("depth_dot_lens.json")).unwrap();
    assert_eq!(config.effect, Effect::depth_dot_lens());
    assert_eq!(config.image_path, demo("image.png"));
}

#[test]
fn test_all_demos_parse() {
    let ripple = DemoConfig::load(demo("liquid_ripple.json")).unwrap();
    assert!(matches!(ripple.effect, Effect::Ripple(_)));

    let tilt = DemoConfig::load(demo("tilt_shift_scan.json")).unwrap();
    assert_eq!(tilt.target_fps, 30);
    assert!(matches!(
        tilt.effect,
        Effect::Layered {
            base: Distortion::TiltShift(_),
            overlay: Overlay::ScanLine(_),
        }
    ));
}

#[test]
fn test_shipped_demos_render() {
    let image = load_image(demo("image.png")).unwrap();
    let depth = load_depth(demo("depth.png")).unwrap();
    assert_eq!((image.width(), image.height()), (320, 240));
    assert_eq!((depth.width(), depth.height()), (320, 240));

    for name in ["depth_dot_lens.json", "liquid_ripple.json", "tilt_shift_scan.json"] {
        let config = DemoConfig::load(demo(name)).unwrap();
        let image = load_image(&config.image_path).unwrap();
        let depth = load_depth(&config.depth_path).unwrap();
        let compositor = Compositor::new(image, depth, config.effect.clone());
        let frame = compositor.render_frame(32, 24, PointerState::at(0.6, 0.5), 1.0);
        let rgba = frame.to_rgba8();
        assert_eq!(rgba.len(), 32 * 24 * 4, "{name}");
        assert!(rgba.chunks(4).all(|p| p[3] == 255), "{name}");
    }
}

#[test]
fn test_default_config_uses_shipped_assets() {
    let config = DemoConfig::default();
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    assert!(load_image(root.join(&config.image_path)).is_ok());
    assert!(load_depth(root.join(&config.depth_path)).is_ok());
}

#[test]
fn test_missing_assets_fail_startup() {
    let dir = scratch_dir("missing");
    let config_path = dir.join("demo.json");
    fs::write(&config_path, "{}").unwrap();
    let config = DemoConfig::load(&config_path).unwrap();
    fs::remove_dir_all(&dir).ok();

    match load_image(&config.image_path) {
        Err(CompositorError::AssetLoad { path, .. }) => assert_eq!(path, config.image_path),
        other => panic!("expected AssetLoad, got {other:?}"),
    }
}

#[test]
fn test_snapshot_end_to_end() {
    let dir = scratch_dir("snapshot");
    write_assets(&dir);
    let config_path = dir.join("demo.json");
    fs::write(
        &config_path,
        r#"{ "window_width": 40, "window_height": 30, "effect": { "kind": "lens", "require_hover": false } }"#,
    )
    .unwrap();

    let config = DemoConfig::load(&config_path).unwrap();
    let image = load_image(&config.image_path).unwrap();
    let depth = load_depth(&config.depth_path).unwrap();
    assert_eq!((image.width(), image.height()), (32, 24));
    assert_eq!((depth.width(), depth.height()), (16, 16));

    let compositor = Compositor::new(image, depth, config.effect.clone());
    let mut surface = CpuSurface::new();
    surface
        .configure(config.window_width, config.window_height)
        .unwrap();
    let frame = compositor.render_frame(40, 30, PointerState::at(0.5, 0.5), 1.0);
    surface.present(&frame).unwrap();

    let out = dir.join("out.png");
    surface.save_png(&out).unwrap();
    let saved = image::open(&out).unwrap().to_rgba8();
    fs::remove_dir_all(&dir).ok();

    assert_eq!(saved.dimensions(), (40, 30));
    assert!(saved.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn test_resized_snapshots_agree_at_shared_uv() {
    let dir = scratch_dir("resize");
    write_assets(&dir);
    let image = load_image(dir.join("image.png")).unwrap();
    let depth = load_depth(dir.join("depth.png")).unwrap();
    fs::remove_dir_all(&dir).ok();

    let compositor = Compositor::new(image, depth, Effect::depth_dot_lens());
    let pointer = PointerState::at(0.4, 0.4);
    let mut surface = CpuSurface::new();

    surface.configure(4, 4).unwrap();
    surface
        .present(&compositor.render_frame(4, 4, pointer, 2.0))
        .unwrap();
    // Pixel (1, 1) of 4x4 sits at uv 0.375
    let small = surface.pixels()[(4 + 1) * 4..(4 + 1) * 4 + 4].to_vec();

    // Pixel (4, 4) of 12x12 sits at the same uv
    surface.configure(12, 12).unwrap();
    surface
        .present(&compositor.render_frame(12, 12, pointer, 2.0))
        .unwrap();
    let large = surface.pixels()[(12 * 4 + 4) * 4..(12 * 4 + 4) * 4 + 4].to_vec();

    assert_eq!(small, large);
}
