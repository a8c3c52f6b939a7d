//! End-to-end enhancement: PNG on disk through the pipeline and back.

mod common;

use common::{assert_png_bytes, assert_same_shape_and_alpha, channel_spread, fixtures};
use dstretch::assets::AssetLoader;
use dstretch::models::{AppConfig, StatsReport};
use dstretch::rendering::{encode_png, read_png, write_png};
use dstretch_core::{ColorSpace, Enhancer, ParameterSet, PixelBuffer};
use pretty_assertions::assert_eq;

#[test]
fn test_png_file_round_trip_preserves_pixels() {
    let image = fixtures::random_image(17, 9, 7);
    let (dir, path) = fixtures::write_temp_png(&image, "noise.png");

    let loaded = read_png(&path).unwrap();
    assert_eq!(loaded, image);

    let out = dir.path().join("copy.png");
    write_png(&out, &loaded).unwrap();
    assert_png_bytes(&std::fs::read(&out).unwrap());
    assert_eq!(read_png(&out).unwrap(), image);
}

#[test]
fn test_neutral_parameters_leave_file_unchanged() {
    let image = fixtures::rock_art(32, 24);
    let (_dir, path) = fixtures::write_temp_png(&image, "rock.png");

    let loaded = read_png(&path).unwrap();
    let out = Enhancer::default().process(&loaded).unwrap();
    assert_eq!(encode_png(&out).unwrap(), encode_png(&image).unwrap());
}

#[test]
fn test_stretch_expands_faint_pigment_contrast() {
    let image = fixtures::rock_art(48, 48);
    let before = channel_spread(&image);

    for space in ColorSpace::ALL {
        let out = Enhancer::default()
            .dstretch(true)
            .colorspace(space)
            .stretch_amount(0.5)
            .process(&image)
            .unwrap();
        assert_same_shape_and_alpha(&image, &out);

        let after = channel_spread(&out);
        let gain = after.iter().sum::<f64>() / before.iter().sum::<f64>();
        assert!(
            gain > 1.5,
            "{space}: spread {before:?} -> {after:?} (gain {gain:.2})"
        );
    }
}

#[test]
fn test_every_embedded_preset_runs() {
    let config = AppConfig::load_from_assets(&AssetLoader::default());
    let image = fixtures::random_image(20, 16, 99);
    assert!(config.presets.len() >= 5);

    for (name, preset) in &config.presets {
        let out = Enhancer::new(preset.params.clone())
            .process(&image)
            .unwrap_or_else(|e| panic!("preset {name} failed: {e}"));
        assert_same_shape_and_alpha(&image, &out);
    }
}

#[test]
fn test_relief_preset_changes_image() {
    let config = AppConfig::load_from_assets(&AssetLoader::default());
    let params = config.resolve_params(Some("relief")).unwrap();
    let image = fixtures::raised_square(24);

    let out = Enhancer::new(params).process(&image).unwrap();
    assert_same_shape_and_alpha(&image, &out);
    assert_ne!(out, image);
}

#[test]
fn test_edge_overlay_marks_square_outline() {
    let image = fixtures::raised_square(24);
    let out = Enhancer::default()
        .edge_strength(15.0)
        .edge_thickness(2)
        .process(&image)
        .unwrap();

    // Far from the square the image is flat and nothing fires
    assert_eq!(out.rgba(2, 2), image.rgba(2, 2));
    assert_eq!(out.rgba(12, 12), image.rgba(12, 12));
    // The outline of the square is darkened by half
    assert_eq!(out.rgba(6, 12), [100, 100, 100, 255]);
}

#[test]
fn test_transparent_pixels_keep_alpha() {
    let pixels: Vec<[u8; 4]> = (0..64u8)
        .map(|i| [i * 3, 255 - i * 2, 100 + i, i * 4])
        .collect();
    let image = PixelBuffer::from_pixels(8, 8, &pixels).unwrap();
    let out = Enhancer::default()
        .dstretch(true)
        .colorspace(ColorSpace::Lab)
        .contrast(40.0)
        .normal_strength(50.0)
        .edge_strength(10.0)
        .process(&image)
        .unwrap();
    assert_same_shape_and_alpha(&image, &out);
}

#[test]
fn test_stats_report_for_file() {
    let image = fixtures::rock_art(16, 16);
    let (_dir, path) = fixtures::write_temp_png(&image, "rock.png");
    let report = StatsReport::from_image(&read_png(&path).unwrap(), ColorSpace::Rgb);

    assert_eq!((report.width, report.height), (16, 16));
    assert!(!report.fallback);
    assert!(report.eigenvalues[0] >= report.eigenvalues[1]);
    assert!(report.eigenvalues[1] >= report.eigenvalues[2]);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["colorspace"], "RGB");
}
