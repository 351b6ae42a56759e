//! Integration Tests
//!
//! End-to-end tests for the imgprep dataset pipeline.

use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use imgprep::engine::{list_images, load_image, save_image, PixelBuffer};
use imgprep::pipeline::{DatasetWalker, OutputPolicy, PipelineConfig, TierConfig};
use imgprep::transform::{
    bilinear_resize, suppress_noise, threshold_binarize, to_grayscale, DenoiseConfig,
    TransformStep, LUMA_WEIGHTS,
};

/// Helper to create a uniform RGB buffer
fn rgb_buffer(width: usize, height: usize, rgb: [f32; 3]) -> PixelBuffer {
    let plane = width * height;
    let mut samples = Vec::with_capacity(plane * 3);
    for value in rgb {
        samples.extend(std::iter::repeat(value).take(plane));
    }
    PixelBuffer::from_samples(width, height, 3, samples).unwrap()
}

/// Helper to create a deterministic gradient buffer
fn gradient(width: usize, height: usize, channels: usize) -> PixelBuffer {
    let mut buffer = PixelBuffer::new(width, height, channels).unwrap();
    for c in 0..channels {
        for y in 0..height {
            for x in 0..width {
                let v = ((x * 7 + y * 13 + c * 29) % 97) as f32 / 96.0;
                buffer.set(x, y, c, v);
            }
        }
    }
    buffer
}

fn write_image(path: &Path, buffer: &PixelBuffer) {
    save_image(buffer, path).unwrap();
}

// === Full Pipeline Tests ===

#[test]
fn test_grayscale_tier_end_to_end() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    let rgb = [0.8, 0.4, 0.2];
    write_image(
        &src.path().join("64").join("waldo").join("a.jpg"),
        &rgb_buffer(64, 64, rgb),
    );
    write_image(
        &src.path().join("64").join("notwaldo").join("b.jpg"),
        &rgb_buffer(64, 64, rgb),
    );

    let config = PipelineConfig::new(src.path(), dst.path())
        .with_tier(TierConfig::divided("64", vec![TransformStep::Grayscale]));
    let summary = DatasetWalker::new(config).unwrap().run().unwrap();

    assert_eq!(summary.processed, 2);
    assert!(summary.is_clean());

    let expected: f32 = rgb.iter().zip(LUMA_WEIGHTS).map(|(v, w)| v * w).sum();
    for (class, name) in [("waldo", "a.jpg"), ("notwaldo", "b.jpg")] {
        let out = load_image(&dst.path().join("64").join(class).join(name)).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (64, 64, 1));
        // JPEG round trips are lossy
        assert_abs_diff_eq!(out.get(32, 32, 0), expected, epsilon = 0.05);
    }
}

#[test]
fn test_corrupt_file_is_skipped_not_fatal() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    let class_dir = src.path().join("128").join("waldo");
    write_image(&class_dir.join("good.jpg"), &rgb_buffer(16, 16, [0.5, 0.5, 0.5]));
    fs::write(class_dir.join("bad.jpg"), b"definitely not a jpeg").unwrap();

    let mut config = PipelineConfig::new(src.path(), dst.path())
        .with_tier(TierConfig::divided("128", vec![TransformStep::Grayscale]));
    config.parallel = false;
    let summary = DatasetWalker::new(config).unwrap().run().unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].code, "DECODE_ERROR");
    assert!(summary.failures[0].path.ends_with("bad.jpg"));

    let outputs = list_images(&dst.path().join("128").join("waldo"), "jpg");
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].ends_with("good.jpg"));
}

#[test]
fn test_unwritable_destination_is_skipped_not_fatal() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    let class_dir = src.path().join("64").join("notwaldo");
    write_image(&class_dir.join("blocked.png"), &rgb_buffer(8, 8, [0.3, 0.6, 0.9]));
    write_image(&class_dir.join("open.png"), &rgb_buffer(8, 8, [0.3, 0.6, 0.9]));

    // A directory where the output file should go
    let blocked = dst.path().join("64").join("notwaldo").join("blocked.png");
    fs::create_dir_all(&blocked).unwrap();

    let mut config = PipelineConfig::new(src.path(), dst.path())
        .with_tier(TierConfig::divided("64", vec![TransformStep::Grayscale]));
    config.extension = "png".to_string();
    let summary = DatasetWalker::new(config).unwrap().run().unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].code, "WRITE_ERROR");
    assert!(summary.failures[0].path.ends_with("blocked.png"));
    assert!(blocked.is_dir());

    let out = load_image(&dst.path().join("64").join("notwaldo").join("open.png")).unwrap();
    assert_eq!(out.channels(), 1);
}

#[test]
fn test_parallel_and_sequential_runs_agree() {
    let src = tempdir().unwrap();
    for i in 0..6 {
        write_image(
            &src.path().join("256").join("notwaldo").join(format!("{i}.png")),
            &gradient(12, 10, 3),
        );
    }

    let run = |parallel: bool| {
        let dst = tempdir().unwrap();
        let mut config = PipelineConfig::new(src.path(), dst.path()).with_tier(
            TierConfig::divided(
                "256",
                vec![TransformStep::Grayscale, TransformStep::resize_to(6)],
            ),
        );
        config.extension = "png".to_string();
        config.parallel = parallel;
        let summary = DatasetWalker::new(config).unwrap().run().unwrap();
        let first = load_image(&dst.path().join("256").join("notwaldo").join("0.png")).unwrap();
        (summary.processed, first)
    };

    let (seq_count, seq_image) = run(false);
    let (par_count, par_image) = run(true);
    assert_eq!(seq_count, 6);
    assert_eq!(par_count, 6);
    assert_eq!(seq_image, par_image);
    assert_eq!((par_image.width(), par_image.height()), (6, 6));
}

#[test]
fn test_skip_existing_leaves_outputs_alone() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    write_image(
        &src.path().join("original-images").join("1.png"),
        &rgb_buffer(8, 8, [0.1, 0.2, 0.3]),
    );

    let mut config = PipelineConfig::new(src.path(), dst.path())
        .with_tier(TierConfig::undivided("original-images", vec![TransformStep::Grayscale]));
    config.extension = "png".to_string();

    let first = DatasetWalker::new(config.clone()).unwrap().run().unwrap();
    assert_eq!(first.processed, 1);

    config.output_policy = OutputPolicy::SkipExisting;
    let second = DatasetWalker::new(config).unwrap().run().unwrap();
    assert_eq!((second.processed, second.skipped), (0, 1));
}

#[test]
fn test_denoise_on_gray_variant_tier() {
    let src = tempdir().unwrap();
    let dst = tempdir().unwrap();
    let mut image = PixelBuffer::filled(16, 16, 1, 0.05).unwrap();
    image.set(8, 8, 0, 0.9);
    write_image(&src.path().join("64-bw").join("waldo").join("speck.png"), &image);

    let mut config = PipelineConfig::new(src.path(), dst.path()).with_tier(TierConfig::divided(
        "64-bw",
        vec![TransformStep::Denoise(DenoiseConfig::default())],
    ));
    config.extension = "png".to_string();
    let summary = DatasetWalker::new(config).unwrap().run().unwrap();
    assert_eq!(summary.processed, 1);

    let out = load_image(&dst.path().join("64-bw").join("waldo").join("speck.png")).unwrap();
    assert_eq!((out.width(), out.height(), out.channels()), (16, 16, 1));
    assert_abs_diff_eq!(out.get(0, 0, 0), 0.05, epsilon = 0.01);
}

#[test]
fn test_denoise_without_grayscale_is_rejected() {
    let config = PipelineConfig::new("in", "out").with_tier(TierConfig::divided(
        "128",
        vec![TransformStep::Denoise(DenoiseConfig::default())],
    ));
    let err = DatasetWalker::new(config).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_same_source_and_destination_rejected() {
    let config = PipelineConfig::hey_waldo("data", "data");
    assert!(config.validate().is_err());
}

// === Transform Properties ===

#[test]
fn test_resize_identity_returns_input() {
    let buffer = gradient(9, 7, 3);
    let resized = bilinear_resize(&buffer, 9, 7).unwrap();
    assert_eq!(resized, buffer);
}

#[test]
fn test_resize_output_shape() {
    let buffer = gradient(9, 7, 3);
    for (w, h) in [(1, 1), (4, 20), (18, 14), (3, 7)] {
        let out = bilinear_resize(&buffer, w, h).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (w, h, 3));
    }
}

#[test]
fn test_grayscale_is_idempotent() {
    let once = to_grayscale(gradient(10, 10, 3));
    let twice = to_grayscale(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn test_threshold_only_raises_values() {
    let buffer = gradient(10, 10, 1);
    let out = threshold_binarize(buffer.clone(), 0.4);
    for (before, after) in buffer.samples().iter().zip(out.samples()) {
        if *before > 0.4 {
            assert_eq!(*after, 1.0);
        } else {
            assert_eq!(after, before);
        }
    }
}

#[test]
fn test_uniform_dark_image_survives_denoise() {
    let buffer = PixelBuffer::filled(20, 20, 1, 0.1).unwrap();
    let out = suppress_noise(&buffer, &DenoiseConfig::default()).unwrap();
    assert_eq!((out.width(), out.height()), (20, 20));
    for v in out.samples() {
        assert_abs_diff_eq!(*v, 0.1, epsilon = 1e-5);
    }
}

#[test]
fn test_uniform_bright_image_saturates() {
    let buffer = PixelBuffer::filled(20, 20, 1, 0.6).unwrap();
    let out = suppress_noise(&buffer, &DenoiseConfig::default()).unwrap();
    assert!(out.samples().iter().all(|v| *v == 1.0));
}
