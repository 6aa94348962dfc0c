//! End-to-end batch behavior against real files on disk

use std::fs;
use std::path::{Path, PathBuf};

use image::{ColorType, Rgb, RgbImage, Rgba, RgbaImage};
use logostamp::{
    run_batch, BatchRequest, EventLog, ProcessingEvent, WatermarkEngine, WatermarkError,
};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    input: PathBuf,
    output: PathBuf,
    logo: PathBuf,
}

impl Fixture {
    /// Empty input folder, output folder not yet created, 100x50 white logo
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input_images");
        let output = dir.path().join("output_images");
        let logo = dir.path().join("logo.png");
        fs::create_dir(&input).unwrap();
        RgbaImage::from_pixel(100, 50, Rgba([255, 255, 255, 255])).save(&logo).unwrap();

        Self { _dir: dir, input, output, logo }
    }

    fn add_png(&self, name: &str, width: u32, height: u32, color: Rgba<u8>) -> PathBuf {
        let path = self.input.join(name);
        RgbaImage::from_pixel(width, height, color).save(&path).unwrap();
        path
    }

    fn request(&self, percentage: u32) -> BatchRequest {
        BatchRequest::new(self.input.clone(), self.output.clone(), self.logo.clone())
            .percentage(percentage)
    }

    fn run(&self, request: &BatchRequest) -> (logostamp::Result<logostamp::BatchSummary>, Vec<ProcessingEvent>) {
        let mut log = EventLog::new();
        let result = WatermarkEngine::new().run(request, &mut log);
        (result, log.into_events())
    }

    fn output_of(&self, name: &str) -> PathBuf {
        self.output.join(name)
    }
}

fn rgba(path: &Path) -> RgbaImage {
    image::open(path).unwrap().to_rgba8()
}

#[test]
fn test_stamps_every_supported_image() {
    let fx = Fixture::new();
    fx.add_png("a.png", 200, 200, Rgba([0, 0, 0, 255]));
    fx.add_png("b.PNG", 300, 120, Rgba([0, 0, 0, 255]));
    RgbImage::from_pixel(200, 100, Rgb([0, 0, 0])).save(fx.input.join("c.bmp")).unwrap();
    fs::write(fx.input.join("notes.txt"), b"ignore me").unwrap();

    let (result, events) = fx.run(&fx.request(15));
    let summary = result.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failed, 0);
    assert!(summary.is_clean());

    assert!(matches!(events[0], ProcessingEvent::FolderCreated { .. }));
    let processed: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ProcessingEvent::FileProcessed { index, total, .. } => Some((*index, *total)),
            _ => None,
        })
        .collect();
    assert_eq!(processed, vec![(1, 3), (2, 3), (3, 3)]);

    assert!(!fx.output_of("notes.txt").exists());
    for (name, dims) in [("a.png", (200, 200)), ("b.PNG", (300, 120)), ("c.bmp", (200, 100))] {
        let out = image::open(fx.output_of(name)).unwrap();
        assert_eq!((out.width(), out.height()), dims, "{}", name);
    }
}

#[test]
fn test_logo_lands_at_offset() {
    let fx = Fixture::new();
    fx.add_png("photo.png", 200, 200, Rgba([0, 0, 0, 255]));

    fx.run(&fx.request(15)).0.unwrap();
    let out = rgba(&fx.output_of("photo.png"));

    // 30x15 logo at (10, 10)
    assert_eq!(*out.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
    assert_eq!(*out.get_pixel(45, 30), Rgba([0, 0, 0, 255]));
    assert_eq!(*out.get_pixel(199, 199), Rgba([0, 0, 0, 255]));
    let inside = out.get_pixel(25, 17);
    assert!(inside[0] > 200, "expected logo color, got {:?}", inside);
}

#[test]
fn test_png_keeps_transparency_other_formats_flatten() {
    let fx = Fixture::new();
    fx.add_png("clear.png", 100, 100, Rgba([10, 20, 30, 0]));
    fx.add_png("clear.gif", 100, 100, Rgba([10, 20, 30, 0]));
    RgbImage::from_pixel(100, 100, Rgb([90, 90, 90])).save(fx.input.join("shot.jpg")).unwrap();

    let summary = fx.run(&fx.request(20)).0.unwrap();
    assert_eq!(summary.processed, 3);

    let png = image::open(fx.output_of("clear.png")).unwrap();
    assert_eq!(png.color(), ColorType::Rgba8);
    let png = png.to_rgba8();
    assert_eq!(png.get_pixel(90, 90)[3], 0);
    assert_eq!(png.get_pixel(15, 12)[3], 255);

    let jpg = image::open(fx.output_of("shot.jpg")).unwrap();
    assert_eq!(jpg.color(), ColorType::Rgb8);
    assert_eq!((jpg.width(), jpg.height()), (100, 100));

    let gif = image::open(fx.output_of("clear.gif")).unwrap();
    assert_eq!((gif.width(), gif.height()), (100, 100));
}

#[test]
fn test_missing_logo_is_fatal_and_silent() {
    let fx = Fixture::new();
    fx.add_png("a.png", 200, 200, Rgba([0, 0, 0, 255]));
    let request = BatchRequest::new(fx.input.clone(), fx.output.clone(), fx.input.join("nope.png"));

    let (result, events) = fx.run(&request);

    assert!(matches!(result, Err(WatermarkError::LogoNotFound { .. })));
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ProcessingEvent::FatalLogoError { .. }));
    assert!(!fx.output.exists());
}

#[test]
fn test_corrupt_logo_is_fatal() {
    let fx = Fixture::new();
    fx.add_png("a.png", 200, 200, Rgba([0, 0, 0, 255]));
    fs::write(&fx.logo, b"not a picture").unwrap();

    let (result, events) = fx.run(&fx.request(15));

    let err = result.unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, WatermarkError::LogoLoadError { .. }));
    assert_eq!(events.len(), 1);
    assert!(events[0].is_fatal());
}

#[test]
fn test_missing_input_folder_is_fatal() {
    let fx = Fixture::new();
    let request = BatchRequest::new(fx.input.join("gone"), fx.output.clone(), fx.logo.clone());

    let (result, events) = fx.run(&request);

    assert!(matches!(result, Err(WatermarkError::InputFolderError { .. })));
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ProcessingEvent::FatalFolderError { .. }));
}

#[test]
fn test_empty_input_is_informational() {
    let fx = Fixture::new();

    let (result, events) = fx.run(&fx.request(15));
    let summary = result.unwrap();

    assert_eq!(summary.total, 0);
    assert!(fx.output.is_dir());
    assert_eq!(
        events,
        vec![
            ProcessingEvent::FolderCreated { path: fx.output.clone() },
            ProcessingEvent::EmptyInput,
        ]
    );
}

#[test]
fn test_existing_output_folder_is_not_reported() {
    let fx = Fixture::new();
    fs::create_dir(&fx.output).unwrap();

    let (_, events) = fx.run(&fx.request(15));
    assert_eq!(events, vec![ProcessingEvent::EmptyInput]);
}

#[test]
fn test_bad_file_does_not_stop_batch() {
    let fx = Fixture::new();
    fs::write(fx.input.join("broken.png"), b"garbage").unwrap();
    fx.add_png("good.png", 200, 200, Rgba([0, 0, 0, 255]));

    let (result, events) = fx.run(&fx.request(15));
    let summary = result.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert!(events.iter().any(|e| matches!(
        e,
        ProcessingEvent::FileError { filename, .. } if filename == "broken.png"
    )));
    assert!(fx.output_of("good.png").exists());
    assert!(!fx.output_of("broken.png").exists());
}

#[test]
fn test_write_failure_is_per_file() {
    let fx = Fixture::new();
    fx.add_png("blocked.png", 200, 200, Rgba([0, 0, 0, 255]));
    fx.add_png("fine.png", 200, 200, Rgba([0, 0, 0, 255]));
    // A directory where the output file should go
    fs::create_dir_all(fx.output_of("blocked.png")).unwrap();

    let (result, events) = fx.run(&fx.request(15));
    let summary = result.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 1);
    assert!(events.iter().any(|e| matches!(
        e,
        ProcessingEvent::FileError { filename, .. } if filename == "blocked.png"
    )));
    assert!(fx.output_of("fine.png").is_file());
}

#[test]
fn test_out_of_bounds_copies_pixels() {
    let fx = Fixture::new();
    let input = fx.add_png("tiny.png", 20, 20, Rgba([12, 34, 56, 200]));

    // 60% of 20px -> 12x6 logo at (10, 10) overflows the right edge
    let (result, events) = fx.run(&fx.request(60));
    let summary = result.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.overlay_skipped, 1);
    assert!(events.iter().any(|e| matches!(e, ProcessingEvent::FileSkippedWarning { .. })));
    assert_eq!(rgba(&fx.output_of("tiny.png")), rgba(&input));
}

#[test]
fn test_zero_width_falls_back_then_skips() {
    let fx = Fixture::new();
    let input = fx.add_png("speck.png", 6, 6, Rgba([1, 2, 3, 255]));

    let (result, events) = fx.run(&fx.request(15));
    let summary = result.unwrap();

    assert_eq!(summary.size_fallbacks, 1);
    assert_eq!(summary.overlay_skipped, 1);
    assert_eq!(summary.processed, 1);
    assert!(events.iter().any(|e| matches!(e, ProcessingEvent::LogoFallbackWarning { .. })));
    assert!(events.iter().any(|e| matches!(e, ProcessingEvent::FileSkippedWarning { .. })));
    assert_eq!(rgba(&fx.output_of("speck.png")), rgba(&input));
}

#[test]
fn test_runs_are_deterministic() {
    let fx = Fixture::new();
    fx.add_png("a.png", 240, 160, Rgba([40, 80, 120, 255]));
    RgbImage::from_pixel(180, 90, Rgb([200, 100, 0])).save(fx.input.join("b.jpg")).unwrap();

    fx.run(&fx.request(25)).0.unwrap();
    let first_a = rgba(&fx.output_of("a.png"));
    let first_b = rgba(&fx.output_of("b.jpg"));

    fx.run(&fx.request(25)).0.unwrap();
    assert_eq!(rgba(&fx.output_of("a.png")), first_a);
    assert_eq!(rgba(&fx.output_of("b.jpg")), first_b);
}

#[test]
fn test_outputs_do_not_depend_on_batch_contents() {
    let fx = Fixture::new();
    fx.add_png("a.png", 240, 160, Rgba([40, 80, 120, 255]));
    fx.run(&fx.request(15)).0.unwrap();
    let alone = rgba(&fx.output_of("a.png"));

    let crowded = Fixture::new();
    crowded.add_png("0.png", 1000, 30, Rgba([9, 9, 9, 255]));
    crowded.add_png("a.png", 240, 160, Rgba([40, 80, 120, 255]));
    crowded.add_png("z.png", 15, 900, Rgba([9, 9, 9, 255]));
    crowded.run(&crowded.request(15)).0.unwrap();

    assert_eq!(rgba(&crowded.output_of("a.png")), alone);
}

#[test]
fn test_run_batch_without_sink() {
    let fx = Fixture::new();
    fx.add_png("a.png", 200, 200, Rgba([0, 0, 0, 255]));

    let summary = run_batch(&fx.request(15)).unwrap();
    assert_eq!(summary.processed, 1);
    assert!(fx.output_of("a.png").exists());
}
