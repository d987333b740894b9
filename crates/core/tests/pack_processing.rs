//! Pack processing integration tests.
//!
//! These tests drive the full per-item pipeline with mock Telegram and
//! transcoder backends:
//! - Every sticker is attempted, in API order
//! - Static stickers are downscaled and written per configured format
//! - Animated stickers go through the transcoder (or are saved raw)
//! - One item's failure never aborts the rest of the run

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use tempfile::TempDir;

use packgrab_core::testing::{fixtures, MockTelegramApi, MockTranscoder, TranscodeMode};
use packgrab_core::{
    ArtifactKind, ArtifactStore, PackProcessor, ProcessorConfig, ProcessorError, StaticFormat,
    StickerKind, StickerPack, TelegramError,
};

/// Test helper bundling processor, mocks, and temp directories.
struct TestHarness {
    processor: PackProcessor<MockTelegramApi, MockTranscoder>,
    client: MockTelegramApi,
    transcoder: MockTranscoder,
    output_dir: TempDir,
    _work_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    fn with_config(mut config: ProcessorConfig) -> Self {
        let output_dir = TempDir::new().expect("failed to create output dir");
        let work_dir = TempDir::new().expect("failed to create work dir");
        config.work_dir = work_dir.path().to_path_buf();

        let client = MockTelegramApi::new();
        let transcoder = MockTranscoder::new();
        let store = ArtifactStore::new(output_dir.path());

        let processor = PackProcessor::new(
            config,
            Arc::new(client.clone()),
            Arc::new(transcoder.clone()),
            store,
        );

        Self {
            processor,
            client,
            transcoder,
            output_dir,
            _work_dir: work_dir,
        }
    }

    /// Registers a pack along with bytes for each of its stickers. Static
    /// stickers get a real encoded image so the decode path is exercised.
    async fn load_pack(&self, pack: StickerPack, static_dims: (u32, u32)) {
        for item in &pack.stickers {
            let bytes = match item.kind {
                StickerKind::Static => webp_bytes(static_dims.0, static_dims.1),
                StickerKind::Video => b"not-really-webm".to_vec(),
                StickerKind::Lottie => b"not-really-tgs".to_vec(),
            };
            self.client.insert_file(item.file_id.clone(), bytes).await;
        }
        self.client.insert_pack(pack).await;
    }
}

/// Encodes a solid-color image as WebP, the format static stickers arrive in.
fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([30, 120, 210, 255]),
    ));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::WebP)
        .expect("webp encoding");
    buffer.into_inner()
}

// =============================================================================
// Ordering and coverage
// =============================================================================

#[tokio::test]
async fn test_every_sticker_attempted_in_api_order() {
    let harness = TestHarness::new();
    harness
        .load_pack(fixtures::pack("ordered", 5), (64, 64))
        .await;

    let summary = harness.processor.process_pack("ordered").await.unwrap();

    assert_eq!(summary.attempted(), 5);
    assert!(summary.is_success());

    let downloads = harness.client.downloaded_files().await;
    assert_eq!(
        downloads,
        vec!["file-1", "file-2", "file-3", "file-4", "file-5"]
    );

    let indices: Vec<usize> = summary.outcomes.iter().map(|o| o.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_pack_name_url_is_normalized() {
    let harness = TestHarness::new();
    harness.load_pack(fixtures::pack("foo", 1), (32, 32)).await;

    let summary = harness
        .processor
        .process_pack("https://t.me/addstickers/foo")
        .await
        .unwrap();

    assert_eq!(summary.pack_name, "foo");
    assert_eq!(summary.attempted(), 1);
}

#[tokio::test]
async fn test_unknown_pack_aborts_run() {
    let harness = TestHarness::new();

    let err = harness.processor.process_pack("missing").await.unwrap_err();
    assert!(matches!(
        err,
        ProcessorError::Telegram(TelegramError::PackNotFound(_))
    ));
    assert_eq!(harness.client.download_count().await, 0);
}

// =============================================================================
// Static path
// =============================================================================

#[tokio::test]
async fn test_oversized_static_is_downscaled() {
    let harness = TestHarness::new();
    harness
        .load_pack(fixtures::pack("big", 1), (1024, 768))
        .await;

    let summary = harness.processor.process_pack("big").await.unwrap();
    assert!(summary.is_success());

    let artifact = &summary.outcomes[0].artifacts[0];
    let written = image::open(&artifact.path).unwrap();
    let (w, h) = written.dimensions();
    assert!(w <= 512 && h <= 512);

    // Aspect ratio preserved within a pixel of rounding.
    let expected_h = (768.0 * w as f64 / 1024.0).round() as i64;
    assert!((h as i64 - expected_h).abs() <= 1, "got {}x{}", w, h);
}

#[tokio::test]
async fn test_small_static_keeps_dimensions() {
    let harness = TestHarness::new();
    harness.load_pack(fixtures::pack("small", 1), (100, 60)).await;

    let summary = harness.processor.process_pack("small").await.unwrap();
    let artifact = &summary.outcomes[0].artifacts[0];
    let written = image::open(&artifact.path).unwrap();
    assert_eq!(written.dimensions(), (100, 60));
}

#[tokio::test]
async fn test_one_artifact_per_configured_format() {
    let config = ProcessorConfig::default()
        .with_static_formats(vec![StaticFormat::Webp, StaticFormat::Png]);
    let harness = TestHarness::with_config(config);
    harness.load_pack(fixtures::pack("multi", 2), (64, 64)).await;

    let summary = harness.processor.process_pack("multi").await.unwrap();

    assert_eq!(summary.artifact_count(), 4);
    for outcome in &summary.outcomes {
        let exts: Vec<_> = outcome
            .artifacts
            .iter()
            .map(|a| a.path.extension().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(exts, vec!["webp", "png"]);
    }
}

#[tokio::test]
async fn test_undecodable_static_recorded_as_failure() {
    let harness = TestHarness::new();
    let pack = fixtures::pack("broken", 1);
    harness.client.insert_pack(pack).await;
    harness
        .client
        .insert_file("file-1", b"garbage bytes".to_vec())
        .await;

    let summary = harness.processor.process_pack("broken").await.unwrap();

    assert_eq!(summary.failed(), 1);
    assert!(summary.outcomes[0]
        .error
        .as_deref()
        .unwrap()
        .contains("decode"));
}

// =============================================================================
// Filename invariants
// =============================================================================

#[tokio::test]
async fn test_artifact_filenames_unique() {
    let harness = TestHarness::new();
    harness.load_pack(fixtures::pack("uniq", 8), (32, 32)).await;

    let summary = harness.processor.process_pack("uniq").await.unwrap();

    let paths: HashSet<_> = summary
        .outcomes
        .iter()
        .flat_map(|o| o.artifacts.iter().map(|a| a.path.clone()))
        .collect();
    assert_eq!(paths.len(), 8);
}

#[tokio::test]
async fn test_artifacts_land_in_pack_directory() {
    let harness = TestHarness::new();
    harness.load_pack(fixtures::pack("homed", 1), (32, 32)).await;

    let summary = harness.processor.process_pack("homed").await.unwrap();

    let expected_dir = harness.output_dir.path().join("homed_homed_Title");
    assert_eq!(summary.output_dir, expected_dir);
    assert!(summary.outcomes[0].artifacts[0]
        .path
        .starts_with(&expected_dir));
}

// =============================================================================
// Animated paths
// =============================================================================

#[tokio::test]
async fn test_mixed_pack_dispatches_by_kind() {
    let harness = TestHarness::new();
    harness
        .load_pack(fixtures::mixed_pack("mixed"), (64, 64))
        .await;

    let summary = harness.processor.process_pack("mixed").await.unwrap();
    assert!(summary.is_success());

    let jobs = harness.transcoder.recorded_jobs().await;
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].mode, TranscodeMode::Video);
    assert_eq!(jobs[1].mode, TranscodeMode::Lottie);
}

#[tokio::test]
async fn test_lottie_persists_raw_source_then_apng() {
    let harness = TestHarness::new();
    harness
        .load_pack(fixtures::mixed_pack("lottie"), (64, 64))
        .await;

    let summary = harness.processor.process_pack("lottie").await.unwrap();

    let lottie_outcome = &summary.outcomes[2];
    assert_eq!(lottie_outcome.kind, StickerKind::Lottie);
    assert_eq!(lottie_outcome.artifacts.len(), 2);
    assert_eq!(lottie_outcome.artifacts[0].kind, ArtifactKind::LottieSource);
    assert_eq!(lottie_outcome.artifacts[1].kind, ArtifactKind::Apng);
    assert!(lottie_outcome.artifacts[0].path.exists());
    assert!(lottie_outcome.artifacts[1].path.exists());
}

#[tokio::test]
async fn test_no_convert_saves_raw_animated_sources() {
    let config = ProcessorConfig::default().with_transcode_animated(false);
    let harness = TestHarness::with_config(config);
    harness
        .load_pack(fixtures::mixed_pack("raw"), (64, 64))
        .await;

    let summary = harness.processor.process_pack("raw").await.unwrap();
    assert!(summary.is_success());
    assert_eq!(harness.transcoder.job_count().await, 0);

    let video_outcome = &summary.outcomes[1];
    assert_eq!(video_outcome.artifacts.len(), 1);
    assert_eq!(video_outcome.artifacts[0].kind, ArtifactKind::VideoSource);
    assert!(video_outcome.artifacts[0]
        .path
        .to_str()
        .unwrap()
        .ends_with(".webm"));

    let lottie_outcome = &summary.outcomes[2];
    assert_eq!(lottie_outcome.artifacts.len(), 1);
    assert_eq!(lottie_outcome.artifacts[0].kind, ArtifactKind::LottieSource);
}

#[tokio::test]
async fn test_video_scratch_file_removed_after_item() {
    let harness = TestHarness::new();
    harness
        .load_pack(fixtures::mixed_pack("scratch"), (64, 64))
        .await;

    harness.processor.process_pack("scratch").await.unwrap();

    let jobs = harness.transcoder.recorded_jobs().await;
    let video_job = jobs
        .iter()
        .find(|j| j.mode == TranscodeMode::Video)
        .unwrap();
    assert!(
        !video_job.job.input_path.exists(),
        "scratch clip should be deleted once its iteration finishes"
    );
}

// =============================================================================
// Failure policy
// =============================================================================

#[tokio::test]
async fn test_failed_download_does_not_abort_remaining_items() {
    let harness = TestHarness::new();
    harness.load_pack(fixtures::pack("partial", 3), (32, 32)).await;
    harness.client.fail_download("file-2").await;

    let summary = harness.processor.process_pack("partial").await.unwrap();

    assert_eq!(summary.attempted(), 3);
    assert_eq!(summary.failed(), 1);
    assert!(summary.outcomes[0].succeeded());
    assert!(!summary.outcomes[1].succeeded());
    assert!(summary.outcomes[2].succeeded());

    // The failing item was still attempted before moving on.
    assert_eq!(harness.client.download_count().await, 3);
}

#[tokio::test]
async fn test_failed_transcode_recorded_and_leaves_no_apng() {
    let harness = TestHarness::new();
    harness
        .load_pack(fixtures::mixed_pack("flaky"), (64, 64))
        .await;
    harness.transcoder.fail_job("002-uid2").await;

    let summary = harness.processor.process_pack("flaky").await.unwrap();

    let video_outcome = &summary.outcomes[1];
    assert!(!video_outcome.succeeded());
    assert!(video_outcome.artifacts.is_empty());

    let apng = summary.output_dir.join("sticker_002_uid2.apng");
    assert!(!apng.exists());

    // Later items are unaffected.
    assert!(summary.outcomes[2].succeeded());
}

#[tokio::test]
async fn test_failed_lottie_transcode_keeps_raw_source() {
    let harness = TestHarness::new();
    harness
        .load_pack(fixtures::mixed_pack("keepraw"), (64, 64))
        .await;
    harness.transcoder.fail_all().await;

    let summary = harness.processor.process_pack("keepraw").await.unwrap();

    // The .tgs was written before the transcode attempt and stays on disk
    // even though the item is recorded as failed.
    let lottie_outcome = &summary.outcomes[2];
    assert!(!lottie_outcome.succeeded());
    let tgs = summary.output_dir.join("sticker_003_uid3.tgs");
    assert!(tgs.exists());
}
