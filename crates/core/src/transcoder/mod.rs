//! Transcoding of animated stickers to looping APNGs.
//!
//! Two animated source formats exist: WebM video clips and gzipped Lottie
//! vector animations (`.tgs`). Both end up as looping APNGs. The work is done
//! by external tools (ffmpeg, ffprobe, python-lottie's `lottie_convert.py`)
//! behind the [`AnimationTranscoder`] trait, so the per-item pipeline never
//! depends on which backend renders the frames.
//!
//! # Example
//!
//! ```ignore
//! use packgrab_core::transcoder::{AnimationTranscoder, FfmpegTranscoder, TranscodeJob};
//!
//! let transcoder = FfmpegTranscoder::with_defaults();
//! transcoder.validate().await?;
//!
//! let result = transcoder
//!     .video_to_apng(TranscodeJob {
//!         job_id: "7-AQADBAAD".to_string(),
//!         input_path: "/tmp/packgrab/7.webm".into(),
//!         output_path: "stickers/pack/sticker_007_AQADBAAD.apng".into(),
//!     })
//!     .await?;
//! println!("wrote {} bytes", result.output_size_bytes);
//! ```

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::TranscoderConfig;
pub use error::TranscoderError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::AnimationTranscoder;
pub use types::{frame_delay_ms, MediaProbe, TranscodeJob, TranscodeResult, DEFAULT_FPS};
