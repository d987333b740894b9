//! External-tool transcoder implementation.
//!
//! Video stickers go through a single ffmpeg invocation (WebM in, looping
//! APNG out). Lottie stickers go through two: the python-lottie converter
//! renders the vector animation to an intermediate GIF, then ffmpeg re-encodes
//! that GIF as a looping APNG at the target resolution.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::TranscoderConfig;
use super::error::TranscoderError;
use super::traits::AnimationTranscoder;
use super::types::{frame_delay_ms, MediaProbe, TranscodeJob, TranscodeResult};

/// Transcoder backed by ffmpeg/ffprobe and a Lottie converter script.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    /// Creates a new transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }

    /// Scale filter that fits the output within the target square without
    /// upscaling, aspect preserved.
    fn scale_filter(&self) -> String {
        let size = self.config.target_size;
        format!(
            "scale='min({},iw)':'min({},ih)':force_original_aspect_ratio=decrease",
            size, size
        )
    }

    /// Builds ffmpeg arguments for re-encoding a video clip as a looping APNG.
    ///
    /// The output frame rate is derived from the rounded per-frame delay, so
    /// each frame lasts exactly `frame_delay_ms(fps)` milliseconds.
    fn build_video_apng_args(&self, input: &Path, output: &Path, fps: f64) -> Vec<String> {
        let delay_ms = frame_delay_ms(fps);
        let output_fps = 1000.0 / delay_ms as f64;

        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vf".to_string(),
            self.scale_filter(),
            "-r".to_string(),
            format!("{:.4}", output_fps),
            "-plays".to_string(),
            "0".to_string(),
            "-f".to_string(),
            "apng".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Builds ffmpeg arguments for re-encoding an intermediate GIF as a
    /// looping APNG. GIF frame timing is preserved.
    fn build_gif_apng_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vf".to_string(),
            self.scale_filter(),
            "-plays".to_string(),
            "0".to_string(),
            "-f".to_string(),
            "apng".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Builds arguments for the Lottie converter (input and output paths;
    /// the script infers formats from the extensions).
    fn build_lottie_args(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            input.to_string_lossy().to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    fn missing_tool_error(&self, tool: &str) -> TranscoderError {
        match tool {
            "ffmpeg" => TranscoderError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            },
            "ffprobe" => TranscoderError::FfprobeNotFound {
                path: self.config.ffprobe_path.clone(),
            },
            _ => TranscoderError::LottieToolNotFound {
                path: self.config.lottie_converter_path.clone(),
            },
        }
    }

    /// Runs a tool to completion, capturing stderr, killing it on timeout.
    async fn run_tool(
        &self,
        tool: &str,
        program: &Path,
        args: &[String],
    ) -> Result<(), TranscoderError> {
        debug!(tool = tool, ?args, "invoking external tool");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    self.missing_tool_error(tool)
                } else {
                    TranscoderError::Io(e)
                }
            })?;

        let stderr = child.stderr.take().expect("stderr is piped");
        let mut reader = BufReader::new(stderr).lines();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut captured = String::new();
            while let Ok(Some(line)) = reader.next_line().await {
                captured.push_str(&line);
                captured.push('\n');
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, captured))
        })
        .await;

        match result {
            Ok(Ok((status, stderr_output))) => {
                if status.success() {
                    Ok(())
                } else {
                    Err(TranscoderError::tool_failed(
                        tool,
                        status.code(),
                        stderr_output,
                    ))
                }
            }
            Ok(Err(e)) => Err(TranscoderError::Io(e)),
            Err(_) => {
                let _ = child.kill().await;
                Err(TranscoderError::Timeout {
                    tool: tool.to_string(),
                    timeout_secs: self.config.timeout_secs,
                })
            }
        }
    }

    /// Removes files that may have been partially written by a failed tool.
    async fn cleanup(paths: &[&Path]) {
        for path in paths {
            let _ = tokio::fs::remove_file(path).await;
        }
    }

    async fn finish(
        job: &TranscodeJob,
        started: Instant,
    ) -> Result<TranscodeResult, TranscoderError> {
        let metadata = tokio::fs::metadata(&job.output_path).await.map_err(|_| {
            TranscoderError::OutputMissing {
                path: job.output_path.clone(),
            }
        })?;

        Ok(TranscodeResult {
            job_id: job.job_id.clone(),
            output_path: job.output_path.clone(),
            output_size_bytes: metadata.len(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Parses ffprobe JSON output into a MediaProbe.
    fn parse_probe_output(path: &Path, output: &str) -> Result<MediaProbe, TranscoderError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            format: ProbeFormat,
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            codec_type: String,
            width: Option<u32>,
            height: Option<u32>,
            r_frame_rate: Option<String>,
            avg_frame_rate: Option<String>,
        }

        let probe: ProbeOutput =
            serde_json::from_str(output).map_err(|e| TranscoderError::ParseError {
                reason: format!("ffprobe output: {}", e),
            })?;

        let duration_secs = probe
            .format
            .duration
            .as_ref()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let video_stream = probe.streams.iter().find(|s| s.codec_type == "video");

        let fps = video_stream.and_then(|s| {
            s.avg_frame_rate
                .as_deref()
                .and_then(parse_frame_rate)
                .or_else(|| s.r_frame_rate.as_deref().and_then(parse_frame_rate))
        });

        Ok(MediaProbe {
            path: path.to_path_buf(),
            duration_secs,
            width: video_stream.and_then(|s| s.width),
            height: video_stream.and_then(|s| s.height),
            fps,
        })
    }
}

/// Parses a frame rate like "30/1", "30000/1001", or "20".
fn parse_frame_rate(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() == 2 {
        let num = parts[0].parse::<f64>().ok()?;
        let den = parts[1].parse::<f64>().ok()?;
        if den > 0.0 && num > 0.0 {
            Some(num / den)
        } else {
            None
        }
    } else {
        raw.parse::<f64>().ok().filter(|f| *f > 0.0)
    }
}

#[async_trait]
impl AnimationTranscoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> Result<MediaProbe, TranscoderError> {
        if !path.exists() {
            return Err(TranscoderError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    self.missing_tool_error("ffprobe")
                } else {
                    TranscoderError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(TranscoderError::probe_failed(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(path, &stdout)
    }

    async fn video_to_apng(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscoderError> {
        if !job.input_path.exists() {
            return Err(TranscoderError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        let started = Instant::now();
        let probe = self.probe(&job.input_path).await?;
        let fps = probe.fps_or_default();

        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let args = self.build_video_apng_args(&job.input_path, &job.output_path, fps);
        if let Err(e) = self.run_tool("ffmpeg", &self.config.ffmpeg_path, &args).await {
            Self::cleanup(&[job.output_path.as_path()]).await;
            return Err(e);
        }

        Self::finish(&job, started).await
    }

    async fn lottie_to_apng(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscoderError> {
        if !job.input_path.exists() {
            return Err(TranscoderError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        let started = Instant::now();

        tokio::fs::create_dir_all(&self.config.temp_dir).await?;
        let intermediate: PathBuf = self.config.temp_dir.join(format!("{}.gif", job.job_id));

        // Stage 1: vector animation to intermediate frame sequence.
        let lottie_args = self.build_lottie_args(&job.input_path, &intermediate);
        if let Err(e) = self
            .run_tool("lottie", &self.config.lottie_converter_path, &lottie_args)
            .await
        {
            Self::cleanup(&[intermediate.as_path()]).await;
            return Err(e);
        }

        if let Some(parent) = job.output_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                Self::cleanup(&[intermediate.as_path()]).await;
                return Err(TranscoderError::Io(e));
            }
        }

        // Stage 2: intermediate to looping APNG.
        let ffmpeg_args = self.build_gif_apng_args(&intermediate, &job.output_path);
        if let Err(e) = self
            .run_tool("ffmpeg", &self.config.ffmpeg_path, &ffmpeg_args)
            .await
        {
            Self::cleanup(&[intermediate.as_path(), job.output_path.as_path()]).await;
            return Err(e);
        }

        // Intermediate is only needed while ffmpeg runs.
        Self::cleanup(&[intermediate.as_path()]).await;

        Self::finish(&job, started).await
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        for (tool, path) in [
            ("ffmpeg", &self.config.ffmpeg_path),
            ("ffprobe", &self.config.ffprobe_path),
        ] {
            let result = Command::new(path)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .output()
                .await;
            if let Err(e) = result {
                if e.kind() == std::io::ErrorKind::NotFound {
                    return Err(self.missing_tool_error(tool));
                }
                return Err(TranscoderError::Io(e));
            }
        }

        // The converter script has no stable version flag; spawning it at all
        // is the availability check.
        let result = Command::new(&self.config.lottie_converter_path)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;
        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(self.missing_tool_error("lottie"));
            }
            return Err(TranscoderError::Io(e));
        }

        tokio::fs::create_dir_all(&self.config.temp_dir).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_video_apng_args() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let args = transcoder.build_video_apng_args(
            Path::new("/in.webm"),
            Path::new("/out.apng"),
            20.0,
        );

        assert!(args.contains(&"-plays".to_string()));
        assert!(args.contains(&"0".to_string()));
        assert!(args.contains(&"apng".to_string()));
        // 20 fps -> 50 ms per frame -> exactly 20 fps back out
        assert!(args.contains(&"20.0000".to_string()));
        let vf = args
            .iter()
            .position(|a| a == "-vf")
            .map(|i| args[i + 1].clone())
            .unwrap();
        assert!(vf.contains("min(512,iw)"));
        assert!(vf.contains("force_original_aspect_ratio=decrease"));
    }

    #[test]
    fn test_build_video_apng_args_ntsc_rate() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let args = transcoder.build_video_apng_args(
            Path::new("/in.webm"),
            Path::new("/out.apng"),
            30000.0 / 1001.0,
        );
        // 29.97 fps rounds to a 33 ms delay -> 30.3030 fps out
        assert!(args.contains(&"30.3030".to_string()));
    }

    #[test]
    fn test_build_gif_apng_args_preserve_timing() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let args = transcoder.build_gif_apng_args(Path::new("/tmp/x.gif"), Path::new("/out.apng"));
        assert!(args.contains(&"-plays".to_string()));
        assert!(!args.contains(&"-r".to_string()));
    }

    #[test]
    fn test_build_lottie_args() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let args =
            transcoder.build_lottie_args(Path::new("/in.tgs"), Path::new("/tmp/job.gif"));
        assert_eq!(args, vec!["/in.tgs".to_string(), "/tmp/job.gif".to_string()]);
    }

    #[test]
    fn test_scale_filter_uses_target_size() {
        let config = TranscoderConfig::default().with_target_size(256);
        let transcoder = FfmpegTranscoder::new(config);
        assert!(transcoder.scale_filter().contains("min(256,iw)"));
    }

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("20"), Some(20.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("garbage"), None);
    }

    #[test]
    fn test_parse_probe_output() {
        let json = r#"{
            "format": {
                "format_name": "matroska,webm",
                "duration": "2.960"
            },
            "streams": [
                {
                    "codec_type": "video",
                    "codec_name": "vp9",
                    "width": 512,
                    "height": 510,
                    "r_frame_rate": "20/1",
                    "avg_frame_rate": "20/1"
                }
            ]
        }"#;

        let probe =
            FfmpegTranscoder::parse_probe_output(Path::new("sticker.webm"), json).unwrap();
        assert_eq!(probe.width, Some(512));
        assert_eq!(probe.height, Some(510));
        assert_eq!(probe.fps, Some(20.0));
        assert!((probe.duration_secs - 2.96).abs() < 0.001);
    }

    #[test]
    fn test_parse_probe_output_falls_back_to_r_frame_rate() {
        let json = r#"{
            "format": {"duration": "1.0"},
            "streams": [
                {
                    "codec_type": "video",
                    "width": 100,
                    "height": 100,
                    "r_frame_rate": "24/1",
                    "avg_frame_rate": "0/0"
                }
            ]
        }"#;

        let probe = FfmpegTranscoder::parse_probe_output(Path::new("x.webm"), json).unwrap();
        assert_eq!(probe.fps, Some(24.0));
    }

    #[test]
    fn test_parse_probe_output_no_video_stream() {
        let json = r#"{"format": {"duration": "1.0"}, "streams": []}"#;
        let probe = FfmpegTranscoder::parse_probe_output(Path::new("x.webm"), json).unwrap();
        assert_eq!(probe.fps, None);
        assert_eq!(probe.width, None);
    }

    #[test]
    fn test_parse_probe_output_garbage_fails() {
        let result = FfmpegTranscoder::parse_probe_output(Path::new("x"), "not json");
        assert!(matches!(result, Err(TranscoderError::ParseError { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_lottie_tool_leaves_no_intermediate() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("sticker.tgs");
        tokio::fs::write(&input, b"fake tgs").await.unwrap();

        // /bin/false exits non-zero without writing anything.
        let config = TranscoderConfig::with_paths(
            PathBuf::from("ffmpeg"),
            PathBuf::from("ffprobe"),
            PathBuf::from("/bin/false"),
        )
        .with_temp_dir(temp.path().join("work"));
        let transcoder = FfmpegTranscoder::new(config);

        let job = TranscodeJob {
            job_id: "1-abc".to_string(),
            input_path: input,
            output_path: temp.path().join("out.apng"),
        };

        let err = transcoder.lottie_to_apng(job.clone()).await.unwrap_err();
        assert!(matches!(err, TranscoderError::ToolFailed { .. }));
        assert!(!temp.path().join("work/1-abc.gif").exists());
        assert!(!job.output_path.exists());
    }

    #[tokio::test]
    async fn test_missing_tool_maps_to_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("sticker.tgs");
        tokio::fs::write(&input, b"fake tgs").await.unwrap();

        let config = TranscoderConfig::with_paths(
            PathBuf::from("ffmpeg"),
            PathBuf::from("ffprobe"),
            temp.path().join("no-such-converter"),
        )
        .with_temp_dir(temp.path().join("work"));
        let transcoder = FfmpegTranscoder::new(config);

        let job = TranscodeJob {
            job_id: "2-def".to_string(),
            input_path: input,
            output_path: temp.path().join("out.apng"),
        };

        let err = transcoder.lottie_to_apng(job).await.unwrap_err();
        assert!(matches!(err, TranscoderError::LottieToolNotFound { .. }));
    }

    #[tokio::test]
    async fn test_video_missing_input() {
        let transcoder = FfmpegTranscoder::with_defaults();
        let job = TranscodeJob {
            job_id: "3".to_string(),
            input_path: PathBuf::from("/definitely/not/here.webm"),
            output_path: PathBuf::from("/tmp/out.apng"),
        };
        let err = transcoder.video_to_apng(job).await.unwrap_err();
        assert!(matches!(err, TranscoderError::InputNotFound { .. }));
    }
}
