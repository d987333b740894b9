//! Mock transcoder for testing.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transcoder::{
    AnimationTranscoder, MediaProbe, TranscodeJob, TranscodeResult, TranscoderError,
};

/// Which transcode entry point a recorded job went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeMode {
    Video,
    Lottie,
}

/// A recorded transcode job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTranscode {
    pub job: TranscodeJob,
    pub mode: TranscodeMode,
    pub success: bool,
}

/// Mock implementation of the [`AnimationTranscoder`] trait.
///
/// Successful jobs write a small stub APNG file to the job's output path so
/// callers can assert on artifacts; failed jobs leave nothing behind, matching
/// the real backend's cleanup contract.
#[derive(Debug, Clone, Default)]
pub struct MockTranscoder {
    jobs: Arc<RwLock<Vec<RecordedTranscode>>>,
    failing_jobs: Arc<RwLock<Vec<String>>>,
    fail_all: Arc<RwLock<bool>>,
}

impl MockTranscoder {
    /// Create a new mock transcoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the job with this id fail.
    pub async fn fail_job(&self, job_id: impl Into<String>) {
        self.failing_jobs.write().await.push(job_id.into());
    }

    /// Make every job fail.
    pub async fn fail_all(&self) {
        *self.fail_all.write().await = true;
    }

    /// Get all recorded jobs.
    pub async fn recorded_jobs(&self) -> Vec<RecordedTranscode> {
        self.jobs.read().await.clone()
    }

    /// Number of jobs submitted.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    async fn should_fail(&self, job_id: &str) -> bool {
        *self.fail_all.read().await || self.failing_jobs.read().await.iter().any(|j| j == job_id)
    }

    async fn run(
        &self,
        job: TranscodeJob,
        mode: TranscodeMode,
    ) -> Result<TranscodeResult, TranscoderError> {
        let fail = self.should_fail(&job.job_id).await;

        self.jobs.write().await.push(RecordedTranscode {
            job: job.clone(),
            mode,
            success: !fail,
        });

        if fail {
            return Err(TranscoderError::tool_failed(
                "mock",
                Some(1),
                "simulated failure".to_string(),
            ));
        }

        if let Some(parent) = job.output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let stub = b"apng-stub";
        tokio::fs::write(&job.output_path, stub).await?;

        Ok(TranscodeResult {
            job_id: job.job_id,
            output_path: job.output_path,
            output_size_bytes: stub.len() as u64,
            duration_ms: 1,
        })
    }
}

#[async_trait]
impl AnimationTranscoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<MediaProbe, TranscoderError> {
        Ok(MediaProbe {
            path: path.to_path_buf(),
            duration_secs: 3.0,
            width: Some(512),
            height: Some(512),
            fps: Some(30.0),
        })
    }

    async fn video_to_apng(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscoderError> {
        self.run(job, TranscodeMode::Video).await
    }

    async fn lottie_to_apng(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscoderError> {
        self.run(job, TranscodeMode::Lottie).await
    }

    async fn validate(&self) -> Result<(), TranscoderError> {
        Ok(())
    }
}
