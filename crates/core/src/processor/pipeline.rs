//! Pack processor implementation.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::raster;
use crate::store::{ArtifactKind, ArtifactStore, OutputArtifact, StoreError};
use crate::telegram::{normalize_pack_name, StickerItem, StickerKind, TelegramApi, TelegramError};
use crate::transcoder::{AnimationTranscoder, TranscodeJob, TranscoderError};

use super::config::ProcessorConfig;
use super::types::{ItemOutcome, RunSummary};

/// Pack-level errors that abort the whole run.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Fetching the pack failed.
    #[error(transparent)]
    Telegram(#[from] TelegramError),

    /// The output directory could not be prepared.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-item errors. These are caught, recorded in the run summary, and never
/// abort the remaining items.
#[derive(Debug, Error)]
enum ItemError {
    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error(transparent)]
    Raster(#[from] raster::RasterError),

    #[error(transparent)]
    Transcode(#[from] TranscoderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Processes every sticker of a pack, strictly sequentially and in API order.
///
/// Each iteration owns its downloaded bytes and any scratch file it creates;
/// both are gone by the time the next item starts.
pub struct PackProcessor<T: TelegramApi, A: AnimationTranscoder> {
    config: ProcessorConfig,
    client: Arc<T>,
    transcoder: Arc<A>,
    store: ArtifactStore,
}

impl<T: TelegramApi, A: AnimationTranscoder> PackProcessor<T, A> {
    /// Creates a new pack processor.
    pub fn new(
        config: ProcessorConfig,
        client: Arc<T>,
        transcoder: Arc<A>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            config,
            client,
            transcoder,
            store,
        }
    }

    /// Downloads and converts one whole pack.
    ///
    /// A failed item is logged and summarized, never fatal; only pack lookup
    /// and output-directory failures abort the run.
    pub async fn process_pack(&self, raw_name: &str) -> Result<RunSummary, ProcessorError> {
        let name = normalize_pack_name(raw_name);
        let pack = self.client.get_sticker_set(&name).await?;

        info!(
            pack = %pack.name,
            title = %pack.title,
            stickers = pack.len(),
            "fetched sticker pack"
        );

        let pack_dir = self.store.pack_dir(&pack.name, &pack.title);
        self.store.ensure_dir(&pack_dir).await?;

        let total = pack.len();
        let mut outcomes = Vec::with_capacity(total);

        for (i, item) in pack.stickers.iter().enumerate() {
            let index = i + 1;
            info!(
                "sticker {}/{} ({:?}, {})",
                index, total, item.kind, item.unique_id
            );

            let outcome = match self.process_item(&pack_dir, index, item).await {
                Ok(artifacts) => ItemOutcome {
                    index,
                    unique_id: item.unique_id.clone(),
                    kind: item.kind,
                    artifacts,
                    error: None,
                },
                Err(e) => {
                    warn!(
                        index = index,
                        unique_id = %item.unique_id,
                        "failed to process sticker: {}",
                        e
                    );
                    ItemOutcome {
                        index,
                        unique_id: item.unique_id.clone(),
                        kind: item.kind,
                        artifacts: Vec::new(),
                        error: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        Ok(RunSummary {
            pack_name: pack.name,
            pack_title: pack.title,
            output_dir: pack_dir,
            outcomes,
        })
    }

    async fn process_item(
        &self,
        pack_dir: &Path,
        index: usize,
        item: &StickerItem,
    ) -> Result<Vec<OutputArtifact>, ItemError> {
        let bytes = self.client.download_file(&item.file_id).await?;

        match item.kind {
            StickerKind::Static => self.process_static(pack_dir, index, item, &bytes).await,
            StickerKind::Video => self.process_video(pack_dir, index, item, &bytes).await,
            StickerKind::Lottie => self.process_lottie(pack_dir, index, item, &bytes).await,
        }
    }

    async fn process_static(
        &self,
        pack_dir: &Path,
        index: usize,
        item: &StickerItem,
        bytes: &[u8],
    ) -> Result<Vec<OutputArtifact>, ItemError> {
        let img = raster::decode(bytes)?;
        let img = raster::fit_within(img, self.config.max_dimension);

        let mut artifacts = Vec::with_capacity(self.config.static_formats.len());
        for format in &self.config.static_formats {
            let encoded = raster::encode(&img, *format)?;
            let path =
                ArtifactStore::artifact_path(pack_dir, index, &item.unique_id, format.extension());
            let artifact = self
                .store
                .write(&path, &encoded, &item.unique_id, ArtifactKind::Static(*format))
                .await?;
            artifacts.push(artifact);
        }

        Ok(artifacts)
    }

    async fn process_video(
        &self,
        pack_dir: &Path,
        index: usize,
        item: &StickerItem,
        bytes: &[u8],
    ) -> Result<Vec<OutputArtifact>, ItemError> {
        if !self.config.transcode_animated {
            let path = ArtifactStore::artifact_path(pack_dir, index, &item.unique_id, "webm");
            let artifact = self
                .store
                .write(&path, bytes, &item.unique_id, ArtifactKind::VideoSource)
                .await?;
            return Ok(vec![artifact]);
        }

        // The clip has to hit disk for the external tool; scratch file lives
        // only for this iteration.
        tokio::fs::create_dir_all(&self.config.work_dir).await?;
        let scratch = self
            .config
            .work_dir
            .join(format!("{:03}_{}.webm", index, item.unique_id));
        tokio::fs::write(&scratch, bytes).await?;

        let output_path = ArtifactStore::artifact_path(pack_dir, index, &item.unique_id, "apng");
        let job = TranscodeJob {
            job_id: format!("{:03}-{}", index, item.unique_id),
            input_path: scratch.clone(),
            output_path: output_path.clone(),
        };

        let result = self.transcoder.video_to_apng(job).await;
        let _ = tokio::fs::remove_file(&scratch).await;
        let result = result?;

        Ok(vec![OutputArtifact {
            item_id: item.unique_id.clone(),
            path: result.output_path,
            size_bytes: result.output_size_bytes,
            kind: ArtifactKind::Apng,
        }])
    }

    async fn process_lottie(
        &self,
        pack_dir: &Path,
        index: usize,
        item: &StickerItem,
        bytes: &[u8],
    ) -> Result<Vec<OutputArtifact>, ItemError> {
        // The raw vector animation is always persisted, conversion or not.
        let tgs_path = ArtifactStore::artifact_path(pack_dir, index, &item.unique_id, "tgs");
        let tgs_artifact = self
            .store
            .write(&tgs_path, bytes, &item.unique_id, ArtifactKind::LottieSource)
            .await?;
        let mut artifacts = vec![tgs_artifact];

        if self.config.transcode_animated {
            let output_path =
                ArtifactStore::artifact_path(pack_dir, index, &item.unique_id, "apng");
            let job = TranscodeJob {
                job_id: format!("{:03}-{}", index, item.unique_id),
                input_path: tgs_path,
                output_path: output_path.clone(),
            };

            let result = self.transcoder.lottie_to_apng(job).await?;
            artifacts.push(OutputArtifact {
                item_id: item.unique_id.clone(),
                path: result.output_path,
                size_bytes: result.output_size_bytes,
                kind: ArtifactKind::Apng,
            });
        }

        Ok(artifacts)
    }
}
