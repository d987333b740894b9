use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use packgrab_core::{
    load_config, load_config_from_env, validate_config, AnimationTranscoder, ArtifactStore,
    BotApiClient, FfmpegTranscoder, PackProcessor, RunSummary,
};

/// Download a Telegram sticker pack and convert it for local use.
///
/// Static stickers are resized and saved as web images; animated stickers
/// (Lottie and video) are converted to looping APNGs via ffmpeg and
/// python-lottie.
#[derive(Parser, Debug)]
#[command(name = "packgrab", version)]
struct Args {
    /// Sticker pack name or t.me/addstickers URL. Prompted for when omitted.
    pack: Option<String>,

    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the output directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Create the output directory without asking.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Save animated stickers raw (.tgs/.webm) instead of converting to APNG.
    #[arg(long)]
    no_convert: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args = Args::parse();

    // Determine config path; fall back to environment-only config when no
    // file exists (the bot token alone is enough to run).
    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var("PACKGRAB_CONFIG").map(PathBuf::from).ok())
        .unwrap_or_else(|| PathBuf::from("packgrab.toml"));

    let mut config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        if args.config.is_some() {
            bail!("Config file not found: {}", config_path.display());
        }
        load_config_from_env().context(
            "No config file found and the environment is incomplete; \
             set PACKGRAB_TELEGRAM__BOT_TOKEN or create packgrab.toml",
        )?
    };

    if let Some(dir) = args.output {
        config.output.dir = dir;
    }
    if args.no_convert {
        config.processor.transcode_animated = false;
    }

    validate_config(&config).context("Configuration validation failed")?;

    let pack_name = match args.pack {
        Some(pack) => pack,
        None => prompt("Pack name or URL (the part after t.me/addstickers/): ")?,
    };
    if pack_name.trim().is_empty() {
        bail!("No pack name given");
    }

    // The original tool asks before creating a fresh output directory; --yes
    // skips the question for scripted runs.
    if !config.output.dir.exists() && !args.yes {
        let answer = prompt(&format!(
            "Output directory {} does not exist. Create it? [y/N] ",
            config.output.dir.display()
        ))?;
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            bail!("Aborted");
        }
    }

    let client = Arc::new(
        BotApiClient::new(config.telegram.clone()).context("Failed to create Telegram client")?,
    );

    let transcoder = Arc::new(FfmpegTranscoder::new(config.transcoder.clone()));
    if config.processor.transcode_animated {
        if let Err(e) = transcoder.validate().await {
            warn!(
                "Transcoder unavailable ({}); animated stickers will be saved raw",
                e
            );
            config.processor.transcode_animated = false;
        }
    }

    let store = ArtifactStore::new(config.output.dir.clone());
    let processor = PackProcessor::new(config.processor.clone(), client, transcoder, store);

    let summary = processor.process_pack(&pack_name).await?;
    report(&summary);

    if !summary.is_success() {
        bail!(
            "{} of {} stickers failed",
            summary.failed(),
            summary.attempted()
        );
    }

    Ok(())
}

fn report(summary: &RunSummary) {
    info!(
        "Downloaded {}/{} stickers from \"{}\" ({} files) to {}",
        summary.succeeded(),
        summary.attempted(),
        summary.pack_title,
        summary.artifact_count(),
        summary.output_dir.display()
    );

    for failure in summary.failures() {
        warn!(
            "sticker {} ({}): {}",
            failure.index,
            failure.unique_id,
            failure.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}
