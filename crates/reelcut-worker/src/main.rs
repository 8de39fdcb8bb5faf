//! Clip pipeline binary: one batch run over the raw directory.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reelcut_worker::{Collaborators, Pipeline, PipelineConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        eprintln!("rustls crypto provider already installed");
    }

    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting reelcut-worker");

    if let Err(e) = run().await {
        error!("Run failed: {:#}", e);
        std::process::exit(1);
    }

    info!("reelcut-worker finished");
}

async fn run() -> anyhow::Result<()> {
    let config = PipelineConfig::from_env()?;
    info!("Pipeline config: {:?}", redacted(&config));

    let deps = Collaborators::from_config(&config)?;
    let pipeline = Pipeline::new(config, deps);
    let record = pipeline.run().await?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Colored output for dev, JSON when `LOG_FORMAT=json`.
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reelcut=info,hyper=warn,reqwest=warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

fn redacted(config: &PipelineConfig) -> PipelineConfig {
    let mask = |v: &Option<String>| v.as_ref().map(|_| "***".to_string());
    PipelineConfig {
        vision_api_key: mask(&config.vision_api_key),
        openai_api_key: mask(&config.openai_api_key),
        telegram_bot_token: mask(&config.telegram_bot_token),
        ..config.clone()
    }
}
