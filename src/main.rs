use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use streamscribe::audio::SymphoniaTranscoder;
use streamscribe::nats::{BroadcastStore, NatsBroadcast};
use streamscribe::session::SessionRegistry;
use streamscribe::stt::{NatsRecognizer, SttEngine};
use streamscribe::{create_router, AppState, Config};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "streamscribe", about = "Realtime streaming transcription backend")]
struct Args {
    /// Configuration file (without extension), overridable via
    /// STREAMSCRIBE_* environment variables
    #[arg(long, default_value = "config/streamscribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);
    info!(
        "trigger threshold: {} bytes, rotation bound: {} segments",
        cfg.stt.trigger_bytes, cfg.stt.max_segments
    );

    // The service stays up without NATS: recognition reports not-ready and
    // transcript publishing is skipped until a broker is available
    let nats_client = match async_nats::connect(&cfg.nats.url).await {
        Ok(client) => {
            info!("Connected to NATS at {}", cfg.nats.url);
            Some(client)
        }
        Err(e) => {
            warn!("NATS unavailable at {}: {}", cfg.nats.url, e);
            None
        }
    };

    let recognizer = Arc::new(NatsRecognizer::new(
        nats_client.clone(),
        cfg.stt.request_subject.clone(),
        cfg.stt.request_timeout_secs,
    ));
    let engine = Arc::new(SttEngine::new(
        Arc::new(SymphoniaTranscoder::new()),
        recognizer,
        cfg.stt.max_concurrent_passes,
    ));

    let sink: Option<Arc<dyn BroadcastStore>> =
        nats_client.map(|client| Arc::new(NatsBroadcast::new(client)) as Arc<dyn BroadcastStore>);

    let state = AppState {
        registry: Arc::new(SessionRegistry::new()),
        engine,
        sink,
        stt: Arc::new(cfg.stt.clone()),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
