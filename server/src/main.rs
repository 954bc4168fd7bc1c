use anyhow::Result;
use clap::Parser;
use inference::{InferenceConfig, PredictionService};
use review_sentiment_server::{create_router, AppState, ServerConfig, VERSION};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ONNX classifier (overrides MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Keras tokenizer JSON (overrides TOKENIZER_PATH)
    #[arg(long)]
    tokenizer: Option<PathBuf>,

    /// Newline-delimited stopword list (overrides STOPWORDS_PATH)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "review_sentiment_server=info,inference=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut server_config = ServerConfig::from_env_or_default();
    if let Some(port) = args.port {
        server_config.port = port;
    }
    server_config.validate()?;

    let mut inference_config = InferenceConfig::from_env_or_default();
    if let Some(model) = args.model {
        inference_config.model_path = model;
    }
    if let Some(tokenizer) = args.tokenizer {
        inference_config.tokenizer_path = tokenizer;
    }
    if let Some(stopwords) = args.stopwords {
        inference_config.stopwords_path = Some(stopwords);
    }

    info!("Starting review-sentiment-server v{}", VERSION);
    info!("Model: {:?}", inference_config.model_path);
    info!("Tokenizer: {:?}", inference_config.tokenizer_path);

    let service = PredictionService::load(&inference_config).map_err(|e| {
        error!("Failed to load prediction artifacts: {}", e);
        e
    })?;
    let app = create_router(AppState::new(service));

    let addr = server_config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
