use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadgen_api::config::{GeneratorConfig, ServerConfig};
use leadgen_api::router::build_app_router;
use leadgen_api::state::AppState;
use leadgen_comfyui::api::ComfyUIApi;
use leadgen_comfyui::generator::ImageGenerator;
use leadgen_pipeline::memory_store::MemoryPageSink;
use leadgen_pipeline::pipeline::LeadPagePipeline;
use leadgen_pipeline::text::OllamaClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "leadgen_api=debug,leadgen_comfyui=debug,leadgen_pipeline=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let generator = GeneratorConfig::from_env();
    tracing::info!(
        comfyui_url = %generator.comfyui_url,
        ollama_url = %generator.ollama.base_url,
        model = %generator.ollama.model,
        poll_interval_ms = generator.poll.interval.as_millis() as u64,
        poll_timeout_secs = generator.poll.timeout.as_secs(),
        image_mode = ?generator.image_mode,
        "Loaded generator configuration",
    );

    // --- Upstream clients ---
    let comfyui = Arc::new(ComfyUIApi::new(generator.comfyui_url.clone()));
    let images = ImageGenerator::new(comfyui, generator.poll.clone());
    let text = Arc::new(OllamaClient::new(generator.ollama.clone()));

    // --- Page store ---
    let store = Arc::new(MemoryPageSink::new());

    let pipeline = LeadPagePipeline::new(text, images, generator.image_mode, store.clone());

    // Not fatal: the services may come up after the server does.
    let services = pipeline.check_services().await;
    if services.all_up() {
        tracing::info!("Text and image services reachable");
    } else {
        tracing::warn!(down = ?services.down_services(), "Some upstream services are not reachable");
    }

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        pipeline,
        store,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
