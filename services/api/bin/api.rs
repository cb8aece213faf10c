//! Main Entrypoint for the Eco Detective API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Loading prompt templates.
//! 3. Initializing the service clients and adapters.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::{AzureConfig, OpenAIConfig};
use eco_detective_api::{
    config::{ChatProvider, Config},
    router::create_router,
    sessions::SessionStore,
    state::AppState,
};
use eco_detective_core::{
    classify::ImageClassificationAdapter,
    llm_client::{ChatClient, OpenAICompatibleClient},
    prompts::Prompts,
    speech::AzureSpeechClient,
    tts::{GoogleTranslateTts, TTS_LANGUAGE},
    vision::CustomVisionClient,
    voice::VoiceQaAdapter,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

fn chat_client(config: &Config) -> anyhow::Result<Arc<dyn ChatClient>> {
    let client: Arc<dyn ChatClient> = match config.chat_provider {
        ChatProvider::Azure => {
            info!("Using Azure OpenAI provider.");
            let azure_config = AzureConfig::new()
                .with_api_base(
                    config
                        .azure_openai_endpoint
                        .as_deref()
                        .context("AZURE_OPENAI_ENDPOINT not set")?,
                )
                .with_api_version(&config.azure_openai_version)
                .with_deployment_id(&config.chat_model)
                .with_api_key(
                    config
                        .azure_openai_api_key
                        .as_deref()
                        .context("AZURE_OPENAI_API_KEY not set")?,
                );
            Arc::new(OpenAICompatibleClient::new(
                azure_config,
                config.chat_model.clone(),
            ))
        }
        ChatProvider::OpenAI => {
            info!("Using OpenAI provider.");
            let openai_config = OpenAIConfig::new().with_api_key(
                config
                    .openai_api_key
                    .as_deref()
                    .context("OPENAI_API_KEY not set")?,
            );
            Arc::new(OpenAICompatibleClient::new(
                openai_config,
                config.chat_model.clone(),
            ))
        }
    };
    Ok(client)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Load Prompts and Prepare Directories ---
    let prompts = Arc::new(
        Prompts::load_dir(&config.prompts_path).context("Failed to load prompt templates")?,
    );
    tokio::fs::create_dir_all(config.audio_dir()).await?;
    tokio::fs::create_dir_all(config.scratch_dir()).await?;
    info!(work_dir = %config.work_dir.display(), "Prompts loaded and work directories ready.");

    // --- 4. Initialize Shared Services ---
    let chat = chat_client(&config)?;

    let speech_endpoint = config
        .speech_endpoint
        .clone()
        .unwrap_or_else(|| AzureSpeechClient::endpoint_for_region(&config.speech_region));
    let stt = Arc::new(AzureSpeechClient::new(
        speech_endpoint,
        config.speech_key.clone(),
    ));

    let cv = &config.custom_vision;
    let vision = Arc::new(CustomVisionClient::new(
        &cv.endpoint,
        &cv.project_id,
        &cv.iteration_name,
        cv.key.clone(),
    ));

    let tts = Arc::new(GoogleTranslateTts::new(&config.tts_base_url, TTS_LANGUAGE));

    let app_state = Arc::new(AppState {
        sessions: Arc::new(SessionStore::new()),
        voice: Arc::new(VoiceQaAdapter::new(stt, chat.clone(), prompts.clone())),
        classifier: Arc::new(ImageClassificationAdapter::new(
            vision,
            chat,
            tts,
            prompts,
            config.scratch_dir(),
            config.audio_dir(),
        )),
        config: Arc::new(config.clone()),
    });

    // --- 5. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // --- 6. Start Server ---
    info!(
        provider = ?config.chat_provider,
        model = %config.chat_model,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
