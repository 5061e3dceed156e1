//! StudySync - study session API
//!
//! Turns documents into flashcards and keeps multi-threaded study chats
//! backed by a remote completion model. All state lives in memory for the
//! lifetime of the process.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod conversation;
mod core;
mod flashcards;
mod providers;
mod routes;

use config::Config;
use conversation::ConversationRegistry;
use crate::core::ChatOrchestrator;
use flashcards::FlashcardStore;
use providers::Provider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub flashcards: Arc<Mutex<FlashcardStore>>,
    pub conversations: Arc<Mutex<ConversationRegistry>>,
    pub chat: Arc<ChatOrchestrator>,
}

impl AppState {
    /// Fresh session: no cards, no conversations
    pub fn new(chat: ChatOrchestrator) -> Self {
        Self {
            flashcards: Arc::new(Mutex::new(FlashcardStore::new())),
            conversations: Arc::new(Mutex::new(ConversationRegistry::new())),
            chat: Arc::new(chat),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studysync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    if config.llm_api_key.is_none() && config.study.llm.provider != "ollama" {
        tracing::warn!(
            "{} is not set; chat requests will likely be refused",
            config.study.llm.api_key_env
        );
    }

    let provider = Provider::from_config(&config)?;
    let directive = config.system_directive().await?;
    let chat = ChatOrchestrator::from_config(Arc::new(provider), &config, directive);

    tracing::info!(
        provider = %config.study.llm.provider,
        model = %config.study.llm.model,
        "Chat provider ready"
    );

    let app = Router::new()
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(chat));

    tracing::info!("StudySync API running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
