//! API routes

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::conversation::{ConversationId, Message};
use crate::core::{ingest, DocumentSource, PdfDocument, SendOutcome, TextDocument};
use crate::flashcards::Flashcard;
use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct NewCardRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub cards: Vec<Flashcard>,
    pub count: usize,
    pub empty: bool,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub cards: Vec<Flashcard>,
    pub pages: usize,
    pub failed_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub created_at: DateTime<Utc>,
    pub messages: usize,
}

#[derive(Debug, Serialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<ConversationSummary>,
    pub active: Option<ConversationId>,
}

#[derive(Debug, Serialize)]
pub struct CreatedConversation {
    pub id: ConversationId,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: ConversationId,
}

#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub active: Option<ConversationId>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Errors surfaced to API callers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected: {0}")]
    Rejected(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_cards(State(state): State<AppState>) -> Json<CardsResponse> {
    let store = state.flashcards.lock().await;
    Json(CardsResponse {
        cards: store.cards().to_vec(),
        count: store.len(),
        empty: store.is_empty(),
    })
}

async fn add_card(
    State(state): State<AppState>,
    Json(request): Json<NewCardRequest>,
) -> Result<(StatusCode, Json<Flashcard>), ApiError> {
    let card = state
        .flashcards
        .lock()
        .await
        .add_manual(&request.question, &request.answer)
        .ok_or_else(|| ApiError::Rejected("question and answer are required".into()))?;

    Ok((StatusCode::CREATED, Json(card)))
}

async fn flip_card(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Flashcard>, ApiError> {
    let mut store = state.flashcards.lock().await;
    if !store.flip(id) {
        return Err(ApiError::NotFound(format!("flashcard {}", id)));
    }
    store
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {}", id)))
}

/// Accepts a PDF (`application/pdf`) or extracted text with form-feed page breaks
async fn ingest_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DocumentResponse>, ApiError> {
    let is_pdf = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/pdf"));

    let document: Box<dyn DocumentSource> = if is_pdf {
        let pdf = PdfDocument::from_bytes(&body).map_err(|e| ApiError::Rejected(e.to_string()))?;
        Box::new(pdf)
    } else {
        let text = std::str::from_utf8(&body)
            .map_err(|_| ApiError::Rejected("document text must be UTF-8".into()))?;
        Box::new(TextDocument::from_text(text))
    };

    let ingestion = ingest(document.as_ref()).await;
    let cards = state.flashcards.lock().await.ingest_text(&ingestion.text);

    Ok(Json(DocumentResponse {
        cards,
        pages: ingestion.pages,
        failed_pages: ingestion.failed_pages,
    }))
}

async fn list_conversations(State(state): State<AppState>) -> Json<ConversationsResponse> {
    let registry = state.conversations.lock().await;
    let conversations = registry
        .list_conversations()
        .iter()
        .filter_map(|id| {
            registry.thread(id).map(|thread| ConversationSummary {
                id: id.clone(),
                created_at: thread.created_at(),
                messages: thread.len(),
            })
        })
        .collect();

    Json(ConversationsResponse {
        conversations,
        active: registry.active().cloned(),
    })
}

async fn create_conversation(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreatedConversation>) {
    let id = state.conversations.lock().await.create_conversation();
    (StatusCode::CREATED, Json(CreatedConversation { id }))
}

async fn select_conversation(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<ThreadResponse>, ApiError> {
    let mut registry = state.conversations.lock().await;
    if !registry.select_conversation(&request.id) {
        return Err(ApiError::NotFound(request.id.to_string()));
    }
    Ok(Json(ThreadResponse {
        active: registry.active().cloned(),
        messages: registry.active_messages().to_vec(),
    }))
}

async fn set_draft(State(state): State<AppState>, Json(request): Json<DraftRequest>) -> StatusCode {
    state.conversations.lock().await.set_draft(request.text);
    StatusCode::NO_CONTENT
}

async fn active_messages(State(state): State<AppState>) -> Json<ThreadResponse> {
    let registry = state.conversations.lock().await;
    Json(ThreadResponse {
        active: registry.active().cloned(),
        messages: registry.active_messages().to_vec(),
    })
}

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<SendOutcome> {
    Json(state.chat.send(&state.conversations, &request.message).await)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/flashcards", get(list_cards).post(add_card))
        .route("/v1/flashcards/:id/flip", post(flip_card))
        .route("/v1/flashcards/document", post(ingest_document))
        .route(
            "/v1/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route("/v1/conversations/select", post(select_conversation))
        .route("/v1/conversations/draft", put(set_draft))
        .route("/v1/conversations/active/messages", get(active_messages))
        .route("/v1/chat", post(chat))
}
