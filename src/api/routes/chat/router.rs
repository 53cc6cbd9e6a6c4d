//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::chat::{Completion, TurnState, request_completion, select_model};
use crate::groq::Message;

type SharedState = Arc<RwLock<AppState>>;

pub(crate) enum TurnOutcome {
    // The session is still waiting on the reply to a previous message
    Busy,
    Done {
        model: String,
        completion: Completion,
        transcript: Vec<Message>,
    },
}

/// Runs one turn of the session `session_id`, creating the session if
/// needed. The shared state is only locked while reading or updating
/// the session, never while waiting on the model.
///
/// The request and recording the reply run in their own task so the
/// turn always finishes and the session gets back to `Idle` even if
/// the caller goes away mid request.
pub(crate) async fn run_session_turn(
    state: &SharedState,
    session_id: &str,
    model: Option<&str>,
    message: &str,
) -> Result<TurnOutcome, ApiError> {
    let (model, history, client) = {
        let mut shared_state = state.write().expect("Unable to write share state");
        let model = select_model(&shared_state.config.models, model)?.to_string();
        let client = shared_state.client.clone();
        let session = shared_state.sessions.get_or_create(session_id);
        if session.state() == TurnState::AwaitingReply {
            return Ok(TurnOutcome::Busy);
        }
        let history = session.begin_turn(message)?;
        (model, history, client)
    };

    tracing::debug!("Session {} sending message to {}", session_id, model);

    let state = Arc::clone(state);
    let session_id = session_id.to_string();
    let turn = tokio::spawn(async move {
        let completion = request_completion(client.as_deref(), &model, &history).await;

        let transcript = {
            let mut shared_state = state.write().expect("Unable to write share state");
            match shared_state.sessions.get_mut(&session_id) {
                Some(session) => {
                    session.finish_turn(completion.clone());
                    session.messages().to_vec()
                }
                None => Vec::new(),
            }
        };

        TurnOutcome::Done {
            model,
            completion,
            transcript,
        }
    });

    Ok(turn.await?)
}

/// Add a message to a chat session and wait for the reply
async fn chat_handler(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<public::ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = run_session_turn(
        &state,
        &payload.session_id,
        payload.model.as_deref(),
        &payload.message,
    )
    .await?;

    match outcome {
        TurnOutcome::Busy => Ok((
            StatusCode::CONFLICT,
            format!(
                "Chat session {} is still waiting for a reply",
                payload.session_id
            ),
        )
            .into_response()),
        TurnOutcome::Done {
            model,
            completion,
            transcript,
        } => Ok(axum::Json(public::ChatResponse {
            session_id: payload.session_id,
            model,
            reply: completion.content,
            notice: completion.notice,
            transcript,
        })
        .into_response()),
    }
}

/// Get the transcript of a chat session by ID
async fn chat_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let shared_state = state.read().expect("Unable to read share state");

    let Some(session) = shared_state.sessions.get(&id) else {
        return Ok((
            StatusCode::NOT_FOUND,
            format!("Chat session {} not found", id),
        )
            .into_response());
    };

    Ok(axum::Json(public::ChatTranscriptResponse {
        transcript: session.messages().to_vec(),
    })
    .into_response())
}

/// Clear the transcript of a chat session
async fn chat_clear(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let mut shared_state = state.write().expect("Unable to write share state");

    let Some(session) = shared_state.sessions.get_mut(&id) else {
        return Ok((
            StatusCode::NOT_FOUND,
            format!("Chat session {} not found", id),
        )
            .into_response());
    };
    session.clear();
    tracing::info!("Cleared chat session {}", id);

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// List the models that can be chosen
async fn models_list(
    State(state): State<SharedState>,
) -> Result<axum::Json<public::ModelsResponse>, ApiError> {
    let shared_state = state.read().expect("Unable to read share state");
    let models = shared_state.config.models.clone();
    let default = select_model(&models, None)?.to_string();

    Ok(axum::Json(public::ModelsResponse { models, default }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(chat_handler))
        .route("/{id}", get(chat_session).delete(chat_clear))
}

/// Create the models router
pub fn models_router() -> Router<SharedState> {
    Router::new().route("/", get(models_list))
}
