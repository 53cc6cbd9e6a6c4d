//! Router for the server rendered chat page

use std::sync::{Arc, RwLock};

use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::Query;
use uuid::Uuid;

use super::public;
use super::templates::{ChatPage, ModelOption, PageMessage, render_chat_page};
use crate::api::public::ApiError;
use crate::api::routes::chat::{TurnOutcome, run_session_turn};
use crate::api::state::AppState;
use crate::chat::select_model;

type SharedState = Arc<RwLock<AppState>>;

fn page_url(session_id: &str, model: Option<&str>) -> String {
    match model {
        Some(model) => format!(
            "/?session_id={}&model={}",
            urlencoding::encode(session_id),
            urlencoding::encode(model)
        ),
        None => format!("/?session_id={}", urlencoding::encode(session_id)),
    }
}

/// Render the chat page for a session. Visiting without a session
/// starts a new one.
async fn chat_page(
    State(state): State<SharedState>,
    Query(params): Query<public::ChatPageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(session_id) = params.session_id else {
        let session_id = Uuid::new_v4().to_string();
        tracing::info!("Starting new chat session {}", session_id);
        return Ok(Redirect::to(&page_url(&session_id, params.model.as_deref())).into_response());
    };

    let mut shared_state = state.write().expect("Unable to write share state");
    let AppState {
        sessions,
        config,
        templates,
        ..
    } = &mut *shared_state;

    let model = select_model(&config.models, params.model.as_deref())?;
    let models = config
        .models
        .iter()
        .map(|id| ModelOption {
            id: id.clone(),
            selected: id == model,
        })
        .collect();

    // Sessions are only created by sending a message
    let (messages, notice) = match sessions.get_mut(&session_id) {
        Some(session) => {
            let messages: Vec<PageMessage> = session
                .messages()
                .iter()
                .map(|m| PageMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect();
            (messages, session.take_notice())
        }
        None => (Vec::new(), None),
    };

    let page = ChatPage {
        title: config.page_title.clone(),
        session_id: session_id.clone(),
        model: model.to_string(),
        models,
        messages,
        notice,
    };
    let html = render_chat_page(templates, &page)?;

    Ok(Html(html).into_response())
}

/// Send a message from the page's chat input
async fn send_message(
    State(state): State<SharedState>,
    Form(form): Form<public::MessageForm>,
) -> Result<Redirect, ApiError> {
    let redirect = Redirect::to(&page_url(&form.session_id, form.model.as_deref()));

    // Nothing was typed
    if form.message.is_empty() {
        return Ok(redirect);
    }

    let outcome = run_session_turn(
        &state,
        &form.session_id,
        form.model.as_deref(),
        &form.message,
    )
    .await?;

    if let TurnOutcome::Busy = outcome {
        tracing::warn!(
            "Ignoring message for session {} while it waits for a reply",
            form.session_id
        );
    }

    Ok(redirect)
}

/// Clear the chat history from the sidebar button
async fn clear_chat(
    State(state): State<SharedState>,
    Form(form): Form<public::ClearForm>,
) -> Result<Redirect, ApiError> {
    {
        let mut shared_state = state.write().expect("Unable to write share state");
        if let Some(session) = shared_state.sessions.get_mut(&form.session_id) {
            session.clear();
            tracing::info!("Cleared chat session {}", form.session_id);
        }
    }

    Ok(Redirect::to(&page_url(
        &form.session_id,
        form.model.as_deref(),
    )))
}

/// Create the chat page router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(chat_page))
        .route("/chat", post(send_message))
        .route("/clear", post(clear_chat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_encodes_params() {
        assert_eq!(
            page_url("abc", Some("meta-llama/llama-guard-4-12b")),
            "/?session_id=abc&model=meta-llama%2Fllama-guard-4-12b"
        );
        assert_eq!(page_url("a b", None), "/?session_id=a%20b");
    }
}
