use anyhow::{Result, anyhow};

use super::models::{Completion, Session};
use crate::groq::{DynCompletionClient, Message};

/// Reply recorded when there is no API key and therefore no client.
pub const MISSING_API_KEY_REPLY: &str =
    "Error: no está configurada la GROQ_API_KEY en el entorno.";

/// Reply recorded when the model couldn't be reached.
pub const FALLBACK_REPLY: &str = "Lo siento, hubo un error al contactar al modelo.";

/// Picks the model to use from the allowed `choices`. Anything not in
/// the list, or no request at all, falls back to the first entry.
pub fn select_model<'a>(choices: &'a [String], requested: Option<&str>) -> Result<&'a str> {
    let default = choices.first().ok_or(anyhow!("No models configured"))?;
    let selected = requested
        .and_then(|r| choices.iter().find(|c| c.as_str() == r))
        .unwrap_or(default);
    Ok(selected.as_str())
}

/// Gets the next reply from the model. Never fails: a missing client
/// or a failed request are turned into a reply that explains what
/// happened so the conversation can carry on.
pub async fn request_completion(
    client: Option<&DynCompletionClient>,
    model: &str,
    messages: &[Message],
) -> Completion {
    let Some(client) = client else {
        return Completion::reply(MISSING_API_KEY_REPLY);
    };

    match client.completion(model, messages).await {
        Ok(content) => Completion::reply(&content),
        Err(e) => {
            tracing::error!("Completion with {} failed: {}", model, e);
            Completion::fallback(FALLBACK_REPLY, format!("Error al llamar al modelo: {}", e))
        }
    }
}

/// Runs one full turn: records the user's message, asks the model for
/// a reply with the whole history and records that too.
pub async fn run_turn(
    session: &mut Session,
    client: Option<&DynCompletionClient>,
    model: &str,
    content: &str,
) -> Result<Completion> {
    let history = session.begin_turn(content)?;
    let completion = request_completion(client, model, &history).await;
    session.finish_turn(completion.clone());
    Ok(completion)
}
