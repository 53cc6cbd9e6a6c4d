//! Public types for the chat page
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ChatPageQuery {
    pub session_id: Option<String>,
    pub model: Option<String>,
}

#[derive(Deserialize)]
pub struct MessageForm {
    pub session_id: String,
    pub model: Option<String>,
    // Browsers always send the field, an empty value means nothing
    // was typed
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
pub struct ClearForm {
    pub session_id: String,
    pub model: Option<String>,
}
