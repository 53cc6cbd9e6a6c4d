//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::groq::Message;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    // Falls back to the default model when missing or unknown
    pub model: Option<String>,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub model: String,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub transcript: Vec<Message>,
}

#[derive(Serialize, Deserialize)]
pub struct ChatTranscriptResponse {
    pub transcript: Vec<Message>,
}

#[derive(Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub default: String,
}
