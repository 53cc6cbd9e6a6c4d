mod core;
mod models;

pub use self::core::{FALLBACK_REPLY, MISSING_API_KEY_REPLY, request_completion, run_turn, select_model};
pub use models::{Completion, Session, Sessions, TurnState};
