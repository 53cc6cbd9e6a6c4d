use std::sync::Arc;

use handlebars::Handlebars;

use crate::api::routes::ui::templates::templates;
use crate::chat::Sessions;
use crate::core::AppConfig;
use crate::groq::{GroqClient, SharedCompletionClient};

pub struct AppState {
    pub sessions: Sessions,
    // `None` when there is no API key configured
    pub client: Option<SharedCompletionClient>,
    pub templates: Handlebars<'static>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let client = GroqClient::from_config(&config)
            .map(|client| Arc::new(client) as SharedCompletionClient);
        Self::new_with_client(config, client)
    }

    pub fn new_with_client(config: AppConfig, client: Option<SharedCompletionClient>) -> Self {
        Self {
            sessions: Sessions::new(),
            client,
            templates: templates(),
            config,
        }
    }
}
