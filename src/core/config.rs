use std::env;

/// Model identifiers offered in the model picker. The first entry is
/// the default selection.
pub const MODELS: [&str; 5] = [
    "llama-3.1-8b-instant",
    "llama-3.3-70b-versatile",
    "meta-llama/llama-guard-4-12b",
    "openai/gpt-oss-20b",
    "openai/gpt-oss-120b",
];

#[derive(Clone, Debug)]
pub struct AppConfig {
    // Missing key means there is no client. Completions short circuit
    // to a fixed error reply instead of failing.
    pub groq_api_key: Option<String>,
    pub groq_api_hostname: String,
    pub models: Vec<String>,
    pub page_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let groq_api_key = env::var("GROQ_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let groq_api_hostname = env::var("CHATBOT_GROQ_API_HOST")
            .unwrap_or_else(|_| "https://api.groq.com/openai".to_string());

        Self {
            groq_api_key,
            groq_api_hostname,
            models: MODELS.iter().map(|m| m.to_string()).collect(),
            page_title: String::from("Pagina para el chatbot"),
        }
    }
}
