//! Server rendered chat page. Handlebars escapes everything by
//! default which matters here since model output is untrusted.

use anyhow::Result;
use handlebars::Handlebars;
use serde::Serialize;

const CHAT_PAGE: &str = "chat_page";

const CHAT_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{title}}</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>🫡</text></svg>">
<style>
body { margin: 0; display: flex; min-height: 100vh; font-family: sans-serif; }
aside { width: 18rem; padding: 1rem; background: #f0f2f6; }
main { flex: 1; display: flex; flex-direction: column; max-width: 48rem; margin: 0 auto; padding: 1rem; }
.message { padding: 0.75rem; margin: 0.5rem 0; border-radius: 0.5rem; white-space: pre-wrap; }
.message .role { font-weight: bold; display: block; margin-bottom: 0.25rem; }
.message.user { background: #e8f0fe; }
.message.assistant { background: #f6f6f6; }
.message.system { background: #fff8e1; }
.notice { padding: 0.75rem; margin: 0.5rem 0; border-radius: 0.5rem; background: #ffebee; color: #b71c1c; }
#history { flex: 1; }
#chat-input { display: flex; gap: 0.5rem; }
#chat-input input[type=text] { flex: 1; padding: 0.5rem; }
</style>
</head>
<body>
<aside>
<h2>Elegi tu IA</h2>
<form method="get" action="/">
<input type="hidden" name="session_id" value="{{session_id}}">
<label for="model">Cual elegis?</label>
<select id="model" name="model" onchange="this.form.submit()">
{{#each models}}
<option value="{{id}}"{{#if selected}} selected{{/if}}>{{id}}</option>
{{/each}}
</select>
<noscript><button type="submit">Elegir</button></noscript>
</form>
<p>Elegiste el modelo: {{model}}</p>
<form method="post" action="/clear">
<input type="hidden" name="session_id" value="{{session_id}}">
<input type="hidden" name="model" value="{{model}}">
<button type="submit">Limpiar chat</button>
</form>
</aside>
<main>
<h1>{{title}}</h1>
<div id="history">
{{#each messages}}
<div class="message {{role}}"><span class="role">{{role}}</span>{{content}}</div>
{{/each}}
{{#if notice}}
<div class="notice">{{notice}}</div>
{{/if}}
</div>
<form id="chat-input" method="post" action="/chat">
<input type="hidden" name="session_id" value="{{session_id}}">
<input type="hidden" name="model" value="{{model}}">
<input type="text" name="message" placeholder="Envia un mensaje" autofocus autocomplete="off">
<button type="submit">Enviar</button>
</form>
</main>
</body>
</html>
"#;

#[derive(Serialize)]
pub struct ModelOption {
    pub id: String,
    pub selected: bool,
}

#[derive(Serialize)]
pub struct PageMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatPage {
    pub title: String,
    pub session_id: String,
    pub model: String,
    pub models: Vec<ModelOption>,
    pub messages: Vec<PageMessage>,
    pub notice: Option<String>,
}

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(CHAT_PAGE, CHAT_PAGE_TEMPLATE)
        .expect("Failed to register template");
    registry
}

pub fn render_chat_page(registry: &Handlebars, page: &ChatPage) -> Result<String> {
    Ok(registry.render(CHAT_PAGE, page)?)
}
