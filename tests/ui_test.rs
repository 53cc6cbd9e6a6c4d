//! Integration tests for the server rendered chat page

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, completion_body, test_app, test_app_without_key};

    async fn get_page(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .method("POST")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    fn location(response: &Response) -> String {
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    /// Tests visiting without a session starts a new one
    #[tokio::test]
    async fn it_redirects_to_new_session() {
        let app = test_app_without_key().await;

        let response = get_page(&app, "/").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(location(&response).starts_with("/?session_id="));
    }

    /// Tests rendering an empty chat page
    #[tokio::test]
    async fn it_renders_chat_page() {
        let app = test_app_without_key().await;

        let response = get_page(&app, "/?session_id=page").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("<h1>Pagina para el chatbot</h1>"));
        assert!(body.contains("Elegi tu IA"));
        assert!(body.contains("Elegiste el modelo: llama-3.1-8b-instant"));
        assert!(body.contains("Limpiar chat"));
        assert!(!body.contains("class=\"message"));
    }

    /// Tests the model picker reflects the chosen model
    #[tokio::test]
    async fn it_renders_selected_model() {
        let app = test_app_without_key().await;

        let response = get_page(&app, "/?session_id=page&model=openai%2Fgpt-oss-120b").await;

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Elegiste el modelo: openai/gpt-oss-120b"));
        assert!(body.contains(r#"<option value="openai/gpt-oss-120b" selected>"#));
    }

    /// Tests sending a message without an API key
    #[tokio::test]
    async fn it_sends_message_without_api_key() {
        let app = test_app_without_key().await;

        let response = post_form(&app, "/chat", "session_id=no-key&message=hola").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?session_id=no-key");

        let response = get_page(&app, "/?session_id=no-key").await;
        let body = body_to_string(response.into_body()).await;
        let user = body
            .find(r#"<span class="role">user</span>hola"#)
            .expect("Missing user message");
        let assistant = body
            .find("Error: no está configurada la GROQ_API_KEY")
            .expect("Missing error reply");
        assert!(user < assistant);
    }

    /// Tests a reply from the model is shown after the user's message
    #[tokio::test]
    async fn it_shows_model_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("¡Hola! ¿En qué puedo ayudarte?"))
            .create_async()
            .await;
        let app = test_app(&server.url(), Some("gsk_test")).await;

        let response = post_form(
            &app,
            "/chat",
            "session_id=reply&model=openai%2Fgpt-oss-20b&message=hola",
        )
        .await;
        assert_eq!(
            location(&response),
            "/?session_id=reply&model=openai%2Fgpt-oss-20b"
        );

        let response = get_page(&app, &location(&response)).await;
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains(
            r#"<div class="message assistant"><span class="role">assistant</span>¡Hola! ¿En qué puedo ayudarte?</div>"#
        ));
    }

    /// Tests a failed request shows a notice once
    #[tokio::test]
    async fn it_shows_notice_once_on_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .create_async()
            .await;
        let app = test_app(&server.url(), Some("gsk_test")).await;

        post_form(&app, "/chat", "session_id=notice&message=hola").await;

        let body = body_to_string(get_page(&app, "/?session_id=notice").await.into_body()).await;
        assert!(body.contains("Error al llamar al modelo:"));
        assert!(body.contains("Lo siento, hubo un error al contactar al modelo."));

        let body = body_to_string(get_page(&app, "/?session_id=notice").await.into_body()).await;
        assert!(!body.contains("Error al llamar al modelo:"));
        assert!(body.contains("Lo siento, hubo un error al contactar al modelo."));
    }

    /// Tests submitting without typing anything records nothing
    #[tokio::test]
    async fn it_ignores_empty_input() {
        let app = test_app_without_key().await;

        let response = post_form(&app, "/chat", "session_id=empty&message=").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let body = body_to_string(get_page(&app, "/?session_id=empty").await.into_body()).await;
        assert!(!body.contains("class=\"message"));
    }

    /// Tests the clear button empties the history
    #[tokio::test]
    async fn it_clears_chat() {
        let app = test_app_without_key().await;
        post_form(&app, "/chat", "session_id=clear&message=hola").await;

        let response = post_form(&app, "/clear", "session_id=clear").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?session_id=clear");

        let body = body_to_string(get_page(&app, "/?session_id=clear").await.into_body()).await;
        assert!(!body.contains("class=\"message"));
    }

    /// Tests viewing a page doesn't create the session
    #[tokio::test]
    async fn it_does_not_create_session_on_view() {
        let app = test_app_without_key().await;

        let response = get_page(&app, "/?session_id=just-looking").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_page(&app, "/api/chat/just-looking").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests clearing a session that was never started doesn't create it
    #[tokio::test]
    async fn it_does_not_create_session_on_clear() {
        let app = test_app_without_key().await;

        let response = post_form(&app, "/clear", "session_id=never-started").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?session_id=never-started");

        let response = get_page(&app, "/api/chat/never-started").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
