//! # Handlers HTTP — Os Endpoints da Aplicação
//!
//! Cada função pública neste módulo é um handler Axum, mapeado a uma
//! rota em [`super::create_router()`].
//!
//! | Handler | Método | Retorno | Uso |
//! |---------|--------|---------|-----|
//! | `index` | GET | HTML completo | Página do chat (Maud) |
//! | `model_status` | GET | JSON | Polling de readiness |
//! | `chat` | POST | JSON | Classifica e responde uma mensagem |
//! | `reset_session` | POST | JSON | Volta a sessão ao estado inicial |
//!
//! ## Guarda de Model Ready
//!
//! `/chat` verifica `state.model.get()`:
//! - `Some(model)` → processa normalmente
//! - `None` → `503` com "Modelo carregando"

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::AppState;
use super::templates;
use crate::error::ChatError;
use crate::orchestrator::{ClassificationResult, Turn};

/// Resposta do endpoint `/status`.
#[derive(Serialize)]
pub struct StatusResponse {
    /// `true` quando catálogo e classificador estão prontos.
    pub ready: bool,
}

/// Corpo do `POST /chat`.
#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Sessão existente; ausente → uma nova é criada.
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

/// Resposta agregada de uma mensagem (todas as frases).
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    /// Respostas das frases, separadas por espaço.
    pub response: String,
    /// `"tag (xx.xx%), ..."` na ordem das frases.
    pub intents: String,
    /// Média das confianças, duas casas decimais.
    pub confidence: f64,
    pub details: Vec<ClassificationDetail>,
    pub session_id: Uuid,
    pub awaiting_dish: bool,
}

/// Registro por frase, como devolvido ao cliente.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassificationDetail {
    pub sentence: String,
    pub intent: String,
    pub confidence: f64,
    pub response: String,
    pub pending_slot: bool,
}

impl From<ClassificationResult> for ClassificationDetail {
    fn from(r: ClassificationResult) -> Self {
        Self {
            sentence: r.sentence,
            intent: r.intent,
            confidence: r.confidence,
            response: r.response,
            pending_slot: r.pending_slot,
        }
    }
}

impl ChatResponse {
    fn from_turn(turn: Turn, session_id: Uuid) -> Self {
        let response = turn
            .results
            .iter()
            .map(|r| r.response.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let intents = turn
            .results
            .iter()
            .map(|r| format!("{} ({:.2}%)", r.intent, r.confidence))
            .collect::<Vec<_>>()
            .join(", ");
        let confidence = if turn.results.is_empty() {
            0.0
        } else {
            let sum: f64 = turn.results.iter().map(|r| r.confidence).sum();
            round2(sum / turn.results.len() as f64)
        };

        Self {
            response,
            intents,
            confidence,
            details: turn.results.into_iter().map(Into::into).collect(),
            session_id,
            awaiting_dish: turn.state.is_awaiting_dish(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Página principal do chat.
pub async fn index() -> Html<String> {
    Html(templates::full_page().into_string())
}

pub async fn model_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        ready: state.model.get().is_some(),
    })
}

/// Processa uma mensagem: recupera o estado da sessão, roda o
/// orquestrador fora do runtime async (o gateway bloqueia) e persiste
/// o novo estado.
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Mensagem vazia");
    }

    let Some(model) = state.model.get() else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Modelo carregando, aguarde alguns segundos...",
        );
    };

    let session_id = req.session_id.unwrap_or_else(Uuid::new_v4);
    let dialogue = state.sessions.state(session_id);

    let orchestrator = model.orchestrator.clone();
    let outcome = tokio::task::spawn_blocking(move || orchestrator.process(&message, dialogue)).await;

    match outcome {
        Ok(Ok(turn)) => {
            state.sessions.save(session_id, turn.state);
            tracing::info!(
                session = %session_id,
                sentences = turn.results.len(),
                awaiting_dish = turn.state.is_awaiting_dish(),
                "Mensagem processada"
            );
            Json(ChatResponse::from_turn(turn, session_id)).into_response()
        }
        Ok(Err(ChatError::EmptyMessage)) => error_response(StatusCode::BAD_REQUEST, "Mensagem vazia"),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Falha ao processar mensagem");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao processar mensagem")
        }
        Err(e) => {
            tracing::error!(error = %e, "Tarefa de processamento abortada");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao processar mensagem")
        }
    }
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub reset: bool,
}

pub async fn reset_session(
    State(state): State<AppState>,
    Json(req): Json<ResetRequest>,
) -> Json<ResetResponse> {
    let reset = state.sessions.reset(req.session_id);
    tracing::debug!(session = %req.session_id, reset, "Sessão reiniciada");
    Json(ResetResponse { reset })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::{IntentCatalog, IntentRecord};
    use crate::gateway::RecipeGateway;
    use crate::nlu::stopwords::{StopwordLanguage, Stopwords};
    use crate::orchestrator::Orchestrator;
    use crate::web::create_router;
    use crate::web::session::SessionStore;

    #[derive(Default)]
    struct CountingGateway {
        calls: AtomicUsize,
    }

    impl RecipeGateway for CountingGateway {
        fn lookup(&self, dish: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            format!("massa, molho e {}", dish.to_lowercase())
        }
    }

    fn record(tag: &str, patterns: &[&str], responses: &[&str]) -> IntentRecord {
        IntentRecord {
            tag: tag.into(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            responses: responses.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ready_state() -> (AppState, Arc<CountingGateway>) {
        let catalog = IntentCatalog::new(vec![
            record("saudacao", &["Oi", "Olá", "Bom dia"], &["Olá! Bem-vindo."]),
            record("pedido", &["Quero fazer um pedido"], &["Qual sabor?"]),
            record("ingredientes", &["Quais os ingredientes"], &["Me diga o sabor."]),
            record("escolha_sabor", &["Margherita", "Calabresa"], &["Ótima escolha!"]),
        ]);
        let gateway = Arc::new(CountingGateway::default());
        let orchestrator = Orchestrator::with_rng(
            Arc::new(catalog),
            Stopwords::builtin(StopwordLanguage::Portuguese),
            gateway.clone(),
            Box::new(StdRng::seed_from_u64(1)),
        );
        (AppState::ready(orchestrator, SessionStore::default()), gateway)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn status_reports_readiness() {
        let (state, _) = ready_state();
        let request = Request::get("/status").body(Body::empty()).unwrap();
        let (status, body) = send(&state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);

        let loading = AppState::new(SessionStore::default());
        let request = Request::get("/status").body(Body::empty()).unwrap();
        let (_, body) = send(&loading, request).await;
        assert_eq!(body["ready"], false);
    }

    #[tokio::test]
    async fn empty_message_is_a_bad_request() {
        let (state, _) = ready_state();
        let (status, body) = send(&state, post_json("/chat", serde_json::json!({ "message": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Mensagem vazia");
    }

    #[tokio::test]
    async fn chat_is_unavailable_until_model_is_ready() {
        let loading = AppState::new(SessionStore::default());
        let (status, body) = send(&loading, post_json("/chat", serde_json::json!({ "message": "Oi" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("carregando"));
    }

    #[tokio::test]
    async fn multi_sentence_message_is_aggregated() {
        let (state, gateway) = ready_state();
        let (status, body) = send(
            &state,
            post_json("/chat", serde_json::json!({ "message": "Oi. Calabresa" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let response: ChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.details.len(), 2);
        assert_eq!(response.details[0].intent, "saudacao");
        assert_eq!(response.details[1].intent, "ingredientes");
        assert_eq!(response.details[1].confidence, 100.0);
        assert_eq!(
            response.response,
            "Olá! Bem-vindo. 🍕 Calabresa: massa, molho e calabresa"
        );

        let expected = round2((response.details[0].confidence + 100.0) / 2.0);
        assert_eq!(response.confidence, expected);
        assert!(response.intents.starts_with("saudacao ("));
        assert!(response.intents.ends_with("ingredientes (100.00%)"));
        assert!(!response.awaiting_dish);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pending_dish_survives_between_requests() {
        let (state, gateway) = ready_state();

        let (_, body) = send(
            &state,
            post_json("/chat", serde_json::json!({ "message": "Quais os ingredientes?" })),
        )
        .await;
        let first: ChatResponse = serde_json::from_value(body).unwrap();
        assert!(first.awaiting_dish);
        assert!(first.response.contains("1. Margherita, 2. Calabresa"));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);

        let (_, body) = send(
            &state,
            post_json(
                "/chat",
                serde_json::json!({ "message": "2", "session_id": first.session_id }),
            ),
        )
        .await;
        let second: ChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(second.session_id, first.session_id);
        assert!(!second.awaiting_dish);
        assert_eq!(second.response, "🍕 Calabresa: massa, molho e calabresa");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn new_session_does_not_inherit_pending_state() {
        let (state, gateway) = ready_state();
        let (_, body) = send(
            &state,
            post_json("/chat", serde_json::json!({ "message": "Quais os ingredientes?" })),
        )
        .await;
        assert_eq!(body["awaiting_dish"], true);

        let (_, body) = send(&state, post_json("/chat", serde_json::json!({ "message": "Oi" }))).await;
        assert_eq!(body["details"][0]["intent"], "saudacao");
        assert_eq!(body["awaiting_dish"], false);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reset_clears_the_pending_dish() {
        let (state, _) = ready_state();
        let (_, body) = send(
            &state,
            post_json("/chat", serde_json::json!({ "message": "Quais os ingredientes?" })),
        )
        .await;
        let session_id = body["session_id"].clone();

        let (status, body) = send(
            &state,
            post_json("/session/reset", serde_json::json!({ "session_id": session_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reset"], true);

        let (_, body) = send(
            &state,
            post_json("/chat", serde_json::json!({ "message": "Oi", "session_id": session_id })),
        )
        .await;
        assert_eq!(body["details"][0]["intent"], "saudacao");
        assert_eq!(body["awaiting_dish"], false);
    }

    #[tokio::test]
    async fn index_serves_the_chat_page() {
        let (state, _) = ready_state();
        let response = create_router(state)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("chat-form"));
    }
}
