//! # Módulo Web — Atendimento pelo Navegador
//!
//! Camada HTTP da aplicação, construída com **Axum** + **Maud**.
//!
//! ## Arquitetura Web
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Browser (fetch + JSON)                                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                               │
//! │  ├── GET  /               → página do chat              │
//! │  ├── GET  /status         → JSON: modelo pronto?        │
//! │  ├── POST /chat           → JSON: respostas + intenções │
//! │  └── POST /session/reset  → JSON: sessão reiniciada     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Static Assets (tower_http::ServeDir → /assets/)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`, `ModelReady`) |
//! | [`session`] | Estado de diálogo por sessão, com TTL |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`templates`] | Templates Maud (HTML server-side) |

pub mod handlers;
pub mod session;
pub mod state;
pub mod templates;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::catalog::IntentCatalog;
use crate::config::ServeArgs;
use crate::gateway::{self, GatewayConfig};
use crate::nlu::stopwords::Stopwords;
use crate::orchestrator::Orchestrator;
use session::SessionStore;
use state::{AppState, ModelReady};

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // ── Página HTML ───────────────────────────────────────
        .route("/", get(handlers::index))
        // ── API JSON ──────────────────────────────────────────
        .route("/status", get(handlers::model_status))
        .route("/chat", post(handlers::chat))
        .route("/session/reset", post(handlers::reset_session))
        // ── Arquivos estáticos ────────────────────────────────
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Sobe o servidor e monta o orquestrador em background.
///
/// O servidor aceita conexões imediatamente; até o `OnceLock` ser
/// preenchido, `/chat` responde `503`.
pub async fn serve(
    args: ServeArgs,
    catalog_path: PathBuf,
    stopwords: Stopwords,
    gateway_config: GatewayConfig,
) -> Result<()> {
    let sessions = SessionStore::new(chrono::Duration::minutes(args.session_ttl_minutes));
    let state = AppState::new(sessions);
    let model = state.model.clone();

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("falha ao escutar em {}", args.bind))?;
    tracing::info!("🍕 Servidor em http://{}", args.bind);

    // O cliente reqwest bloqueante é criado e vive fora do runtime async.
    let loader = tokio::task::spawn_blocking(move || {
        let ready = load_model(&catalog_path, stopwords, gateway_config);
        let _ = model.set(ready);
        tracing::info!("✅ Atendente pronto!");
    });
    tokio::spawn(async move {
        if let Err(e) = loader.await {
            tracing::error!(error = %e, "Falha ao montar o atendente; /chat seguirá indisponível");
        }
    });

    axum::serve(listener, app).await?;
    Ok(())
}

/// Carrega catálogo, ajusta o classificador e conecta o gateway.
///
/// Nunca falha: catálogo ilegível vira vazio e gateway sem cliente HTTP
/// vira [`crate::gateway::UnavailableGateway`]. Bloqueante.
pub fn load_model(catalog_path: &Path, stopwords: Stopwords, gateway_config: GatewayConfig) -> ModelReady {
    let catalog = Arc::new(IntentCatalog::load_or_empty(catalog_path));
    let orchestrator = Orchestrator::new(catalog, stopwords, gateway::connect(gateway_config));
    ModelReady {
        orchestrator: Arc::new(orchestrator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::DialogueState;

    #[test]
    fn model_loads_even_without_a_catalog_file() {
        let ready = load_model(
            Path::new("/nao/existe/intents.json"),
            Stopwords::none(),
            GatewayConfig::default(),
        );
        let turn = ready.orchestrator.process("Oi", DialogueState::Idle).unwrap();
        assert_eq!(turn.results[0].intent, "unknown");
    }

    #[test]
    fn model_loads_the_shipped_catalog() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/intents.json");
        let ready = load_model(&path, Stopwords::none(), GatewayConfig::default());
        let turn = ready.orchestrator.process("Bom dia", DialogueState::Idle).unwrap();
        assert_eq!(turn.results[0].intent, "saudacao");
    }
}
