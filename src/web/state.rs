//! # Estado da Aplicação Web
//!
//! Define as structs de estado compartilhado entre todos os handlers Axum.
//!
//! ## Padrão de Inicialização em Duas Fases
//!
//! ```text
//! Fase 1 (imediata):        Fase 2 (background):
//! ┌──────────────────┐     ┌──────────────────┐
//! │ AppState         │     │ ModelReady       │
//! │  ├── sessions ✓  │     │  └── orchestrator│
//! │  └── model: ∅    │←────│  (set via OnceLock)
//! └──────────────────┘     └──────────────────┘
//!       ↓ Web server                ↓ catálogo + TF-IDF
//!    disponível                  classificador pronto
//! ```

use std::sync::{Arc, OnceLock};

use super::session::SessionStore;
use crate::orchestrator::Orchestrator;

/// Orquestrador pronto, publicado quando catálogo e índice terminam de carregar.
pub struct ModelReady {
    pub orchestrator: Arc<Orchestrator>,
}

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Preenchido em background via `OnceLock::set()`.
    pub model: Arc<OnceLock<ModelReady>>,
    /// Estado de diálogo por sessão.
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(sessions: SessionStore) -> Self {
        Self {
            model: Arc::new(OnceLock::new()),
            sessions: Arc::new(sessions),
        }
    }

    /// Estado já com o orquestrador publicado.
    #[cfg(test)]
    pub fn ready(orchestrator: Orchestrator, sessions: SessionStore) -> Self {
        let state = Self::new(sessions);
        let _ = state.model.set(ModelReady {
            orchestrator: Arc::new(orchestrator),
        });
        state
    }
}
