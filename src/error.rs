//! # Erros de Domínio
//!
//! Taxonomia de erros do núcleo de diálogo. Falhas de transporte do gateway
//! ficam em [`crate::gateway::TransportError`] e nunca saem do gateway.

use std::path::PathBuf;

use thiserror::Error;

/// Erros que o núcleo pode sinalizar à camada de fronteira (web/CLI).
#[derive(Debug, Error)]
pub enum ChatError {
    /// O catálogo não tem nenhum padrão — não há espaço vetorial para pontuar.
    #[error("catálogo de intenções vazio: nenhum padrão para indexar")]
    EmptyCatalog,

    /// Mensagem do usuário vazia (ou só espaços).
    #[error("mensagem vazia")]
    EmptyMessage,

    /// Falha de I/O ao ler o catálogo (arquivo existe mas não pôde ser lido).
    #[error("falha ao ler catálogo {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON do catálogo malformado ou com campos incompatíveis.
    #[error("catálogo inválido {path}: {source}")]
    CatalogFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ChatError>;
