//! # Pizzaria Chat — Atendente Virtual
//!
//! **Ponto de entrada principal** do atendente da pizzaria.
//!
//! O atendente classifica mensagens livres em intenções pré-definidas
//! (saudação, cardápio, preços, entrega, ingredientes...) por similaridade
//! TF-IDF contra um catálogo de frases de exemplo, responde com textos do
//! catálogo e consulta um serviço externo (LLM) para listar os
//! ingredientes de um sabor.
//!
//! ## Fluxo de Inicialização (`serve`)
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging
//!   ├── Lê configuração (CLI + variáveis de ambiente)
//!   ├── Monta AppState e Router
//!   ├── Inicia servidor TCP (porta 5000)
//!   └── Spawn background:
//!       ├── Carrega catálogo de intenções
//!       ├── Ajusta espaço TF-IDF
//!       ├── Cria gateway de receitas
//!       └── Publica em OnceLock (ModelReady)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Servidor web com logs padrão (info)
//! cargo run
//!
//! # Chat no terminal, com logs detalhados
//! RUST_LOG=debug cargo run -- chat
//!
//! # Ingredientes via LLM
//! LLM_API_KEY=sk-... cargo run -- serve --bind 127.0.0.1:8080
//! ```

/// Módulo `catalog` — catálogo de intenções (tags, padrões, respostas).
mod catalog;

/// Módulo `cli` — conversa pelo terminal.
mod cli;

/// Módulo `config` — opções de linha de comando e ambiente.
mod config;

/// Módulo `error` — erros de domínio.
mod error;

/// Módulo `gateway` — consulta de receitas em serviço externo.
mod gateway;

/// Módulo `nlu` — normalização, TF-IDF, classificação e extração de sabores.
mod nlu;

/// Módulo `orchestrator` — roteamento por frase e máquina de estados do diálogo.
mod orchestrator;

/// Módulo `web` — servidor axum, handlers HTTP e templates.
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::catalog::IntentCatalog;
use crate::config::{Cli, Command};
use crate::orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG sobrescreve o nível padrão.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let stopwords = cli.nlu.stopwords();
    let gateway_config = cli.llm.gateway_config();

    if gateway_config.api_key.is_none() {
        tracing::warn!("LLM_API_KEY não definida; consultas de ingredientes ficam indisponíveis");
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("🍕 Pizzaria Chat — iniciando servidor...");
            web::serve(cli.serve, cli.nlu.catalog, stopwords, gateway_config).await
        }
        Command::Chat => {
            let catalog_path = cli.nlu.catalog;
            // reqwest::blocking não pode ser usado dentro do runtime async.
            tokio::task::spawn_blocking(move || -> Result<()> {
                let catalog = Arc::new(IntentCatalog::load_or_empty(&catalog_path));
                let orchestrator = Orchestrator::new(catalog, stopwords, gateway::connect(gateway_config));
                let stdin = std::io::stdin();
                cli::run(&orchestrator, stdin.lock(), std::io::stdout())
            })
            .await
            .context("tarefa do chat abortada")?
        }
    }
}
