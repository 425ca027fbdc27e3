//! # Configuração — Linha de Comando e Variáveis de Ambiente
//!
//! Toda opção tem uma variável de ambiente equivalente, então o mesmo
//! binário roda local (`--llm-api-key ...`) ou em container (`LLM_API_KEY=...`).
//!
//! ```bash
//! # Servidor web na porta 5000
//! pizzaria-chat serve
//!
//! # Chat no terminal, catálogo alternativo
//! PIZZARIA_CATALOG=meu_catalogo.json pizzaria-chat chat
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::gateway::{GatewayConfig, DEFAULT_API_URL, DEFAULT_MODEL};
use crate::nlu::stopwords::{StopwordLanguage, Stopwords};

#[derive(Debug, Parser)]
#[command(name = "pizzaria-chat", version, about = "Atendente virtual da pizzaria")]
pub struct Cli {
    #[command(flatten)]
    pub nlu: NluArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sobe o servidor HTTP (padrão).
    Serve,
    /// Conversa pelo terminal.
    Chat,
}

#[derive(Debug, Args)]
pub struct NluArgs {
    /// Catálogo de intenções (JSON).
    #[arg(long, env = "PIZZARIA_CATALOG", default_value = "data/intents.json", global = true)]
    pub catalog: PathBuf,

    /// Lista embutida de stopwords.
    #[arg(long, env = "PIZZARIA_STOPWORDS", value_enum, default_value_t = StopwordLanguage::Portuguese, global = true)]
    pub stopwords: StopwordLanguage,

    /// Arquivo de stopwords (uma por linha); substitui a lista embutida.
    #[arg(long, env = "PIZZARIA_STOPWORDS_FILE", global = true)]
    pub stopwords_file: Option<PathBuf>,
}

impl NluArgs {
    pub fn stopwords(&self) -> Stopwords {
        match &self.stopwords_file {
            Some(path) => Stopwords::from_file(path),
            None => Stopwords::builtin(self.stopwords),
        }
    }
}

#[derive(Debug, Args)]
pub struct LlmArgs {
    /// Chave da API do serviço de receitas; sem ela, nenhuma chamada é feita.
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true, global = true)]
    pub llm_api_key: Option<String>,

    #[arg(long, env = "LLM_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub llm_api_url: String,

    #[arg(long, env = "LLM_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub llm_model: String,
}

impl LlmArgs {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            api_key: self.llm_api_key.clone(),
            api_url: self.llm_api_url.clone(),
            model: self.llm_model.clone(),
            ..GatewayConfig::default()
        }
    }
}

/// Opções do servidor. Globais: valem com ou sem o subcomando `serve`.
#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Endereço de escuta.
    #[arg(long, env = "PIZZARIA_BIND", default_value = "0.0.0.0:5000", global = true)]
    pub bind: String,

    /// Minutos sem atividade até a sessão voltar ao estado inicial (1 a 10080).
    #[arg(
        long,
        env = "PIZZARIA_SESSION_TTL_MINUTES",
        default_value_t = 30,
        value_parser = clap::value_parser!(i64).range(1..=10_080),
        global = true
    )]
    pub session_ttl_minutes: i64,
}
