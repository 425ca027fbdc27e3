//! # Gateway de Receitas — Consulta a um LLM Externo
//!
//! Dado o nome de um sabor, o [`RecipeGateway`] devolve um texto descritivo
//! (ingredientes e modo de preparo). É o **único** ponto bloqueante do
//! núcleo e também a fronteira de contenção de falhas: o orquestrador
//! nunca vê um erro de transporte — só texto.
//!
//! ## Fluxo de uma Consulta
//!
//! ```text
//! lookup("Calabresa")
//!   ├── sem credencial → mensagem "credenciais não configuradas" (zero chamadas)
//!   ├── tentativa 1 ── ok ──────────────→ extrai texto da resposta
//!   │       └── falha de transporte/5xx → espera backoff fixo
//!   ├── tentativa 2 ── ok ──────────────→ extrai texto da resposta
//!   │       └── falha → mensagem de erro amigável
//!   └── 4xx → mensagem de erro amigável (sem retry)
//! ```
//!
//! ## Formatos de Resposta Aceitos
//!
//! | Formato | Exemplo |
//! |---------|---------|
//! | Chat completion | `{"choices":[{"message":{"content":"..."}}]}` |
//! | Completion legado | `{"choices":[{"text":"..."}]}` |
//! | Chaves planas | `{"answer":"..."}`, `{"result":"..."}`, `{"response":"..."}` |
//! | Texto cru | corpo que não é JSON, ou JSON string |
//!
//! Nenhum formato reconhecido → corpo cru truncado em [`MAX_RAW_CHARS`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;

/// Mensagem quando não há chave de API configurada.
pub const CREDENTIALS_MISSING: &str =
    "Desculpe, a consulta de receitas não está disponível: credenciais da API não configuradas.";

/// Mensagem quando todas as tentativas falharam.
pub const LOOKUP_FAILED: &str =
    "Desculpe, não consegui consultar a receita agora. Tente novamente em instantes.";

/// Mensagem quando o serviço respondeu sem conteúdo.
pub const EMPTY_ANSWER: &str = "Desculpe, não encontrei informações sobre esse sabor.";

/// Limite de caracteres quando devolvemos o corpo cru.
pub const MAX_RAW_CHARS: usize = 1000;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str =
    "Você é o pizzaiolo da casa. Responda em português, de forma curta e simpática.";

/// Consulta de receita por nome de sabor.
///
/// Implementações nunca falham: erros viram texto para o usuário.
pub trait RecipeGateway: Send + Sync {
    fn lookup(&self, dish: &str) -> String;
}

/// Política de retry: número total de tentativas e espera fixa entre elas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Configuração do gateway HTTP.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// `None` (ou vazia) desliga as chamadas de rede.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(20),
            retry: RetryPolicy::default(),
        }
    }
}

/// Requisição pronta para o transporte.
#[derive(Clone, Debug)]
pub struct GatewayRequest {
    pub url: String,
    pub api_key: String,
    pub body: Value,
}

/// Falhas do transporte HTTP. Não saem do gateway.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("falha de rede: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl TransportError {
    /// Falhas de rede e erros 5xx merecem nova tentativa; 4xx não.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Network(_) => true,
            TransportError::Status { status, .. } => *status >= 500,
        }
    }
}

/// Envio síncrono de uma requisição, devolvendo o corpo da resposta.
pub trait Transport: Send + Sync {
    fn send(&self, request: &GatewayRequest) -> Result<String, TransportError>;
}

/// Transporte real via `reqwest` bloqueante, com timeout.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Não deve ser chamado dentro do runtime async (usa cliente bloqueante).
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &GatewayRequest) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .bearer_auth(&request.api_key)
            .json(&request.body)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, 200),
            })
        }
    }
}

/// Gateway HTTP para um serviço de geração de texto compatível com chat completions.
pub struct HttpRecipeGateway<T: Transport = ReqwestTransport> {
    config: GatewayConfig,
    transport: T,
}

impl HttpRecipeGateway<ReqwestTransport> {
    pub fn from_config(config: GatewayConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

/// Gateway usado quando o cliente HTTP não pôde ser criado: toda consulta
/// devolve [`LOOKUP_FAILED`], e o resto do atendimento segue funcionando.
pub struct UnavailableGateway;

impl RecipeGateway for UnavailableGateway {
    fn lookup(&self, dish: &str) -> String {
        tracing::warn!(dish, "Gateway de receitas indisponível");
        LOOKUP_FAILED.to_string()
    }
}

/// Cria o gateway HTTP; falha na criação do cliente degrada para
/// [`UnavailableGateway`].
///
/// Usa cliente bloqueante: chamar fora do runtime async.
pub fn connect(config: GatewayConfig) -> Arc<dyn RecipeGateway> {
    gateway_or_unavailable(HttpRecipeGateway::from_config(config))
}

fn gateway_or_unavailable<G: RecipeGateway + 'static>(
    built: Result<G, TransportError>,
) -> Arc<dyn RecipeGateway> {
    match built {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            tracing::error!(error = %e, "Falha ao criar cliente HTTP do gateway; consultas de receita desativadas");
            Arc::new(UnavailableGateway)
        }
    }
}

impl<T: Transport> HttpRecipeGateway<T> {
    pub fn with_transport(config: GatewayConfig, transport: T) -> Self {
        Self { config, transport }
    }

    fn build_request(&self, api_key: &str, dish: &str) -> GatewayRequest {
        GatewayRequest {
            url: self.config.api_url.clone(),
            api_key: api_key.to_string(),
            body: json!({
                "model": self.config.model,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": recipe_prompt(dish) },
                ],
                "max_tokens": 400,
            }),
        }
    }
}

impl<T: Transport> RecipeGateway for HttpRecipeGateway<T> {
    fn lookup(&self, dish: &str) -> String {
        let Some(api_key) = self
            .config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        else {
            tracing::warn!(dish, "Chave da API ausente; consulta de receita ignorada");
            return CREDENTIALS_MISSING.to_string();
        };

        let request = self.build_request(api_key, dish);
        let max_attempts = self.config.retry.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.transport.send(&request) {
                Ok(body) => {
                    tracing::info!(dish, attempt, "Receita obtida do serviço externo");
                    return extract_text(&body);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    tracing::warn!(dish, attempt, error = %e, "Falha na consulta de receita, tentando novamente");
                    std::thread::sleep(self.config.retry.backoff);
                }
                Err(e) => {
                    tracing::error!(dish, attempt, error = %e, "Consulta de receita falhou");
                    return LOOKUP_FAILED.to_string();
                }
            }
        }

        LOOKUP_FAILED.to_string()
    }
}

/// Prompt fixo enviado ao serviço.
pub fn recipe_prompt(dish: &str) -> String {
    format!(
        "Quais são os ingredientes e como é a receita da pizza sabor {}? Liste os ingredientes.",
        dish
    )
}

/// Extrai o texto útil de um corpo de resposta, tolerando vários formatos.
pub fn extract_text(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return EMPTY_ANSWER.to_string();
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return truncate_chars(trimmed, MAX_RAW_CHARS);
    };

    let candidates = [
        value.pointer("/choices/0/message/content"),
        value.pointer("/choices/0/text"),
        value.get("answer"),
        value.get("result"),
        value.get("response"),
        value.get("text"),
        value.get("content"),
        value.get("output"),
    ];

    let found = match &value {
        Value::String(s) => Some(s.as_str()),
        _ => candidates.into_iter().flatten().find_map(Value::as_str),
    };

    match found.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        Some(_) => EMPTY_ANSWER.to_string(),
        None => truncate_chars(trimmed, MAX_RAW_CHARS),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
