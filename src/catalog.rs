//! # Catálogo de Intenções
//!
//! Carrega o catálogo estático (`data/intents.json`) que define cada
//! intenção: uma tag única, frases de exemplo (padrões) e respostas
//! candidatas.
//!
//! ```json
//! { "intents": [
//!     { "tag": "saudacao", "patterns": ["Oi", "Olá"], "responses": ["Olá! 🍕"] },
//!     { "tag": "escolha_sabor", "patterns": ["Calabresa", "Margherita"], "responses": ["..."] }
//! ] }
//! ```
//!
//! A tag [`DISH_CHOICE_TAG`] tem papel duplo: seus padrões são exemplos de
//! intenção **e** a lista enumerável de sabores válidos.
//!
//! ## Carregamento
//!
//! Mesmo padrão do carregamento de dados do resto da aplicação:
//! - arquivo ausente → catálogo vazio (o sistema sobe, tudo vira `unknown`)
//! - arquivo corrompido → erro; quem chama decide o fallback

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};

/// Tag cujos padrões são a lista de sabores.
pub const DISH_CHOICE_TAG: &str = "escolha_sabor";

/// Tag de perguntas sobre ingredientes.
pub const INGREDIENTS_TAG: &str = "ingredientes";

/// Tag sintética quando nada é reconhecido.
pub const UNKNOWN_TAG: &str = "unknown";

/// Placeholder de resposta substituído pela lista de sabores.
pub const DISHES_PLACEHOLDER: &str = "{sabores}";

/// Uma intenção do catálogo.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntentRecord {
    pub tag: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

/// Catálogo imutável de intenções, na ordem do arquivo.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IntentCatalog {
    intents: Vec<IntentRecord>,
}

impl IntentCatalog {
    pub fn new(intents: Vec<IntentRecord>) -> Self {
        let mut seen = HashSet::new();
        for intent in &intents {
            if !seen.insert(intent.tag.as_str()) {
                tracing::warn!(tag = %intent.tag, "Tag duplicada no catálogo; a primeira ocorrência define as respostas");
            }
        }
        Self { intents }
    }

    /// Carrega o catálogo de um arquivo JSON.
    ///
    /// # Erros
    ///
    /// Retorna erro se o arquivo existir mas não puder ser lido ou
    /// desserializado. Arquivo ausente **não** é erro.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Catálogo de intenções não encontrado, iniciando vazio");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|source| ChatError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ChatError::CatalogFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Como [`IntentCatalog::load`], mas um catálogo ilegível vira vazio
    /// (com aviso) em vez de impedir a subida.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!(
                    intents = catalog.intents.len(),
                    patterns = catalog.pattern_count(),
                    "Catálogo de intenções carregado"
                );
                catalog
            }
            Err(e) => {
                tracing::warn!(error = %e, "Falha ao carregar catálogo, iniciando vazio");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let raw: IntentCatalog = serde_json::from_str(json)?;
        Ok(Self::new(raw.intents))
    }

    pub fn intents(&self) -> &[IntentRecord] {
        &self.intents
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn pattern_count(&self) -> usize {
        self.intents.iter().map(|i| i.patterns.len()).sum()
    }

    /// Primeira intenção com a tag dada.
    pub fn get(&self, tag: &str) -> Option<&IntentRecord> {
        self.intents.iter().find(|i| i.tag == tag)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Respostas candidatas da tag (vazio se a tag não existe).
    pub fn responses(&self, tag: &str) -> &[String] {
        self.get(tag).map(|i| i.responses.as_slice()).unwrap_or(&[])
    }

    /// Lista de sabores, na ordem do catálogo.
    pub fn dishes(&self) -> &[String] {
        self.get(DISH_CHOICE_TAG)
            .map(|i| i.patterns.as_slice())
            .unwrap_or(&[])
    }
}
