//! # Classificador de Intenção
//!
//! O [`IntentClassifier`] determina a **intenção** de uma frase comparando-a
//! com todos os padrões do catálogo no espaço TF-IDF.
//!
//! ## Estratégia em Duas Fases (Similaridade + Palavras-chave)
//!
//! ```text
//! Frase do usuário
//!   ├── 1. Similaridade cosseno contra todo o corpus
//!   │   → confiança = melhor similaridade
//!   │   → se confiança > 0.10: retorna a tag do melhor padrão
//!   └── 2. Fallback por palavras-chave (só se a fase 1 rejeitou)
//!       → frase contém "ingrediente", "receita", ...?
//!       → sim: "ingredientes" com confiança sintética 0.25
//!       → não: "unknown" com confiança 0.0
//! ```
//!
//! TF-IDF num corpus pequeno e templado perde variações léxicas de
//! perguntas sobre ingredientes; o fallback recupera recall para essa
//! intenção sem retreinar nada.

use super::index::CorpusIndex;
use super::normalize::normalize;
use crate::catalog::{IntentCatalog, INGREDIENTS_TAG, UNKNOWN_TAG};

/// Similaridade mínima (exclusiva) para aceitar um match.
pub const CONFIDENCE_THRESHOLD: f64 = 0.10;

/// Confiança sintética atribuída pelo fallback de palavras-chave.
pub const KEYWORD_FALLBACK_CONFIDENCE: f64 = 0.25;

/// Expressões que denunciam uma pergunta sobre ingredientes.
const INGREDIENT_KEYWORDS: &[&str] = &[
    "ingrediente",
    "receita",
    "recheio",
    "composição",
    "o que vai na",
    "o que vai no",
    "o que tem na",
    "o que tem no",
    "feita com",
    "feito com",
    "feita de",
];

/// Intenção classificada e sua confiança em `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Intent {
    pub tag: String,
    pub confidence: f64,
}

impl Intent {
    pub fn unknown() -> Self {
        Self {
            tag: UNKNOWN_TAG.to_string(),
            confidence: 0.0,
        }
    }

    #[cfg(test)]
    pub fn is_unknown(&self) -> bool {
        self.tag == UNKNOWN_TAG
    }
}

/// Classificador TF-IDF + fallback de palavras-chave.
///
/// Imutável após a criação — pode ser compartilhado entre requisições.
pub struct IntentClassifier {
    index: CorpusIndex,
    /// Palavras-chave já normalizadas.
    keywords: Vec<String>,
    /// O fallback só força `ingredientes` se o catálogo tiver essa tag.
    fallback_enabled: bool,
}

impl IntentClassifier {
    pub fn new(index: CorpusIndex, catalog: &IntentCatalog) -> Self {
        Self {
            index,
            keywords: INGREDIENT_KEYWORDS.iter().map(|k| normalize(k)).collect(),
            fallback_enabled: catalog.has_tag(INGREDIENTS_TAG),
        }
    }

    /// Classifica uma frase.
    ///
    /// Empates de similaridade ficam com o padrão que aparece primeiro no
    /// catálogo — o resultado é determinístico.
    pub fn classify(&self, sentence: &str) -> Intent {
        let normalized = normalize(sentence);
        let query = self.index.embed(&normalized);

        if let Some((i, confidence)) = self.index.best_match(&query) {
            if confidence > CONFIDENCE_THRESHOLD {
                if let Some(entry) = self.index.entry(i) {
                    tracing::debug!(sentence, pattern = %entry.pattern, confidence, "Padrão mais próximo");
                    return Intent {
                        tag: entry.tag.clone(),
                        confidence,
                    };
                }
            }
            tracing::debug!(sentence, confidence, "Similaridade abaixo do limiar");
        }

        if self.fallback_enabled && self.mentions_ingredients(&normalized) {
            tracing::debug!(sentence, "Fallback de palavras-chave: ingredientes");
            return Intent {
                tag: INGREDIENTS_TAG.to_string(),
                confidence: KEYWORD_FALLBACK_CONFIDENCE,
            };
        }

        Intent::unknown()
    }

    fn mentions_ingredients(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k.as_str()))
    }
}
