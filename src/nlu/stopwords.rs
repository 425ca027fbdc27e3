//! # Stopwords
//!
//! Palavras funcionais removidas antes do ajuste TF-IDF. A lista é escolhida
//! por configuração ([`StopwordLanguage`]) ou lida de um arquivo (uma palavra
//! por linha). Arquivo ausente degrada para "sem remoção" — nunca é erro.
//!
//! Todas as entradas passam por [`normalize`], então "não" e "nao" são a
//! mesma stopword, do mesmo jeito que os tokens do corpus.

use std::collections::HashSet;
use std::path::Path;

use super::normalize::normalize;

/// Stopwords PT-BR.
///
/// Ficam de fora palavras que carregam intenção no domínio da pizzaria
/// ("qual", "quanto", "quando", "onde", "tem", "não", "quero").
const PORTUGUESE: &[&str] = &[
    "a", "o", "as", "os", "um", "uma", "uns", "umas", "de", "do", "da", "dos", "das", "em",
    "no", "na", "nos", "nas", "por", "pelo", "pela", "pelos", "pelas", "para", "pra", "com",
    "ao", "aos", "à", "às", "num", "numa", "e", "ou", "mas", "que", "se", "é", "eu", "tu",
    "ele", "ela", "eles", "elas", "nós", "vocês", "me", "te", "lhe", "lhes", "meu", "minha",
    "meus", "minhas", "seu", "sua", "seus", "suas", "teu", "tua", "nosso", "nossa", "esse",
    "essa", "esses", "essas", "este", "esta", "estes", "estas", "isso", "isto", "aquele",
    "aquela", "aquilo", "já", "também", "só", "muito", "mais", "ser", "sou", "era", "foi",
    "estou", "está", "estão", "vai", "vou",
];

/// Stopwords em inglês (subconjunto da lista clássica de IR).
const ENGLISH: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "of", "at", "by", "for", "with", "about",
    "to", "from", "in", "on", "into", "is", "are", "was", "were", "be", "been", "being",
    "am", "i", "me", "my", "we", "our", "you", "your", "he", "him", "his", "she", "her",
    "it", "its", "they", "them", "their", "this", "that", "these", "those", "do", "does",
    "did", "so", "than", "too", "very", "can", "will", "just", "there", "here", "then",
];

/// Idioma da lista embutida de stopwords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StopwordLanguage {
    Portuguese,
    English,
    /// Sem remoção de stopwords.
    None,
}

/// Conjunto normalizado de stopwords.
#[derive(Clone, Debug, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Conjunto vazio — nenhuma palavra é removida.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn builtin(language: StopwordLanguage) -> Self {
        match language {
            StopwordLanguage::Portuguese => Self::from_words(PORTUGUESE.iter().copied()),
            StopwordLanguage::English => Self::from_words(ENGLISH.iter().copied()),
            StopwordLanguage::None => Self::none(),
        }
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let words = words
            .into_iter()
            .map(normalize)
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Lê stopwords de um arquivo texto (uma por linha, `#` inicia comentário).
    ///
    /// Se o arquivo não existir ou não puder ser lido, registra um aviso e
    /// devolve o conjunto vazio.
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let stopwords = Self::from_words(
                    content
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.starts_with('#')),
                );
                tracing::info!(path = %path.display(), count = stopwords.words.len(), "Stopwords carregadas de arquivo");
                stopwords
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Lista de stopwords indisponível, seguindo sem remoção");
                Self::none()
            }
        }
    }

    /// `token` já deve estar normalizado.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
