//! # Índice do Corpus — Espaço Vetorial TF-IDF
//!
//! O [`CorpusIndex`] transforma o catálogo de intenções num espaço vetorial
//! onde cada padrão de exemplo é um vetor TF-IDF. É construído **uma vez**
//! na inicialização e nunca mais muda — leituras concorrentes sem lock.
//!
//! ## Construção
//!
//! ```text
//! Catálogo (tag → padrões)
//!   ├── 1. normaliza cada padrão, em ordem de catálogo
//!   ├── 2. tokeniza (2+ caracteres de palavra) e remove stopwords
//!   ├── 3. vocabulário na ordem de primeira aparição
//!   ├── 4. idf suavizado: ln((1 + n) / (1 + df)) + 1
//!   └── 5. vetor = contagem × idf, normalizado (L2)
//! ```
//!
//! Consultas reaproveitam o vocabulário ajustado: termos fora dele têm peso
//! zero. Uma consulta sem nenhum termo conhecido vira o vetor nulo, cuja
//! similaridade com qualquer padrão é 0.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::normalize::normalize;
use super::stopwords::Stopwords;
use crate::catalog::IntentCatalog;
use crate::error::{ChatError, Result};

/// Tokens de duas ou mais letras/dígitos, como o padrão do scikit-learn.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w\w+").expect("padrão de token válido"));

/// Vetor esparso normalizado: pares (índice do termo, peso) ordenados por índice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_weights(mut weights: HashMap<usize, f64>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        let mut entries: Vec<(usize, f64)> = weights.into_iter().filter(|(_, w)| *w != 0.0).collect();
        entries.sort_unstable_by_key(|(i, _)| *i);
        Self { entries }
    }

    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut acc) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }

    fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }
}

/// Similaridade cosseno entre dois vetores esparsos, em `[0, 1]` para pesos
/// não negativos. Vetor nulo → 0.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        0.0
    } else {
        (a.dot(b) / denom).clamp(0.0, 1.0)
    }
}

/// Uma entrada do corpus: padrão normalizado, tag dona e seu vetor.
#[derive(Clone, Debug)]
pub struct CorpusEntry {
    pub pattern: String,
    pub tag: String,
    pub vector: SparseVector,
}

/// Modelo de espaço vetorial ajustado sobre o corpus completo do catálogo.
pub struct CorpusIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    stopwords: Stopwords,
    entries: Vec<CorpusEntry>,
}

impl CorpusIndex {
    /// Ajusta o TF-IDF sobre todos os padrões do catálogo, em ordem.
    ///
    /// # Erros
    ///
    /// [`ChatError::EmptyCatalog`] se o catálogo não tiver nenhum padrão.
    pub fn build(catalog: &IntentCatalog, stopwords: Stopwords) -> Result<Self> {
        let corpus: Vec<(String, String)> = catalog
            .intents()
            .iter()
            .flat_map(|intent| {
                intent
                    .patterns
                    .iter()
                    .map(move |p| (normalize(p), intent.tag.clone()))
            })
            .collect();

        if corpus.is_empty() {
            return Err(ChatError::EmptyCatalog);
        }

        let documents: Vec<Vec<String>> = corpus
            .iter()
            .map(|(pattern, _)| tokenize(pattern, &stopwords))
            .collect();

        // Vocabulário e frequência de documento
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut df: Vec<usize> = Vec::new();
        for tokens in &documents {
            let mut seen_in_doc = std::collections::HashSet::new();
            for token in tokens {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token.clone()).or_insert(next);
                if idx == df.len() {
                    df.push(0);
                }
                if seen_in_doc.insert(idx) {
                    df[idx] += 1;
                }
            }
        }

        let n_docs = documents.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let mut index = Self {
            vocabulary,
            idf,
            stopwords,
            entries: Vec::with_capacity(corpus.len()),
        };

        for ((pattern, tag), tokens) in corpus.into_iter().zip(documents) {
            let vector = index.weigh(&tokens);
            index.entries.push(CorpusEntry { pattern, tag, vector });
        }

        tracing::info!(
            patterns = index.entries.len(),
            vocabulary = index.vocabulary.len(),
            "Espaço vetorial TF-IDF ajustado"
        );

        Ok(index)
    }

    /// Projeta um texto (bruto ou normalizado) no espaço ajustado.
    pub fn embed(&self, text: &str) -> SparseVector {
        let tokens = tokenize(&normalize(text), &self.stopwords);
        self.weigh(&tokens)
    }

    /// Melhor entrada do corpus para o vetor dado: `(índice, similaridade)`.
    ///
    /// Empates ficam com a primeira ocorrência (ordem do catálogo).
    pub fn best_match(&self, query: &SparseVector) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let score = cosine_similarity(query, &entry.vector);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((i, score)),
            }
        }
        best
    }

    pub fn entry(&self, i: usize) -> Option<&CorpusEntry> {
        self.entries.get(i)
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut weights: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                *weights.entry(idx).or_insert(0.0) += self.idf[idx];
            }
        }
        SparseVector::from_weights(weights)
    }
}

/// Tokeniza um texto já normalizado, descartando stopwords.
fn tokenize(normalized: &str, stopwords: &Stopwords) -> Vec<String> {
    TOKEN_RE
        .find_iter(normalized)
        .map(|m| m.as_str())
        .filter(|t| !stopwords.contains(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IntentRecord;
    use crate::nlu::stopwords::StopwordLanguage;

    fn catalog(records: &[(&str, &[&str])]) -> IntentCatalog {
        IntentCatalog::new(
            records
                .iter()
                .map(|(tag, patterns)| IntentRecord {
                    tag: tag.to_string(),
                    patterns: patterns.iter().map(|p| p.to_string()).collect(),
                    responses: vec![],
                })
                .collect(),
        )
    }

    #[test]
    fn empty_catalog_fails_fast() {
        let result = CorpusIndex::build(&IntentCatalog::default(), Stopwords::none());
        assert!(matches!(result, Err(ChatError::EmptyCatalog)));
    }

    #[test]
    fn intents_without_patterns_count_as_empty() {
        let result = CorpusIndex::build(&catalog(&[("vazio", &[])]), Stopwords::none());
        assert!(matches!(result, Err(ChatError::EmptyCatalog)));
    }

    #[test]
    fn corpus_keeps_catalog_order_and_owning_tags() {
        let index = CorpusIndex::build(
            &catalog(&[("saudacao", &["Olá!", "Bom dia"]), ("pedido", &["Quero pizza"])]),
            Stopwords::none(),
        )
        .unwrap();

        let entries = index.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].pattern, "ola");
        assert_eq!(entries[0].tag, "saudacao");
        assert_eq!(entries[1].tag, "saudacao");
        assert_eq!(entries[2].pattern, "quero pizza");
        assert_eq!(entries[2].tag, "pedido");
    }

    #[test]
    fn pattern_matches_itself_with_full_similarity() {
        let index = CorpusIndex::build(
            &catalog(&[("a", &["pizza de calabresa"]), ("b", &["horário de funcionamento"])]),
            Stopwords::builtin(StopwordLanguage::Portuguese),
        )
        .unwrap();

        let query = index.embed("Horário de funcionamento");
        let (i, score) = index.best_match(&query).unwrap();
        assert_eq!(index.entry(i).unwrap().tag, "b");
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_vocabulary_terms_have_zero_weight() {
        let index =
            CorpusIndex::build(&catalog(&[("a", &["pizza grande"])]), Stopwords::none()).unwrap();

        assert!(index.embed("xyzzy abracadabra").is_zero());
        let (_, score) = index.best_match(&index.embed("xyzzy")).unwrap();
        assert_eq!(score, 0.0);
        // "pizza" e "grande" pesam igual (mesmo idf), metade dos termos coincide
        let (_, score) = index.best_match(&index.embed("pizza xyzzy")).unwrap();
        assert!((score - 1.0 / 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn stopwords_are_dropped_before_fitting() {
        let index = CorpusIndex::build(
            &catalog(&[("a", &["a pizza de queijo"])]),
            Stopwords::builtin(StopwordLanguage::Portuguese),
        )
        .unwrap();
        assert_eq!(index.vocabulary_size(), 2);
    }

    #[test]
    fn ties_resolve_to_first_catalog_entry() {
        let index = CorpusIndex::build(
            &catalog(&[("primeiro", &["pizza"]), ("segundo", &["pizza"])]),
            Stopwords::none(),
        )
        .unwrap();
        let (i, _) = index.best_match(&index.embed("pizza")).unwrap();
        assert_eq!(index.entry(i).unwrap().tag, "primeiro");
    }

    #[test]
    fn idf_favours_rare_terms() {
        let index = CorpusIndex::build(
            &catalog(&[
                ("pedido", &["quero pizza"]),
                ("cardapio", &["cardapio pizza"]),
                ("entrega", &["entrega pizza"]),
            ]),
            Stopwords::none(),
        )
        .unwrap();
        let (i, _) = index.best_match(&index.embed("entrega")).unwrap();
        assert_eq!(index.entry(i).unwrap().tag, "entrega");
    }
}
