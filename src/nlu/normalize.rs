//! # Normalizador de Texto
//!
//! Forma canônica usada em **todas** as comparações léxicas do sistema
//! (corpus, consultas, nomes de sabores, palavras-chave e stopwords):
//!
//! ```text
//! "Olá, Pizzaria!"  → "ola pizzaria"
//! "QUATRO QUEIJOS." → "quatro queijos"
//! ```
//!
//! 1. Lowercase
//! 2. Decomposição canônica Unicode (NFD) e remoção das marcas combinantes
//!    (acentos) — "ã" e "a" passam a ser iguais
//! 3. Remoção de tudo que não é alfanumérico nem espaço

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normaliza um texto para comparação insensível a caixa, acentos e pontuação.
///
/// Função total e determinística: entrada vazia produz saída vazia, e
/// `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Divide uma mensagem em frases pelo ponto final.
///
/// Fragmentos vazios são descartados. Se nada sobrar (ex: `"..."`), a
/// mensagem inteira vira uma única frase — entrada não vazia nunca
/// produz lista vazia.
pub fn split_sentences(text: &str) -> Vec<String> {
    let sentences: Vec<String> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if sentences.is_empty() && !text.is_empty() {
        return vec![text.to_string()];
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_case_and_punctuation() {
        assert_eq!(normalize("Olá, Pizzaria!"), "ola pizzaria");
        assert_eq!(normalize("Ingredientes da PORTUGUESA?"), "ingredientes da portuguesa");
        assert_eq!(normalize("Preço: R$ 45,90"), "preco r 4590");
    }

    #[test]
    fn accented_and_plain_forms_compare_equal() {
        assert_eq!(normalize("coração"), normalize("coracao"));
        assert_eq!(normalize("Açaí"), normalize("acai"));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "Olá, tudo bem?",
            "QUATRO QUEIJOS!!",
            "Frango com Catupiry®",
            "İstanbul ŞİŞ",
            "  espaços \t e\nquebras  ",
            "ﬁ ligatura ½ fração",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "não idempotente para {:?}", s);
        }
    }

    #[test]
    fn splits_on_periods_and_drops_empty_fragments() {
        assert_eq!(split_sentences("Oi. Quero pizza."), vec!["Oi", "Quero pizza"]);
        assert_eq!(split_sentences("Oi.. . Tchau"), vec!["Oi", "Tchau"]);
    }

    #[test]
    fn punctuation_only_input_becomes_single_sentence() {
        assert_eq!(split_sentences("..."), vec!["..."]);
        assert!(split_sentences("").is_empty());
    }
}
