//! # Pipeline NLU — Compreensão de Linguagem Natural
//!
//! Tudo que transforma texto livre em decisões do diálogo.
//!
//! ## Fluxo de Processamento
//!
//! ```text
//! Frase do usuário
//!   ├── 1. Normaliza (lowercase, sem acentos, sem pontuação)
//!   ├── 2. Procura sabor citado (DishExtractor)
//!   └── 3. Classifica intenção (IntentClassifier)
//!         ├── projeta no espaço TF-IDF (CorpusIndex)
//!         ├── cosseno contra todos os padrões
//!         └── fallback de palavras-chave para "ingredientes"
//! ```
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`normalize`] | Forma canônica do texto e divisão em frases |
//! | [`stopwords`] | Listas de stopwords embutidas ou de arquivo |
//! | [`index`] | Espaço vetorial TF-IDF ajustado sobre o catálogo |
//! | [`intent`] | Classificador de intenção com limiar e fallback |
//! | [`extractor`] | Reconhecimento de sabores por nome ou número |

pub mod extractor;
pub mod index;
pub mod intent;
pub mod normalize;
pub mod stopwords;
