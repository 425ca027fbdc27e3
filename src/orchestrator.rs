//! # Orquestrador de Diálogo
//!
//! O [`Orchestrator`] é o **coração do sistema** — recebe a mensagem do
//! usuário, divide em frases, roteia cada frase pelo extrator de sabores,
//! pelo classificador e pelo gateway de receitas, e devolve um resultado
//! por frase.
//!
//! ## Roteamento por Frase
//!
//! ```text
//! Frase
//!   │
//!   ├── 1. Estado AwaitingDish?
//!   │   ├── sabor encontrado → gateway → "ingredientes" 100% → Idle
//!   │   └── não encontrado  → repete a lista de sabores (continua aguardando)
//!   │
//!   ├── 2. Sabor citado na frase? → gateway → "ingredientes" 100%
//!   │
//!   ├── 3. Classifica (TF-IDF + palavras-chave)
//!   │   └── tag de ingredientes/escolha de sabor → pede o sabor → AwaitingDish
//!   │
//!   └── 4. Resposta aleatória entre as respostas da tag
//! ```
//!
//! ## Máquina de Estados (por sessão)
//!
//! ```text
//!            classificador pede sabor
//!   Idle ─────────────────────────────→ AwaitingDish ──┐ sabor não reconhecido
//!    ↑                                        │  ↑      │ (repete a pergunta)
//!    └──────── sabor resolvido ───────────────┘  └──────┘
//! ```
//!
//! O estado não mora aqui: entra como parâmetro e sai no [`Turn`]. Quem
//! guarda (cookie, memória, store) é a camada de fronteira.
//!
//! ## Concorrência
//!
//! O orquestrador é `Send + Sync` e usado via `&self`. Catálogo, índice e
//! extrator são imutáveis; só a fonte de aleatoriedade fica atrás de um
//! `Mutex`, travado apenas durante o sorteio.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::{IntentCatalog, DISHES_PLACEHOLDER, DISH_CHOICE_TAG, INGREDIENTS_TAG};
use crate::error::{ChatError, Result};
use crate::gateway::RecipeGateway;
use crate::nlu::extractor::DishExtractor;
use crate::nlu::index::CorpusIndex;
use crate::nlu::intent::{Intent, IntentClassifier};
use crate::nlu::normalize::split_sentences;
use crate::nlu::stopwords::Stopwords;

/// Resposta quando a intenção não é reconhecida.
pub const FALLBACK_RESPONSE: &str = "Desculpe, não entendi sua mensagem. Pode reformular?";

/// Estado do diálogo de uma conversa.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    #[default]
    Idle,
    /// O sistema perguntou o sabor e aguarda a resposta.
    AwaitingDish,
}

impl DialogueState {
    pub fn is_awaiting_dish(self) -> bool {
        self == DialogueState::AwaitingDish
    }
}

/// Resultado da classificação de uma frase.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub sentence: String,
    pub intent: String,
    /// Percentual em `[0, 100]`, duas casas decimais.
    pub confidence: f64,
    pub response: String,
    /// `true` quando a resposta pede um sabor para o próximo turno.
    pub pending_slot: bool,
}

/// Saída de [`Orchestrator::process`]: resultados em ordem e o novo estado.
#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub results: Vec<ClassificationResult>,
    pub state: DialogueState,
}

/// Orquestrador do diálogo — serviço explícito, montado com suas dependências.
pub struct Orchestrator {
    catalog: Arc<IntentCatalog>,
    /// `None` quando o catálogo está vazio: tudo vira `unknown`.
    classifier: Option<IntentClassifier>,
    extractor: DishExtractor,
    gateway: Arc<dyn RecipeGateway>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Orchestrator {
    /// Monta o orquestrador: ajusta o espaço vetorial sobre o catálogo.
    ///
    /// Catálogo vazio não impede a criação — o classificador fica desligado
    /// e um aviso é registrado.
    pub fn new(
        catalog: Arc<IntentCatalog>,
        stopwords: Stopwords,
        gateway: Arc<dyn RecipeGateway>,
    ) -> Self {
        Self::with_rng(catalog, stopwords, gateway, Box::new(StdRng::from_os_rng()))
    }

    /// Igual a [`Orchestrator::new`], com fonte de aleatoriedade injetada.
    pub fn with_rng(
        catalog: Arc<IntentCatalog>,
        stopwords: Stopwords,
        gateway: Arc<dyn RecipeGateway>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let classifier = match CorpusIndex::build(&catalog, stopwords) {
            Ok(index) => Some(IntentClassifier::new(index, &catalog)),
            Err(e) => {
                tracing::warn!(error = %e, "Classificador desligado; todas as frases serão 'unknown'");
                None
            }
        };
        let extractor = DishExtractor::new(catalog.dishes());

        Self {
            catalog,
            classifier,
            extractor,
            gateway,
            rng: Mutex::new(rng),
        }
    }

    /// Processa uma mensagem do usuário.
    ///
    /// O estado flui frase a frase: "Quero os ingredientes. Calabresa."
    /// pergunta o sabor na primeira frase e resolve na segunda.
    ///
    /// # Erros
    ///
    /// [`ChatError::EmptyMessage`] se a mensagem for vazia ou só espaços.
    pub fn process(&self, utterance: &str, state: DialogueState) -> Result<Turn> {
        if utterance.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let mut state = state;
        let results: Vec<ClassificationResult> = split_sentences(utterance)
            .into_iter()
            .map(|sentence| {
                let (result, next) = self.process_sentence(sentence, state);
                state = next;
                result
            })
            .collect();

        Ok(Turn { results, state })
    }

    fn process_sentence(
        &self,
        sentence: String,
        state: DialogueState,
    ) -> (ClassificationResult, DialogueState) {
        let dish = self.extractor.extract(&sentence);

        // 1. Aguardando sabor
        if state.is_awaiting_dish() {
            return match dish {
                Some(dish) => (self.recipe_result(sentence, dish), DialogueState::Idle),
                None => {
                    tracing::debug!(sentence = %sentence, "Sabor não reconhecido, repetindo a pergunta");
                    let result = ClassificationResult {
                        sentence,
                        intent: DISH_CHOICE_TAG.to_string(),
                        confidence: 0.0,
                        response: format!("Não reconheci esse sabor. {}", self.dish_prompt()),
                        pending_slot: true,
                    };
                    (result, DialogueState::AwaitingDish)
                }
            };
        }

        // 2. Sabor citado diretamente
        if let Some(dish) = dish {
            return (self.recipe_result(sentence, dish), DialogueState::Idle);
        }

        // 3. Classificação
        let intent = self.classify(&sentence);
        tracing::debug!(sentence = %sentence, tag = %intent.tag, confidence = intent.confidence, "Frase classificada");

        if self.asks_for_dish(&intent) {
            let result = ClassificationResult {
                sentence,
                intent: intent.tag,
                confidence: as_percentage(intent.confidence),
                response: self.dish_prompt(),
                pending_slot: true,
            };
            return (result, DialogueState::AwaitingDish);
        }

        // 4. Resposta do catálogo
        let response = self.pick_response(&intent.tag);
        let result = ClassificationResult {
            sentence,
            intent: intent.tag,
            confidence: as_percentage(intent.confidence),
            response,
            pending_slot: false,
        };
        (result, DialogueState::Idle)
    }

    fn classify(&self, sentence: &str) -> Intent {
        self.classifier
            .as_ref()
            .map(|c| c.classify(sentence))
            .unwrap_or_else(Intent::unknown)
    }

    fn asks_for_dish(&self, intent: &Intent) -> bool {
        (intent.tag == INGREDIENTS_TAG || intent.tag == DISH_CHOICE_TAG) && !self.extractor.is_empty()
    }

    fn recipe_result(&self, sentence: String, dish: &str) -> ClassificationResult {
        tracing::info!(dish, "Consultando receita");
        let recipe = self.gateway.lookup(dish);
        ClassificationResult {
            sentence,
            intent: INGREDIENTS_TAG.to_string(),
            confidence: 100.0,
            response: format!("🍕 {}: {}", dish, recipe),
            pending_slot: false,
        }
    }

    /// Pergunta listando os sabores numerados (o número também é aceito).
    fn dish_prompt(&self) -> String {
        let options: Vec<String> = self
            .extractor
            .dish_names()
            .enumerate()
            .map(|(i, name)| format!("{}. {}", i + 1, name))
            .collect();
        format!(
            "De qual sabor você quer saber os ingredientes? Opções: {}",
            options.join(", ")
        )
    }

    /// Sorteia uma resposta da tag; tag sem respostas usa [`FALLBACK_RESPONSE`].
    fn pick_response(&self, tag: &str) -> String {
        let responses = self.catalog.responses(tag);
        let chosen = {
            let mut rng = self.rng.lock();
            responses.choose(&mut **rng).cloned()
        };
        match chosen {
            Some(template) => self.render(&template),
            None => FALLBACK_RESPONSE.to_string(),
        }
    }

    fn render(&self, template: &str) -> String {
        if template.contains(DISHES_PLACEHOLDER) {
            let dishes: Vec<&str> = self.extractor.dish_names().collect();
            template.replace(DISHES_PLACEHOLDER, &dishes.join(", "))
        } else {
            template.to_string()
        }
    }
}

/// Converte `[0, 1]` em percentual com duas casas decimais.
pub fn as_percentage(confidence: f64) -> f64 {
    (confidence * 100.0 * 100.0).round() / 100.0
}
