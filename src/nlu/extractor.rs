//! # Extrator de Sabores
//!
//! O [`DishExtractor`] reconhece o **nome de um sabor** dentro de texto livre.
//! A lista de sabores vem dos padrões da tag `escolha_sabor` do catálogo,
//! guardados crus (para exibição) e normalizados (para comparação).
//!
//! ## Ordem de Resolução (primeiro match vence)
//!
//! | Etapa | Regra | Exemplo |
//! |-------|-------|---------|
//! | 1 | Entrada só com dígitos → índice 1-based na lista | `"2"` → 2º sabor |
//! | 2 | Nome do sabor igual a um token da entrada | `"calabresa por favor"` |
//! | 3 | Nome do sabor contido na entrada | `"a de quatro queijos"` |
//!
//! Entrada numérica fora da faixa não casa e **não** cai nas etapas 2–3.
//!
//! As etapas 2 e 3 são avaliadas por sabor, na ordem do catálogo: um sabor
//! anterior que casa por substring vence um sabor posterior que casaria
//! por token exato.

use super::normalize::normalize;

/// Um sabor do cardápio: nome original e forma normalizada.
#[derive(Clone, Debug)]
struct Dish {
    name: String,
    normalized: String,
}

/// Extrator de sabores baseado em casamento léxico contra o catálogo.
#[derive(Clone, Debug, Default)]
pub struct DishExtractor {
    dishes: Vec<Dish>,
}

impl DishExtractor {
    /// Cria o extrator a partir da lista de sabores (ordem preservada).
    ///
    /// Sabores cujo nome normalizado fica vazio são mantidos para a seleção
    /// numérica, mas nunca casam por texto.
    pub fn new<S: AsRef<str>>(dishes: &[S]) -> Self {
        let dishes = dishes
            .iter()
            .map(|d| Dish {
                name: d.as_ref().to_string(),
                normalized: canonical(d.as_ref()),
            })
            .collect();
        Self { dishes }
    }

    /// Nomes dos sabores, na ordem do catálogo.
    pub fn dish_names(&self) -> impl Iterator<Item = &str> {
        self.dishes.iter().map(|d| d.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    /// Procura um sabor no texto; devolve o nome cru do catálogo.
    pub fn extract(&self, text: &str) -> Option<&str> {
        let text = canonical(text);

        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            return text
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| self.dishes.get(i))
                .map(|d| d.name.as_str());
        }

        self.dishes
            .iter()
            .filter(|d| !d.normalized.is_empty())
            .find(|d| {
                text.split_whitespace().any(|token| token == d.normalized)
                    || text.contains(d.normalized.as_str())
            })
            .map(|d| d.name.as_str())
    }
}

/// Forma normalizada com espaços colapsados: "quatro\n  queijos" → "quatro queijos".
fn canonical(text: &str) -> String {
    normalize(text).split_whitespace().collect::<Vec<_>>().join(" ")
}
