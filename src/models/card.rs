use super::base::DrawBase;
use super::draw::DrawKind;
use crate::error::{DrawError, DrawResult};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Deck the cards are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckType {
    #[default]
    French,
    Spanish,
}

impl DeckType {
    pub fn size(self) -> u32 {
        match self {
            DeckType::French => 52,
            DeckType::Spanish => 48,
        }
    }
}

/// Draw cards from a single deck without putting them back
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardDraw {
    #[serde(flatten)]
    pub base: DrawBase,
    #[serde(default)]
    pub type_of_deck: DeckType,
}

impl CardDraw {
    pub fn new(base: DrawBase, type_of_deck: DeckType) -> Self {
        Self { base, type_of_deck }
    }
}

impl DrawKind for CardDraw {
    const DRAW_TYPE: &'static str = "CardDraw";

    fn base(&self) -> &DrawBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawBase {
        &mut self.base
    }

    fn validate(&self) -> DrawResult<()> {
        self.base.validate()?;
        if self.base.number_of_results > self.type_of_deck.size() {
            return Err(DrawError::invalid("number_of_results"));
        }
        Ok(())
    }

    fn is_feasible(&self) -> bool {
        self.base.number_of_results <= self.type_of_deck.size()
    }

    /// Card positions in the deck, 1-based
    fn generate_items<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Value> {
        let size = self.type_of_deck.size() as usize;
        let count = (self.base.number_of_results as usize).min(size);
        index::sample(rng, size, count)
            .into_iter()
            .map(|card| json!(card + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_cannot_draw_more_than_the_deck() {
        let base = DrawBase::new().with_number_of_results(49);
        assert!(CardDraw::new(base.clone(), DeckType::French).validate().is_ok());
        assert!(matches!(
            CardDraw::new(base, DeckType::Spanish).validate(),
            Err(DrawError::InvalidDraw { ref field }) if field == "number_of_results"
        ));
    }

    #[test]
    fn test_whole_deck_is_a_permutation() {
        let base = DrawBase::new().with_number_of_results(48);
        let draw = CardDraw::new(base, DeckType::Spanish);
        let cards: HashSet<u64> = draw
            .generate_items(&mut StdRng::seed_from_u64(21))
            .into_iter()
            .map(|v| v.as_u64().unwrap())
            .collect();
        assert_eq!(cards, (1..=48).collect::<HashSet<u64>>());
    }

    #[test]
    fn test_deck_type_serialization() {
        let draw = CardDraw::new(DrawBase::new(), DeckType::Spanish);
        let value = serde_json::to_value(&draw).unwrap();
        assert_eq!(value["type_of_deck"], json!("spanish"));

        let parsed: CardDraw = serde_json::from_value(json!({"owner": "u1"})).unwrap();
        assert_eq!(parsed.type_of_deck, DeckType::French);
    }
}
