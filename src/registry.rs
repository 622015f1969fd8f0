//! Draw type registry.
//!
//! Maps the `draw_type` tag of a stored document to the factory that rebuilds
//! the matching [`Draw`] variant.

use crate::database::Document;
use crate::error::DrawError;
use crate::models::{
    CardDraw, CoinDraw, DiceDraw, Draw, DrawKind, RaffleDraw, RaffleFields, RandomItemDraw,
    RandomNumberDraw, DRAW_TYPE_FIELD,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Why a document could not be turned into a draw
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("document has no string '{}' field", DRAW_TYPE_FIELD)]
    MissingType,

    #[error("unknown draw type '{0}'")]
    UnknownType(String),

    #[error("malformed {draw_type} document: {source}")]
    Malformed {
        draw_type: String,
        source: serde_json::Error,
    },

    #[error("invalid {draw_type} document: {source}")]
    Invalid {
        draw_type: String,
        source: DrawError,
    },
}

/// Builds a draw from its stored document
pub type DrawFactory = fn(Document) -> Result<Draw, BuildError>;

/// Factory for kinds whose document maps directly onto the struct
pub fn deserialize_kind<T>(document: Document) -> Result<Draw, BuildError>
where
    T: DrawKind + DeserializeOwned + Into<Draw>,
{
    serde_json::from_value::<T>(Value::Object(document))
        .map(Into::into)
        .map_err(|source| BuildError::Malformed {
            draw_type: T::DRAW_TYPE.to_string(),
            source,
        })
}

/// Raffles go through the constructor so compact participants get parsed
pub fn build_raffle(document: Document) -> Result<Draw, BuildError> {
    let fields: RaffleFields =
        serde_json::from_value(Value::Object(document)).map_err(|source| {
            BuildError::Malformed {
                draw_type: RaffleDraw::DRAW_TYPE.to_string(),
                source,
            }
        })?;

    RaffleDraw::from_fields(fields)
        .map(Draw::Raffle)
        .map_err(|source| BuildError::Invalid {
            draw_type: RaffleDraw::DRAW_TYPE.to_string(),
            source,
        })
}

/// Registry of draw factories keyed by `draw_type`
#[derive(Clone)]
pub struct DrawRegistry {
    factories: HashMap<String, DrawFactory>,
}

impl DrawRegistry {
    /// Registry with no kinds
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with every built-in draw kind
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(RaffleDraw::DRAW_TYPE, build_raffle);
        registry.register(CoinDraw::DRAW_TYPE, deserialize_kind::<CoinDraw>);
        registry.register(DiceDraw::DRAW_TYPE, deserialize_kind::<DiceDraw>);
        registry.register(
            RandomNumberDraw::DRAW_TYPE,
            deserialize_kind::<RandomNumberDraw>,
        );
        registry.register(RandomItemDraw::DRAW_TYPE, deserialize_kind::<RandomItemDraw>);
        registry.register(CardDraw::DRAW_TYPE, deserialize_kind::<CardDraw>);
        registry
    }

    /// Register `factory` for `draw_type`, returning the factory it replaces
    pub fn register(
        &mut self,
        draw_type: impl Into<String>,
        factory: DrawFactory,
    ) -> Option<DrawFactory> {
        self.factories.insert(draw_type.into(), factory)
    }

    pub fn contains(&self, draw_type: &str) -> bool {
        self.factories.contains_key(draw_type)
    }

    /// Registered tags, sorted
    pub fn draw_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn build(&self, document: Document) -> Result<Draw, BuildError> {
        let draw_type = match document.get(DRAW_TYPE_FIELD) {
            Some(Value::String(draw_type)) => draw_type.clone(),
            _ => return Err(BuildError::MissingType),
        };

        let factory = self
            .factories
            .get(&draw_type)
            .ok_or(BuildError::UnknownType(draw_type))?;

        factory(document)
    }
}

impl Default for DrawRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Participant;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_builtin_kinds() {
        let registry = DrawRegistry::builtin();
        assert_eq!(
            registry.draw_types(),
            vec![
                "CardDraw",
                "CoinDraw",
                "DiceDraw",
                "RaffleDraw",
                "RandomItemDraw",
                "RandomNumberDraw"
            ]
        );
        assert!(!DrawRegistry::new().contains("RaffleDraw"));
    }

    #[test]
    fn test_build_facebook_raffle_with_compact_participants() {
        let registry = DrawRegistry::builtin();
        let draw = registry
            .build(doc(json!({
                "draw_type": "RaffleDraw",
                "_id": "d1",
                "owner": "u1",
                "prices": ["bike"],
                "participants": ["{42:Alice}", "7:Bob"],
                "registration_type": "facebook",
                "registration_requirement": "share"
            })))
            .unwrap();

        let raffle = draw.as_raffle().unwrap();
        assert_eq!(draw.id(), Some("d1"));
        assert_eq!(
            raffle.participants(),
            &[Participant::new("42", "Alice"), Participant::new("7", "Bob")]
        );
    }

    #[test]
    fn test_unknown_and_missing_type() {
        let registry = DrawRegistry::builtin();
        assert!(matches!(
            registry.build(doc(json!({"draw_type": "TarotDraw"}))),
            Err(BuildError::UnknownType(ref t)) if t == "TarotDraw"
        ));
        assert!(matches!(
            registry.build(doc(json!({"owner": "u1"}))),
            Err(BuildError::MissingType)
        ));
        assert!(matches!(
            registry.build(doc(json!({"draw_type": 3}))),
            Err(BuildError::MissingType)
        ));
    }

    #[test]
    fn test_malformed_and_invalid_documents() {
        let registry = DrawRegistry::builtin();
        assert!(matches!(
            registry.build(doc(json!({"draw_type": "RandomNumberDraw", "range_min": "low"}))),
            Err(BuildError::Malformed { .. })
        ));
        assert!(matches!(
            registry.build(doc(json!({
                "draw_type": "RaffleDraw",
                "participants": ["nobody"],
                "registration_type": "facebook"
            }))),
            Err(BuildError::Invalid { .. })
        ));
    }

    #[test]
    fn test_build_card_draw() {
        let registry = DrawRegistry::builtin();
        let draw = registry
            .build(doc(json!({
                "draw_type": "CardDraw",
                "owner": "u1",
                "number_of_results": 3,
                "type_of_deck": "spanish"
            })))
            .unwrap();

        assert_eq!(draw.draw_type(), "CardDraw");
        assert_eq!(draw.to_document().unwrap()["type_of_deck"], json!("spanish"));
    }

    #[test]
    fn test_custom_registration() {
        fn always_coin(_: Document) -> Result<Draw, BuildError> {
            Ok(Draw::Coin(CoinDraw::default()))
        }

        let mut registry = DrawRegistry::new();
        assert!(registry.register("LegacyCoin", always_coin).is_none());
        let draw = registry.build(doc(json!({"draw_type": "LegacyCoin"}))).unwrap();
        assert_eq!(draw.draw_type(), "CoinDraw");
    }
}
