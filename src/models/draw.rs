use super::base::{DrawBase, DrawOutcome};
use super::card::CardDraw;
use super::coin::CoinDraw;
use super::dice::DiceDraw;
use super::raffle::RaffleDraw;
use super::random_item::RandomItemDraw;
use super::random_number::RandomNumberDraw;
use crate::database::Document;
use crate::error::{DrawError, DrawResult};
use rand::Rng;
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::Value;

/// Field holding the draw kind tag in stored documents
pub const DRAW_TYPE_FIELD: &str = "draw_type";

/// Behaviour every kind of draw provides
pub trait DrawKind {
    /// Tag stored in the `draw_type` field
    const DRAW_TYPE: &'static str;

    fn base(&self) -> &DrawBase;

    fn base_mut(&mut self) -> &mut DrawBase;

    fn validate(&self) -> DrawResult<()>;

    fn is_feasible(&self) -> bool;

    /// Items of a single toss
    fn generate_items<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Value>;
}

/// Any stored draw
#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    Raffle(RaffleDraw),
    Coin(CoinDraw),
    Dice(DiceDraw),
    RandomNumber(RandomNumberDraw),
    RandomItem(RandomItemDraw),
    Card(CardDraw),
}

macro_rules! dispatch {
    ($draw:expr, $inner:ident => $body:expr) => {
        match $draw {
            Draw::Raffle($inner) => $body,
            Draw::Coin($inner) => $body,
            Draw::Dice($inner) => $body,
            Draw::RandomNumber($inner) => $body,
            Draw::RandomItem($inner) => $body,
            Draw::Card($inner) => $body,
        }
    };
}

fn kind_draw_type<T: DrawKind>(_: &T) -> &'static str {
    T::DRAW_TYPE
}

fn kind_to_document<T: DrawKind + Serialize>(draw: &T) -> serde_json::Result<Document> {
    match serde_json::to_value(draw)? {
        Value::Object(mut document) => {
            document.insert(
                DRAW_TYPE_FIELD.to_string(),
                Value::String(T::DRAW_TYPE.to_string()),
            );
            Ok(document)
        }
        other => Err(serde_json::Error::custom(format!(
            "draw serialized to a non-object value: {}",
            other
        ))),
    }
}

impl Draw {
    pub fn draw_type(&self) -> &'static str {
        dispatch!(self, d => kind_draw_type(d))
    }

    pub fn base(&self) -> &DrawBase {
        dispatch!(self, d => d.base())
    }

    pub fn base_mut(&mut self) -> &mut DrawBase {
        dispatch!(self, d => d.base_mut())
    }

    pub fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.base_mut().id = Some(id.into());
    }

    pub fn owner(&self) -> Option<&str> {
        self.base().owner.as_deref()
    }

    pub fn validate(&self) -> DrawResult<()> {
        dispatch!(self, d => d.validate())
    }

    pub fn is_feasible(&self) -> bool {
        dispatch!(self, d => d.is_feasible())
    }

    /// Validate, produce a result and record it in the draw's history
    pub fn toss_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> DrawResult<&DrawOutcome> {
        self.validate()?;
        if !self.is_feasible() {
            return Err(DrawError::NotFeasible);
        }
        let items = dispatch!(&*self, d => d.generate_items(rng));
        Ok(self.base_mut().push_outcome(items))
    }

    pub fn toss(&mut self) -> DrawResult<&DrawOutcome> {
        self.toss_with(&mut rand::thread_rng())
    }

    /// Full field set plus the `draw_type` tag; `_id` is omitted until assigned
    pub fn to_document(&self) -> serde_json::Result<Document> {
        dispatch!(self, d => kind_to_document(d))
    }

    pub fn as_raffle(&self) -> Option<&RaffleDraw> {
        match self {
            Draw::Raffle(raffle) => Some(raffle),
            _ => None,
        }
    }

    pub fn as_raffle_mut(&mut self) -> Option<&mut RaffleDraw> {
        match self {
            Draw::Raffle(raffle) => Some(raffle),
            _ => None,
        }
    }
}

impl From<RaffleDraw> for Draw {
    fn from(draw: RaffleDraw) -> Self {
        Draw::Raffle(draw)
    }
}

impl From<CoinDraw> for Draw {
    fn from(draw: CoinDraw) -> Self {
        Draw::Coin(draw)
    }
}

impl From<DiceDraw> for Draw {
    fn from(draw: DiceDraw) -> Self {
        Draw::Dice(draw)
    }
}

impl From<RandomNumberDraw> for Draw {
    fn from(draw: RandomNumberDraw) -> Self {
        Draw::RandomNumber(draw)
    }
}

impl From<RandomItemDraw> for Draw {
    fn from(draw: RandomItemDraw) -> Self {
        Draw::RandomItem(draw)
    }
}

impl From<CardDraw> for Draw {
    fn from(draw: CardDraw) -> Self {
        Draw::Card(draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Participant;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn test_document_carries_type_and_omits_unassigned_id() {
        let draw = Draw::from(CoinDraw::new(DrawBase::owned_by("u1")));
        let document = draw.to_document().unwrap();

        assert_eq!(document.get(DRAW_TYPE_FIELD), Some(&json!("CoinDraw")));
        assert_eq!(document.get("owner"), Some(&json!("u1")));
        assert!(!document.contains_key("_id"));
    }

    #[test]
    fn test_raffle_document_fields() {
        let raffle = RaffleDraw::restricted(
            DrawBase::new(),
            vec![json!("bike")],
            vec![Participant::new("1", "Ann")],
        );
        let document = Draw::from(raffle).to_document().unwrap();

        assert_eq!(document["prices"], json!(["bike"]));
        assert_eq!(document["participants"], json!([["1", "Ann"]]));
        assert_eq!(document["registration_type"], json!("restricted"));
        assert_eq!(document["registration_requirement"], Value::Null);
    }

    #[test]
    fn test_toss_records_outcome() {
        let mut draw = Draw::from(RaffleDraw::restricted(
            DrawBase::new(),
            vec![json!("bike")],
            vec![Participant::new("1", "Ann")],
        ));
        let items = draw
            .toss_with(&mut StdRng::seed_from_u64(1))
            .unwrap()
            .items
            .clone();

        assert_eq!(items, vec![json!(["bike", ["1", "Ann"]])]);
        assert_eq!(draw.base().results.len(), 1);
    }

    #[test]
    fn test_toss_rejects_infeasible_draw() {
        let mut draw = Draw::from(RaffleDraw::restricted(
            DrawBase::new(),
            vec![json!("bike")],
            Vec::new(),
        ));
        assert!(matches!(draw.toss(), Err(DrawError::NotFeasible)));
        assert!(draw.base().results.is_empty());
    }

    #[test]
    fn test_toss_validates_first() {
        let mut draw = Draw::from(RaffleDraw::restricted(DrawBase::new(), Vec::new(), Vec::new()));
        assert!(matches!(draw.toss(), Err(DrawError::InvalidDraw { .. })));
    }
}
