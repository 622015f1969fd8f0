use super::base::DrawBase;
use super::draw::DrawKind;
use crate::error::DrawResult;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Flip a coin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoinDraw {
    #[serde(flatten)]
    pub base: DrawBase,
}

impl CoinDraw {
    pub fn new(base: DrawBase) -> Self {
        Self { base }
    }
}

impl DrawKind for CoinDraw {
    const DRAW_TYPE: &'static str = "CoinDraw";

    fn base(&self) -> &DrawBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawBase {
        &mut self.base
    }

    fn validate(&self) -> DrawResult<()> {
        self.base.validate()
    }

    fn is_feasible(&self) -> bool {
        true
    }

    fn generate_items<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Value> {
        let side = if rng.gen_bool(0.5) { "heads" } else { "tails" };
        vec![json!(side)]
    }
}
