use super::base::DrawBase;
use super::draw::DrawKind;
use crate::error::{DrawError, DrawResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const MAX_DICE: u32 = 10;

fn default_number_of_dice() -> u32 {
    1
}

/// Roll six-sided dice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceDraw {
    #[serde(flatten)]
    pub base: DrawBase,
    #[serde(default = "default_number_of_dice")]
    pub number_of_dice: u32,
}

impl DiceDraw {
    pub fn new(base: DrawBase, number_of_dice: u32) -> Self {
        Self {
            base,
            number_of_dice,
        }
    }
}

impl DrawKind for DiceDraw {
    const DRAW_TYPE: &'static str = "DiceDraw";

    fn base(&self) -> &DrawBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawBase {
        &mut self.base
    }

    fn validate(&self) -> DrawResult<()> {
        self.base.validate()?;
        if !(1..=MAX_DICE).contains(&self.number_of_dice) {
            return Err(DrawError::invalid("number_of_dice"));
        }
        Ok(())
    }

    fn is_feasible(&self) -> bool {
        self.number_of_dice > 0
    }

    fn generate_items<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Value> {
        (0..self.number_of_dice)
            .map(|_| json!(rng.gen_range(1..=6u8)))
            .collect()
    }
}
