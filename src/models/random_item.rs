use super::base::DrawBase;
use super::draw::DrawKind;
use crate::error::{DrawError, DrawResult};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Pick entries from a list of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomItemDraw {
    #[serde(flatten)]
    pub base: DrawBase,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub allow_repeat: bool,
}

impl RandomItemDraw {
    pub fn new(base: DrawBase, items: Vec<String>, allow_repeat: bool) -> Self {
        Self {
            base,
            items,
            allow_repeat,
        }
    }
}

impl DrawKind for RandomItemDraw {
    const DRAW_TYPE: &'static str = "RandomItemDraw";

    fn base(&self) -> &DrawBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawBase {
        &mut self.base
    }

    fn validate(&self) -> DrawResult<()> {
        self.base.validate()?;
        if self.items.is_empty() {
            return Err(DrawError::invalid("items"));
        }
        if !self.allow_repeat && self.base.number_of_results as usize > self.items.len() {
            return Err(DrawError::invalid("number_of_results"));
        }
        Ok(())
    }

    fn is_feasible(&self) -> bool {
        !self.items.is_empty()
    }

    fn generate_items<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Value> {
        let count = self.base.number_of_results as usize;
        if self.allow_repeat {
            (0..count)
                .filter_map(|_| self.items.choose(&mut *rng))
                .map(|item| json!(item))
                .collect()
        } else {
            self.items
                .choose_multiple(rng, count)
                .map(|item| json!(item))
                .collect()
        }
    }
}
