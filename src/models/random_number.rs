use super::base::DrawBase;
use super::draw::DrawKind;
use crate::error::{DrawError, DrawResult};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;

/// Ranges up to this size are sampled by index instead of by rejection
const INDEX_SAMPLE_LIMIT: u128 = 1_000_000;

/// Pick numbers from an inclusive range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomNumberDraw {
    #[serde(flatten)]
    pub base: DrawBase,
    pub range_min: i64,
    pub range_max: i64,
    #[serde(default)]
    pub allow_repeat: bool,
}

impl RandomNumberDraw {
    pub fn new(base: DrawBase, range_min: i64, range_max: i64, allow_repeat: bool) -> Self {
        Self {
            base,
            range_min,
            range_max,
            allow_repeat,
        }
    }

    /// Number of distinct values in the range, zero when inverted
    fn span(&self) -> u128 {
        if self.range_min > self.range_max {
            return 0;
        }
        (i128::from(self.range_max) - i128::from(self.range_min) + 1) as u128
    }
}

impl DrawKind for RandomNumberDraw {
    const DRAW_TYPE: &'static str = "RandomNumberDraw";

    fn base(&self) -> &DrawBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawBase {
        &mut self.base
    }

    fn validate(&self) -> DrawResult<()> {
        self.base.validate()?;
        if self.range_min > self.range_max {
            return Err(DrawError::invalid("range_max"));
        }
        if !self.allow_repeat && u128::from(self.base.number_of_results) > self.span() {
            return Err(DrawError::invalid("number_of_results"));
        }
        Ok(())
    }

    fn is_feasible(&self) -> bool {
        self.span() > 0
    }

    fn generate_items<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Value> {
        let count = self.base.number_of_results as usize;
        if self.allow_repeat {
            return (0..count)
                .map(|_| json!(rng.gen_range(self.range_min..=self.range_max)))
                .collect();
        }

        let span = self.span();
        if span <= INDEX_SAMPLE_LIMIT {
            let count = count.min(span as usize);
            return index::sample(&mut *rng, span as usize, count)
                .into_iter()
                .map(|offset| json!(self.range_min + offset as i64))
                .collect();
        }

        let mut seen = HashSet::with_capacity(count);
        let mut picked = Vec::with_capacity(count);
        while picked.len() < count {
            let n = rng.gen_range(self.range_min..=self.range_max);
            if seen.insert(n) {
                picked.push(json!(n));
            }
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Draw;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_inverted_range_is_invalid() {
        let draw = RandomNumberDraw::new(DrawBase::new(), 10, 1, true);
        assert!(matches!(
            draw.validate(),
            Err(DrawError::InvalidDraw { ref field }) if field == "range_max"
        ));
        assert!(!draw.is_feasible());
    }

    #[test]
    fn test_too_many_results_without_repeat() {
        let base = DrawBase::new().with_number_of_results(4);
        assert!(RandomNumberDraw::new(base.clone(), 1, 3, false).validate().is_err());
        assert!(RandomNumberDraw::new(base, 1, 3, true).validate().is_ok());
    }

    #[test]
    fn test_unique_numbers_cover_small_range() {
        let base = DrawBase::new().with_number_of_results(5);
        let draw = RandomNumberDraw::new(base, -2, 2, false);
        let mut items: Vec<i64> = draw
            .generate_items(&mut StdRng::seed_from_u64(3))
            .into_iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        items.sort();
        assert_eq!(items, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn test_unique_numbers_from_large_range() {
        let base = DrawBase::new().with_number_of_results(20);
        let draw = RandomNumberDraw::new(base, i64::MIN, i64::MAX, false);
        let items = draw.generate_items(&mut StdRng::seed_from_u64(9));
        let distinct: HashSet<_> = items.iter().map(|v| v.as_i64().unwrap()).collect();
        assert_eq!(distinct.len(), 20);
    }

    #[test]
    fn test_huge_result_count_rejected_before_generation() {
        let base = DrawBase::new().with_number_of_results(4_000_000_000);
        let mut draw = Draw::from(RandomNumberDraw::new(base, 1, 6, true));
        assert!(matches!(
            draw.toss_with(&mut StdRng::seed_from_u64(1)),
            Err(DrawError::InvalidDraw { ref field }) if field == "number_of_results"
        ));
        assert!(draw.base().results.is_empty());
    }
}
