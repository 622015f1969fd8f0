use crate::error::{DrawError, DrawResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on `number_of_results` for a single toss
pub const MAX_RESULTS: u32 = 1000;

fn default_number_of_results() -> u32 {
    1
}

/// One toss of a draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub generated_at: DateTime<Utc>,
    pub items: Vec<Value>,
}

/// Fields shared by every kind of draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawBase {
    /// Store-assigned identifier, absent until the first save
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_number_of_results")]
    pub number_of_results: u32,
    #[serde(default)]
    pub results: Vec<DrawOutcome>,
    /// Users the draw is shared with
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default = "Utc::now")]
    pub creation_time: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub last_updated_time: DateTime<Utc>,
}

impl DrawBase {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: None,
            owner: None,
            title: None,
            description: None,
            number_of_results: default_number_of_results(),
            results: Vec::new(),
            users: Vec::new(),
            creation_time: now,
            last_updated_time: now,
        }
    }

    /// Base draw owned by `owner`
    pub fn owned_by(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            ..Self::new()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_number_of_results(mut self, number_of_results: u32) -> Self {
        self.number_of_results = number_of_results;
        self
    }

    pub fn validate(&self) -> DrawResult<()> {
        if self.number_of_results == 0 || self.number_of_results > MAX_RESULTS {
            return Err(DrawError::invalid("number_of_results"));
        }
        Ok(())
    }

    pub fn touch(&mut self) {
        self.last_updated_time = Utc::now();
    }

    /// Record a toss and return it
    pub fn push_outcome(&mut self, items: Vec<Value>) -> &DrawOutcome {
        self.touch();
        let generated_at = self.last_updated_time;
        self.results.push(DrawOutcome {
            generated_at,
            items,
        });
        &self.results[self.results.len() - 1]
    }

    pub fn last_outcome(&self) -> Option<&DrawOutcome> {
        self.results.last()
    }
}

impl Default for DrawBase {
    fn default() -> Self {
        Self::new()
    }
}
