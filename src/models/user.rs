use crate::database::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User document. Fields not modelled here are kept in `extra` and written back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Draw ids the user marked as favourite
    #[serde(default)]
    pub favourites: Vec<String>,
    #[serde(default = "Utc::now")]
    pub creation_time: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Document,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            favourites: Vec::new(),
            creation_time: Utc::now(),
            extra: Document::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive() {
        let user: User = serde_json::from_value(json!({
            "_id": "ann@example.com",
            "user_type": "facebook",
            "favourites": ["d1"]
        }))
        .unwrap();

        assert_eq!(user.id, "ann@example.com");
        assert_eq!(user.favourites, vec!["d1".to_string()]);
        assert_eq!(user.extra.get("user_type"), Some(&json!("facebook")));

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["user_type"], json!("facebook"));
        assert_eq!(value["_id"], json!("ann@example.com"));
    }
}
