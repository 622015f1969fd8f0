use crate::error::{DrawError, DrawResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raffle participant. Two participants are the same registrant when their ids match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Participant {
    id: String,
    name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse the compact `id:name` / `{id:name}` form.
    ///
    /// Only the text between the first and second `:` becomes the name.
    pub fn parse_compact(raw: &str) -> DrawResult<Self> {
        let trimmed = raw.trim();
        let (id, rest) = trimmed.split_once(':').ok_or_else(|| {
            DrawError::Format(format!("missing ':' separator in participant '{}'", raw))
        })?;
        let name = rest.split(':').next().unwrap_or(rest);

        Ok(Self::new(id.replace('{', ""), name.replace('}', "")))
    }
}

impl From<(String, String)> for Participant {
    fn from((id, name): (String, String)) -> Self {
        Self { id, name }
    }
}

impl From<Participant> for (String, String) {
    fn from(participant: Participant) -> Self {
        (participant.id, participant.name)
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.name)
    }
}

/// Scalar accepted for participant ids and names on input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => s,
            Scalar::Integer(n) => n.to_string(),
        }
    }
}

/// Participant as it may appear in a stored document or construction input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantEntry {
    Pair(Scalar, Scalar),
    Record { id: Scalar, name: Scalar },
    Compact(String),
}

impl ParticipantEntry {
    /// Resolve the entry, parsing compact strings strictly
    pub fn into_participant(self) -> DrawResult<Participant> {
        match self {
            ParticipantEntry::Pair(id, name) | ParticipantEntry::Record { id, name } => {
                Ok(Participant::new(String::from(id), String::from(name)))
            }
            ParticipantEntry::Compact(raw) => Participant::parse_compact(&raw),
        }
    }

    /// Resolve the entry, keeping a string verbatim as both id and name
    pub fn into_participant_or_name(self) -> Participant {
        match self {
            ParticipantEntry::Pair(id, name) | ParticipantEntry::Record { id, name } => {
                Participant::new(String::from(id), String::from(name))
            }
            ParticipantEntry::Compact(raw) => Participant::new(raw.clone(), raw),
        }
    }
}

impl From<Participant> for ParticipantEntry {
    fn from(participant: Participant) -> Self {
        ParticipantEntry::Pair(Scalar::Text(participant.id), Scalar::Text(participant.name))
    }
}

impl From<&str> for ParticipantEntry {
    fn from(raw: &str) -> Self {
        ParticipantEntry::Compact(raw.to_string())
    }
}
