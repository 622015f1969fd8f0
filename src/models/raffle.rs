use super::base::DrawBase;
use super::draw::DrawKind;
use super::participant::{Participant, ParticipantEntry};
use crate::error::{DrawError, DrawResult};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Who may join a raffle's participant list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationType {
    /// The owner manages the list
    #[default]
    Restricted,
    /// Users register themselves through Facebook
    Facebook,
}

impl RegistrationType {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "restricted" => Ok(RegistrationType::Restricted),
            "facebook" => Ok(RegistrationType::Facebook),
            _ => Err(format!("Invalid registration type: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationType::Restricted => "restricted",
            RegistrationType::Facebook => "facebook",
        }
    }
}

/// Action a Facebook user must take to register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationRequirement {
    #[default]
    Login,
    Share,
}

impl RegistrationRequirement {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "login" => Ok(RegistrationRequirement::Login),
            "share" => Ok(RegistrationRequirement::Share),
            _ => Err(format!("Invalid registration requirement: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationRequirement::Login => "login",
            RegistrationRequirement::Share => "share",
        }
    }
}

/// Raw raffle fields as read from a document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaffleFields {
    #[serde(flatten)]
    pub base: DrawBase,
    #[serde(default)]
    pub prices: Vec<Value>,
    #[serde(default)]
    pub participants: Vec<ParticipantEntry>,
    #[serde(default)]
    pub registration_type: RegistrationType,
    #[serde(default)]
    pub registration_requirement: Option<RegistrationRequirement>,
}

/// A draw pairing prizes with participants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaffleDraw {
    #[serde(flatten)]
    base: DrawBase,
    prices: Vec<Value>,
    participants: Vec<Participant>,
    registration_type: RegistrationType,
    registration_requirement: Option<RegistrationRequirement>,
}

impl RaffleDraw {
    /// Build a raffle.
    ///
    /// Facebook raffles resolve every entry strictly (a compact string without
    /// `:` is a [`DrawError::Format`]) and default the requirement to
    /// [`RegistrationRequirement::Login`]. Restricted raffles drop the
    /// requirement and keep string entries verbatim.
    pub fn new(
        base: DrawBase,
        prices: Vec<Value>,
        participants: Vec<ParticipantEntry>,
        registration_type: RegistrationType,
        registration_requirement: Option<RegistrationRequirement>,
    ) -> DrawResult<Self> {
        let mut raffle = Self {
            base,
            prices,
            participants: Vec::new(),
            registration_type,
            registration_requirement: None,
        };

        match registration_type {
            RegistrationType::Facebook => {
                // installed directly, the reassignment guard only covers later changes
                raffle.participants = participants
                    .into_iter()
                    .map(ParticipantEntry::into_participant)
                    .collect::<DrawResult<_>>()?;
                raffle.registration_requirement = Some(registration_requirement.unwrap_or_default());
            }
            RegistrationType::Restricted => {
                let participants = participants
                    .into_iter()
                    .map(ParticipantEntry::into_participant_or_name)
                    .collect();
                raffle.try_set_participants(participants);
            }
        }

        Ok(raffle)
    }

    /// Restricted raffle with the given prizes and participants
    pub fn restricted(base: DrawBase, prices: Vec<Value>, participants: Vec<Participant>) -> Self {
        Self {
            base,
            prices,
            participants,
            registration_type: RegistrationType::Restricted,
            registration_requirement: None,
        }
    }

    /// Facebook raffle with no participants yet
    pub fn facebook(
        base: DrawBase,
        prices: Vec<Value>,
        registration_requirement: RegistrationRequirement,
    ) -> Self {
        Self {
            base,
            prices,
            participants: Vec::new(),
            registration_type: RegistrationType::Facebook,
            registration_requirement: Some(registration_requirement),
        }
    }

    pub fn from_fields(fields: RaffleFields) -> DrawResult<Self> {
        Self::new(
            fields.base,
            fields.prices,
            fields.participants,
            fields.registration_type,
            fields.registration_requirement,
        )
    }

    pub fn prices(&self) -> &[Value] {
        &self.prices
    }

    pub fn set_prices(&mut self, prices: Vec<Value>) {
        self.prices = prices;
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn registration_type(&self) -> RegistrationType {
        self.registration_type
    }

    pub fn registration_requirement(&self) -> Option<RegistrationRequirement> {
        self.registration_requirement
    }

    /// Replace the participant list.
    ///
    /// Facebook raffles only grow through [`RaffleDraw::register_participant`];
    /// for them this leaves the list untouched and returns `false`.
    pub fn try_set_participants(&mut self, participants: Vec<Participant>) -> bool {
        if self.registration_type == RegistrationType::Facebook {
            return false;
        }
        self.participants = participants;
        true
    }

    /// Append a participant to a Facebook raffle
    pub fn register_participant(&mut self, participant: Participant) -> DrawResult<()> {
        if self.registration_type != RegistrationType::Facebook {
            return Err(DrawError::Registration(
                "cannot register in a non Facebook draw".to_string(),
            ));
        }
        if self.participants.iter().any(|p| p.id() == participant.id()) {
            return Err(DrawError::AlreadyRegistered {
                id: participant.id().to_string(),
            });
        }
        self.participants.push(participant);
        Ok(())
    }

    pub fn is_registered(&self, participant_id: &str) -> bool {
        self.participants.iter().any(|p| p.id() == participant_id)
    }

    /// Shuffle the participants and pair them with the prizes in order.
    ///
    /// Surplus prizes or participants are left out of the result.
    pub fn generate_result_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(Value, Participant)> {
        let mut shuffled = self.participants.clone();
        shuffled.shuffle(rng);
        self.prices.iter().cloned().zip(shuffled).collect()
    }

    pub fn generate_result(&self) -> Vec<(Value, Participant)> {
        self.generate_result_with(&mut rand::thread_rng())
    }
}

impl DrawKind for RaffleDraw {
    const DRAW_TYPE: &'static str = "RaffleDraw";

    fn base(&self) -> &DrawBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DrawBase {
        &mut self.base
    }

    fn validate(&self) -> DrawResult<()> {
        self.base.validate()?;
        if self.prices.is_empty() {
            return Err(DrawError::invalid("prices"));
        }
        Ok(())
    }

    fn is_feasible(&self) -> bool {
        !self.prices.is_empty() && !self.participants.is_empty()
    }

    fn generate_items<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Value> {
        self.generate_result_with(rng)
            .into_iter()
            .map(|(price, participant)| json!([price, participant]))
            .collect()
    }
}
