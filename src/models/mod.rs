//! Domain models for draws and users.
//!
//! Every draw kind embeds a [`DrawBase`] and implements [`DrawKind`];
//! [`Draw`] is the closed set of kinds the registry can rebuild from storage.

pub mod base;
pub mod card;
pub mod coin;
pub mod dice;
pub mod draw;
pub mod participant;
pub mod raffle;
pub mod random_item;
pub mod random_number;
pub mod user;

// Re-export all models for convenient access
pub use base::{DrawBase, DrawOutcome, MAX_RESULTS};
pub use card::{CardDraw, DeckType};
pub use coin::CoinDraw;
pub use dice::DiceDraw;
pub use draw::{Draw, DrawKind, DRAW_TYPE_FIELD};
pub use participant::{Participant, ParticipantEntry, Scalar};
pub use raffle::{RaffleDraw, RaffleFields, RegistrationRequirement, RegistrationType};
pub use random_item::RandomItemDraw;
pub use random_number::RandomNumberDraw;
pub use user::User;
