pub mod club;
pub mod person;
pub mod preferences;
pub mod selection;

pub use crate::domain::model::{Club, ClubDraft, Entity, Person, PersonDraft, Sex};
pub use crate::domain::ports::{ClubRepository, EntitySource, KeyValueStore, PersonRepository};
pub use crate::utils::error::Result;
