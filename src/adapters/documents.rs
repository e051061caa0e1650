//! Storage representation of domain entities.
//!
//! Documents use camelCase keys, keep the id outside the body and store
//! instants as epoch milliseconds.

use crate::domain::model::{Club, Entity, Person, Sex};
use crate::utils::error::BackendError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An entity that can be written to and read from a document collection.
pub trait StoredEntity: Entity {
    fn to_document(&self) -> Result<Value, BackendError>;
    fn from_document(id: &str, document: Value) -> Result<Self, BackendError>;
    fn with_id(self, id: String) -> Self;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDocument {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub year_of_birth: i32,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub club_ids: Vec<String>,
}

impl From<&Person> for PersonDocument {
    fn from(person: &Person) -> Self {
        Self {
            user_id: person.user_id.clone(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            year_of_birth: person.year_of_birth,
            sex: person.sex,
            image_url: person.image_url.clone(),
            club_ids: person.club_ids.clone(),
        }
    }
}

impl PersonDocument {
    pub fn into_person(self, id: &str) -> Person {
        Person {
            id: id.to_string(),
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            year_of_birth: self.year_of_birth,
            sex: self.sex,
            image_url: self.image_url,
            club_ids: self.club_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub owner_id: String,
    #[serde(default)]
    pub admin_ids: Vec<String>,
    #[serde(default)]
    pub member_ids: Vec<String>,
    pub invite_code: String,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_code_expiry: Option<i64>,
}

impl From<&Club> for ClubDocument {
    fn from(club: &Club) -> Self {
        Self {
            name: club.name.clone(),
            image_url: club.image_url.clone(),
            owner_id: club.owner_id.clone(),
            admin_ids: club.admin_ids.clone(),
            member_ids: club.member_ids.clone(),
            invite_code: club.invite_code.clone(),
            invite_code_expiry: club.invite_code_expires_at.map(|at| at.timestamp_millis()),
        }
    }
}

impl ClubDocument {
    pub fn into_club(self, id: &str) -> Result<Club, BackendError> {
        let invite_code_expires_at = match self.invite_code_expiry {
            Some(millis) => Some(DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(
                || BackendError::Decode(format!("{}/{}: expiry {} out of range", Club::KIND, id, millis)),
            )?),
            None => None,
        };

        Ok(Club {
            id: id.to_string(),
            name: self.name,
            image_url: self.image_url,
            owner_id: self.owner_id,
            admin_ids: self.admin_ids,
            member_ids: self.member_ids,
            invite_code: self.invite_code,
            invite_code_expires_at,
        })
    }
}

fn decode_error(kind: &str, id: &str, err: serde_json::Error) -> BackendError {
    BackendError::Decode(format!("{}/{}: {}", kind, id, err))
}

impl StoredEntity for Person {
    fn to_document(&self) -> Result<Value, BackendError> {
        serde_json::to_value(PersonDocument::from(self))
            .map_err(|e| decode_error(Self::KIND, &self.id, e))
    }

    fn from_document(id: &str, document: Value) -> Result<Self, BackendError> {
        let document: PersonDocument =
            serde_json::from_value(document).map_err(|e| decode_error(Self::KIND, id, e))?;
        Ok(document.into_person(id))
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }
}

impl StoredEntity for Club {
    fn to_document(&self) -> Result<Value, BackendError> {
        serde_json::to_value(ClubDocument::from(self))
            .map_err(|e| decode_error(Self::KIND, &self.id, e))
    }

    fn from_document(id: &str, document: Value) -> Result<Self, BackendError> {
        let document: ClubDocument =
            serde_json::from_value(document).map_err(|e| decode_error(Self::KIND, id, e))?;
        document.into_club(id)
    }

    fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn club() -> Club {
        Club {
            id: "club-42".to_string(),
            name: "SV Grün-Weiß".to_string(),
            image_url: Some("https://cdn.example.com/clubs/42.png".to_string()),
            owner_id: "user-1".to_string(),
            admin_ids: vec!["user-1".to_string(), "user-2".to_string()],
            member_ids: vec!["user-1".to_string(), "user-2".to_string(), "user-3".to_string()],
            invite_code: "K7Q2M9XA".to_string(),
            invite_code_expires_at: Some(
                Utc.timestamp_millis_opt(1_790_000_123_456).single().unwrap(),
            ),
        }
    }

    #[test]
    fn test_club_round_trip() {
        let original = club();
        let document = original.to_document().unwrap();
        let restored = Club::from_document(&original.id, document).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_club_round_trip_without_expiry() {
        let mut original = club();
        original.invite_code_expires_at = None;
        original.image_url = None;

        let document = original.to_document().unwrap();
        assert!(document.get("inviteCodeExpiry").is_none());
        assert!(document.get("imageUrl").is_none());
        assert_eq!(Club::from_document(&original.id, document).unwrap(), original);
    }

    #[test]
    fn test_document_layout() {
        let document = club().to_document().unwrap();
        assert_eq!(document["ownerId"], "user-1");
        assert_eq!(document["inviteCodeExpiry"], 1_790_000_123_456_i64);
        assert!(document.get("id").is_none());
    }

    #[test]
    fn test_person_round_trip() {
        let person = Person {
            id: "p-1".to_string(),
            user_id: "user-1".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Núñez".to_string(),
            year_of_birth: 2001,
            sex: Sex::Female,
            image_url: None,
            club_ids: vec!["club-42".to_string()],
        };
        let document = person.to_document().unwrap();
        assert_eq!(document["sex"], "FEMALE");
        assert_eq!(Person::from_document("p-1", document).unwrap(), person);
    }

    #[test]
    fn test_malformed_document_is_decode_error() {
        let document = serde_json::json!({ "name": "No owner" });
        let result = Club::from_document("club-1", document);
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }
}
