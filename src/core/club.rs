use crate::config::{ClubConfig, ValidationConfig};
use crate::domain::model::{Club, ClubDraft};
use crate::domain::ports::ClubRepository;
use crate::utils::error::{AppError, ClubError, Result};
use crate::validation::ClubValidator;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::Arc;

/// Invite code alphabet without look-alike characters (0/O, 1/I).
const INVITE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub fn generate_invite_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(INVITE_ALPHABET[rng.gen_range(0..INVITE_ALPHABET.len())]))
        .collect()
}

pub struct ClubService {
    repository: Arc<dyn ClubRepository>,
    validator: ClubValidator,
    invite_code_length: usize,
    invite_code_validity: Duration,
}

impl ClubService {
    pub fn new(
        repository: Arc<dyn ClubRepository>,
        validation: ValidationConfig,
        club: &ClubConfig,
    ) -> Self {
        Self {
            repository,
            invite_code_length: validation.invite_code_length,
            validator: ClubValidator::new(validation),
            invite_code_validity: Duration::days(club.invite_code_validity_days),
        }
    }

    /// Creates a club owned by `owner_id`, who also becomes its first admin and member.
    pub async fn create_club(&self, owner_id: &str, draft: ClubDraft) -> Result<Club> {
        if owner_id.is_empty() {
            return Err(ClubError::Unauthenticated.into());
        }
        let draft = ClubDraft {
            name: draft.name.trim().to_string(),
            ..draft
        };
        let validation = self.validator.validate(&draft);
        if !validation.is_valid() {
            return Err(AppError::InvalidClub(validation));
        }

        let club = Club {
            id: String::new(),
            name: draft.name.clone(),
            image_url: draft.image_url,
            owner_id: owner_id.to_string(),
            admin_ids: vec![owner_id.to_string()],
            member_ids: vec![owner_id.to_string()],
            invite_code: generate_invite_code(self.invite_code_length),
            invite_code_expires_at: Some(self.next_expiry(Utc::now())),
        };

        let created = self.repository.create(club).await.map_err(|e| {
            tracing::warn!("Creating club '{}' failed: {}", draft.name, e);
            ClubError::from(e)
        })?;
        tracing::info!("Created club {} owned by {}", created.id, owner_id);
        Ok(created)
    }

    pub async fn join_with_invite_code(
        &self,
        user_id: &str,
        code: &str,
    ) -> std::result::Result<Club, ClubError> {
        self.join_with_invite_code_at(user_id, code, Utc::now()).await
    }

    pub async fn join_with_invite_code_at(
        &self,
        user_id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Club, ClubError> {
        if user_id.is_empty() {
            return Err(ClubError::Unauthenticated);
        }
        let code = code.trim().to_ascii_uppercase();
        if self.validator.validate_invite_code(&code).is_some() {
            return Err(ClubError::InvalidInviteCode);
        }

        let mut club = self
            .repository
            .find_by_invite_code(&code)
            .await?
            .ok_or(ClubError::InvalidInviteCode)?;

        if club.invite_code_expired(now) {
            return Err(ClubError::ExpiredInviteCode);
        }
        if club.is_member(user_id) {
            return Err(ClubError::AlreadyMember);
        }

        club.member_ids.push(user_id.to_string());
        self.repository.update(&club).await?;
        tracing::info!("User {} joined club {}", user_id, club.id);
        Ok(club)
    }

    /// Issues a fresh invite code; only the owner or an admin may do this.
    pub async fn regenerate_invite_code(
        &self,
        requester_id: &str,
        club_id: &str,
    ) -> std::result::Result<Club, ClubError> {
        let mut club = self.load_for_admin(requester_id, club_id).await?;
        club.invite_code = generate_invite_code(self.invite_code_length);
        club.invite_code_expires_at = Some(self.next_expiry(Utc::now()));
        self.repository.update(&club).await?;
        tracing::info!("Regenerated invite code of club {}", club.id);
        Ok(club)
    }

    /// Removes `member_id`. Admins may remove anyone but the owner; members may leave.
    pub async fn remove_member(
        &self,
        requester_id: &str,
        club_id: &str,
        member_id: &str,
    ) -> std::result::Result<Club, ClubError> {
        if requester_id.is_empty() {
            return Err(ClubError::Unauthenticated);
        }
        let mut club = self
            .repository
            .get(club_id)
            .await?
            .ok_or(ClubError::NotFound)?;

        if member_id == club.owner_id {
            return Err(ClubError::PermissionDenied);
        }
        if requester_id != member_id && !club.is_admin(requester_id) {
            return Err(ClubError::PermissionDenied);
        }

        club.member_ids.retain(|id| id != member_id);
        club.admin_ids.retain(|id| id != member_id);
        self.repository.update(&club).await?;
        tracing::info!("Removed {} from club {}", member_id, club.id);
        Ok(club)
    }

    async fn load_for_admin(
        &self,
        requester_id: &str,
        club_id: &str,
    ) -> std::result::Result<Club, ClubError> {
        if requester_id.is_empty() {
            return Err(ClubError::Unauthenticated);
        }
        let club = self
            .repository
            .get(club_id)
            .await?
            .ok_or(ClubError::NotFound)?;
        if !club.is_admin(requester_id) {
            return Err(ClubError::PermissionDenied);
        }
        Ok(club)
    }

    fn next_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.invite_code_validity
    }
}
