use crate::domain::model::{Person, PersonDraft};
use crate::domain::ports::PersonRepository;
use crate::utils::error::{AppError, Result};
use crate::validation::PersonValidator;
use std::sync::Arc;

pub struct PersonService {
    repository: Arc<dyn PersonRepository>,
    validator: PersonValidator,
}

impl PersonService {
    pub fn new(repository: Arc<dyn PersonRepository>, validator: PersonValidator) -> Self {
        Self {
            repository,
            validator,
        }
    }

    /// Validates the draft and stores a new person owned by `user_id`.
    pub async fn create_person(&self, user_id: &str, draft: PersonDraft) -> Result<Person> {
        // Validate the names exactly as they will be stored.
        let draft = PersonDraft {
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            ..draft
        };
        let validation = self.validator.validate(&draft);
        let (year_of_birth, sex) = match (draft.year_of_birth, draft.sex) {
            (Some(year), Some(sex)) if validation.is_valid() => (year, sex),
            _ => {
                tracing::debug!("Rejected person draft: {:?}", validation.errors());
                return Err(AppError::InvalidPerson(validation));
            }
        };

        let person = Person {
            id: String::new(),
            user_id: user_id.to_string(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            year_of_birth,
            sex,
            image_url: draft.image_url,
            club_ids: Vec::new(),
        };

        let created = self.repository.create(person).await.map_err(|e| {
            tracing::warn!("Creating person for {} failed: {}", user_id, e);
            AppError::StorageError {
                message: e.to_string(),
            }
        })?;
        tracing::info!("Created person {} for user {}", created.id, user_id);
        Ok(created)
    }
}
