use crate::config::ValidationConfig;
use crate::domain::model::{PersonDraft, Sex};
use crate::utils::error::ValidationError;
use crate::validation::charset::{check_name, filter, CharacterSet};
use crate::validation::check_image_url;
use chrono::{Datelike, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonValidation {
    pub first_name: Option<ValidationError>,
    pub last_name: Option<ValidationError>,
    pub year_of_birth: Option<ValidationError>,
    pub sex: Option<ValidationError>,
    pub image_url: Option<ValidationError>,
}

impl PersonValidation {
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Field name and error for every failing field.
    pub fn errors(&self) -> Vec<(&'static str, &ValidationError)> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("year_of_birth", &self.year_of_birth),
            ("sex", &self.sex),
            ("image_url", &self.image_url),
        ]
        .into_iter()
        .filter_map(|(field, error)| error.as_ref().map(|e| (field, e)))
        .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonValidator {
    config: ValidationConfig,
}

impl PersonValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate_first_name(&self, value: &str) -> Option<ValidationError> {
        self.check_name(value)
    }

    pub fn validate_last_name(&self, value: &str) -> Option<ValidationError> {
        self.check_name(value)
    }

    /// Valid years are `min_birth_year..=current_year`.
    pub fn validate_year_of_birth(
        &self,
        year: Option<i32>,
        current_year: i32,
    ) -> Option<ValidationError> {
        let year = match year {
            Some(year) => year,
            None => return Some(ValidationError::Required),
        };
        if year < self.config.min_birth_year || year > current_year {
            return Some(ValidationError::OutOfRange {
                min: self.config.min_birth_year,
                max: current_year,
            });
        }
        None
    }

    pub fn validate_sex(&self, sex: Option<Sex>) -> Option<ValidationError> {
        sex.is_none().then_some(ValidationError::Required)
    }

    pub fn validate(&self, draft: &PersonDraft) -> PersonValidation {
        self.validate_at(draft, Utc::now().year())
    }

    pub fn validate_at(&self, draft: &PersonDraft, current_year: i32) -> PersonValidation {
        PersonValidation {
            first_name: self.validate_first_name(&draft.first_name),
            last_name: self.validate_last_name(&draft.last_name),
            year_of_birth: self.validate_year_of_birth(draft.year_of_birth, current_year),
            sex: self.validate_sex(draft.sex),
            image_url: check_image_url(draft.image_url.as_deref()),
        }
    }

    /// Typing filter for first and last names.
    pub fn filter_name(&self, input: &str) -> String {
        filter(input, CharacterSet::PersonName, self.config.name_max_length)
    }

    fn check_name(&self, value: &str) -> Option<ValidationError> {
        check_name(
            value,
            CharacterSet::PersonName,
            self.config.name_min_length,
            self.config.name_max_length,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PersonDraft {
        PersonDraft {
            first_name: "Zoë".to_string(),
            last_name: "O'Connor-Łukasik".to_string(),
            year_of_birth: Some(1990),
            sex: Some(Sex::Female),
            image_url: None,
        }
    }

    #[test]
    fn test_valid_person() {
        let result = PersonValidator::default().validate_at(&draft(), 2026);
        assert!(result.is_valid(), "{:?}", result);
    }

    #[test]
    fn test_empty_draft_reports_required_fields() {
        let result = PersonValidator::default().validate_at(&PersonDraft::default(), 2026);
        assert_eq!(result.first_name, Some(ValidationError::Empty));
        assert_eq!(result.last_name, Some(ValidationError::Empty));
        assert_eq!(result.year_of_birth, Some(ValidationError::Required));
        assert_eq!(result.sex, Some(ValidationError::Required));
        assert_eq!(result.image_url, None);
        assert_eq!(result.errors().len(), 4);
    }

    #[test]
    fn test_year_of_birth_boundaries() {
        let validator = PersonValidator::default();
        let min = ValidationConfig::default().min_birth_year;
        let current = 2026;

        assert!(validator.validate_year_of_birth(Some(min - 1), current).is_some());
        assert!(validator.validate_year_of_birth(Some(current + 1), current).is_some());
        assert!(validator.validate_year_of_birth(Some(min), current).is_none());
        assert!(validator.validate_year_of_birth(Some(current), current).is_none());
    }

    #[test]
    fn test_name_errors() {
        let validator = PersonValidator::default();
        assert_eq!(
            validator.validate_first_name("Jo3"),
            Some(ValidationError::InvalidCharacters)
        );
        assert_eq!(
            validator.validate_last_name("Smith--Jones"),
            Some(ValidationError::ConsecutiveSpecialCharacters)
        );
        assert_eq!(
            validator.validate_first_name(&"a".repeat(51)),
            Some(ValidationError::TooLong { max: 50 })
        );
    }

    #[test]
    fn test_image_url_must_be_http() {
        let mut person = draft();
        person.image_url = Some("ftp://example.com/me.png".to_string());
        let result = PersonValidator::default().validate_at(&person, 2026);
        assert_eq!(result.image_url, Some(ValidationError::InvalidFormat));

        person.image_url = Some("https://cdn.example.com/me.png".to_string());
        assert!(PersonValidator::default().validate_at(&person, 2026).is_valid());
    }

    #[test]
    fn test_filter_respects_configured_length() {
        let validator = PersonValidator::new(ValidationConfig {
            name_max_length: 5,
            ..ValidationConfig::default()
        });
        assert_eq!(validator.filter_name("Alexandra"), "Alexa");
    }
}
