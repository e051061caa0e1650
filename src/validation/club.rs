use crate::config::ValidationConfig;
use crate::domain::model::ClubDraft;
use crate::utils::error::ValidationError;
use crate::validation::charset::{check_name, filter, CharacterSet};
use crate::validation::check_image_url;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubValidation {
    pub name: Option<ValidationError>,
    pub image_url: Option<ValidationError>,
}

impl ClubValidation {
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn errors(&self) -> Vec<(&'static str, &ValidationError)> {
        [("name", &self.name), ("image_url", &self.image_url)]
            .into_iter()
            .filter_map(|(field, error)| error.as_ref().map(|e| (field, e)))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClubValidator {
    config: ValidationConfig,
}

impl ClubValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate_name(&self, value: &str) -> Option<ValidationError> {
        check_name(
            value,
            CharacterSet::ClubName,
            self.config.club_name_min_length,
            self.config.club_name_max_length,
        )
    }

    pub fn validate(&self, draft: &ClubDraft) -> ClubValidation {
        ClubValidation {
            name: self.validate_name(&draft.name),
            image_url: check_image_url(draft.image_url.as_deref()),
        }
    }

    /// Expects the code already upper-cased by the caller.
    pub fn validate_invite_code(&self, code: &str) -> Option<ValidationError> {
        if code.trim().is_empty() {
            return Some(ValidationError::Empty);
        }
        if code.chars().count() != self.config.invite_code_length
            || !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Some(ValidationError::InvalidFormat);
        }
        None
    }

    pub fn filter_name(&self, input: &str) -> String {
        filter(input, CharacterSet::ClubName, self.config.club_name_max_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_club_name_rules() {
        let validator = ClubValidator::default();
        assert_eq!(validator.validate_name("1. FC Köln"), None);
        assert_eq!(validator.validate_name(""), Some(ValidationError::Empty));
        assert_eq!(
            validator.validate_name("Red\nDevils"),
            Some(ValidationError::ContainsNewline)
        );
        assert_eq!(
            validator.validate_name("Club @ Home"),
            Some(ValidationError::InvalidCharacters)
        );
        assert_eq!(
            validator.validate_name("FC"),
            Some(ValidationError::TooShort { min: 3 })
        );
    }

    #[test]
    fn test_invite_code_format() {
        let validator = ClubValidator::default();
        assert_eq!(validator.validate_invite_code("AB12CD34"), None);
        assert_eq!(validator.validate_invite_code(" "), Some(ValidationError::Empty));
        assert_eq!(
            validator.validate_invite_code("AB12"),
            Some(ValidationError::InvalidFormat)
        );
        assert_eq!(
            validator.validate_invite_code("ab12cd34"),
            Some(ValidationError::InvalidFormat)
        );
    }

    #[test]
    fn test_filter_strips_newlines() {
        let validator = ClubValidator::default();
        let filtered = validator.filter_name("Red\nDevils  United");
        assert_eq!(filtered, "RedDevils United");
        assert_eq!(validator.validate_name(&filtered), None);
    }
}
