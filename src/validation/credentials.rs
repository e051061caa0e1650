use crate::config::ValidationConfig;
use crate::utils::error::ValidationError;
use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpValidation {
    pub email: Option<ValidationError>,
    pub password: Option<ValidationError>,
    pub confirmation: Option<ValidationError>,
}

impl SignUpValidation {
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.confirmation.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CredentialsValidator {
    config: ValidationConfig,
}

impl CredentialsValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate_email(&self, email: &str) -> Option<ValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Some(ValidationError::Empty);
        }
        if !email_pattern().is_match(email) {
            return Some(ValidationError::InvalidFormat);
        }
        None
    }

    /// Needs the configured length plus at least one letter and one digit.
    pub fn validate_password(&self, password: &str) -> Option<ValidationError> {
        if password.is_empty() {
            return Some(ValidationError::Empty);
        }
        let long_enough = password.chars().count() >= self.config.password_min_length;
        let has_letter = password.chars().any(char::is_alphabetic);
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(long_enough && has_letter && has_digit) {
            return Some(ValidationError::WeakPassword);
        }
        None
    }

    pub fn validate_password_confirmation(
        &self,
        password: &str,
        confirmation: &str,
    ) -> Option<ValidationError> {
        if confirmation.is_empty() {
            return Some(ValidationError::Empty);
        }
        (password != confirmation).then_some(ValidationError::Mismatch)
    }

    pub fn validate_sign_up(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> SignUpValidation {
        SignUpValidation {
            email: self.validate_email(email),
            password: self.validate_password(password),
            confirmation: self.validate_password_confirmation(password, confirmation),
        }
    }
}
