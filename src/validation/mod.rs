// Pure field validation. Results are per-field error codes, never `Err`.

pub mod charset;
pub mod club;
pub mod credentials;
pub mod person;

pub use charset::CharacterSet;
pub use club::{ClubValidation, ClubValidator};
pub use credentials::{CredentialsValidator, SignUpValidation};
pub use person::{PersonValidation, PersonValidator};

use crate::utils::error::ValidationError;
use url::Url;

/// Optional image links must be absolute http(s) URLs.
pub(crate) fn check_image_url(url: Option<&str>) -> Option<ValidationError> {
    let url = url?;
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => None,
        _ => Some(ValidationError::InvalidFormat),
    }
}
