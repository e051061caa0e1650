pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod validation;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{FileKeyValueStore, InMemoryBackend, MemoryKeyValueStore};
pub use config::AppConfig;
pub use crate::core::{
    club::ClubService,
    person::PersonService,
    preferences::Preferences,
    selection::{SelectedEntityService, SelectionCache, SelectionValidation},
};
pub use utils::error::{AppError, AuthError, BackendError, ClubError, Result, ValidationError};
pub use validation::{ClubValidator, CredentialsValidator, PersonValidator};
