#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_bounds, validate_path, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub validation: ValidationConfig,
    pub selection: SelectionConfig,
    pub storage: StorageConfig,
    pub club: ClubConfig,
}

/// Field limits shared by validators and input filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub name_min_length: usize,
    pub name_max_length: usize,
    pub club_name_min_length: usize,
    pub club_name_max_length: usize,
    pub min_birth_year: i32,
    pub password_min_length: usize,
    pub invite_code_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_min_length: 2,
            name_max_length: 50,
            club_name_min_length: 3,
            club_name_max_length: 50,
            min_birth_year: 1900,
            password_min_length: 8,
            invite_code_length: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Upper bound for `await_selected_*` before falling back to the cache.
    pub await_timeout_ms: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            await_timeout_ms: 5000,
        }
    }
}

impl SelectionConfig {
    pub fn await_timeout(&self) -> Duration {
        Duration::from_millis(self.await_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the local key-value store.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "./club-core.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfig {
    pub invite_code_validity_days: i64,
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            invite_code_validity_days: 7,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string. Missing sections fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
fn substitute_env_vars(content: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        let v = &self.validation;
        validate_bounds("validation.name_length", v.name_min_length, v.name_max_length)?;
        validate_bounds(
            "validation.club_name_length",
            v.club_name_min_length,
            v.club_name_max_length,
        )?;
        validate_range("validation.min_birth_year", v.min_birth_year, 1800, 2100)?;
        validate_positive_number(
            "validation.password_min_length",
            v.password_min_length as u64,
            1,
        )?;
        validate_range("validation.invite_code_length", v.invite_code_length, 4, 32)?;

        validate_positive_number(
            "selection.await_timeout_ms",
            self.selection.await_timeout_ms,
            1,
        )?;
        validate_path("storage.path", &self.storage.path)?;
        validate_range(
            "club.invite_code_validity_days",
            self.club.invite_code_validity_days,
            1,
            365,
        )?;

        Ok(())
    }
}
