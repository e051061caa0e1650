use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anything stored as a document keyed by a generated string id.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Collection name used in log output and document paths.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
            Sex::Other => "OTHER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub year_of_birth: i32,
    pub sex: Sex,
    pub image_url: Option<String>,
    pub club_ids: Vec<String>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for Person {
    const KIND: &'static str = "persons";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub owner_id: String,
    pub admin_ids: Vec<String>,
    pub member_ids: Vec<String>,
    pub invite_code: String,
    pub invite_code_expires_at: Option<DateTime<Utc>>,
}

impl Club {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.owner_id == user_id || self.admin_ids.iter().any(|id| id == user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == user_id)
    }

    /// A code without expiry never expires.
    pub fn invite_code_expired(&self, now: DateTime<Utc>) -> bool {
        self.invite_code_expires_at
            .map(|expires_at| expires_at <= now)
            .unwrap_or(false)
    }
}

impl Entity for Club {
    const KIND: &'static str = "clubs";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Unsaved person input. `year_of_birth` and `sex` stay optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub first_name: String,
    pub last_name: String,
    pub year_of_birth: Option<i32>,
    pub sex: Option<Sex>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubDraft {
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        };
        f.write_str(s)
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Theme::System),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    DayMonthYear,
    MonthDayYear,
    Iso,
}

impl DateFormat {
    /// Pattern as shown to the user and persisted.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "dd.MM.yyyy",
            DateFormat::MonthDayYear => "MM/dd/yyyy",
            DateFormat::Iso => "yyyy-MM-dd",
        }
    }

    pub fn format(&self, date: chrono::NaiveDate) -> String {
        let fmt = match self {
            DateFormat::DayMonthYear => "%d.%m.%Y",
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::Iso => "%Y-%m-%d",
        };
        date.format(fmt).to_string()
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dd.MM.yyyy" => Ok(DateFormat::DayMonthYear),
            "MM/dd/yyyy" => Ok(DateFormat::MonthDayYear),
            "yyyy-MM-dd" => Ok(DateFormat::Iso),
            other => Err(format!("unknown date format '{}'", other)),
        }
    }
}
