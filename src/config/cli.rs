use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "club-core")]
#[command(about = "Validate club member input and inspect the local selection store")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `storage.path` from the configuration
    #[arg(long, global = true)]
    pub store: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate person profile fields
    ValidatePerson {
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        year_of_birth: Option<i32>,
        #[arg(long, value_enum)]
        sex: Option<SexArg>,
    },
    /// Validate a club name
    ValidateClub {
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Apply the typing filter to a name and print the result
    FilterName {
        text: String,
        #[arg(long, help = "Use club name rules")]
        club: bool,
    },
    /// Show or clear the persisted selection
    Selection {
        #[command(subcommand)]
        action: SelectionAction,
    },
    /// Show or change display preferences
    Preferences {
        #[command(subcommand)]
        action: PreferencesAction,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SelectionAction {
    Show,
    Clear,
}

#[derive(Debug, Clone, Subcommand)]
pub enum PreferencesAction {
    Show,
    Set {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        date_format: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SexArg {
    Male,
    Female,
    Other,
}

impl From<SexArg> for crate::domain::model::Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Self::Male,
            SexArg::Female => Self::Female,
            SexArg::Other => Self::Other,
        }
    }
}
