use anyhow::Context;
use clap::Parser;
use club_core::config::cli::{Command, PreferencesAction, SelectionAction};
use club_core::core::selection::{SELECTED_CLUB_KEY, SELECTED_PERSON_KEY};
use club_core::domain::model::{ClubDraft, DateFormat, PersonDraft, Theme};
use club_core::domain::ports::KeyValueStore;
use club_core::utils::error::ValidationError;
use club_core::utils::{logger, validation::Validate};
use club_core::{AppConfig, CliConfig, ClubValidator, FileKeyValueStore, PersonValidator, Preferences};
use std::sync::Arc;

fn print_errors(errors: &[(&'static str, &ValidationError)]) {
    for (field, error) in errors {
        println!("❌ {}: {} ({})", field, error, error.message_key());
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(store) = &cli.store {
        config.storage.path = store.clone();
    }
    config.validate().context("invalid configuration")?;
    tracing::debug!("Effective config: {:?}", config);

    match cli.command {
        Command::ValidatePerson {
            first_name,
            last_name,
            year_of_birth,
            sex,
        } => {
            let draft = PersonDraft {
                first_name,
                last_name,
                year_of_birth,
                sex: sex.map(Into::into),
                image_url: None,
            };
            let result = PersonValidator::new(config.validation).validate(&draft);
            if result.is_valid() {
                println!("✅ Person is valid");
                return Ok(true);
            }
            print_errors(&result.errors());
            Ok(false)
        }
        Command::ValidateClub { name } => {
            let result = ClubValidator::new(config.validation).validate(&ClubDraft {
                name,
                image_url: None,
            });
            if result.is_valid() {
                println!("✅ Club is valid");
                return Ok(true);
            }
            print_errors(&result.errors());
            Ok(false)
        }
        Command::FilterName { text, club } => {
            let filtered = if club {
                ClubValidator::new(config.validation).filter_name(&text)
            } else {
                PersonValidator::new(config.validation).filter_name(&text)
            };
            println!("{}", filtered);
            Ok(true)
        }
        Command::Selection { action } => {
            let store = FileKeyValueStore::open(&config.storage.path).await?;
            match action {
                SelectionAction::Show => {
                    for key in [SELECTED_PERSON_KEY, SELECTED_CLUB_KEY] {
                        let value = store.get(key).await?;
                        println!("{}: {}", key, value.as_deref().unwrap_or("-"));
                    }
                }
                SelectionAction::Clear => {
                    store.remove(SELECTED_PERSON_KEY).await?;
                    store.remove(SELECTED_CLUB_KEY).await?;
                    tracing::info!("Cleared selection in {}", store.path().display());
                    println!("✅ Selection cleared");
                }
            }
            Ok(true)
        }
        Command::Preferences { action } => {
            let store = FileKeyValueStore::open(&config.storage.path).await?;
            let preferences = Preferences::new(Arc::new(store));
            if let PreferencesAction::Set { theme, date_format } = action {
                if let Some(theme) = theme {
                    let theme: Theme = theme.parse().map_err(anyhow::Error::msg)?;
                    preferences.set_theme(theme).await?;
                }
                if let Some(format) = date_format {
                    let format: DateFormat = format.parse().map_err(anyhow::Error::msg)?;
                    preferences.set_date_format(format).await?;
                }
            }
            println!("theme: {}", preferences.theme().await?);
            println!("date_format: {}", preferences.date_format().await?.pattern());
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let format = if cli.log_json {
        logger::LogFormat::Json
    } else {
        logger::LogFormat::Compact
    };
    logger::init_logger(format, cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(2);
        }
    }
}
