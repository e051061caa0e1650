use crate::domain::model::{DateFormat, Theme};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;
use std::sync::Arc;

pub const THEME_KEY: &str = "theme";
pub const DATE_FORMAT_KEY: &str = "date_format";

/// Display preferences kept next to the selection state.
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Unknown stored values fall back to the default.
    pub async fn theme(&self) -> Result<Theme> {
        Ok(self.read(THEME_KEY).await?.unwrap_or_default())
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, &theme.to_string()).await
    }

    pub async fn date_format(&self) -> Result<DateFormat> {
        Ok(self.read(DATE_FORMAT_KEY).await?.unwrap_or_default())
    }

    pub async fn set_date_format(&self, format: DateFormat) -> Result<()> {
        self.store.set(DATE_FORMAT_KEY, format.pattern()).await
    }

    async fn read<T: std::str::FromStr<Err = String>>(&self, key: &str) -> Result<Option<T>> {
        let raw = match self.store.get(key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring stored {}: {}", key, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryKeyValueStore;

    #[tokio::test]
    async fn test_defaults_and_updates() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let preferences = Preferences::new(store.clone());

        assert_eq!(preferences.theme().await.unwrap(), Theme::System);
        assert_eq!(
            preferences.date_format().await.unwrap(),
            DateFormat::DayMonthYear
        );

        preferences.set_theme(Theme::Dark).await.unwrap();
        preferences.set_date_format(DateFormat::Iso).await.unwrap();
        assert_eq!(preferences.theme().await.unwrap(), Theme::Dark);
        assert_eq!(preferences.date_format().await.unwrap(), DateFormat::Iso);
        assert_eq!(store.get(DATE_FORMAT_KEY).await.unwrap().as_deref(), Some("yyyy-MM-dd"));
    }

    #[tokio::test]
    async fn test_corrupt_value_falls_back_to_default() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(THEME_KEY, "sepia").await.unwrap();

        let preferences = Preferences::new(store);
        assert_eq!(preferences.theme().await.unwrap(), Theme::System);
    }
}
