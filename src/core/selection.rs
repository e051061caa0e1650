//! Shared cache for the user's selected person and club.
//!
//! Each entity type has one driver task that owns the remote listener for the
//! currently selected id. Consumers only ever see `watch` receivers, so the
//! number of subscribers never changes the number of listeners.

use crate::config::SelectionConfig;
use crate::domain::model::{Club, Entity, Person};
use crate::domain::ports::{EntitySource, KeyValueStore, ListenerEvent};
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

pub const SELECTED_PERSON_KEY: &str = "selected_person_id";
pub const SELECTED_CLUB_KEY: &str = "selected_club_id";

struct Shared<T> {
    key: &'static str,
    store: Arc<dyn KeyValueStore>,
    selected_id: watch::Sender<Option<String>>,
    value: watch::Sender<Option<T>>,
    prefetched: Mutex<Option<T>>,
    /// Serialises writes of the selected id to the store and to `selected_id`.
    write_lock: Mutex<()>,
}

struct Listener<T> {
    id: String,
    events: mpsc::Receiver<ListenerEvent<T>>,
}

impl<T: Entity> Shared<T> {
    fn is_selected(&self, id: &str) -> bool {
        self.selected_id.borrow().as_deref() == Some(id)
    }

    /// Publishes a value for `id` unless another id has been selected meanwhile.
    fn publish(&self, id: &str, value: Option<T>) -> bool {
        self.value.send_if_modified(|current| {
            if !self.is_selected(id) {
                return false;
            }
            *current = value;
            true
        })
    }

    /// Publishes `None` unless an id has been selected meanwhile.
    fn publish_cleared(&self) -> bool {
        self.value.send_if_modified(|current| {
            if self.selected_id.borrow().is_some() {
                return false;
            }
            *current = None;
            true
        })
    }

    /// Drops the selection of `id`, leaving any newer selection untouched.
    async fn clear_selection(&self, id: &str) -> bool {
        let _write = self.write_lock.lock().await;
        if !self.is_selected(id) {
            return false;
        }
        if let Err(e) = self.store.remove(self.key).await {
            tracing::warn!("Failed to remove {} from local store: {}", self.key, e);
        }
        self.selected_id.send_replace(None);
        self.publish_cleared();
        true
    }

    async fn switch_to(
        &self,
        source: &dyn EntitySource<T>,
        id: Option<String>,
    ) -> Option<Listener<T>> {
        let id = match id {
            Some(id) => id,
            None => {
                self.publish_cleared();
                return None;
            }
        };

        let warm = {
            let mut prefetched = self.prefetched.lock().await;
            match prefetched.take() {
                Some(value) if value.id() == id => Some(value),
                other => {
                    *prefetched = other;
                    None
                }
            }
        };
        if let Some(value) = warm {
            tracing::debug!("Using prefetched {}/{}", T::KIND, id);
            self.publish(&id, Some(value));
        }

        tracing::debug!("Listening to {}/{}", T::KIND, id);
        let events = source.listen(&id);
        Some(Listener { id, events })
    }
}

async fn next_event<T>(listener: &mut Option<Listener<T>>) -> Option<ListenerEvent<T>> {
    match listener {
        Some(listener) => listener.events.recv().await,
        None => std::future::pending().await,
    }
}

async fn drive<T: Entity>(
    shared: Arc<Shared<T>>,
    source: Arc<dyn EntitySource<T>>,
    mut id_rx: watch::Receiver<Option<String>>,
) {
    let initial = id_rx.borrow_and_update().clone();
    let mut listener = shared.switch_to(source.as_ref(), initial).await;

    loop {
        // Id changes win over pending events, so the old listener is dropped
        // before any of its buffered events can be published.
        tokio::select! {
            biased;

            changed = id_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let id = id_rx.borrow_and_update().clone();
                drop(listener.take());
                listener = shared.switch_to(source.as_ref(), id).await;
            }

            event = next_event(&mut listener) => {
                let id = match &listener {
                    Some(listener) => listener.id.clone(),
                    None => continue,
                };
                match event {
                    Some(Ok(value)) => {
                        shared.publish(&id, value);
                    }
                    Some(Err(e)) => {
                        tracing::warn!(
                            "Listener for {}/{} failed, clearing selection: {}",
                            T::KIND,
                            id,
                            e
                        );
                        listener = None;
                        shared.clear_selection(&id).await;
                    }
                    None => {
                        tracing::debug!("Listener for {}/{} closed", T::KIND, id);
                        listener = None;
                    }
                }
            }
        }
    }
}

/// Hot, shared view of one selected entity type.
pub struct SelectionCache<T: Entity> {
    shared: Arc<Shared<T>>,
    source: Arc<dyn EntitySource<T>>,
    await_timeout: Duration,
    driver: JoinHandle<()>,
}

impl<T: Entity> SelectionCache<T> {
    /// Restores the persisted id from `store` and starts the driver task.
    pub async fn start(
        key: &'static str,
        source: Arc<dyn EntitySource<T>>,
        store: Arc<dyn KeyValueStore>,
        await_timeout: Duration,
    ) -> Result<Self> {
        let initial = store.get(key).await?;
        tracing::debug!("Restored {} = {:?}", key, initial);

        let (selected_id, id_rx) = watch::channel(initial);
        let (value, _) = watch::channel(None);
        let shared = Arc::new(Shared {
            key,
            store,
            selected_id,
            value,
            prefetched: Mutex::new(None),
            write_lock: Mutex::new(()),
        });
        let driver = tokio::spawn(drive(shared.clone(), source.clone(), id_rx));

        Ok(Self {
            shared,
            source,
            await_timeout,
            driver,
        })
    }

    pub fn observe(&self) -> watch::Receiver<Option<T>> {
        self.shared.value.subscribe()
    }

    /// Last cached value, possibly stale.
    pub fn current(&self) -> Option<T> {
        self.shared.value.borrow().clone()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.shared.selected_id.borrow().clone()
    }

    /// Persists the new id, then switches the shared listener to it.
    pub async fn select(&self, id: Option<String>) -> Result<()> {
        let _write = self.shared.write_lock.lock().await;
        match &id {
            Some(id) => self.shared.store.set(self.shared.key, id).await?,
            None => self.shared.store.remove(self.shared.key).await?,
        }
        self.shared.selected_id.send_if_modified(|current| {
            if *current == id {
                return false;
            }
            *current = id;
            true
        });
        Ok(())
    }

    /// Waits for the selected entity, falling back to the cache after the timeout.
    pub async fn await_value(&self) -> Option<T> {
        let mut value_rx = self.shared.value.subscribe();
        let wait = async {
            loop {
                let wanted = self.shared.selected_id.borrow().clone();
                let found = value_rx
                    .borrow_and_update()
                    .as_ref()
                    .filter(|value| wanted.as_deref() == Some(value.id()))
                    .cloned();
                if found.is_some() {
                    return found;
                }
                if value_rx.changed().await.is_err() {
                    return None;
                }
            }
        };

        match tokio::time::timeout(self.await_timeout, wait).await {
            Ok(Some(value)) => Some(value),
            Ok(None) => self.current(),
            Err(_) => {
                tracing::debug!(
                    "No {} arrived within {:?}, using cached value",
                    T::KIND,
                    self.await_timeout
                );
                self.current()
            }
        }
    }

    /// Best-effort fetch that warms the cache for `id`. Failures are only logged.
    pub async fn prefetch(&self, id: &str) {
        match self.source.fetch(id).await {
            Ok(Some(value)) => {
                if self.shared.is_selected(id) {
                    let published = self.shared.value.send_if_modified(|current| {
                        let already_loaded = current.as_ref().map(|c| c.id()) == Some(id);
                        if already_loaded || !self.shared.is_selected(id) {
                            return false;
                        }
                        *current = Some(value);
                        true
                    });
                    tracing::debug!("Prefetched {}/{} (published: {})", T::KIND, id, published);
                } else {
                    *self.shared.prefetched.lock().await = Some(value);
                    tracing::debug!("Prefetched {}/{} for later selection", T::KIND, id);
                }
            }
            Ok(None) => tracing::debug!("Prefetch found no {}/{}", T::KIND, id),
            Err(e) => tracing::warn!("Prefetch of {}/{} failed: {}", T::KIND, id, e),
        }
    }

    /// Clears the selection when it points to a missing entity. Returns true when cleared.
    ///
    /// Fetch failures keep the selection, a transient outage must not lose it.
    pub async fn validate(&self) -> bool {
        let id = match self.selected_id() {
            Some(id) => id,
            None => return false,
        };

        match self.source.fetch(&id).await {
            Ok(Some(_)) => false,
            Ok(None) => {
                tracing::info!("Selected {}/{} no longer exists, clearing", T::KIND, id);
                self.shared.clear_selection(&id).await
            }
            Err(e) => {
                tracing::warn!("Could not validate {}/{}, keeping selection: {}", T::KIND, id, e);
                false
            }
        }
    }
}

impl<T: Entity> Drop for SelectionCache<T> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionValidation {
    pub person_cleared: bool,
    pub club_cleared: bool,
}

/// Selected person and club for the signed-in user.
pub struct SelectedEntityService {
    persons: SelectionCache<Person>,
    clubs: SelectionCache<Club>,
}

impl SelectedEntityService {
    pub async fn new(
        person_source: Arc<dyn EntitySource<Person>>,
        club_source: Arc<dyn EntitySource<Club>>,
        store: Arc<dyn KeyValueStore>,
        config: &SelectionConfig,
    ) -> Result<Self> {
        let timeout = config.await_timeout();
        let persons =
            SelectionCache::start(SELECTED_PERSON_KEY, person_source, store.clone(), timeout)
                .await?;
        let clubs = SelectionCache::start(SELECTED_CLUB_KEY, club_source, store, timeout).await?;
        Ok(Self { persons, clubs })
    }

    pub fn observe_selected_person(&self) -> watch::Receiver<Option<Person>> {
        self.persons.observe()
    }

    pub fn get_current_selected_person(&self) -> Option<Person> {
        self.persons.current()
    }

    pub async fn await_selected_person(&self) -> Option<Person> {
        self.persons.await_value().await
    }

    pub fn selected_person_id(&self) -> Option<String> {
        self.persons.selected_id()
    }

    pub async fn select_person(&self, id: Option<String>) -> Result<()> {
        self.persons.select(id).await
    }

    pub async fn prefetch_person(&self, id: &str) {
        self.persons.prefetch(id).await
    }

    pub fn observe_selected_club(&self) -> watch::Receiver<Option<Club>> {
        self.clubs.observe()
    }

    pub fn get_current_selected_club(&self) -> Option<Club> {
        self.clubs.current()
    }

    pub async fn await_selected_club(&self) -> Option<Club> {
        self.clubs.await_value().await
    }

    pub fn selected_club_id(&self) -> Option<String> {
        self.clubs.selected_id()
    }

    pub async fn select_club(&self, id: Option<String>) -> Result<()> {
        self.clubs.select(id).await
    }

    pub async fn prefetch_club(&self, id: &str) {
        self.clubs.prefetch(id).await
    }

    /// Startup check that both selections still point to existing entities.
    pub async fn validate_selections(&self) -> SelectionValidation {
        let (person_cleared, club_cleared) =
            tokio::join!(self.persons.validate(), self.clubs.validate());
        SelectionValidation {
            person_cleared,
            club_cleared,
        }
    }
}
