//! In-process document database with realtime listeners.
//!
//! Documents are held as JSON values per `(collection, id)` so reads and writes
//! go through the same storage mapping a remote backend would use.

use crate::adapters::documents::StoredEntity;
use crate::domain::model::{Club, Entity, Person};
use crate::domain::ports::{ClubRepository, EntitySource, ListenerEvent, PersonRepository};
use crate::utils::error::BackendError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

const LISTENER_BUFFER: usize = 16;

type DocumentKey = (&'static str, String);

#[derive(Default)]
pub struct InMemoryBackend {
    documents: Mutex<HashMap<DocumentKey, watch::Sender<Option<Value>>>>,
    offline: AtomicBool,
    active_listeners: Arc<AtomicUsize>,
    listen_calls: AtomicUsize,
}

/// Decrements the active listener count when a listener task ends.
struct ListenerGuard(Arc<AtomicUsize>);

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates loss of connectivity: fetches fail and new listeners report an error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn active_listeners(&self) -> usize {
        self.active_listeners.load(Ordering::SeqCst)
    }

    pub fn listen_calls(&self) -> usize {
        self.listen_calls.load(Ordering::SeqCst)
    }

    /// Writes an entity under its own id, notifying listeners.
    pub fn put<T: StoredEntity>(&self, entity: &T) -> Result<(), BackendError> {
        let document = entity.to_document()?;
        self.sender(T::KIND, entity.id()).send_replace(Some(document));
        Ok(())
    }

    pub fn delete<T: StoredEntity>(&self, id: &str) {
        let documents = self.lock();
        if let Some(sender) = documents.get(&(T::KIND, id.to_string())) {
            sender.send_replace(None);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DocumentKey, watch::Sender<Option<Value>>>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sender(&self, kind: &'static str, id: &str) -> watch::Sender<Option<Value>> {
        self.lock()
            .entry((kind, id.to_string()))
            .or_insert_with(|| watch::channel(None).0)
            .clone()
    }

    fn ensure_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Network("backend unreachable".to_string()));
        }
        Ok(())
    }

    fn read<T: StoredEntity>(&self, id: &str) -> Result<Option<T>, BackendError> {
        let document = self
            .lock()
            .get(&(T::KIND, id.to_string()))
            .and_then(|sender| sender.borrow().clone());
        document.map(|doc| T::from_document(id, doc)).transpose()
    }

    fn insert_new<T: StoredEntity>(&self, entity: T) -> Result<T, BackendError> {
        self.ensure_online()?;
        let entity = entity.with_id(Uuid::new_v4().to_string());
        self.put(&entity)?;
        tracing::debug!("Created {}/{}", T::KIND, entity.id());
        Ok(entity)
    }
}

#[async_trait]
impl<T: StoredEntity> EntitySource<T> for InMemoryBackend {
    async fn fetch(&self, id: &str) -> Result<Option<T>, BackendError> {
        self.ensure_online()?;
        self.read(id)
    }

    fn listen(&self, id: &str) -> mpsc::Receiver<ListenerEvent<T>> {
        self.listen_calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(LISTENER_BUFFER);

        if let Err(err) = self.ensure_online() {
            // Fresh channel, so there is room for the single error event.
            let _ = tx.try_send(Err(err));
            return rx;
        }

        let mut document_rx = self.sender(T::KIND, id).subscribe();
        let id = id.to_string();
        self.active_listeners.fetch_add(1, Ordering::SeqCst);
        let guard = ListenerGuard(self.active_listeners.clone());

        tokio::spawn(async move {
            let _guard = guard;
            loop {
                let document = document_rx.borrow_and_update().clone();
                let event = document.map(|doc| T::from_document(&id, doc)).transpose();
                if tx.send(event).await.is_err() {
                    break;
                }

                tokio::select! {
                    changed = document_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = tx.closed() => break,
                }
            }
            tracing::trace!("Listener for {}/{} stopped", T::KIND, id);
        });

        rx
    }
}

#[async_trait]
impl PersonRepository for InMemoryBackend {
    async fn create(&self, person: Person) -> Result<Person, BackendError> {
        self.insert_new(person)
    }
}

#[async_trait]
impl ClubRepository for InMemoryBackend {
    async fn create(&self, club: Club) -> Result<Club, BackendError> {
        self.insert_new(club)
    }

    async fn get(&self, id: &str) -> Result<Option<Club>, BackendError> {
        self.ensure_online()?;
        self.read(id)
    }

    async fn update(&self, club: &Club) -> Result<(), BackendError> {
        self.ensure_online()?;
        if self.read::<Club>(&club.id)?.is_none() {
            return Err(BackendError::NotFound(format!("{}/{}", Club::KIND, club.id)));
        }
        self.put(club)
    }

    async fn find_by_invite_code(&self, code: &str) -> Result<Option<Club>, BackendError> {
        self.ensure_online()?;
        let candidates: Vec<(String, Value)> = self
            .lock()
            .iter()
            .filter(|((kind, _), _)| *kind == Club::KIND)
            .filter_map(|((_, id), sender)| sender.borrow().clone().map(|doc| (id.clone(), doc)))
            .collect();

        for (id, document) in candidates {
            let club = Club::from_document(&id, document)?;
            if club.invite_code == code {
                return Ok(Some(club));
            }
        }
        Ok(None)
    }
}
