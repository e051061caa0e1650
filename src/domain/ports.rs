use crate::domain::model::{Club, Person};
use crate::utils::error::{BackendError, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Events delivered by a realtime document listener. `Ok(None)` means the document does not exist.
pub type ListenerEvent<T> = std::result::Result<Option<T>, BackendError>;

/// Read side of a document collection: one-shot fetch plus realtime listener.
#[async_trait]
pub trait EntitySource<T>: Send + Sync {
    async fn fetch(&self, id: &str) -> std::result::Result<Option<T>, BackendError>;

    /// Starts a listener for one document. Dropping the receiver cancels it.
    fn listen(&self, id: &str) -> mpsc::Receiver<ListenerEvent<T>>;
}

#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Stores a new person; the repository assigns the id and ignores `person.id`.
    async fn create(&self, person: Person) -> std::result::Result<Person, BackendError>;
}

#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Stores a new club; the repository assigns the id and ignores `club.id`.
    async fn create(&self, club: Club) -> std::result::Result<Club, BackendError>;

    async fn get(&self, id: &str) -> std::result::Result<Option<Club>, BackendError>;

    async fn update(&self, club: &Club) -> std::result::Result<(), BackendError>;

    async fn find_by_invite_code(&self, code: &str)
        -> std::result::Result<Option<Club>, BackendError>;
}

/// Local persistent key-value storage surviving process restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
