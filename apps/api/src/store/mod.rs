//! Profile persistence.
//!
//! Handlers only see `Arc<dyn ProfileStore>`; the backend is picked at startup
//! from `STORE_BACKEND`. Every save is conditional on the version that was
//! loaded, so two read-modify-write cycles on the same profile cannot silently
//! overwrite each other.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::profile::{Profile, ProfileSections};

pub use memory::MemoryProfileStore;
pub use postgres::PgProfileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Profile not found")]
    NotFound,

    #[error("Profile {0} was modified concurrently")]
    Conflict(Uuid),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// All profiles, oldest first.
    async fn list(&self) -> Result<Vec<Profile>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Stores a new document with a fresh id at version 1.
    async fn insert(&self, sections: ProfileSections) -> Result<Profile, StoreError>;

    /// Writes `profile.sections` back if the stored version still equals
    /// `profile.version`. Returns the document as persisted.
    async fn save(&self, profile: &Profile) -> Result<Profile, StoreError>;

    /// Removes a profile, returning what was stored.
    async fn delete(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Whether any profile other than `exclude` lists `email` as a contact.
    /// `email` must already be normalised.
    async fn contact_email_taken(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, StoreError>;

    /// Releases backend resources. Called once on shutdown.
    async fn close(&self);
}
