use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProfileStore, StoreError};
use crate::models::profile::{Profile, ProfileSections};
use crate::validation::rules::normalize_email;

/// In-process store. Insertion order doubles as creation order.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.read().await.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(&self, sections: ProfileSections) -> Result<Profile, StoreError> {
        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4(),
            sections,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.profiles.write().await.push(profile.clone());
        Ok(profile)
    }

    async fn save(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.write().await;
        let stored = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or(StoreError::NotFound)?;
        if stored.version != profile.version {
            return Err(StoreError::Conflict(profile.id));
        }
        stored.sections = profile.sections.clone();
        stored.version += 1;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let mut profiles = self.profiles.write().await;
        let index = profiles.iter().position(|p| p.id == id);
        Ok(index.map(|index| profiles.remove(index)))
    }

    async fn contact_email_taken(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        Ok(self.profiles.read().await.iter().any(|p| {
            Some(p.id) != exclude
                && p
                    .sections
                    .contact
                    .iter()
                    .any(|c| normalize_email(&c.email) == email)
        }))
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Contact, Skill};

    fn sections_with_email(email: &str) -> ProfileSections {
        ProfileSections {
            contact: vec![Contact {
                id: Uuid::new_v4(),
                email: email.to_string(),
                phone_number: None,
                linkedin: None,
                message: None,
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_bumps_version() {
        let store = MemoryProfileStore::new();
        let mut profile = store.insert(ProfileSections::default()).await.unwrap();
        assert_eq!(profile.version, 1);

        profile.sections.skills.push(Skill {
            id: Uuid::new_v4(),
            name: "Go".into(),
            proficiency: 8,
        });
        let saved = store.save(&profile).await.unwrap();
        assert_eq!(saved.version, 2);
        assert_eq!(saved.sections.skills.len(), 1);
        assert!(saved.updated_at >= saved.created_at);
    }

    #[tokio::test]
    async fn test_stale_save_is_rejected() {
        let store = MemoryProfileStore::new();
        let profile = store.insert(ProfileSections::default()).await.unwrap();

        let mut first = profile.clone();
        let mut second = profile.clone();
        first.sections = sections_with_email("a@b.co");
        second.sections = sections_with_email("c@d.co");

        store.save(&first).await.unwrap();
        let err = store.save(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == profile.id));

        let stored = store.get(profile.id).await.unwrap().unwrap();
        assert_eq!(stored.sections.contact[0].email, "a@b.co");
    }

    #[tokio::test]
    async fn test_save_missing_profile() {
        let store = MemoryProfileStore::new();
        let profile = store.insert(ProfileSections::default()).await.unwrap();
        store.delete(profile.id).await.unwrap();
        assert!(matches!(
            store.save(&profile).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_contact_email_taken_respects_exclusion() {
        let store = MemoryProfileStore::new();
        let owner = store
            .insert(sections_with_email("Owner@Example.com"))
            .await
            .unwrap();

        assert!(store
            .contact_email_taken("owner@example.com", None)
            .await
            .unwrap());
        assert!(!store
            .contact_email_taken("owner@example.com", Some(owner.id))
            .await
            .unwrap());
        assert!(!store.contact_email_taken("x@y.z", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_keeps_creation_order() {
        let store = MemoryProfileStore::new();
        let a = store.insert(ProfileSections::default()).await.unwrap();
        let b = store.insert(ProfileSections::default()).await.unwrap();
        let ids: Vec<_> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
