use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{ProfileStore, StoreError};
use crate::models::profile::{Profile, ProfileSections};

/// Profiles stored one row per document, sections as a single JSONB value.
#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    sections: Json<ProfileSections>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            sections: row.sections.0,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "id, sections, version, created_at, updated_at";

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {COLUMNS} FROM profiles ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn insert(&self, sections: ProfileSections) -> Result<Profile, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "INSERT INTO profiles (id, sections) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(Json(&sections))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn save(&self, profile: &Profile) -> Result<Profile, StoreError> {
        // Conditional on the loaded version; no row back means stale or gone.
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            UPDATE profiles
            SET sections = $2, version = version + 1, updated_at = now()
            WHERE id = $1 AND version = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(Json(&profile.sections))
        .bind(profile.version)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM profiles WHERE id = $1)")
                        .bind(profile.id)
                        .fetch_one(&self.pool)
                        .await?;
                if exists {
                    Err(StoreError::Conflict(profile.id))
                } else {
                    Err(StoreError::NotFound)
                }
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "DELETE FROM profiles WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn contact_email_taken(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        Ok(sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM profiles p,
                     jsonb_array_elements(COALESCE(p.sections->'contact', '[]'::jsonb)) AS c
                WHERE lower(trim(c->>'email')) = $1
                  AND ($2::uuid IS NULL OR p.id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}
