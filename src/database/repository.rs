use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Creation, CreationRow, NewCreation};

/// Append-only store of creation records.
///
/// Records are inserted once per successful operation and never updated or
/// deleted through this trait.
#[async_trait]
pub trait CreationStore: Send + Sync {
    /// Append one creation record
    async fn record(&self, creation: NewCreation) -> Result<(), DatabaseError>;

    /// All creations of one user, newest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Creation>, DatabaseError>;

    /// Creations flagged for publication, newest first
    async fn list_published(&self) -> Result<Vec<Creation>, DatabaseError>;

    /// Connectivity probe used by /health
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Postgres-backed creation store
pub struct PgCreationStore {
    pool: PgPool,
}

impl PgCreationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreationStore for PgCreationStore {
    async fn record(&self, creation: NewCreation) -> Result<(), DatabaseError> {
        let query = r#"
            INSERT INTO creations (id, user_id, prompt, content, type, publish)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#;

        sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(&creation.user_id)
            .bind(&creation.prompt)
            .bind(&creation.content)
            .bind(creation.kind.as_str())
            .bind(creation.publish)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Creation>, DatabaseError> {
        let query = r#"
            SELECT id, user_id, prompt, content, type, publish, created_at
            FROM creations
            WHERE user_id = $1
            ORDER BY created_at DESC
        "#;

        let rows: Vec<CreationRow> = sqlx::query_as(query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Creation::try_from).collect()
    }

    async fn list_published(&self) -> Result<Vec<Creation>, DatabaseError> {
        let query = r#"
            SELECT id, user_id, prompt, content, type, publish, created_at
            FROM creations
            WHERE publish = TRUE
            ORDER BY created_at DESC
        "#;

        let rows: Vec<CreationRow> = sqlx::query_as(query).fetch_all(&self.pool).await?;

        rows.into_iter().map(Creation::try_from).collect()
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
