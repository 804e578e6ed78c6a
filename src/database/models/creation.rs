use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::types::CreationKind;

/// A persisted creation, as returned by the listing endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creation {
    pub id: Uuid,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: CreationKind,
    pub publish: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw row shape of the creations table
#[derive(Debug, Clone, FromRow)]
pub struct CreationRow {
    pub id: Uuid,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub publish: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CreationRow> for Creation {
    type Error = DatabaseError;

    fn try_from(row: CreationRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse().map_err(DatabaseError::InvalidRow)?;
        Ok(Creation {
            id: row.id,
            user_id: row.user_id,
            prompt: row.prompt,
            content: row.content,
            kind,
            publish: row.publish,
            created_at: row.created_at,
        })
    }
}

/// A creation about to be appended. Built by the creation service once the
/// provider call has succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCreation {
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    pub kind: CreationKind,
    pub publish: bool,
}
