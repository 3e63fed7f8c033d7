use crate::Result;
use anyhow::ensure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person in the household to whom transactions can be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Member {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewMember {
    pub user_id: String,
    pub name: String,
}

impl NewMember {
    /// Creates a member request with a trimmed `name`.
    pub fn new(user_id: impl Into<String>, name: impl AsRef<str>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.as_ref().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.user_id.trim().is_empty(), "A member requires a user id");
        ensure!(!self.name.is_empty(), "A member requires a name");
        Ok(())
    }
}
