//! Key-value persistence for session records.
//!
//! One entry per session token holding the serialized record. Entries are
//! overwritten wholesale on every state change and removed on logout.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::document::FileData;
use crate::models::user::User;

/// Bumped whenever the stored shape changes; `decode_record` migrates older versions.
pub const SCHEMA_VERSION: u64 = 1;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session record could not be decoded: {0}")]
    Corrupt(String),

    #[error("Unsupported session schema version {0}")]
    UnsupportedVersion(u64),

    #[error("Session record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What is stored under a session key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub schema_version: u64,
    pub user: User,
    /// The last résumé uploaded in this session, used as the default optimize input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_file: Option<FileData>,
}

impl SessionRecord {
    pub fn new(user: User) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            user,
            resume_file: None,
        }
    }
}

pub fn encode_record(record: &SessionRecord) -> Result<String, SessionError> {
    Ok(serde_json::to_string(record)?)
}

/// Decodes a stored record, migrating older layouts.
///
/// Version 0 is the unversioned layout: the bare user object.
pub fn decode_record(raw: &str) -> Result<SessionRecord, SessionError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| SessionError::Corrupt(e.to_string()))?;

    let version = match value.get("schemaVersion") {
        None => 0,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| SessionError::Corrupt("schemaVersion is not an integer".to_string()))?,
    };

    match version {
        0 => {
            let user: User =
                serde_json::from_value(value).map_err(|e| SessionError::Corrupt(e.to_string()))?;
            Ok(SessionRecord::new(user))
        }
        SCHEMA_VERSION => {
            serde_json::from_value(value).map_err(|e| SessionError::Corrupt(e.to_string()))
        }
        other => Err(SessionError::UnsupportedVersion(other)),
    }
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    async fn set(&self, key: &str, value: String) -> Result<(), SessionError>;
    async fn delete(&self, key: &str) -> Result<(), SessionError>;
}

/// Redis-backed store over a multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

/// Process-local store. Used when no Redis URL is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SessionError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Plan;
    use serde_json::json;

    #[test]
    fn test_encode_decode_current_version() {
        let mut user = User::new("jane@example.com");
        user.plan = Plan::Basic;
        user.revisions_total = 5;
        let record = SessionRecord::new(user);
        let raw = encode_record(&record).unwrap();
        assert!(raw.contains("\"schemaVersion\":1"));
        assert_eq!(decode_record(&raw).unwrap(), record);
    }

    #[test]
    fn test_unversioned_user_is_migrated() {
        let raw = json!({
            "email": "jane@example.com",
            "plan": "Free",
            "revisionsUsed": 1,
            "revisionsTotal": 1,
            "history": []
        })
        .to_string();
        let record = decode_record(&raw).unwrap();
        assert_eq!(record.schema_version, SCHEMA_VERSION);
        assert_eq!(record.user.email, "jane@example.com");
        assert_eq!(record.user.revisions_used, 1);
        assert!(record.resume_file.is_none());
    }

    #[test]
    fn test_future_version_rejected() {
        let raw = json!({"schemaVersion": 9, "user": {}}).to_string();
        assert!(matches!(
            decode_record(&raw).unwrap_err(),
            SessionError::UnsupportedVersion(9)
        ));
    }

    #[test]
    fn test_incompatible_shape_is_corrupt() {
        let raw = json!({"schemaVersion": 1, "user": {"email": 3}}).to_string();
        assert!(matches!(decode_record(&raw).unwrap_err(), SessionError::Corrupt(_)));
        assert!(matches!(decode_record("{not json").unwrap_err(), SessionError::Corrupt(_)));
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::default();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v1".to_string()).await.unwrap();
        store.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
