//! Draft storage — a key-value store for user-authored message templates.
//!
//! `RedisDraftStore` is used whenever `REDIS_URL` is configured;
//! `MemoryDraftStore` covers local runs and tests.
//!
//! Layout in Redis:
//! - `draft:{id}` → JSON-encoded `MessageDraft`, expiring after the configured TTL
//! - `drafts:owner:{owner_id}` → set of draft ids

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::messages::templates::Channel;
use crate::spintax::validate;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt draft payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub channel: Channel,
    pub title: String,
    pub subject: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a draft.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftInput {
    pub owner_id: Uuid,
    pub channel: Channel,
    pub title: String,
    pub subject: Option<String>,
    pub body: String,
}

/// Rejects a draft that is empty or fails spintax validation.
///
/// Subject errors are prefixed so the author can tell them apart from
/// body errors.
pub fn check_draft(input: &DraftInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if input.body.trim().is_empty() {
        return Err(AppError::Validation("body cannot be empty".to_string()));
    }

    let mut errors = validate(&input.body).errors;
    if let Some(subject) = &input.subject {
        errors.extend(
            validate(subject)
                .errors
                .into_iter()
                .map(|e| format!("Subject: {e}")),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidTemplate(errors))
    }
}

impl MessageDraft {
    pub fn create(input: DraftInput) -> Self {
        let now = Utc::now();
        MessageDraft {
            id: Uuid::new_v4(),
            owner_id: input.owner_id,
            channel: input.channel,
            title: input.title,
            subject: input.subject,
            body: input.body,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the editable fields, keeping identity and creation time.
    pub fn replace(&mut self, input: DraftInput) {
        self.channel = input.channel;
        self.title = input.title;
        self.subject = input.subject;
        self.body = input.body;
        self.updated_at = Utc::now();
    }
}

/// Persistence for drafts. Carried in `AppState` as `Arc<dyn DraftStore>`.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn save(&self, draft: &MessageDraft) -> Result<(), StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<MessageDraft>, StoreError>;
    /// Drafts of one owner, most recently updated first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<MessageDraft>, StoreError>;
    /// Returns whether a draft was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

fn sort_newest_first(drafts: &mut [MessageDraft]) {
    drafts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisDraftStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisDraftStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    fn draft_key(id: impl std::fmt::Display) -> String {
        format!("draft:{id}")
    }

    fn owner_key(owner_id: Uuid) -> String {
        format!("drafts:owner:{owner_id}")
    }
}

#[async_trait]
impl DraftStore for RedisDraftStore {
    async fn save(&self, draft: &MessageDraft) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(draft)?;

        conn.set_ex::<_, _, ()>(Self::draft_key(draft.id), payload, self.ttl_secs)
            .await?;
        conn.sadd::<_, _, ()>(Self::owner_key(draft.owner_id), draft.id.to_string())
            .await?;

        debug!("Saved draft {} for owner {}", draft.id, draft.owner_id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<MessageDraft>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(Self::draft_key(id)).await?;
        Ok(payload
            .map(|p| serde_json::from_str(&p))
            .transpose()?)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<MessageDraft>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let ids: Vec<String> = conn.smembers(Self::owner_key(owner_id)).await?;

        let mut drafts = Vec::with_capacity(ids.len());
        let mut expired = Vec::new();
        for id in ids {
            let payload: Option<String> = conn.get(Self::draft_key(&id)).await?;
            match payload {
                Some(p) => drafts.push(serde_json::from_str::<MessageDraft>(&p)?),
                None => expired.push(id),
            }
        }

        // Index entries outlive their drafts once the TTL fires.
        if !expired.is_empty() {
            info!(
                "Pruning {} expired draft ids for owner {owner_id}",
                expired.len()
            );
            conn.srem::<_, _, ()>(Self::owner_key(owner_id), expired)
                .await?;
        }

        sort_newest_first(&mut drafts);
        Ok(drafts)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let Some(draft) = self.get(id).await? else {
            return Ok(false);
        };
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let removed: u32 = conn.del(Self::draft_key(id)).await?;
        conn.srem::<_, _, ()>(Self::owner_key(draft.owner_id), id.to_string())
            .await?;
        Ok(removed > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Drafts do not expire and vanish on restart.
#[derive(Default)]
pub struct MemoryDraftStore {
    drafts: RwLock<HashMap<Uuid, MessageDraft>>,
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save(&self, draft: &MessageDraft) -> Result<(), StoreError> {
        self.drafts.write().await.insert(draft.id, draft.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<MessageDraft>, StoreError> {
        Ok(self.drafts.read().await.get(&id).cloned())
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<MessageDraft>, StoreError> {
        let mut drafts: Vec<_> = self
            .drafts
            .read()
            .await
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        sort_newest_first(&mut drafts);
        Ok(drafts)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.drafts.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(owner_id: Uuid, body: &str) -> DraftInput {
        DraftInput {
            owner_id,
            channel: Channel::Whatsapp,
            title: "Follow-up".to_string(),
            subject: None,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_check_draft_accepts_valid_template() {
        assert!(check_draft(&input(Uuid::new_v4(), "{Hi|Hello} [name]")).is_ok());
    }

    #[test]
    fn test_check_draft_rejects_invalid_template() {
        let err = check_draft(&input(Uuid::new_v4(), "{Hi|{Hello|Hey}}")).unwrap_err();
        match err {
            AppError::InvalidTemplate(errors) => {
                assert_eq!(errors, vec!["Nested spintax is not supported"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_draft_prefixes_subject_errors() {
        let mut draft = input(Uuid::new_v4(), "{Hi|Hello}");
        draft.channel = Channel::Email;
        draft.subject = Some("{ | }".to_string());
        match check_draft(&draft).unwrap_err() {
            AppError::InvalidTemplate(errors) => {
                assert_eq!(errors, vec!["Subject: Empty spintax options found"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_draft_rejects_blank_fields() {
        let mut draft = input(Uuid::new_v4(), "   ");
        assert!(matches!(check_draft(&draft), Err(AppError::Validation(_))));
        draft.body = "Hi".to_string();
        draft.title = String::new();
        assert!(matches!(check_draft(&draft), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_replace_keeps_identity() {
        let owner = Uuid::new_v4();
        let mut draft = MessageDraft::create(input(owner, "{a|b}"));
        let (id, created) = (draft.id, draft.created_at);
        draft.replace(input(owner, "{c|d}"));
        assert_eq!(draft.id, id);
        assert_eq!(draft.created_at, created);
        assert_eq!(draft.body, "{c|d}");
        assert!(draft.updated_at >= created);
    }

    #[test]
    fn test_redis_keys_share_one_layout() {
        let id = Uuid::new_v4();
        assert_eq!(RedisDraftStore::draft_key(id), format!("draft:{id}"));
        assert_eq!(
            RedisDraftStore::draft_key(id.to_string()),
            RedisDraftStore::draft_key(id)
        );
        assert_eq!(RedisDraftStore::owner_key(id), format!("drafts:owner:{id}"));
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryDraftStore::default();
        let owner = Uuid::new_v4();
        let draft = MessageDraft::create(input(owner, "{Hi|Hello}"));

        store.save(&draft).await.unwrap();
        assert_eq!(store.get(draft.id).await.unwrap(), Some(draft.clone()));

        assert!(store.delete(draft.id).await.unwrap());
        assert!(!store.delete(draft.id).await.unwrap());
        assert_eq!(store.get(draft.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_lists_owner_drafts_newest_first() {
        let store = MemoryDraftStore::default();
        let owner = Uuid::new_v4();

        let mut older = MessageDraft::create(input(owner, "{a|b}"));
        older.updated_at = older.updated_at - chrono::Duration::minutes(5);
        let newer = MessageDraft::create(input(owner, "{c|d}"));
        let other = MessageDraft::create(input(Uuid::new_v4(), "{e|f}"));

        for d in [&older, &newer, &other] {
            store.save(d).await.unwrap();
        }

        let listed = store.list_for_owner(owner).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
