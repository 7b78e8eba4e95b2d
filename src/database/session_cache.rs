use crate::error::app_error::AppError;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use uuid::Uuid;

const KEY_PREFIX: &str = "refresh:";

fn session_key(token_id: &Uuid) -> String {
    format!("{}{}", KEY_PREFIX, token_id)
}

/// TTL-based store of currently-valid refresh token ids. Keys expire on
/// their own; `revoke` is a single atomic delete so that of two racing
/// rotations of the same token exactly one succeeds.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn store(&self, token_id: &Uuid) -> Result<(), AppError>;
    async fn revoke(&self, token_id: &Uuid) -> Result<bool, AppError>;
    async fn active_sessions(&self) -> Result<u64, AppError>;
}

pub struct RedisSessionCache {
    manager: ConnectionManager,
    ttl: Duration,
}

impl RedisSessionCache {
    pub fn new(manager: ConnectionManager, ttl: Duration) -> Self {
        Self { manager, ttl }
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionCache {
    async fn store(&self, token_id: &Uuid) -> Result<(), AppError> {
        let mut connection = self.manager.clone();
        let _: () = connection.set_ex(session_key(token_id), "0", self.ttl.as_secs()).await?;

        Ok(())
    }

    async fn revoke(&self, token_id: &Uuid) -> Result<bool, AppError> {
        let mut connection = self.manager.clone();
        let removed: u64 = connection.del(session_key(token_id)).await?;

        Ok(removed > 0)
    }

    /// Counts live refresh entries with an incremental SCAN so the count
    /// never blocks the server the way a full KEYS sweep would.
    async fn active_sessions(&self) -> Result<u64, AppError> {
        let mut connection = self.manager.clone();
        let pattern = format!("{}*", KEY_PREFIX);
        let mut cursor: u64 = 0;
        let mut count: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut connection)
                .await?;

            count += keys.len() as u64;
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_keys_are_namespaced_by_token_id() {
        let token_id = Uuid::new_v4();
        let key = session_key(&token_id);
        assert!(key.starts_with("refresh:"));
        assert!(key.ends_with(&token_id.to_string()));
    }

    #[tokio::test]
    #[ignore = "requires redis"]
    async fn store_count_and_revoke_round_trip() {
        let client = redis::Client::open("redis://127.0.0.1:6379").expect("valid redis url");
        let manager = client.get_connection_manager().await.expect("redis connection");
        let cache = RedisSessionCache::new(manager, Duration::from_secs(60));

        let token_id = Uuid::new_v4();
        cache.store(&token_id).await.unwrap();
        assert!(cache.active_sessions().await.unwrap() >= 1);

        assert!(cache.revoke(&token_id).await.unwrap());
        assert!(!cache.revoke(&token_id).await.unwrap());
    }
}
