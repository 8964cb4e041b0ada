//! Redis-backed coupon store.
//!
//! Records are JSON strings under `{key_prefix}{serial}`. With an empty
//! prefix the layout matches records written by earlier deployments.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use coupon_common::{CouponRecord, SerialNumber};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{CouponStore, MarkUsed, StoreError, StoreResult};

/// Sets `usedAt` only while it is absent, keeping every other field as stored.
/// Replies `{1, updated}`, `{0, false}` when already used, `{-1, false}` when missing.
const MARK_USED_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
  return {-1, false}
end
local record = cjson.decode(raw)
if record['usedAt'] ~= nil and record['usedAt'] ~= cjson.null then
  return {0, false}
end
record['usedAt'] = ARGV[1]
local updated = cjson.encode(record)
redis.call('SET', KEYS[1], updated)
return {1, updated}
"#;

#[derive(Clone)]
pub struct RedisStore {
    /// Redis connection manager (auto-reconnecting)
    conn: ConnectionManager,
    key_prefix: String,
    mark_used_script: redis::Script,
}

impl RedisStore {
    /// Connect to Redis
    pub async fn connect(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client =
            redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        Ok(Self {
            conn,
            key_prefix: key_prefix.into(),
            mark_used_script: redis::Script::new(MARK_USED_SCRIPT),
        })
    }

    fn key(&self, serial: &SerialNumber) -> String {
        record_key(&self.key_prefix, serial)
    }
}

fn record_key(prefix: &str, serial: &SerialNumber) -> String {
    format!("{}{}", prefix, serial)
}

impl CouponStore for RedisStore {
    async fn get(&self, serial: &SerialNumber) -> StoreResult<Option<CouponRecord>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.key(serial)).await?;

        match raw {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn insert_if_absent(
        &self,
        serial: &SerialNumber,
        record: &CouponRecord,
    ) -> StoreResult<bool> {
        let value = serde_json::to_string(record)?;
        let mut conn = self.conn.clone();

        // SET NX replies OK when written, nil when the key exists
        let reply: Option<String> = redis::cmd("SET")
            .arg(self.key(serial))
            .arg(value)
            .arg("NX")
            .query_async(&mut conn)
            .await?;

        match reply.as_deref() {
            Some("OK") => Ok(true),
            None => Ok(false),
            Some(other) => Err(StoreError::UnexpectedReply(other.to_string())),
        }
    }

    async fn mark_used(
        &self,
        serial: &SerialNumber,
        used_at: DateTime<Utc>,
    ) -> StoreResult<MarkUsed> {
        let mut conn = self.conn.clone();
        let used_at = used_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        let (status, updated): (i64, Option<String>) = self
            .mark_used_script
            .key(self.key(serial))
            .arg(used_at)
            .invoke_async(&mut conn)
            .await?;

        match (status, updated) {
            (1, Some(data)) => Ok(MarkUsed::Marked(serde_json::from_str(&data)?)),
            (0, _) => Ok(MarkUsed::AlreadyUsed),
            (-1, _) => Ok(MarkUsed::Missing),
            (other, _) => Err(StoreError::UnexpectedReply(format!(
                "mark_used status {}",
                other
            ))),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(StoreError::UnexpectedReply(pong))
        }
    }
}
