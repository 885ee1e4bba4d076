use chrono::{DateTime, Duration, Utc};
use derive_new::new;
use tracing::instrument;

use crate::store::{fetch, put, Result, Store};

pub type Timestamp = DateTime<Utc>;

/// Key of the global view counter.
pub const VIEWS_KEY: &str = "views";

/// Prefix of the per-visitor cooldown keys.
pub const VISITOR_PREFIX: &str = "ip:";

/// Repeated views from the same visitor inside this window are not counted.
pub fn default_cooldown() -> Duration {
    Duration::minutes(30)
}

/// Store key holding the last counted view of `identity`.
///
/// Only the first entry of a comma separated proxy chain identifies the visitor.
pub fn visitor_key(identity: &str) -> String {
    let visitor = identity.split(',').next().unwrap_or_default();
    format!("{VISITOR_PREFIX}{visitor}")
}

/// Counts profile views, at most one per visitor per cooldown window.
///
/// Reads and writes are not coordinated: concurrent first views from one visitor
/// can both be counted.
#[derive(Debug, Clone, new)]
pub struct ViewCounter<S> {
    store: S,
    #[new(value = "default_cooldown()")]
    cooldown: Duration,
}

impl<S> ViewCounter<S> {
    pub fn with_cooldown(store: S, cooldown: Duration) -> Self {
        Self { store, cooldown }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl<S: Store> ViewCounter<S> {
    /// Creates the counter with a value of zero unless it already exists.
    pub async fn init(&self) -> Result<u64> {
        match fetch::<_, u64>(&self.store, VIEWS_KEY).await? {
            Some(views) => Ok(views),
            None => {
                tracing::info!("view counter does not exist yet, starting from zero");
                put(&self.store, VIEWS_KEY, &0u64).await?;
                Ok(0)
            }
        }
    }

    /// Current number of counted views.
    pub async fn count(&self) -> Result<u64> {
        Ok(fetch(&self.store, VIEWS_KEY).await?.unwrap_or(0))
    }

    /// Registers a view from `identity` and returns the total afterwards.
    pub async fn register_view(&self, identity: &str) -> Result<u64> {
        self.register_view_at(identity, Utc::now()).await
    }

    #[instrument(skip(self, identity))]
    pub async fn register_view_at(&self, identity: &str, now: Timestamp) -> Result<u64> {
        let key = visitor_key(identity);
        let now = now.timestamp_millis();

        let last_seen: Option<i64> = fetch(&self.store, &key).await?;
        let is_new_view = match last_seen {
            Some(last_seen) => now - last_seen > self.cooldown.num_milliseconds(),
            None => true,
        };

        if !is_new_view {
            tracing::debug!(visitor = %key, "visitor is still cooling down");
            return self.count().await;
        }

        let views = self.count().await? + 1;
        put(&self.store, VIEWS_KEY, &views).await?;
        put(&self.store, &key, &now).await?;

        let client: String = identity.chars().take(6).collect();
        tracing::info!(client = %client, total = views, "view counted from {client}... (total: {views})");

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    fn counter() -> (ViewCounter<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (ViewCounter::new(store.clone()), store)
    }

    fn at(millis: i64) -> Timestamp {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    const START: i64 = 1_700_000_000_000;
    const COOLDOWN: i64 = 1_800_000;

    #[test]
    fn visitor_key_uses_first_proxy_entry() {
        assert_eq!(visitor_key("203.0.113.7"), "ip:203.0.113.7");
        assert_eq!(visitor_key("203.0.113.7,10.0.0.1"), "ip:203.0.113.7");
        assert_eq!(visitor_key(""), "ip:");
    }

    #[tokio::test]
    async fn init_creates_counter_once() {
        let (counter, store) = counter();

        assert_eq!(counter.init().await.unwrap(), 0);
        assert_eq!(store.get(VIEWS_KEY).await.unwrap(), Some(json!(0)));

        store.set(VIEWS_KEY, json!(12)).await.unwrap();
        assert_eq!(counter.init().await.unwrap(), 12);
        assert_eq!(counter.count().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn count_defaults_to_zero() {
        let (counter, _) = counter();
        assert_eq!(counter.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repeated_views_within_cooldown_count_once() {
        let (counter, _) = counter();

        assert_eq!(counter.register_view_at("198.51.100.4", at(START)).await.unwrap(), 1);
        assert_eq!(counter.register_view_at("198.51.100.4", at(START + 1)).await.unwrap(), 1);
        assert_eq!(
            counter.register_view_at("198.51.100.4", at(START + COOLDOWN)).await.unwrap(),
            1,
            "a view exactly at the end of the window is still cooling down"
        );
        assert_eq!(counter.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn views_after_cooldown_count_again() {
        let (counter, store) = counter();

        counter.register_view_at("198.51.100.4", at(START)).await.unwrap();
        let total = counter
            .register_view_at("198.51.100.4", at(START + COOLDOWN + 1))
            .await
            .unwrap();

        assert_eq!(total, 2);
        assert_eq!(
            store.get("ip:198.51.100.4").await.unwrap(),
            Some(json!(START + COOLDOWN + 1))
        );
    }

    #[tokio::test]
    async fn cooldown_timestamp_is_not_refreshed_by_ignored_views() {
        let (counter, store) = counter();

        counter.register_view_at("198.51.100.4", at(START)).await.unwrap();
        counter.register_view_at("198.51.100.4", at(START + 60_000)).await.unwrap();

        assert_eq!(store.get("ip:198.51.100.4").await.unwrap(), Some(json!(START)));
    }

    #[tokio::test]
    async fn distinct_visitors_are_independent() {
        let (counter, _) = counter();

        for visitor in ["10.0.0.1", "10.0.0.2", "10.0.0.3", "2001:db8::1"] {
            counter.register_view_at(visitor, at(START)).await.unwrap();
        }

        assert_eq!(counter.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn proxy_chain_shares_the_first_entry() {
        let (counter, _) = counter();

        counter.register_view_at("10.0.0.1,172.16.0.1", at(START)).await.unwrap();
        counter.register_view_at("10.0.0.1", at(START + 1)).await.unwrap();

        assert_eq!(counter.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn custom_cooldown() {
        let store = MemoryStore::new();
        let counter = ViewCounter::with_cooldown(store, Duration::seconds(10));

        counter.register_view_at("10.0.0.1", at(START)).await.unwrap();
        counter.register_view_at("10.0.0.1", at(START + 10_001)).await.unwrap();

        assert_eq!(counter.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn continues_from_persisted_count() {
        let (counter, store) = counter();
        store.set(VIEWS_KEY, json!(999)).await.unwrap();

        assert_eq!(counter.register_view_at("10.0.0.1", at(START)).await.unwrap(), 1000);
    }
}
