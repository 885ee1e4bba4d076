use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::ResultExt;
use surrealdb::{engine::any::Any, Surreal};

use super::{ConnectionSnafu, DecodeSnafu, EncodeSnafu, QuerySnafu, Result, Store};

const NAMESPACE: &str = "profile_views";
const DATABASE: &str = "profile_views";
const TABLE: &str = "kv";

/// Store backed by an embedded surrealdb instance.
///
/// Every key is a record of the `kv` table, its value is kept as a JSON string.
#[derive(Debug, Clone)]
pub struct SurrealStore {
    database: Surreal<Any>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    value: String,
}

impl SurrealStore {
    /// Connects to `endpoint`, e.g. `surrealkv://data` or `mem://`.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let database = surrealdb::engine::any::connect(endpoint)
            .await
            .context(ConnectionSnafu { endpoint })?;

        database
            .use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .context(ConnectionSnafu { endpoint })?;

        tracing::debug!(endpoint, "connected to the store");

        Ok(Self { database })
    }
}

impl Store for SurrealStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let entry: Option<Entry> = self
            .database
            .select((TABLE, key.to_owned()))
            .await
            .context(QuerySnafu { key })?;

        entry
            .map(|entry| serde_json::from_str(&entry.value).context(DecodeSnafu { key }))
            .transpose()
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let value = serde_json::to_string(&value).context(EncodeSnafu { key })?;

        // updating a specific record creates it when it does not exist yet
        let _: Option<Entry> = self
            .database
            .update((TABLE, key.to_owned()))
            .content(Entry { value })
            .await
            .context(QuerySnafu { key })?;

        Ok(())
    }
}
