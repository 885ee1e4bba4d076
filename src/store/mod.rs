//! Key-value persistence for the counter and the visitor cooldowns.
//!
//! Values are plain JSON. The layout used by the rest of the crate is
//!
//! ```text
//! views          → integer, the total number of counted views
//! ip:<identity>  → integer, milliseconds since epoch of the last counted view
//! ```

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use snafu::ResultExt;

pub use error::*;
pub use memory::MemoryStore;
pub use surreal::SurrealStore;

mod error;
mod memory;
mod surreal;

/// A durable mapping from string keys to JSON values.
pub trait Store: Clone + Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<()>> + Send;
}

/// Reads `key` and deserializes it into `T`.
pub async fn fetch<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: Store,
    T: DeserializeOwned,
{
    store
        .get(key)
        .await?
        .map(|value| serde_json::from_value(value).context(DecodeSnafu { key }))
        .transpose()
}

/// Serializes `value` and writes it under `key`.
pub async fn put<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: Store,
    T: Serialize + Sync,
{
    let value = serde_json::to_value(value).context(EncodeSnafu { key })?;
    store.set(key, value).await
}
