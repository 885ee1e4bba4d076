use snafu::{Location, Snafu};

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("cannot connect to the store `{endpoint}` at {location}: {source}"))]
    Connection {
        endpoint: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to query key `{key}` at {location}: {source}"))]
    Query {
        key: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to encode the value of key `{key}` at {location}: {source}"))]
    Encode {
        key: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("value of key `{key}` is malformed at {location}: {source}"))]
    Decode {
        key: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },
}
