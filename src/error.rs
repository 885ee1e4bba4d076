use std::net::SocketAddr;
use std::path::PathBuf;

use snafu::{Location, Snafu};

use crate::store::StoreError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApplicationError {
    /// could not parse the configuration from the environment
    #[snafu(display("could not load the configuration at {location}: {source}"))]
    ConfigLoad {
        source: envy::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// The configured cooldown does not fit in a duration
    #[snafu(display("COOLDOWN_SECS={secs} is out of range"))]
    CooldownRange {
        secs: u64,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not create the directory that holds the on-disk store
    #[snafu(display("could not create the data directory `{}`: {source}", path.display()))]
    DataDir {
        path: PathBuf,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("could not connect to the store at {location}: {source}"))]
    ConnectStore {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not make sure the view counter exists before serving
    #[snafu(display("could not initialize the view counter at {location}: {source}"))]
    InitializeCounter {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("could not load the page templates at {location}: {source}"))]
    LoadTemplates {
        source: tera::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not serve the application
    #[snafu(display("the web server stopped unexpectedly at {location}: {source}"))]
    WebServer {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not bind to the given address, check if it's already in use
    #[snafu(display("could not bind to `{address}`: {source}"))]
    BindAddress {
        address: SocketAddr,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not initialize the logger
    #[snafu(display("could not initialize the logger: {source}"))]
    InitializeLogger {
        source: tracing::subscriber::SetGlobalDefaultError,
        #[snafu(implicit)]
        location: Location,
    },
}
