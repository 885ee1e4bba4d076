use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use snafu::{OptionExt, ResultExt};

use crate::badge::DEFAULT_COLOR;
use crate::error::{ApplicationError, ConfigLoadSnafu, CooldownRangeSnafu};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory of the on-disk store, relative to the working directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Overrides the store location derived from `data_dir`, e.g. `mem://`.
    #[serde(default)]
    pub store_endpoint: Option<String>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_badge_color")]
    pub badge_color: String,
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_cooldown_secs() -> u64 {
    30 * 60
}

fn default_badge_color() -> String {
    DEFAULT_COLOR.to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: default_port(),
            data_dir: default_data_dir(),
            store_endpoint: None,
            log_dir: None,
            cooldown_secs: default_cooldown_secs(),
            badge_color: default_badge_color(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        envy::from_env::<Config>().context(ConfigLoadSnafu)
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// The surrealdb endpoint the store connects to.
    pub fn store_endpoint(&self) -> String {
        match &self.store_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("surrealkv://{}", self.data_dir.display()),
        }
    }

    /// Whether the store lives in `data_dir` and the directory has to exist.
    pub fn uses_data_dir(&self) -> bool {
        self.store_endpoint.is_none()
    }

    /// Fails when `cooldown_secs` does not fit in a [chrono::Duration].
    pub fn cooldown(&self) -> Result<chrono::Duration, ApplicationError> {
        let secs = self.cooldown_secs;
        i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .context(CooldownRangeSnafu { secs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Config {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn defaults_without_environment() {
        let config = parse(&[]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.address(), "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.store_endpoint(), "surrealkv://data");
        assert!(config.uses_data_dir());
        assert_eq!(config.cooldown().unwrap().num_milliseconds(), 1_800_000);
        assert_eq!(config.badge_color, "007ec6");
        assert_eq!(config.log_dir, None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = parse(&[
            ("PORT", "8080"),
            ("DATA_DIR", "/var/lib/views"),
            ("COOLDOWN_SECS", "60"),
            ("BADGE_COLOR", "97ca00"),
            ("LOG_DIR", "logs"),
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.store_endpoint(), "surrealkv:///var/lib/views");
        assert_eq!(config.cooldown().unwrap(), chrono::Duration::minutes(1));
        assert_eq!(config.badge_color, "97ca00");
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn explicit_endpoint_skips_data_dir() {
        let config = parse(&[("STORE_ENDPOINT", "mem://")]);

        assert_eq!(config.store_endpoint(), "mem://");
        assert!(!config.uses_data_dir());
    }

    #[test]
    fn out_of_range_cooldown_is_an_error() {
        for secs in [u64::MAX.to_string(), i64::MAX.to_string()] {
            let config = parse(&[("COOLDOWN_SECS", secs.as_str())]);
            let result = config.cooldown();

            assert!(
                matches!(result, Err(ApplicationError::CooldownRange { secs: ref got, .. }) if got.to_string() == secs),
                "expected a range error for {secs}, got {result:?}"
            );
        }
    }

    #[test]
    fn largest_cooldown_in_range() {
        let config = parse(&[("COOLDOWN_SECS", "9223372036854775")]);
        assert_eq!(config.cooldown().unwrap().num_seconds(), 9_223_372_036_854_775);
    }

    #[test]
    fn rejects_invalid_port() {
        let vars = vec![("PORT".to_string(), "not-a-port".to_string())];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }
}
