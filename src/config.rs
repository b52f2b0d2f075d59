//! Runtime configuration, read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `5000` |
//! | `UPSTREAM_URL` | `https://hor-769y.onrender.com` |
//! | `UPSTREAM_TIMEOUT_SECS` | unset (no timeout) |
//! | `LOG_FORMAT` | `compact` (or `json`) |
//!
//! The server always binds all interfaces.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_UPSTREAM_URL: &str = "https://hor-769y.onrender.com";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    #[serde(default)]
    pub upstream_timeout_secs: Option<u64>,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Shape of log lines on stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

fn default_port() -> u16 { DEFAULT_PORT }
fn default_upstream_url() -> String { DEFAULT_UPSTREAM_URL.to_owned() }

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::load(None)
    }

    /// Reads the given variables instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, Error> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self, Error> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .source(vars.map(|v| v.into_iter().collect())),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_vars(HashMap::new()).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(cfg.upstream_timeout(), None);
        assert_eq!(cfg.log_format, LogFormat::Compact);
        assert_eq!(cfg.addr(), "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn reads_uppercase_variables() {
        let cfg = Config::from_vars(vars(&[
            ("PORT", "8080"),
            ("UPSTREAM_URL", "http://127.0.0.1:9000"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.upstream_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.upstream_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn log_format_comes_from_config() {
        let cfg = Config::from_vars(vars(&[("LOG_FORMAT", "json")])).unwrap();
        assert_eq!(cfg.log_format, LogFormat::Json);

        let err = Config::from_vars(vars(&[("LOG_FORMAT", "yaml")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = Config::from_vars(vars(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
