//! Client runtime configuration.
//!
//! Resolved once at process startup and passed into [`crate::PiesClient`]; nothing reads the
//! environment while requests are in flight.

use crate::{ClientError, ClientResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_FILE: &str = ".pies/session.json";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: String,
    session_file: PathBuf,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        session_file: PathBuf,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("base url {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base url {base_url:?} must be http or https"
            )));
        }
        if timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            base_url,
            session_file,
            timeout,
        })
    }

    /// Reads `PIES_API_URL`, `PIES_SESSION_FILE` and `PIES_HTTP_TIMEOUT_SECS`, falling back to
    /// the defaults.
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var("PIES_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let session_file = match std::env::var("PIES_SESSION_FILE") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_SESSION_FILE),
        };

        let timeout_secs = match std::env::var("PIES_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ClientError::InvalidConfig(format!("PIES_HTTP_TIMEOUT_SECS {raw:?}: {e}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self::new(base_url, session_file, Duration::from_secs(timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let cfg = ClientConfig::new(
            "http://localhost:8080/",
            PathBuf::from("s.json"),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(cfg.base_url(), "http://localhost:8080");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ClientConfig::new("localhost", PathBuf::from("s"), Duration::from_secs(5)).is_err());
        assert!(
            ClientConfig::new("ftp://host", PathBuf::from("s"), Duration::from_secs(5)).is_err()
        );
        assert!(ClientConfig::new(DEFAULT_API_URL, PathBuf::from("s"), Duration::ZERO).is_err());
    }
}
