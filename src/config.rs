use alloy::primitives::Address;
use alloy::transports::http::reqwest::Url;
use displaydoc::Display;
use std::path::Path;
use thiserror::Error;

/// Endpoint for HTTP JSON-RPC requests.
pub const RPC_HTTP_URL: &str = "RPC_HTTP_URL";
/// Endpoint for WebSocket subscriptions.
pub const RPC_WS_URL: &str = "RPC_WS_URL";
/// Hex-encoded private key of the sending account.
pub const PRIVATE_KEY: &str = "PRIVATE_KEY1";
/// Address receiving transfers.
pub const RECIPIENT_ADDRESS: &str = "ACCOUNT_ADDRESS2";

/// Represents errors raised while reading configuration from the environment.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Failed to load .env file: {0}
    DotEnv(String),
    /// Environment variable {0} is not set
    Missing(String),
    /// Environment variable {key} has an invalid value: {reason}
    Invalid { key: String, reason: String },
}

/// Loads a `.env` file from the working directory.
/// A missing file is fine; a file that cannot be parsed is not.
pub fn load_dotenv() -> Result<(), Error> {
    check_dotenv(dotenvy::dotenv().map(|path| path.display().to_string()))
}

/// Loads the env file at `path`, with the same rules as [`load_dotenv`].
pub fn load_dotenv_from(path: &Path) -> Result<(), Error> {
    check_dotenv(dotenvy::from_path(path).map(|()| path.display().to_string()))
}

fn check_dotenv(result: dotenvy::Result<String>) -> Result<(), Error> {
    match result {
        Ok(path) => {
            log::debug!("Loaded environment from {path}");
            Ok(())
        }
        Err(e) if e.not_found() => {
            log::debug!("No .env file found, using process environment only");
            Ok(())
        }
        Err(e) => Err(Error::DotEnv(e.to_string())),
    }
}

/// Returns the value of a required environment variable.
/// Unset and empty variables are both reported as missing.
pub fn env_var(key: &str) -> Result<String, Error> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Missing(key.to_string())),
    }
}

/// Returns the value of an environment variable or the given default.
pub fn env_var_or(key: &str, default: &str) -> String {
    env_var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_url(key: &str, value: &str) -> Result<Url, Error> {
    Url::parse(value).map_err(|e| Error::Invalid {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Derives a WebSocket endpoint from an HTTP one by swapping the scheme.
pub fn ws_url_from_http(http: &Url) -> Result<Url, Error> {
    let scheme = match http.scheme() {
        "https" => "wss",
        "http" => "ws",
        "ws" | "wss" => return Ok(http.clone()),
        other => {
            return Err(Error::Invalid {
                key: RPC_HTTP_URL.to_string(),
                reason: format!("unsupported scheme `{other}`"),
            });
        }
    };
    let mut ws = http.clone();
    ws.set_scheme(scheme).map_err(|_| Error::Invalid {
        key: RPC_HTTP_URL.to_string(),
        reason: format!("cannot switch scheme to `{scheme}`"),
    })?;
    Ok(ws)
}

/// Settings shared by the study programs.
#[derive(Debug, Clone)]
pub struct StudyConfig {
    /// HTTP JSON-RPC endpoint.
    pub rpc_http_url: Url,
    /// WebSocket endpoint, either configured or derived from the HTTP one.
    pub rpc_ws_url: Url,
    private_key: Option<String>,
    recipient: Option<Address>,
}

impl StudyConfig {
    /// Loads `.env` and reads the configuration from the environment.
    pub fn from_env() -> Result<Self, Error> {
        load_dotenv()?;
        Self::from_lookup(|key| env_var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http = lookup(RPC_HTTP_URL).ok_or_else(|| Error::Missing(RPC_HTTP_URL.to_string()))?;
        let rpc_http_url = parse_url(RPC_HTTP_URL, &http)?;
        let rpc_ws_url = match lookup(RPC_WS_URL) {
            Some(ws) => parse_url(RPC_WS_URL, &ws)?,
            None => ws_url_from_http(&rpc_http_url)?,
        };
        let recipient = lookup(RECIPIENT_ADDRESS)
            .map(|value| {
                value.parse::<Address>().map_err(|e| Error::Invalid {
                    key: RECIPIENT_ADDRESS.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            rpc_http_url,
            rpc_ws_url,
            private_key: lookup(PRIVATE_KEY),
            recipient,
        })
    }

    /// Hex-encoded private key of the sending account.
    pub fn private_key(&self) -> Result<&str, Error> {
        self.private_key
            .as_deref()
            .ok_or_else(|| Error::Missing(PRIVATE_KEY.to_string()))
    }

    /// Address receiving transfers.
    pub fn recipient(&self) -> Result<Address, Error> {
        self.recipient
            .ok_or_else(|| Error::Missing(RECIPIENT_ADDRESS.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn derives_ws_url_from_https() {
        let config =
            StudyConfig::from_lookup(lookup(&[(RPC_HTTP_URL, "https://node.example/v2/key")]))
                .unwrap();
        assert_eq!(config.rpc_ws_url.as_str(), "wss://node.example/v2/key");
    }

    #[test]
    fn explicit_ws_url_wins() {
        let config = StudyConfig::from_lookup(lookup(&[
            (RPC_HTTP_URL, "http://localhost:8545"),
            (RPC_WS_URL, "ws://localhost:8546"),
        ]))
        .unwrap();
        assert_eq!(config.rpc_ws_url.port(), Some(8546));
    }

    #[test]
    fn missing_http_url_is_reported_by_name() {
        let err = StudyConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Environment variable RPC_HTTP_URL is not set");
    }

    #[test]
    fn optional_values_error_only_when_used() {
        let config =
            StudyConfig::from_lookup(lookup(&[(RPC_HTTP_URL, "http://localhost:8545")])).unwrap();
        assert!(matches!(config.private_key(), Err(Error::Missing(k)) if k == PRIVATE_KEY));
        assert!(config.recipient().is_err());
    }

    #[test]
    fn rejects_malformed_recipient() {
        let err = StudyConfig::from_lookup(lookup(&[
            (RPC_HTTP_URL, "http://localhost:8545"),
            (RECIPIENT_ADDRESS, "0x1234"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Invalid { key, .. } if key == RECIPIENT_ADDRESS));
    }

    #[test]
    fn missing_env_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dotenv_from(&dir.path().join(".env")).is_ok());
    }

    #[test]
    fn malformed_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "THIS LINE HAS NO ASSIGNMENT\n").unwrap();
        assert!(matches!(load_dotenv_from(&path), Err(Error::DotEnv(_))));
    }

    #[test]
    #[serial]
    fn env_file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "STUDY_CONFIG_TEST_FROM_FILE=loaded\n").unwrap();
        load_dotenv_from(&path).unwrap();
        assert_eq!(env_var("STUDY_CONFIG_TEST_FROM_FILE").unwrap(), "loaded");
    }

    #[test]
    #[serial]
    fn empty_variable_counts_as_missing() {
        // SAFETY: env-mutating tests are serialized.
        unsafe { std::env::set_var("STUDY_CONFIG_TEST_EMPTY", "") };
        let err = env_var("STUDY_CONFIG_TEST_EMPTY").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Environment variable STUDY_CONFIG_TEST_EMPTY is not set"
        );
        assert_eq!(env_var_or("STUDY_CONFIG_TEST_EMPTY", "fallback"), "fallback");
        assert_eq!(env_var_or("STUDY_CONFIG_TEST_UNSET", "fallback"), "fallback");
    }

    #[test]
    #[serial]
    fn from_env_ignores_empty_ws_url() {
        // SAFETY: env-mutating tests are serialized.
        unsafe {
            std::env::set_var(RPC_HTTP_URL, "https://node.example/v2/key");
            std::env::set_var(RPC_WS_URL, "");
        }
        let config = StudyConfig::from_env().unwrap();
        assert_eq!(config.rpc_ws_url.as_str(), "wss://node.example/v2/key");
        unsafe {
            std::env::remove_var(RPC_HTTP_URL);
            std::env::remove_var(RPC_WS_URL);
        }
    }

    #[test]
    fn ws_url_rejects_other_schemes() {
        let url = Url::parse("ipc:///tmp/geth.ipc").unwrap();
        assert!(ws_url_from_http(&url).is_err());
    }
}
