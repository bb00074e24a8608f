use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_PRIMARY_TIMEOUT_SECS: u64 = 90;

/// Application configuration loaded from environment variables.
/// Nothing is required; without a token the primary source is disabled.
#[derive(Debug, Clone)]
pub struct Config {
    pub hf_access_token: Option<String>,
    pub port: u16,
    /// Budget for one primary-source call, retries included.
    pub primary_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            hf_access_token: optional_env("HF_ACCESS_TOKEN"),
            port: match optional_env("SERVER_PORT").or_else(|| optional_env("PORT")) {
                Some(port) => port
                    .parse::<u16>()
                    .context("SERVER_PORT must be a valid port number")?,
                None => DEFAULT_PORT,
            },
            primary_timeout_secs: match optional_env("PRIMARY_TIMEOUT_SECS") {
                Some(secs) => secs
                    .parse::<u64>()
                    .context("PRIMARY_TIMEOUT_SECS must be a whole number of seconds")?,
                None => DEFAULT_PRIMARY_TIMEOUT_SECS,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Fallback `EnvFilter` directives when `RUST_LOG` holds no filter:
    /// this binary's own events plus HTTP request traces.
    pub fn log_directives(&self) -> String {
        format!(
            "{crate_name}={level},tower_http={level}",
            crate_name = env!("CARGO_CRATE_NAME"),
            level = self.rust_log
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hf_access_token: None,
            port: DEFAULT_PORT,
            primary_timeout_secs: DEFAULT_PRIMARY_TIMEOUT_SECS,
            rust_log: "info".to_string(),
        }
    }
}

/// Unset and blank values both read as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directives_target_this_crate() {
        let directives = Config::default().log_directives();
        let crate_root = module_path!().split("::").next().unwrap();
        assert_eq!(directives, format!("{crate_root}=info,tower_http=info"));
    }

    #[test]
    fn test_log_directives_use_configured_level() {
        let config = Config {
            rust_log: "debug".to_string(),
            ..Config::default()
        };
        assert!(config.log_directives().ends_with("=debug,tower_http=debug"));
    }
}
