use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const DEFAULT_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub model: ModelConfig,
    pub web: WebFetchConfig,
}

#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub api_base: String,
    pub model_id: String,
}

/// Policy for generic web page fetches.
#[derive(Clone, Debug)]
pub struct WebFetchConfig {
    pub user_agent: String,
    /// Certificate verification is off unless `WEB_VERIFY_TLS` turns it on.
    pub verify_tls: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for WebFetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verify_tls: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = var("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        let model = ModelConfig {
            api_base: var("GROQ_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model_id: var("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        };
        if url::Url::parse(&model.api_base).is_err() {
            return Err(AppError::ConfigError(format!("Invalid GROQ_API_BASE: {}", model.api_base)));
        }

        let web = WebFetchConfig {
            user_agent: var("WEB_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            verify_tls: match var("WEB_VERIFY_TLS") {
                Some(value) => parse_bool(&value)
                    .ok_or_else(|| AppError::ConfigError(format!("Invalid WEB_VERIFY_TLS: {}", value)))?,
                None => false,
            },
        };

        Ok(Config {
            server_addr,
            model,
            web,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parses_boolean_flags() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" On "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn web_fetch_defaults_are_relaxed() {
        let web = WebFetchConfig::default();
        assert!(!web.verify_tls);
        assert_eq!(web.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.model.model_id, DEFAULT_MODEL);
        assert_eq!(config.model.api_base, DEFAULT_API_BASE);
        assert_eq!(config.web.user_agent, DEFAULT_USER_AGENT);
        assert!(!config.web.verify_tls);
    }

    #[test]
    fn environment_overrides_model_and_web_policy() {
        let config = from_vars(&[
            ("GROQ_MODEL", "mixtral-8x7b-32768"),
            ("WEB_USER_AGENT", " summarizer-test/1.0 "),
            ("WEB_VERIFY_TLS", "true"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.model.model_id, "mixtral-8x7b-32768");
        assert_eq!(config.web.user_agent, "summarizer-test/1.0");
        assert!(config.web.verify_tls);
        assert_eq!(config.server_addr.port(), 8080);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = from_vars(&[("GROQ_MODEL", "  "), ("WEB_VERIFY_TLS", "")]).unwrap();
        assert_eq!(config.model.model_id, DEFAULT_MODEL);
        assert!(!config.web.verify_tls);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for vars in [
            [("WEB_VERIFY_TLS", "sometimes")],
            [("PORT", "http")],
            [("GROQ_API_BASE", "not a url")],
        ] {
            assert!(matches!(from_vars(&vars), Err(AppError::ConfigError(_))));
        }
    }
}
