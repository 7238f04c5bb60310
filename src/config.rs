/*
 * Responsibility
 * - 環境変数の読み込み (PORT, EXT_AUTHZ_TRANSPORT, APP_ENV など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Wire binding the Check procedure is served on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Envoy ext_authz v3 gRPC (`envoy.service.auth.v3.Authorization/Check`).
    Grpc,
    /// Envoy HTTP ext_authz: every request is a Check.
    Http,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Grpc => f.write_str("grpc"),
            Transport::Http => f.write_str("http"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub transport: Transport,
    // Per-call bound on the HTTP binding.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let transport = match lookup("EXT_AUTHZ_TRANSPORT")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("grpc") => Transport::Grpc,
            Some("http") => Transport::Http,
            Some(_) => return Err(ConfigError::Invalid("EXT_AUTHZ_TRANSPORT")),
        };

        let timeout_seconds = match lookup("EXT_AUTHZ_REQUEST_TIMEOUT_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid("EXT_AUTHZ_REQUEST_TIMEOUT_SECONDS"))?,
            None => DEFAULT_REQUEST_TIMEOUT_SECONDS,
        };

        Ok(Self {
            addr,
            app_env,
            transport,
            request_timeout: Duration::from_secs(timeout_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.addr, "0.0.0.0:4000".parse().unwrap());
        assert_eq!(config.transport, Transport::Grpc);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("PORT", "9191"),
            ("EXT_AUTHZ_TRANSPORT", "HTTP"),
            ("APP_ENV", "prod"),
            ("EXT_AUTHZ_REQUEST_TIMEOUT_SECONDS", "5"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 9191);
        assert_eq!(config.transport, Transport::Http);
        assert!(config.app_env.is_production());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            load(&[("PORT", "not-a-port")]).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
        assert_eq!(
            load(&[("EXT_AUTHZ_TRANSPORT", "websocket")]).unwrap_err(),
            ConfigError::Invalid("EXT_AUTHZ_TRANSPORT")
        );
        assert_eq!(
            load(&[("EXT_AUTHZ_REQUEST_TIMEOUT_SECONDS", "0")]).unwrap_err(),
            ConfigError::Invalid("EXT_AUTHZ_REQUEST_TIMEOUT_SECONDS")
        );
    }
}
