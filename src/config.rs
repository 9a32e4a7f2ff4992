//! Process configuration from environment variables (after `.env` is loaded).

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub store_backend: StoreBackend,
}

impl Config {
    /// Reads `HOST`, `PORT`, `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `STORE_BACKEND`.
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: get("HOST").and_then(|v| v.parse().ok()).unwrap_or(defaults.host),
            port: get("PORT").and_then(|v| v.parse().ok()).unwrap_or(defaults.port),
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: get("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            store_backend: match get("STORE_BACKEND").as_deref() {
                Some(v) if v.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
                _ => StoreBackend::Postgres,
            },
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            database_url: "postgres://localhost/students".into(),
            max_connections: 5,
            store_backend: StoreBackend::Postgres,
        }
    }
}
