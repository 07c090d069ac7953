use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Top-level service settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default)]
    pub server: ListenSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
    #[serde(default)]
    pub metadata: MetadataSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ServerSettings {
    /// Dot-notation keys of required settings that are currently blank.
    pub fn missing_required(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.database.path.trim().is_empty() {
            missing.push("database.path".to_string());
        }
        if self.auth.owner_header.trim().is_empty() {
            missing.push("auth.owner_header".to_string());
        }
        missing
    }
}

/// Address the HTTP server binds to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListenSettings {
    pub host: IpAddr,
    pub port: u16,
}

impl ListenSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
        }
    }
}

/// SQLite storage location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "linkvault.db".to_string(),
        }
    }
}

/// Identity handoff from the upstream auth proxy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthSettings {
    /// Request header carrying the already-verified owner id.
    pub owner_header: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            owner_header: "x-user-id".to_string(),
        }
    }
}

/// Fixed-window admission settings for bookmark creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_ms: u64,
    /// Upper bound on tracked identities; least recently seen are evicted.
    pub max_identities: usize,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window_ms: 60_000,
            max_identities: 10_000,
        }
    }
}

/// Outbound page-metadata fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetadataSettings {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub user_agent: String,
    pub max_body_bytes: usize,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 5_000,
            user_agent: "Mozilla/5.0 (compatible; BookmarkBot/1.0)".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Log output settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "linkvault=info,tower_http=info".to_string(),
        }
    }
}
