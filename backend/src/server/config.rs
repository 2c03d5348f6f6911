//! Server settings and the HTTP server configuration derived from them.
//!
//! Settings load through OrthoConfig from CLI flags, `SKYMARKET_*`
//! environment variables and config files.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use skymarket::outbound::persistence::PoolConfig;
use tracing::warn;
use zeroize::Zeroize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

/// Configuration values controlling the server at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SKYMARKET")]
pub struct ServerSettings {
    /// Socket address to listen on; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without one the process keeps data in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_size: Option<u32>,
    /// File holding at least 64 bytes of session key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`; defaults to true.
    pub cookie_secure: Option<bool>,
    /// Accept a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_key: bool,
    /// Administrator ensured at startup, paired with `admin_password`.
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

/// Administrator account requested by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

/// Errors raised while turning settings into a runnable configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("admin_username and admin_password must be set together")]
    IncompleteAdmin,
}

/// Build mode for session key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a generated key.
    Debug,
    /// Release builds require a key file unless ephemeral keys are allowed.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }

    /// Pool settings when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().map(str::trim)?;
        if url.is_empty() {
            return None;
        }
        Some(PoolConfig::new(url).with_max_size(self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)))
    }

    /// Administrator to ensure at startup, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IncompleteAdmin`] when only one of the two
    /// credentials is present.
    pub fn admin_bootstrap(&self) -> Result<Option<AdminBootstrap>, ConfigError> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) => Ok(Some(AdminBootstrap {
                username: username.clone(),
                password: password.clone(),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::IncompleteAdmin),
        }
    }

    /// Load the session signing key named by these settings.
    ///
    /// # Errors
    ///
    /// Fails when the key file is shorter than 64 bytes, or unreadable in a
    /// release build that does not allow ephemeral keys.
    pub fn session_key(&self, mode: BuildMode) -> Result<Key, ConfigError> {
        let path = self.session_key_file();
        match std::fs::read(&path) {
            Ok(bytes) => key_from_bytes(&path, bytes),
            Err(source) if mode == BuildMode::Debug || self.allow_ephemeral_key => {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            }
            Err(source) => Err(ConfigError::KeyRead { path, source }),
        }
    }
}

fn key_from_bytes(path: &Path, mut bytes: Vec<u8>) -> Result<Key, ConfigError> {
    let length = bytes.len();
    if length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        return Err(ConfigError::KeyTooShort {
            path: path.to_path_buf(),
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

/// Truncated SHA-256 of the signing key, safe to log.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Everything needed to start the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
        }
    }
}
