// CLASSIFICATION: COMMUNITY
// Filename: config.rs v0.1
// Author: Lukas Bower
// Date Modified: 2026-10-14

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;

const DEFAULT_MAX_OPEN: usize = 16;

/// Settings for the loopback simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostfsConfig {
    /// Host directory guest paths resolve against.
    pub root: PathBuf,
    /// Descriptor limit before `SYS_OPEN` fails with `EMFILE`.
    pub max_open: usize,
}

impl Default for HostfsConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self {
            root: cwd(),
            max_open: DEFAULT_MAX_OPEN,
        })
    }
}

impl HostfsConfig {
    /// Read `COHESIX_HOSTFS_ROOT` and `COHESIX_HOSTFS_MAX_OPEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let root = std::env::var("COHESIX_HOSTFS_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| cwd());
        let max_open = match std::env::var("COHESIX_HOSTFS_MAX_OPEN") {
            Ok(raw) => parse_max_open(&raw)?,
            Err(_) => DEFAULT_MAX_OPEN,
        };
        Ok(Self { root, max_open })
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_max_open(mut self, max_open: usize) -> Self {
        self.max_open = max_open;
        self
    }
}

fn cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn parse_max_open(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: "COHESIX_HOSTFS_MAX_OPEN",
            value: raw.to_string(),
        }),
    }
}

static CONFIG: Lazy<RwLock<HostfsConfig>> = Lazy::new(|| RwLock::new(HostfsConfig::default()));

/// Errors produced by hostfs config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("hostfs config lock poisoned")]
    LockPoisoned,
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Replace the global hostfs configuration.
pub fn set_config(cfg: HostfsConfig) -> Result<(), ConfigError> {
    let mut guard = CONFIG.write().map_err(|_| ConfigError::LockPoisoned)?;
    *guard = cfg;
    Ok(())
}

/// Get a clone of the current configuration.
pub fn get_config() -> Result<HostfsConfig, ConfigError> {
    CONFIG
        .read()
        .map_err(|_| ConfigError::LockPoisoned)
        .map(|g| g.clone())
}
