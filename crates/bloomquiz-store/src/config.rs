//! Quiz configuration and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bloomquiz_core::leaderboard::DEFAULT_DISPLAY_CAP;
use bloomquiz_core::traits::LeaderboardStore;

use crate::file::FileStore;
use crate::memory::MemoryStore;
use crate::remote::{RemoteStore, DEFAULT_TIMEOUT_SECS};

/// Where the leaderboard lives.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    File {
        #[serde(default = "default_leaderboard_path")]
        path: PathBuf,
    },
    Remote {
        base_url: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
    Memory,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::File { path } => f.debug_struct("File").field("path", path).finish(),
            StoreConfig::Remote {
                base_url,
                api_key,
                timeout_secs,
            } => f
                .debug_struct("Remote")
                .field("base_url", base_url)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
                .field("timeout_secs", timeout_secs)
                .finish(),
            StoreConfig::Memory => f.write_str("Memory"),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: default_leaderboard_path(),
        }
    }
}

fn default_leaderboard_path() -> PathBuf {
    PathBuf::from("bloomquiz-leaderboard.json")
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level bloomquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Question bank file (or directory of banks) used by `play`.
    #[serde(default = "default_question_bank")]
    pub question_bank: PathBuf,
    /// Number of leaderboard entries shown.
    #[serde(default = "default_display_cap")]
    pub display_cap: usize,
    /// Leaderboard backend.
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_question_bank() -> PathBuf {
    PathBuf::from("question-banks/hta.toml")
}
fn default_display_cap() -> usize {
    DEFAULT_DISPLAY_CAP
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_bank: default_question_bank(),
            display_cap: default_display_cap(),
            store: StoreConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a store config.
fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::File { path } => StoreConfig::File {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
        StoreConfig::Remote {
            base_url,
            api_key,
            timeout_secs,
        } => StoreConfig::Remote {
            base_url: resolve_env_vars(base_url),
            api_key: api_key.as_ref().map(|k| resolve_env_vars(k)),
            timeout_secs: *timeout_secs,
        },
        StoreConfig::Memory => StoreConfig::Memory,
    }
}

/// Apply `BLOOMQUIZ_LEADERBOARD_URL` / `BLOOMQUIZ_API_KEY` style overrides.
///
/// A URL switches the store to the remote backend. A key only applies to a
/// remote store.
fn apply_overrides(config: &mut QuizConfig, url: Option<String>, key: Option<String>) {
    if let Some(url) = url.filter(|u| !u.is_empty()) {
        let (api_key, timeout_secs) = match &config.store {
            StoreConfig::Remote {
                api_key,
                timeout_secs,
                ..
            } => (api_key.clone(), *timeout_secs),
            _ => (None, DEFAULT_TIMEOUT_SECS),
        };
        config.store = StoreConfig::Remote {
            base_url: url,
            api_key,
            timeout_secs,
        };
    }

    if let Some(key) = key {
        if let StoreConfig::Remote { api_key, .. } = &mut config.store {
            *api_key = Some(key);
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `bloomquiz.toml` in the current directory
/// 2. `~/.config/bloomquiz/config.toml`
///
/// Environment variable overrides: `BLOOMQUIZ_LEADERBOARD_URL`, `BLOOMQUIZ_API_KEY`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("bloomquiz.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    apply_overrides(
        &mut config,
        std::env::var("BLOOMQUIZ_LEADERBOARD_URL").ok(),
        std::env::var("BLOOMQUIZ_API_KEY").ok(),
    );
    config.store = resolve_store_config(&config.store);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("bloomquiz"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn LeaderboardStore>> {
    match config {
        StoreConfig::File { path } => Ok(Arc::new(FileStore::new(path))),
        StoreConfig::Remote {
            base_url,
            api_key,
            timeout_secs,
        } => {
            let store = RemoteStore::with_timeout(base_url, api_key.clone(), *timeout_secs)
                .context("failed to set up remote leaderboard")?;
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_BLOOMQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_BLOOMQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_BLOOMQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_BLOOMQUIZ_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_BLOOMQUIZ_SELF_REF", "a${_BLOOMQUIZ_SELF_REF}b");
        assert_eq!(
            resolve_env_vars("${_BLOOMQUIZ_SELF_REF}/x"),
            "a${_BLOOMQUIZ_SELF_REF}b/x"
        );
        std::env::remove_var("_BLOOMQUIZ_SELF_REF");

        assert_eq!(resolve_env_vars("open ${NOT_CLOSED"), "open ${NOT_CLOSED");
    }

    #[test]
    fn default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.display_cap, 10);
        assert_eq!(config.question_bank, PathBuf::from("question-banks/hta.toml"));
        assert!(matches!(config.store, StoreConfig::File { .. }));
    }

    #[test]
    fn parse_store_configs() {
        let file: QuizConfig = toml::from_str(
            r#"
display_cap = 5

[store]
type = "file"
path = "scores.json"
"#,
        )
        .unwrap();
        assert_eq!(file.display_cap, 5);
        assert!(matches!(file.store, StoreConfig::File { ref path } if path == Path::new("scores.json")));

        let remote: QuizConfig = toml::from_str(
            r#"
[store]
type = "remote"
base_url = "https://quiz.example.org"
api_key = "k"
"#,
        )
        .unwrap();
        assert!(matches!(
            remote.store,
            StoreConfig::Remote { timeout_secs: 10, .. }
        ));

        let memory: QuizConfig = toml::from_str("[store]\ntype = \"memory\"\n").unwrap();
        assert!(matches!(memory.store, StoreConfig::Memory));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = StoreConfig::Remote {
            base_url: "https://quiz.example.org".into(),
            api_key: Some("super-secret".into()),
            timeout_secs: 10,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn url_override_switches_to_remote() {
        let mut config = QuizConfig::default();
        apply_overrides(
            &mut config,
            Some("https://quiz.example.org".into()),
            Some("k".into()),
        );
        match config.store {
            StoreConfig::Remote {
                base_url, api_key, ..
            } => {
                assert_eq!(base_url, "https://quiz.example.org");
                assert_eq!(api_key.as_deref(), Some("k"));
            }
            other => panic!("expected remote store, got {other:?}"),
        }
    }

    #[test]
    fn key_override_ignored_for_file_store() {
        let mut config = QuizConfig::default();
        apply_overrides(&mut config, None, Some("k".into()));
        assert!(matches!(config.store, StoreConfig::File { .. }));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bloomquiz.toml");
        std::fs::write(&path, "display_cap = 3\n[store]\ntype = \"memory\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.display_cap, 3);

        let missing = load_config_from(Some(&dir.path().join("nope.toml")));
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn factory_builds_each_backend() {
        let dir = tempfile::tempdir().unwrap();
        let file = create_store(&StoreConfig::File {
            path: dir.path().join("board.json"),
        })
        .unwrap();
        assert_eq!(file.name(), "file");
        assert!(file.list_entries().await.unwrap().is_empty());

        let remote = create_store(&StoreConfig::Remote {
            base_url: "http://127.0.0.1:9".into(),
            api_key: None,
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(remote.name(), "remote");

        assert_eq!(create_store(&StoreConfig::Memory).unwrap().name(), "memory");
    }
}
