use std::path::{Path, PathBuf};

/// Environment variable naming the vault root.
pub const VAULT_PATH_ENV: &str = "DISAMBIGUATE_VAULT_PATH";

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Obsidian vault root directory
    pub vault_path: PathBuf,
    /// Name of the vault (derived from vault_path)
    pub vault_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DISAMBIGUATE_VAULT_PATH`: Path to the vault root (supports ~ for home directory)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(None, std::env::var(VAULT_PATH_ENV).ok())
    }

    /// Build a config from a `--vault` flag, falling back to the environment.
    pub fn load(vault_flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        match vault_flag {
            Some(path) => Self::resolve(Some(path), None),
            None => Self::from_env(),
        }
    }

    /// The flag wins over the environment value; one of them is required.
    fn resolve(flag: Option<PathBuf>, env: Option<String>) -> Result<Self, ConfigError> {
        let vault_path = match (flag, env) {
            (Some(path), _) => path
                .to_str()
                .map(expand_tilde)
                .unwrap_or(path),
            (None, Some(value)) if !value.trim().is_empty() => expand_tilde(value.trim()),
            _ => return Err(ConfigError::MissingVaultPath),
        };

        if !vault_path.is_dir() {
            return Err(ConfigError::VaultNotFound(vault_path));
        }

        let vault_name = vault_name(&vault_path);
        Ok(Self {
            vault_path,
            vault_name,
        })
    }
}

fn vault_name(vault_path: &Path) -> String {
    vault_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("vault")
        .to_string()
}

/// Expand ~ or ~/ prefix to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DISAMBIGUATE_VAULT_PATH environment variable not set (or pass --vault)")]
    MissingVaultPath,

    #[error("Vault directory not found: {}", .0.display())]
    VaultNotFound(PathBuf),
}
