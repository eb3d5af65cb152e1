use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{FileVaultError, Result};

/// Directory name used for the vault root when none is configured.
const DEFAULT_VAULT_DIR_NAME: &str = ".filevault";

/// User configuration, loaded from `.filevault.toml`.
///
/// Every field has a sensible default so FileVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault root directory.  Relative paths are resolved against the
    /// directory the config was loaded from.  Defaults to `~/.filevault`.
    #[serde(default)]
    pub vault_dir: Option<PathBuf>,

    /// Where `retrieve` writes files when `--to` is not given.
    #[serde(default = "default_retrieve_dir")]
    pub retrieve_dir: PathBuf,

    /// Minimum length for a newly chosen master password.
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_retrieve_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_min_password_len() -> usize {
    8
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: None,
            retrieve_dir: default_retrieve_dir(),
            min_password_len: default_min_password_len(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = ".filevault.toml";

    /// Load settings from `<dir>/.filevault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            FileVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the vault root.
    ///
    /// Order: configured `vault_dir` (relative to `base_dir`), then
    /// `~/.filevault`, then `<base_dir>/.filevault` when there is no home
    /// directory.
    pub fn vault_root(&self, base_dir: &Path) -> PathBuf {
        match &self.vault_dir {
            Some(dir) => base_dir.join(dir),
            None => dirs::home_dir()
                .unwrap_or_else(|| base_dir.to_path_buf())
                .join(DEFAULT_VAULT_DIR_NAME),
        }
    }

    /// Resolve the default output directory for `retrieve`.
    pub fn retrieve_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.retrieve_dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert!(s.vault_dir.is_none());
        assert_eq!(s.retrieve_dir, PathBuf::from("."));
        assert_eq!(s.min_password_len, 8);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert!(settings.vault_dir.is_none());
        assert_eq!(settings.min_password_len, 8);
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_dir = "secrets"
retrieve_dir = "out"
min_password_len = 12
"#;
        fs::write(tmp.path().join(Settings::FILE_NAME), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, Some(PathBuf::from("secrets")));
        assert_eq!(settings.retrieve_dir, PathBuf::from("out"));
        assert_eq!(settings.min_password_len, 12);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "min_password_len = 10\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.min_password_len, 10);
        assert!(settings.vault_dir.is_none());
        assert_eq!(settings.retrieve_dir, PathBuf::from("."));
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(FileVaultError::ConfigError(_))));
    }

    #[test]
    fn vault_root_resolves_relative_dir() {
        let s = Settings {
            vault_dir: Some(PathBuf::from("secrets")),
            ..Settings::default()
        };
        let base = Path::new("/home/user/project");
        assert_eq!(
            s.vault_root(base),
            PathBuf::from("/home/user/project/secrets")
        );
    }

    #[test]
    fn vault_root_keeps_absolute_dir() {
        let s = Settings {
            vault_dir: Some(PathBuf::from("/var/vault")),
            ..Settings::default()
        };
        assert_eq!(
            s.vault_root(Path::new("/home/user")),
            PathBuf::from("/var/vault")
        );
    }

    #[test]
    fn default_vault_root_ends_in_filevault() {
        let root = Settings::default().vault_root(Path::new("/tmp"));
        assert!(root.ends_with(DEFAULT_VAULT_DIR_NAME));
    }
}
