use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("obsync"))
}

/// Context configuration: which remote instance to talk to and where the
/// local declarations live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote instance, e.g. `https://grafana.example.com`
    #[serde(default)]
    pub url: String,

    /// API token sent as a bearer credential
    #[serde(default)]
    pub token: Option<String>,

    /// Root directory holding declared resources
    #[serde(default = "default_resources_dir")]
    pub resources_dir: String,

    /// Grouping key applied to declarations that don't name one
    #[serde(default = "default_folder")]
    pub default_folder: String,

    /// Lock pushed resources to management-only edits. Off by default so
    /// manual edits through other channels stay possible.
    #[serde(default)]
    pub lock_provenance: bool,
}

fn default_resources_dir() -> String {
    ".".to_string()
}

fn default_folder() -> String {
    reconcile::GENERAL_FOLDER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: None,
            resources_dir: default_resources_dir(),
            default_folder: default_folder(),
            lock_provenance: false,
        }
    }
}

impl Config {
    /// Load config.json, then apply CLI/environment overrides.
    ///
    /// A missing file is fine as long as the URL arrives via override;
    /// reaching the remote with no URL at all is an error.
    pub fn load(url_override: Option<String>, token_override: Option<String>) -> Result<Self> {
        let path = config_dir()?.join("config.json");

        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            serde_json::from_str(&content).context("Invalid config.json format")?
        } else {
            Self::default()
        };

        if let Some(url) = url_override {
            config.url = url;
        }
        if let Some(token) = token_override {
            config.token = Some(token);
        }

        if config.url.is_empty() {
            anyhow::bail!(
                "No remote URL configured. Set OBSYNC_URL, pass --url, or create {}",
                path.display()
            );
        }

        Ok(config)
    }

    /// Save config.json
    pub fn save(&self) -> Result<()> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir)?;
        let path = dir.join("config.json");
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get the expanded resources root path
    pub fn resources_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.resources_dir);
        PathBuf::from(expanded.as_ref())
    }
}
