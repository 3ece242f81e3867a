//! Config command: inspect and bootstrap the context configuration.

use anyhow::{Context as AnyhowContext, Result};
use std::fs;

use crate::cli::ConfigCommand;
use crate::config::{self, Config};
use crate::ui;

pub fn run(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(),
        ConfigCommand::Init { url, force } => init(url, force),
    }
}

fn show() -> Result<()> {
    let path = config::config_dir()?.join("config.json");

    ui::header("Context Configuration");
    ui::kv("File", &path.display().to_string());

    if !path.exists() {
        ui::warn("No config file yet - run 'obsync config init --url <URL>'");
        return Ok(());
    }

    let content =
        fs::read_to_string(&path).with_context(|| format!("Could not read {}", path.display()))?;
    let config: Config = serde_json::from_str(&content).context("Invalid config.json format")?;

    ui::kv("URL", &config.url);
    ui::kv("Token", if config.token.is_some() { "set" } else { "unset" });
    ui::kv("Resources dir", &config.resources_dir);
    ui::kv("Default folder", &config.default_folder);
    ui::kv(
        "Provenance",
        if config.lock_provenance {
            "locked"
        } else {
            "unlocked"
        },
    );

    Ok(())
}

fn init(url: String, force: bool) -> Result<()> {
    let path = config::config_dir()?.join("config.json");
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let config = Config {
        url,
        ..Config::default()
    };
    config.save()?;
    ui::success(&format!("Wrote {}", path.display()));

    Ok(())
}
