//! External command file of the monitoring core
//!
//! The core reads commands of the form `[<unix time>] COMMAND;args` from a
//! named pipe whose location is the `command_file` directive of the main
//! configuration file.

use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const COMMAND_FILE_DIRECTIVE: &str = "command_file";

/// Extract the `command_file` directive from main configuration text
///
/// The last occurrence wins, as in the core itself.
pub fn parse_command_file(config: &str) -> Option<String> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| line.split_once('='))
        .filter(|(key, _)| key.trim() == COMMAND_FILE_DIRECTIVE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .last()
}

/// Locate the command file declared by the main configuration file
///
/// Relative paths are resolved against the configuration file's directory.
pub async fn locate(main_cfg: &Path) -> Result<PathBuf> {
    let config = tokio::fs::read_to_string(main_cfg)
        .await
        .with_context(|| format!("unable to read {}", main_cfg.display()))?;

    let declared = parse_command_file(&config).ok_or_else(|| {
        anyhow!(
            "no {} directive in {}",
            COMMAND_FILE_DIRECTIVE,
            main_cfg.display()
        )
    })?;

    let path = PathBuf::from(declared);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(main_cfg
            .parent()
            .map(|dir| dir.join(&path))
            .unwrap_or(path))
    }
}

/// Format one external command line
pub fn format_command(timestamp: i64, command: &str) -> String {
    format!("[{}] {}\n", timestamp, command)
}

/// Write a command to an existing command file
pub async fn submit(command_file: &Path, command: &str) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .open(command_file)
        .await
        .with_context(|| format!("unable to open command file {}", command_file.display()))?;

    let line = format_command(chrono::Utc::now().timestamp(), command);
    file.write_all(line.as_bytes())
        .await
        .with_context(|| format!("unable to write to command file {}", command_file.display()))?;
    file.flush().await?;

    Ok(())
}
