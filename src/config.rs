use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flag-style defaults read from a config file and merged with the CLI.
///
/// The file holds the same tokens the command line accepts, one or more
/// per line. Values given on the command line win over the file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub export_dir: Option<PathBuf>,
    pub json: bool,
    pub action_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            export_dir: other.export_dir.clone().or_else(|| self.export_dir.clone()),
            json: self.json || other.json,
            action_log: other.action_log.clone().or_else(|| self.action_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("storyloom").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("storyloom")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("storyloom").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("storyloom")
                .join("config");
        }
    }

    PathBuf::from(".storyloomrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".storyloomrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# storyloom defaults (saved with --save)".to_string());
    if let Some(dir) = &flags.export_dir {
        lines.push(format!("--export-dir {}", dir.display()));
    }
    if flags.json {
        lines.push("--json".to_string());
    }
    if let Some(log) = &flags.action_log {
        lines.push(format!("--action-log {}", log.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--json" {
            flags.json = true;
        } else if token == "--export-dir" {
            if let Some(next) = tokens.get(i + 1) {
                flags.export_dir = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--export-dir=") {
            flags.export_dir = Some(PathBuf::from(value));
        } else if token == "--action-log" {
            if let Some(next) = tokens.get(i + 1) {
                flags.action_log = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--action-log=") {
            flags.action_log = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "storyloom".to_string(),
            "--json".to_string(),
            "--export-dir".to_string(),
            "out".to_string(),
            "--action-log=actions.log".to_string(),
            "My Story".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.json);
        assert_eq!(flags.export_dir, Some(PathBuf::from("out")));
        assert_eq!(flags.action_log, Some(PathBuf::from("actions.log")));
    }

    #[test]
    fn test_parse_flag_tokens_ignores_dangling_value_flag() {
        let args = vec!["--export-dir".to_string()];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.export_dir, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            export_dir: Some(PathBuf::from("from_file")),
            json: true,
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            export_dir: Some(PathBuf::from("from_cli")),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.json);
        assert_eq!(merged.export_dir, Some(PathBuf::from("from_cli")));
    }

    #[test]
    fn test_config_union_keeps_file_value_when_cli_is_silent() {
        let file = ConfigFlags {
            action_log: Some(PathBuf::from("actions.log")),
            ..ConfigFlags::default()
        };
        let merged = file.union(&ConfigFlags::default());
        assert_eq!(merged.action_log, Some(PathBuf::from("actions.log")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".storyloomrc");
        let flags = ConfigFlags {
            export_dir: Some(PathBuf::from("stories")),
            json: true,
            action_log: Some(PathBuf::from("actions.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}
