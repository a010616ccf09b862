//! Subcommand handlers for config actions.

use std::path::{Path, PathBuf};

use super::args::ConfigAction;
use crate::config::{default_path, Config, DEFAULT_CONFIG};
use crate::error::{GlyphcastError, Result};

/// Handle config subcommand actions. `path` overrides the default location.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            if config_path.exists() {
                println!("# Config file: {} (exists)", config_path.display());
            } else {
                println!("# Config file: {} (not found, showing defaults)", config_path.display());
            }
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init => {
            init_config(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}

/// Write the default template to `path`, refusing to overwrite.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(GlyphcastError::ConfigExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| GlyphcastError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, DEFAULT_CONFIG).map_err(|source| GlyphcastError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        init_config(&path).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\ncolor = true\n").unwrap();
        let err = init_config(&path).unwrap_err();
        assert!(matches!(err, GlyphcastError::ConfigExists(_)));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[render]\ncolor = true\n"
        );
    }

    #[test]
    fn test_show_with_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        handle_config_action(ConfigAction::Show, Some(&path)).unwrap();
        assert!(!path.exists());
    }
}
