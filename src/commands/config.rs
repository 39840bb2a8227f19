use std::path::{Path, PathBuf};

use crate::config::{load_or_default, LauncherConfig, CONFIG_FILE_NAME};

/// Effective configuration and where it came from.
pub struct ConfigView {
    pub path: PathBuf,
    pub from_file: bool,
    pub config: LauncherConfig,
}

/// Resolve the config file (explicit path, else `<config dir>/config.toml`) and load it.
pub fn resolve_config(explicit: Option<&Path>, config_dir: &Path) -> anyhow::Result<ConfigView> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_dir.join(CONFIG_FILE_NAME));
    if explicit.is_some() && !path.is_file() {
        anyhow::bail!("Config file {:?} does not exist", path);
    }
    let config = load_or_default(&path)?;
    Ok(ConfigView {
        from_file: path.is_file(),
        path,
        config,
    })
}

impl ConfigView {
    /// Where the configuration came from, for logs and `config` output.
    pub fn source(&self) -> String {
        if self.from_file {
            format!("Loaded from {}", self.path.display())
        } else {
            format!("{} not found; using built-in defaults", self.path.display())
        }
    }

    pub fn render(&self) -> anyhow::Result<String> {
        Ok(format!("# {}\n{}", self.source(), self.config.to_toml()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let view = resolve_config(None, dir.path()).unwrap();
        assert!(!view.from_file);
        assert_eq!(view.path, dir.path().join(CONFIG_FILE_NAME));
        assert!(view.source().ends_with("not found; using built-in defaults"));
        assert!(view.render().unwrap().starts_with("# "));
    }

    #[test]
    fn test_reads_config_dir_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[runtime]\ncheck_updates = false\n",
        )
        .unwrap();
        let view = resolve_config(None, dir.path()).unwrap();
        assert!(view.from_file);
        assert!(!view.config.runtime.check_updates);
        assert_eq!(
            view.source(),
            format!("Loaded from {}", dir.path().join(CONFIG_FILE_NAME).display())
        );
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("elsewhere.toml");
        assert!(resolve_config(Some(&missing), dir.path()).is_err());
    }
}
