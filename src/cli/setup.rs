//! Configuration loading shared by the session commands.

use crate::config::LifelinkConfig;
use std::path::Path;

/// Overrides taken from the command line. They beat env vars and the file.
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub log_level: Option<&'a str>,
}

/// Load configuration with CLI overrides
///
/// A missing file at `path` falls back to defaults. The result is validated.
pub fn load_config_with_overrides(
    path: &Path,
    overrides: &CliOverrides<'_>,
) -> Result<LifelinkConfig, Box<dyn std::error::Error>> {
    let mut config = if path.exists() {
        LifelinkConfig::load(Some(path))?
    } else {
        LifelinkConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(level) = overrides.log_level {
        config.logging.level = level.to_string();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            load_config_with_overrides(&dir.path().join("absent.toml"), &CliOverrides::default())
                .unwrap();
        assert_eq!(config.dispatch.arrival_after_ms, 8000);
    }

    #[test]
    fn test_cli_overrides_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[logging]\nlevel = \"error\"\n\n[map]\naccess_token = \"pk.file\"\n",
        )
        .unwrap();

        let overrides = CliOverrides {
            log_level: Some("debug"),
        };
        let config = load_config_with_overrides(temp.path(), &overrides).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.map.access_token.as_deref(), Some("pk.file"));
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[simulation]\ndamping = 1.5\n").unwrap();

        let err = load_config_with_overrides(temp.path(), &CliOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("simulation.damping"));
    }
}
