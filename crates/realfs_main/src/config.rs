use std::path::PathBuf;

use derive_setters::Setters;

use crate::cli::Cli;

/// Custom error type for configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse octal mode: {0}")]
    MalformedMode(String),
    #[error("Mode {0:o} is out of range")]
    ModeOutOfRange(u32),
    #[error("Failed to read {name}: {reason}")]
    Env { name: &'static str, reason: String },
}

/// Settings for a single run of the CLI.
#[derive(Debug, Clone, Default, PartialEq, Setters)]
#[setters(strip_option, into)]
pub struct Config {
    /// Tracing filter, e.g. `realfs=debug`.
    pub log_filter: Option<String>,
    /// Directory for hourly rolling JSON log files; logs go to stderr when unset.
    pub log_dir: Option<PathBuf>,
    /// Umask applied before the command runs.
    pub umask: Option<u32>,
}

impl Config {
    /// Reads `REALFS_LOG`, `REALFS_LOG_DIR` and `REALFS_UMASK`, after loading
    /// a `.env` file if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut config = Config::default();
        if let Some(filter) = var("REALFS_LOG")? {
            config = config.log_filter(filter);
        }
        if let Some(dir) = var("REALFS_LOG_DIR")? {
            config = config.log_dir(dir);
        }
        if let Some(umask) = var("REALFS_UMASK")? {
            config = config.umask(parse_mode(&umask)?);
        }
        Ok(config)
    }

    /// Command-line flags take precedence over the environment.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(level) = cli.log_level {
            self = self.log_filter(format!("realfs={level}"));
        }
        if let Some(dir) = &cli.log_dir {
            self = self.log_dir(dir.clone());
        }
        if let Some(umask) = cli.umask {
            self = self.umask(umask);
        }
        self
    }
}

fn var(name: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::Env { name, reason: e.to_string() }),
    }
}

/// Parses an octal permission mode such as `755`, `0755` or `0o755`.
pub fn parse_mode(value: &str) -> Result<u32, ConfigError> {
    let digits = value.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);
    let mode = u32::from_str_radix(digits, 8)
        .map_err(|_| ConfigError::MalformedMode(value.to_string()))?;
    if mode > 0o7777 {
        return Err(ConfigError::ModeOutOfRange(mode));
    }
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use std::env;

    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    // reset the env variables for reliable tests
    fn reset_env() {
        env::remove_var("REALFS_LOG");
        env::remove_var("REALFS_LOG_DIR");
        env::remove_var("REALFS_UMASK");
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("755").unwrap(), 0o755);
        assert_eq!(parse_mode("0644").unwrap(), 0o644);
        assert_eq!(parse_mode("0o022").unwrap(), 0o022);
        assert!(matches!(parse_mode("9"), Err(ConfigError::MalformedMode(_))));
        assert!(matches!(parse_mode(""), Err(ConfigError::MalformedMode(_))));
        assert!(matches!(parse_mode("17777"), Err(ConfigError::ModeOutOfRange(0o17777))));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        reset_env();
        env::set_var("REALFS_LOG", "realfs=trace");
        env::set_var("REALFS_UMASK", "027");

        let actual = Config::from_env().unwrap();
        let expected = Config::default().log_filter("realfs=trace").umask(0o027u32);
        assert_eq!(actual, expected);
        reset_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_umask() {
        reset_env();
        env::set_var("REALFS_UMASK", "rwx");
        assert!(Config::from_env().is_err());
        reset_env();
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        reset_env();
        env::set_var("REALFS_LOG", "realfs=trace");
        env::set_var("REALFS_UMASK", "077");

        let cli = Cli::parse_from(["realfs", "--log-level", "debug", "--umask", "002", "df", "/"]);
        let actual = Config::from_env().unwrap().merge_cli(&cli);

        assert_eq!(actual.log_filter.as_deref(), Some("realfs=debug"));
        assert_eq!(actual.umask, Some(0o002));
        assert_eq!(actual.log_dir, None);
        reset_env();
    }
}
