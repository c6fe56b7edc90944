use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;
use stopwatch_core::{Timing, SWIPE_THRESHOLD_PX};

use crate::error::ConfigError;
use crate::theme::Theme;

pub const DEFAULT_CONFIG_FILE: &str = "stopwatch.toml";
const DEFAULT_LOG_FILE: &str = "stopwatch.log";

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub timing: TimingConfig,
    pub gesture: GestureConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub tick_ms: u64,
    pub display_quantum_ms: u64,
    pub glow_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            tick_ms: timing.tick_ms,
            display_quantum_ms: timing.display_quantum_ms,
            glow_ms: timing.glow_ms,
        }
    }
}

impl From<&TimingConfig> for Timing {
    fn from(cfg: &TimingConfig) -> Self {
        Timing {
            tick_ms: cfg.tick_ms,
            display_quantum_ms: cfg.display_quantum_ms,
            glow_ms: cfg.glow_ms,
        }
    }
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    pub swipe_threshold_px: i32,
    /// Width of one terminal cell in pixels, used to turn columns into swipe distance.
    pub cell_width_px: i32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold_px: SWIPE_THRESHOLD_PX,
            cell_width_px: 8,
        }
    }
}

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub theme: Theme,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Loads `path` if given, otherwise `stopwatch.toml` in the current
    /// directory when it exists, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::load_file(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.tick_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "timing.tick_ms",
                expected: "greater than zero",
            });
        }
        if self.timing.display_quantum_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "timing.display_quantum_ms",
                expected: "greater than zero",
            });
        }
        if self.gesture.cell_width_px <= 0 {
            return Err(ConfigError::Invalid {
                key: "gesture.cell_width_px",
                expected: "greater than zero",
            });
        }
        if self.gesture.swipe_threshold_px < 0 {
            return Err(ConfigError::Invalid {
                key: "gesture.swipe_threshold_px",
                expected: "zero or more",
            });
        }
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_is_default() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timing.tick_ms, 10);
        assert_eq!(config.timing.display_quantum_ms, 50);
        assert_eq!(config.timing.glow_ms, 140);
        assert_eq!(config.gesture.swipe_threshold_px, 70);
        assert_eq!(config.ui.theme, Theme::Light);
    }

    #[test]
    fn test_partial_fills_defaults() {
        let config: Config = r#"
            [timing]
            glow_ms = 200

            [ui]
            theme = "dark"

            [log]
            level = "debug"
            file = "/var/tmp/sw.log"
        "#
        .parse()
        .unwrap();
        assert_eq!(config.timing.glow_ms, 200);
        assert_eq!(config.timing.tick_ms, 10);
        assert_eq!(config.ui.theme, Theme::Dark);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.file_path(), PathBuf::from("/var/tmp/sw.log"));
        assert_eq!(Timing::from(&config.timing).glow_ms, 200);
    }

    #[test]
    fn test_zero_tick_rejected() {
        let err = "[timing]\ntick_ms = 0\n".parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "timing.tick_ms", .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = "[ui]\ncolour = \"red\"\n".parse::<Config>().unwrap_err();
        assert!(matches!(err, ConfigError::Deserialize(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gesture]\ncell_width_px = 10").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.gesture.cell_width_px, 10);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }
}
