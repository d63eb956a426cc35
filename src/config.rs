use crate::consts;
use crate::grid::{Grid, GridError};
use ratatui::layout::Size;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Copy, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Playfield geometry
    #[serde(default)]
    pub(crate) grid: GridConfig,

    /// How fast the snake moves & the screen redraws
    #[serde(default)]
    pub(crate) timing: TimingConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("wrapsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                log::debug!("No configuration file at {}; using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        let config = toml::from_str::<Config>(&content)?;
        log::debug!("Loaded configuration from {}: {config:?}", path.display());
        Ok(config)
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct GridConfig {
    /// Side length of each cell
    pub(crate) cell_size: u32,

    /// Number of columns of cells.  If unset, as many as fit in the terminal.
    pub(crate) columns: Option<u32>,

    /// Number of rows of cells.  If unset, as many as fit in the terminal.
    pub(crate) rows: Option<u32>,
}

impl GridConfig {
    /// Build the grid to play on, fitting any unset dimensions to `available`,
    /// the number of terminal columns & rows that the playfield can occupy.
    pub(crate) fn to_grid(self, available: Size) -> Result<Grid, GridError> {
        let columns = self
            .columns
            .unwrap_or_else(|| u32::from(available.width));
        let rows = self.rows.unwrap_or_else(|| u32::from(available.height));
        Grid::with_cells(columns, rows, self.cell_size)
    }
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            cell_size: consts::CELL_SIZE,
            columns: None,
            rows: None,
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct TimingConfig {
    /// Milliseconds between movements of the snake
    pub(crate) tick_period_ms: u64,

    /// Minimum milliseconds between redraws
    pub(crate) frame_period_ms: u64,
}

impl TimingConfig {
    pub(crate) fn tick_period(self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Minimum time between redraws.  A zero period is treated as one
    /// millisecond.
    pub(crate) fn frame_period(self) -> Duration {
        Duration::from_millis(self.frame_period_ms.max(1))
    }
}

impl Default for TimingConfig {
    fn default() -> TimingConfig {
        TimingConfig {
            tick_period_ms: u64::try_from(consts::TICK_PERIOD.as_millis()).unwrap_or(u64::MAX),
            frame_period_ms: u64::try_from(consts::FRAME_PERIOD.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(src: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().expect("temp file should be created");
        tmp.write_all(src.as_bytes())
            .expect("config should be written");
        tmp
    }

    #[test]
    fn empty_config() {
        let config = toml::from_str::<Config>("").expect("empty config should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.grid.cell_size, 50);
        assert_eq!(config.timing.tick_period(), Duration::from_millis(93));
        assert_eq!(config.timing.frame_period(), Duration::from_millis(16));
    }

    #[test]
    fn full_config() {
        let tmp = write_config(concat!(
            "[grid]\n",
            "cell-size = 10\n",
            "columns = 40\n",
            "rows = 20\n",
            "\n",
            "[timing]\n",
            "tick-period-ms = 120\n",
            "frame-period-ms = 33\n",
        ));
        let config = Config::load(tmp.path(), false).expect("config should load");
        assert_eq!(
            config,
            Config {
                grid: GridConfig {
                    cell_size: 10,
                    columns: Some(40),
                    rows: Some(20),
                },
                timing: TimingConfig {
                    tick_period_ms: 120,
                    frame_period_ms: 33,
                },
            }
        );
    }

    #[test]
    fn partial_config() {
        let tmp = write_config("[timing]\ntick-period-ms = 200\n");
        let config = Config::load(tmp.path(), false).expect("config should load");
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(config.timing.tick_period_ms, 200);
        assert_eq!(config.timing.frame_period_ms, 16);
    }

    #[test]
    fn zero_frame_period() {
        let tmp = write_config("[timing]\nframe-period-ms = 0\n");
        let config = Config::load(tmp.path(), false).expect("config should load");
        assert_eq!(config.timing.frame_period(), Duration::from_millis(1));
    }

    #[test]
    fn unknown_key() {
        let tmp = write_config("[grid]\ncell-sise = 10\n");
        let r = Config::load(tmp.path(), false);
        assert!(matches!(r, Err(ConfigError::Parse(_))), "{r:?}");
    }

    #[test]
    fn missing_file_allowed() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("config.toml");
        let config = Config::load(&path, true).expect("missing config should be allowed");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_file_not_allowed() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("config.toml");
        let r = Config::load(&path, false);
        assert!(matches!(r, Err(ConfigError::Read(_))), "{r:?}");
    }

    #[test]
    fn grid_fits_terminal() {
        let grid = GridConfig::default()
            .to_grid(Size::new(78, 19))
            .expect("grid should fit");
        assert_eq!(grid.columns(), 78);
        assert_eq!(grid.rows(), 19);
        assert_eq!(grid.cell_size(), 50);
    }

    #[test]
    fn grid_from_config() {
        let cfg = GridConfig {
            cell_size: 10,
            columns: Some(30),
            rows: None,
        };
        let grid = cfg.to_grid(Size::new(78, 19)).expect("grid should fit");
        assert_eq!(grid.width(), 300);
        assert_eq!(grid.height(), 190);
    }

    #[test]
    fn grid_zero_cell_size() {
        let cfg = GridConfig {
            cell_size: 0,
            columns: Some(30),
            rows: Some(10),
        };
        assert_eq!(
            cfg.to_grid(Size::new(78, 19)),
            Err(GridError::ZeroCellSize)
        );
    }
}
