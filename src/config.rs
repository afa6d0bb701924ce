//! Engine configuration using TOML
//!
//! Read once at startup from `<config dir>/tetrs-engine/engine.toml` (or a
//! path given by the host) and handed to [`crate::Game`] by value. Every
//! key is optional; missing ones fall back to the defaults below.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS};
use crate::gravity::{GRAVITY_MS, SOFT_DROP_MULTIPLIER};
use crate::input::{DEFAULT_ARR_MS, DEFAULT_DAS_MS};
use crate::lock::{LOCK_DELAY_MS, MAX_LOCK_RESETS};
use crate::srs::KickTable;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Smallest board side that still fits every piece and a kick
const MIN_BOARD_SIDE: usize = 4;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Hold rule
    pub hold: HoldMode,
    /// Rotation kick table
    pub kicks: KickTable,
    /// Bag seed; unseeded when absent
    pub seed: Option<u64>,
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub controls: ControlsConfig,
}

/// Board dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    /// Visible rows
    pub height: usize,
    /// Overflow rows above the visible area
    pub hidden_rows: usize,
}

/// Gravity and lock timing, all in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub gravity_ms: u32,
    /// Soft drop interval is `gravity_ms / soft_drop_multiplier`
    pub soft_drop_multiplier: u32,
    pub lock_delay_ms: u32,
    pub max_lock_resets: u8,
}

/// Auto-repeat for held directional keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Delayed Auto Shift in milliseconds
    pub das_ms: u32,
    /// Auto Repeat Rate in milliseconds
    pub arr_ms: u32,
}

/// When swapping with the hold slot is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldMode {
    Disabled,
    /// Once per spawned piece
    #[default]
    Once,
    Unlimited,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hold: HoldMode::default(),
            kicks: KickTable::default(),
            seed: None,
            board: BoardConfig::default(),
            timing: TimingConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            hidden_rows: HIDDEN_ROWS,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            gravity_ms: GRAVITY_MS,
            soft_drop_multiplier: SOFT_DROP_MULTIPLIER,
            lock_delay_ms: LOCK_DELAY_MS,
            max_lock_resets: MAX_LOCK_RESETS,
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
        }
    }
}

/// Why a configuration could not be used
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            ConfigError::Invalid(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl GameConfig {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs-engine")
            .map(|dirs| dirs.config_dir().join("engine.toml"))
    }

    /// Parse TOML text; does not validate
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `default_path`, or defaults when there is no file there
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.width < MIN_BOARD_SIDE || self.board.height < MIN_BOARD_SIDE {
            return Err(ConfigError::Invalid(format!(
                "board must be at least {0}x{0}, got {1}x{2}",
                MIN_BOARD_SIDE, self.board.width, self.board.height
            )));
        }
        if self.timing.gravity_ms == 0 {
            return Err(ConfigError::Invalid("gravity_ms must be positive".to_string()));
        }
        if self.timing.soft_drop_multiplier == 0 {
            return Err(ConfigError::Invalid(
                "soft_drop_multiplier must be positive".to_string(),
            ));
        }
        if self.timing.lock_delay_ms == 0 {
            return Err(ConfigError::Invalid("lock_delay_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Write as pretty TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
