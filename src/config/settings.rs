use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PaceError;
use crate::stats::goal::{
    GoalPolicy, DEFAULT_CHALLENGE_RATE, DEFAULT_FLOOR_RATE, DEFAULT_MIN_DATA_POINTS,
};

fn default_challenge_rate() -> f64 {
    DEFAULT_CHALLENGE_RATE
}
fn default_floor_rate() -> f64 {
    DEFAULT_FLOOR_RATE
}
fn default_min_data_points() -> usize {
    DEFAULT_MIN_DATA_POINTS
}
fn default_history_days() -> u32 {
    30
}
fn default_kind() -> String {
    crate::models::habit::DEFAULT_KIND.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    /// Multiplier applied to the recent daily average
    #[serde(default = "default_challenge_rate")]
    pub challenge_rate: f64,
    /// Multiplier applied to the current goal; the next goal is never below it
    #[serde(default = "default_floor_rate")]
    pub floor_rate: f64,
    #[serde(default = "default_min_data_points")]
    pub min_data_points: usize,
    /// Days of history considered by `pace review`, today included
    #[serde(default = "default_history_days")]
    pub history_days: u32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            challenge_rate: default_challenge_rate(),
            floor_rate: default_floor_rate(),
            min_data_points: default_min_data_points(),
            history_days: default_history_days(),
        }
    }
}

impl GoalConfig {
    /// Rates must keep a reviewed goal from dropping below the current one.
    pub fn validate(&self) -> Result<(), PaceError> {
        if !self.floor_rate.is_finite() || self.floor_rate < 1.0 {
            return Err(PaceError::InvalidConfig(format!(
                "goals.floor_rate must be a finite number >= 1.0, got {}",
                self.floor_rate
            )));
        }
        if !self.challenge_rate.is_finite() || self.challenge_rate < 0.0 {
            return Err(PaceError::InvalidConfig(format!(
                "goals.challenge_rate must be a finite number >= 0.0, got {}",
                self.challenge_rate
            )));
        }
        Ok(())
    }

    pub fn policy(&self) -> GoalPolicy {
        GoalPolicy {
            challenge_rate: self.challenge_rate,
            floor_rate: self.floor_rate,
            min_data_points: self.min_data_points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitDefaults {
    #[serde(default = "default_kind")]
    pub kind: String,
}

impl Default for HabitDefaults {
    fn default() -> Self {
        Self { kind: default_kind() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub goals: GoalConfig,
    #[serde(default)]
    pub habits: HabitDefaults,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "pace").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("pace.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        config
            .goals
            .validate()
            .with_context(|| format!("Validating {:?}", path))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
