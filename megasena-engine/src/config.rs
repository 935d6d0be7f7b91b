use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub const MIN_COUNT: usize = 6;
pub const MAX_COUNT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FocusMode {
    /// 80% frequent numbers, 20% stale
    Frequent,
    /// 80% stale numbers, 20% frequent
    Stale,
    /// 50/50, rounding up on the frequent side
    #[default]
    Balanced,
}

impl fmt::Display for FocusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusMode::Frequent => write!(f, "frequent"),
            FocusMode::Stale => write!(f, "stale"),
            FocusMode::Balanced => write!(f, "balanced"),
        }
    }
}

impl FromStr for FocusMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frequent" | "freq" => Ok(FocusMode::Frequent),
            "stale" | "overdue" => Ok(FocusMode::Stale),
            "balanced" => Ok(FocusMode::Balanced),
            other => Err(EngineError::Configuration(format!("unknown focus mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub focus: FocusMode,
    pub attempt_cap: u32,
    /// Size of the ranked frequent/stale pools.
    pub pool_depth: usize,
    /// Relative half-width of the odd-ratio window.
    pub odd_tolerance: f64,
    /// Longest run of consecutive numbers still accepted.
    pub max_consecutive: usize,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 6,
            focus: FocusMode::Balanced,
            attempt_cap: 10_000,
            pool_depth: 30,
            odd_tolerance: 0.2,
            max_consecutive: 3,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| EngineError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_COUNT..=MAX_COUNT).contains(&self.count) {
            return Err(EngineError::Configuration(format!(
                "count {} outside [{MIN_COUNT}, {MAX_COUNT}]",
                self.count
            )));
        }
        if self.attempt_cap == 0 {
            return Err(EngineError::Configuration("attempt cap must be at least 1".into()));
        }
        if self.pool_depth == 0 {
            return Err(EngineError::Configuration("pool depth must be at least 1".into()));
        }
        if !self.odd_tolerance.is_finite() || self.odd_tolerance < 0.0 {
            return Err(EngineError::Configuration(format!(
                "odd tolerance {} must be a non-negative number",
                self.odd_tolerance
            )));
        }
        if self.max_consecutive == 0 {
            return Err(EngineError::Configuration("max consecutive run must be at least 1".into()));
        }
        Ok(())
    }
}
