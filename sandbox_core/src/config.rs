//! Sandbox configuration.
//!
//! Loaded from `sandbox_config.json`, overridable through `SANDBOX_CONFIG_PATH`.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::Resource;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::mapgen::BlueprintKind;

pub const BUILTIN_SANDBOX_CONFIG: &str = include_str!("data/sandbox_config.json");

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub board: BoardConfig,
    pub generation: GenerationConfig,
    pub placement: PlacementConfig,
}

impl SandboxConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_SANDBOX_CONFIG)
                .expect("builtin sandbox config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, SandboxConfigError> {
        let config: SandboxConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, SandboxConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| SandboxConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        SandboxConfig::from_json_str(&contents)
    }

    fn validate(&self) -> Result<(), SandboxConfigError> {
        let board = &self.board;
        if board.dim_step == 0 || board.min_dim > board.max_dim {
            return Err(SandboxConfigError::Invalid(format!(
                "board limits {}..={} step {} are empty",
                board.min_dim, board.max_dim, board.dim_step
            )));
        }
        board
            .check(board.dim)
            .map_err(|err| SandboxConfigError::Invalid(err.to_string()))?;
        for (name, range) in [
            ("tree_scale", self.placement.tree_scale),
            ("rock_scale", self.placement.rock_scale),
        ] {
            let finite = range.min.is_finite() && range.max.is_finite();
            if !(finite && range.min > 0.0 && range.min <= range.max) {
                return Err(SandboxConfigError::Invalid(format!(
                    "{name} must be finite with 0 < min <= max, got {}..={}",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

/// Board size and the limits a resize must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub dim: u32,
    pub min_dim: u32,
    pub max_dim: u32,
    pub dim_step: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            dim: 40,
            min_dim: 20,
            max_dim: 60,
            dim_step: 4,
        }
    }
}

impl BoardConfig {
    /// Accepts even sizes inside `min_dim..=max_dim` reachable from `min_dim`
    /// in whole steps.
    pub fn check(&self, dim: u32) -> Result<u32, BoardSizeError> {
        let in_range = (self.min_dim..=self.max_dim).contains(&dim);
        let on_step = self.dim_step != 0
            && dim >= self.min_dim
            && (dim - self.min_dim) % self.dim_step == 0;
        if dim % 2 == 0 && in_range && on_step {
            Ok(dim)
        } else {
            Err(BoardSizeError {
                requested: dim,
                min: self.min_dim,
                max: self.max_dim,
                step: self.dim_step,
            })
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("board size {requested} must be even and within {min}..={max} in steps of {step}")]
pub struct BoardSizeError {
    pub requested: u32,
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// `0` seeds from entropy.
    pub seed: u64,
    /// Always use this layout instead of a random pick.
    pub blueprint: Option<BlueprintKind>,
}

/// Inclusive range of uniform object scales.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl ScaleRange {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub tree_scale: ScaleRange,
    pub rock_scale: ScaleRange,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            tree_scale: ScaleRange { min: 0.8, max: 1.2 },
            rock_scale: ScaleRange { min: 0.6, max: 1.0 },
        }
    }
}

#[derive(Debug, Error)]
pub enum SandboxConfigError {
    #[error("failed to parse sandbox config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read sandbox config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid sandbox config: {0}")]
    Invalid(String),
}

/// Active configuration plus the file it came from. `source` is `None` for
/// the builtin or a config passed in directly.
#[derive(Resource, Debug, Clone)]
pub struct SandboxConfigHandle {
    config: Arc<SandboxConfig>,
    source: Option<PathBuf>,
}

impl SandboxConfigHandle {
    pub fn new(config: Arc<SandboxConfig>, source: Option<PathBuf>) -> Self {
        Self { config, source }
    }

    pub fn get(&self) -> Arc<SandboxConfig> {
        Arc::clone(&self.config)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn describe_source(&self) -> String {
        self.source
            .as_ref()
            .map_or_else(|| "builtin".to_string(), |path| path.display().to_string())
    }
}

/// Reads `SANDBOX_CONFIG_PATH` when set, otherwise the builtin file. Any
/// failure falls back to the builtin config.
pub fn load_sandbox_config_from_env() -> (Arc<SandboxConfig>, Option<PathBuf>) {
    if let Some(path) = env::var("SANDBOX_CONFIG_PATH").ok().map(PathBuf::from) {
        match SandboxConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "terra_sandbox::config",
                    path = %path.display(),
                    "sandbox_config.loaded=file"
                );
                return (Arc::new(config), Some(path));
            }
            Err(err) => {
                tracing::warn!(
                    target: "terra_sandbox::config",
                    path = %path.display(),
                    error = %err,
                    "sandbox_config.load_failed"
                );
            }
        }
    }

    let config = SandboxConfig::builtin();
    tracing::info!(target: "terra_sandbox::config", "sandbox_config.loaded=builtin");
    (config, None)
}
