//! Simulator configuration, loaded from YAML.

use std::path::{Path, PathBuf};

use jbw_core::Direction;
use jbw_gen::{CatalogConfig, CatalogError, ItemCatalog};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// The four-item world used when no config file is given.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../config/default.yaml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid item catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("there is no item named {0:?}")]
    UnknownGoalItem(String),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for world generation and agent RNG streams.
    pub seed: u64,

    /// Side of a square generation patch, in cells.
    #[serde(default = "default_patch_size")]
    pub patch_size: u32,

    #[serde(default = "default_vision_radius")]
    pub vision_radius: i32,

    #[serde(default = "default_color_dimension")]
    pub color_dimension: usize,

    /// Gibbs sweeps per newly generated region.
    #[serde(default = "default_mcmc_iterations")]
    pub mcmc_iterations: u32,

    #[serde(default = "default_max_steps")]
    pub max_steps_per_movement: u32,

    #[serde(default = "default_agent_color")]
    pub agent_color: Vec<f32>,

    /// Agent-relative move directions the world accepts.
    #[serde(default = "default_allowed_moves")]
    pub allowed_moves: Vec<Direction>,

    /// Agent-relative turn directions the world accepts.
    #[serde(default = "default_allowed_turns")]
    pub allowed_turns: Vec<Direction>,

    /// Item the agent walks toward.
    #[serde(default = "default_goal_item")]
    pub goal_item: String,

    /// Item the agent treats as impassable when planning.
    #[serde(default = "default_wall_item")]
    pub wall_item: Option<String>,

    pub items: CatalogConfig,
}

fn default_patch_size() -> u32 {
    32
}
fn default_vision_radius() -> i32 {
    5
}
fn default_color_dimension() -> usize {
    3
}
fn default_mcmc_iterations() -> u32 {
    4000
}
fn default_max_steps() -> u32 {
    1
}
fn default_agent_color() -> Vec<f32> {
    vec![0.0, 0.0, 1.0]
}
fn default_allowed_moves() -> Vec<Direction> {
    vec![Direction::Up]
}
fn default_allowed_turns() -> Vec<Direction> {
    vec![Direction::Left, Direction::Right]
}
fn default_goal_item() -> String {
    "jellybean".to_string()
}
fn default_wall_item() -> Option<String> {
    Some("wall".to_string())
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            patch_size: default_patch_size(),
            vision_radius: default_vision_radius(),
            color_dimension: default_color_dimension(),
            mcmc_iterations: default_mcmc_iterations(),
            max_steps_per_movement: default_max_steps(),
            agent_color: default_agent_color(),
            allowed_moves: default_allowed_moves(),
            allowed_turns: default_allowed_turns(),
            goal_item: default_goal_item(),
            wall_item: default_wall_item(),
            items: CatalogConfig::default(),
        }
    }
}

/// Goal and wall colors the agent plans with.
#[derive(Debug, Clone, PartialEq)]
pub struct Signatures {
    pub goal: Vec<f32>,
    pub wall: Vec<f32>,
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The built-in four-item world.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml_str(DEFAULT_CONFIG_YAML)
    }

    /// Check every setting and compile the item catalog.
    pub fn validate(&self) -> Result<ItemCatalog, ConfigError> {
        if self.patch_size == 0 {
            return Err(invalid("patch_size", "must be > 0"));
        }
        if self.vision_radius < 0 {
            return Err(invalid(
                "vision_radius",
                format!("must be >= 0, got {}", self.vision_radius),
            ));
        }
        if self.max_steps_per_movement == 0 {
            return Err(invalid("max_steps_per_movement", "must be > 0"));
        }
        if self.color_dimension == 0 {
            return Err(invalid("color_dimension", "must be > 0"));
        }
        if self.agent_color.len() != self.color_dimension {
            return Err(invalid(
                "agent_color",
                format!(
                    "has {} channels, expected {}",
                    self.agent_color.len(),
                    self.color_dimension
                ),
            ));
        }

        let catalog = ItemCatalog::from_config(&self.items)?;
        if catalog.color_dimension() != self.color_dimension {
            return Err(invalid(
                "items",
                format!(
                    "item colors have {} channels, expected {}",
                    catalog.color_dimension(),
                    self.color_dimension
                ),
            ));
        }
        if catalog.index_of(&self.goal_item).is_none() {
            return Err(ConfigError::UnknownGoalItem(self.goal_item.clone()));
        }
        Ok(catalog)
    }

    /// Resolve goal and wall colors. A missing wall item is only a warning:
    /// the wall signature becomes all `-1`, which no rendered cell shows.
    pub fn signatures(&self, catalog: &ItemCatalog) -> Result<Signatures, ConfigError> {
        let goal = catalog
            .index_of(&self.goal_item)
            .and_then(|i| catalog.get(i))
            .map(|item| item.color.clone())
            .ok_or_else(|| ConfigError::UnknownGoalItem(self.goal_item.clone()))?;

        let wall = match self.wall_item.as_deref() {
            Some(name) => match catalog.index_of(name).and_then(|i| catalog.get(i)) {
                Some(item) => item.color.clone(),
                None => {
                    warn!(item = name, "there is no wall item; walls will not be avoided");
                    vec![-1.0; self.color_dimension]
                }
            },
            None => vec![-1.0; self.color_dimension],
        };
        Ok(Signatures { goal, wall })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
