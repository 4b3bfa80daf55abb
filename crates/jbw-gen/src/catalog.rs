//! Item catalog: declarative configuration and its validated runtime form.

use std::collections::{BTreeMap, HashMap};

use jbw_core::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EnergyModel, IntensityFn, InteractionFn};

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("item catalog is empty")]
    Empty,
    #[error("duplicate item type name: {0}")]
    DuplicateName(String),
    #[error("item type `{item}` declares an interaction with unknown item type `{target}`")]
    UnknownItem { item: String, target: String },
    #[error("item type `{item}` has an empty color")]
    EmptyColor { item: String },
    #[error("item type `{item}` has color dimension {found}, expected {expected}")]
    ColorDimension {
        item: String,
        expected: usize,
        found: usize,
    },
    #[error("item type `{item}`: {reason}")]
    InvalidParameter { item: String, reason: String },
    #[error("item index {index} out of range for catalog of {len} types")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Serializable catalog: an ordered list of item types.
///
/// Order matters: the position of an entry is its item-type index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogConfig {
    pub item_types: Vec<ItemTypeConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTypeConfig {
    pub name: String,
    pub color: Vec<f32>,
    #[serde(default)]
    pub blocks_movement: bool,
    #[serde(default)]
    pub intensity: IntensityConfig,
    /// Interaction with each named item type; omitted pairs are zero.
    #[serde(default)]
    pub interactions: BTreeMap<String, InteractionConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntensityConfig {
    #[default]
    Zero,
    Constant { value: f64 },
}

impl IntensityConfig {
    fn compile(self) -> IntensityFn {
        match self {
            IntensityConfig::Zero => IntensityFn::Zero,
            IntensityConfig::Constant { value } => IntensityFn::Constant { value },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionConfig {
    #[default]
    Zero,
    PiecewiseBox {
        first_cutoff: f64,
        second_cutoff: f64,
        first_value: f64,
        second_value: f64,
    },
    Cross {
        near_cutoff: f64,
        far_cutoff: f64,
        near_axis: f64,
        near_diagonal: f64,
        far_axis: f64,
        far_diagonal: f64,
    },
}

impl InteractionConfig {
    fn compile(self) -> InteractionFn {
        match self {
            InteractionConfig::Zero => InteractionFn::Zero,
            InteractionConfig::PiecewiseBox {
                first_cutoff,
                second_cutoff,
                first_value,
                second_value,
            } => InteractionFn::PiecewiseBox {
                first_cutoff,
                second_cutoff,
                first_value,
                second_value,
            },
            InteractionConfig::Cross {
                near_cutoff,
                far_cutoff,
                near_axis,
                near_diagonal,
                far_axis,
                far_diagonal,
            } => InteractionFn::Cross {
                near_cutoff,
                far_cutoff,
                near_axis,
                near_diagonal,
                far_axis,
                far_diagonal,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemType {
    pub name: String,
    pub color: Vec<f32>,
    pub blocks_movement: bool,
    pub intensity: IntensityFn,
    /// Indexed by the other item type.
    pub interactions: Vec<InteractionFn>,
}

impl ItemType {
    /// A type with zero intensity and zero interactions against `item_type_count` types.
    pub fn new(name: impl Into<String>, color: Vec<f32>, item_type_count: usize) -> Self {
        Self {
            name: name.into(),
            color,
            blocks_movement: false,
            intensity: IntensityFn::Zero,
            interactions: vec![InteractionFn::Zero; item_type_count],
        }
    }

    pub fn blocking(mut self, blocks_movement: bool) -> Self {
        self.blocks_movement = blocks_movement;
        self
    }

    pub fn with_intensity(mut self, intensity: IntensityFn) -> Self {
        self.intensity = intensity;
        self
    }
}

/// Validated, fixed set of item types and their energy functions.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    types: Vec<ItemType>,
    color_dimension: usize,
}

impl ItemCatalog {
    pub fn new(types: Vec<ItemType>) -> Result<Self, CatalogError> {
        let first = types.first().ok_or(CatalogError::Empty)?;
        let color_dimension = first.color.len();

        let mut seen = HashMap::with_capacity(types.len());
        for (index, item) in types.iter().enumerate() {
            if seen.insert(item.name.as_str(), index).is_some() {
                return Err(CatalogError::DuplicateName(item.name.clone()));
            }
            if item.color.is_empty() {
                return Err(CatalogError::EmptyColor {
                    item: item.name.clone(),
                });
            }
            if item.color.len() != color_dimension {
                return Err(CatalogError::ColorDimension {
                    item: item.name.clone(),
                    expected: color_dimension,
                    found: item.color.len(),
                });
            }
            if item.interactions.len() != types.len() {
                return Err(CatalogError::InvalidParameter {
                    item: item.name.clone(),
                    reason: format!(
                        "{} interaction functions for {} item types",
                        item.interactions.len(),
                        types.len()
                    ),
                });
            }
            item.intensity
                .check()
                .map_err(|reason| CatalogError::InvalidParameter {
                    item: item.name.clone(),
                    reason,
                })?;
            for f in &item.interactions {
                f.check().map_err(|reason| CatalogError::InvalidParameter {
                    item: item.name.clone(),
                    reason,
                })?;
            }
        }

        Ok(Self {
            types,
            color_dimension,
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let count = config.item_types.len();
        let index: HashMap<&str, usize> = config
            .item_types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.as_str(), i))
            .collect();

        let mut types = Vec::with_capacity(count);
        for raw in &config.item_types {
            let mut item = ItemType::new(raw.name.clone(), raw.color.clone(), count)
                .blocking(raw.blocks_movement)
                .with_intensity(raw.intensity.compile());
            for (target, interaction) in &raw.interactions {
                let Some(&other) = index.get(target.as_str()) else {
                    return Err(CatalogError::UnknownItem {
                        item: raw.name.clone(),
                        target: target.clone(),
                    });
                };
                item.interactions[other] = interaction.compile();
            }
            types.push(item);
        }

        Self::new(types)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn color_dimension(&self) -> usize {
        self.color_dimension
    }

    pub fn get(&self, index: usize) -> Option<&ItemType> {
        self.types.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemType> {
        self.types.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.types.iter().position(|t| t.name == name)
    }

    pub fn set_intensity(&mut self, item: usize, intensity: IntensityFn) -> Result<(), CatalogError> {
        let len = self.len();
        let entry = self
            .types
            .get_mut(item)
            .ok_or(CatalogError::IndexOutOfRange { index: item, len })?;
        intensity
            .check()
            .map_err(|reason| CatalogError::InvalidParameter {
                item: entry.name.clone(),
                reason,
            })?;
        entry.intensity = intensity;
        Ok(())
    }

    /// Set the interaction felt by `first` from an existing `second` item.
    pub fn set_interaction(
        &mut self,
        first: usize,
        second: usize,
        interaction: InteractionFn,
    ) -> Result<(), CatalogError> {
        let len = self.len();
        if second >= len {
            return Err(CatalogError::IndexOutOfRange { index: second, len });
        }
        let entry = self
            .types
            .get_mut(first)
            .ok_or(CatalogError::IndexOutOfRange { index: first, len })?;
        interaction
            .check()
            .map_err(|reason| CatalogError::InvalidParameter {
                item: entry.name.clone(),
                reason,
            })?;
        entry.interactions[second] = interaction;
        Ok(())
    }
}

impl EnergyModel for ItemCatalog {
    fn item_type_count(&self) -> usize {
        self.types.len()
    }

    fn intensity(&self, position: Position, item_type: usize) -> f64 {
        self.types[item_type].intensity.eval(position, item_type)
    }

    fn interaction(&self, a: Position, b: Position, type_a: usize, type_b: usize) -> f64 {
        self.types[type_a].interactions[type_b].eval(a, b, type_a, type_b)
    }
}
