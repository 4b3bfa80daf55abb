use std::collections::BTreeMap;

use jbw_agent::{AgentActions, VisionSource};
use jbw_core::{ActionStatus, Direction, Position, SplitMix64, WorldMut, WorldView};
use jbw_gen::{ItemCatalog, PatchMap};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{ConfigError, SimConfig};

/// Cells `add_agent` examines along +x before giving up.
const PLACEMENT_SCAN_LIMIT: i64 = 1 << 16;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no free cell within {limit} cells of the origin along +x")]
    NoFreeCell { limit: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub position: Position,
    pub facing: Direction,
    /// Items collected so far, per item type.
    pub collected: Vec<u64>,
    vision: Vec<f32>,
}

impl AgentState {
    pub fn vision(&self) -> &[f32] {
        &self.vision
    }

    pub fn total_collected(&self) -> u64 {
        self.collected.iter().sum()
    }
}

#[derive(Debug)]
pub struct Simulator {
    config: SimConfig,
    catalog: ItemCatalog,
    map: PatchMap,
    rng: SplitMix64,
    agents: BTreeMap<u64, AgentState>,
    next_agent: u64,
    time: u64,
}

impl Simulator {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        let catalog = config.validate()?;
        let map = PatchMap::new(config.patch_size, catalog.len());
        let rng = SplitMix64::new(config.seed);
        Ok(Self {
            config,
            catalog,
            map,
            rng,
            agents: BTreeMap::new(),
            next_agent: 0,
            time: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn map(&self) -> &PatchMap {
        &self.map
    }

    pub fn agent(&self, id: u64) -> Option<&AgentState> {
        self.agents.get(&id)
    }

    pub fn agents(&self) -> impl Iterator<Item = (u64, &AgentState)> {
        self.agents.iter().map(|(id, state)| (*id, state))
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    /// Advance the clock by one tick, returning the new time.
    pub fn step(&mut self) -> u64 {
        self.time += 1;
        self.time
    }

    /// Place a new agent facing up at the origin, or at the first cell along
    /// +x that holds neither a blocking item nor another agent.
    pub fn add_agent(&mut self) -> Result<u64, SimError> {
        let mut position = None;
        for x in 0..PLACEMENT_SCAN_LIMIT {
            let candidate = Position::new(x, 0);
            self.generate_around(candidate);
            if self.is_free(candidate) {
                position = Some(candidate);
                break;
            }
        }
        let position = position.ok_or(SimError::NoFreeCell {
            limit: PLACEMENT_SCAN_LIMIT,
        })?;

        let id = self.next_agent;
        self.next_agent += 1;
        self.agents.insert(
            id,
            AgentState {
                position,
                facing: Direction::Up,
                collected: vec![0; self.catalog.len()],
                vision: Vec::new(),
            },
        );
        self.render_all_vision();
        debug!(agent = id, position = %position, "agent added");
        Ok(id)
    }

    /// Item type at a world cell, if any.
    pub fn item_at(&self, position: Position) -> Option<usize> {
        self.map.item_at(position)
    }

    /// Place an item by hand. Fails if the cell holds an item or an agent.
    pub fn insert_item(&mut self, position: Position, item_type: usize) -> bool {
        if self.agent_at(position).is_some() || !self.map.insert_item(position, item_type) {
            return false;
        }
        self.render_all_vision();
        true
    }

    pub fn remove_item(&mut self, position: Position) -> Option<usize> {
        let removed = self.map.remove_item(position);
        if removed.is_some() {
            self.render_all_vision();
        }
        removed
    }

    fn agent_at(&self, position: Position) -> Option<u64> {
        self.agents
            .iter()
            .find(|(_, state)| state.position == position)
            .map(|(id, _)| *id)
    }

    fn blocks(&self, position: Position) -> bool {
        self.map
            .item_at(position)
            .and_then(|t| self.catalog.get(t))
            .is_some_and(|item| item.blocks_movement)
    }

    fn is_free(&self, position: Position) -> bool {
        !self.blocks(position) && self.agent_at(position).is_none()
    }

    fn generate_around(&mut self, center: Position) {
        let radius = self.config.vision_radius.max(0) as u32;
        self.map.generate_around(
            center,
            radius,
            &self.catalog,
            &mut self.rng,
            self.config.mcmc_iterations,
        );
    }

    fn render_vision(&self, state: &AgentState) -> Vec<f32> {
        let r = i64::from(self.config.vision_radius.max(0));
        let dim = self.config.color_dimension;
        let side = (2 * r + 1) as usize;
        let mut vision = vec![0.0; side * side * dim];
        for x in -r..=r {
            for y in -r..=r {
                let world = state.position + state.facing.rotate(Position::new(x, y));
                let color = if self.agent_at(world).is_some() {
                    Some(self.config.agent_color.as_slice())
                } else {
                    self.map
                        .item_at(world)
                        .and_then(|t| self.catalog.get(t))
                        .map(|item| item.color.as_slice())
                };
                if let Some(color) = color {
                    let start = ((x + r) as usize * side + (y + r) as usize) * dim;
                    vision[start..start + dim].copy_from_slice(color);
                }
            }
        }
        vision
    }

    fn render_all_vision(&mut self) {
        let rendered: Vec<(u64, Vec<f32>)> = self
            .agents
            .iter()
            .map(|(id, state)| (*id, self.render_vision(state)))
            .collect();
        for (id, vision) in rendered {
            if let Some(state) = self.agents.get_mut(&id) {
                state.vision = vision;
            }
        }
    }

    /// Regenerate around the agent and refresh every agent's view.
    fn after_action(&mut self, agent: u64) {
        if let Some(position) = self.agents.get(&agent).map(|s| s.position) {
            self.generate_around(position);
        }
        self.render_all_vision();
    }
}

impl WorldView for Simulator {
    type Agent = u64;
}

impl WorldMut for Simulator {}

impl VisionSource for Simulator {
    fn vision(&self, agent: u64) -> Option<&[f32]> {
        self.agents.get(&agent).map(AgentState::vision)
    }

    fn vision_radius(&self) -> i32 {
        self.config.vision_radius
    }

    fn color_dimension(&self) -> usize {
        self.config.color_dimension
    }
}

impl AgentActions for Simulator {
    fn move_agent(&mut self, agent: u64, direction: Direction, steps: u32) -> ActionStatus {
        let Some(state) = self.agents.get(&agent) else {
            return ActionStatus::UnknownAgent;
        };
        if !self.config.allowed_moves.contains(&direction)
            || steps == 0
            || steps > self.config.max_steps_per_movement
        {
            return ActionStatus::Disallowed;
        }

        let offset = state.facing.relative(direction).offset();
        let from = state.position;
        for step in 1..=i64::from(steps) {
            if !self.is_free(from + offset * step) {
                trace!(agent, from = %from, "move blocked");
                return ActionStatus::Blocked;
            }
        }

        let to = from + offset * i64::from(steps);
        let collected = self.map.remove_item(to);
        if let Some(state) = self.agents.get_mut(&agent) {
            state.position = to;
            if let Some(item_type) = collected {
                state.collected[item_type] += 1;
                debug!(agent, item = item_type, position = %to, "item collected");
            }
        }
        self.after_action(agent);
        ActionStatus::Ok
    }

    fn turn_agent(&mut self, agent: u64, direction: Direction) -> ActionStatus {
        if !self.agents.contains_key(&agent) {
            return ActionStatus::UnknownAgent;
        }
        if !self.config.allowed_turns.contains(&direction) {
            return ActionStatus::Disallowed;
        }
        if let Some(state) = self.agents.get_mut(&agent) {
            state.facing = state.facing.relative(direction);
        }
        self.after_action(agent);
        ActionStatus::Ok
    }
}
