use core::cmp::Ordering;
use std::collections::BinaryHeap;

use jbw_core::{Direction, Position};
use tracing::trace;

use crate::{NavError, NodeId, Plan, SearchNodePool, VisionWindow};

#[derive(Debug)]
struct OpenNode {
    cost: u32,
    tie: u64,
    node: NodeId,
}

impl OpenNode {
    fn key(&self) -> (u32, u64) {
        (self.cost, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Counters from the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expanded: usize,
    pub generated: usize,
    pub pruned: usize,
}

/// Uniform-cost search from `(origin, Up)` to the nearest goal-colored cell.
///
/// The planner owns its node pool and best-cost table and reuses both across
/// calls; one planner per agent.
#[derive(Debug, Default)]
pub struct ShortestPathPlanner {
    pool: SearchNodePool,
    best_costs: Vec<u32>,
    open: BinaryHeap<OpenNode>,
    last_stats: SearchStats,
}

impl ShortestPathPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&self) -> &SearchNodePool {
        &self.pool
    }

    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Cheapest action sequence that ends on a cell (other than the origin)
    /// matching `goal`. Forward moves may not leave the window or enter a
    /// cell matching `wall`. `Ok(None)` when no goal is reachable.
    ///
    /// Among equally cheap plans the one whose states were queued first wins;
    /// successors are queued forward, left, right.
    pub fn find_path(
        &mut self,
        vision: &VisionWindow<'_>,
        goal: &[f32],
        wall: &[f32],
    ) -> Result<Option<Plan>, NavError> {
        check_signature("goal", goal, vision.color_dimension())?;
        check_signature("wall", wall, vision.color_dimension())?;

        let side = vision.side();
        self.best_costs.clear();
        self.best_costs.resize(side * side * 4, u32::MAX);
        self.open.clear();
        self.last_stats = SearchStats::default();

        let mut tie: u64 = 0;
        let root = self.pool.allocate_root(Position::ORIGIN, Direction::Up);
        if let Some(slot) = state_key(vision, Position::ORIGIN, Direction::Up) {
            self.best_costs[slot] = 0;
        }
        self.open.push(OpenNode {
            cost: 0,
            tie,
            node: root,
        });
        tie += 1;

        let mut found = None;
        while let Some(open) = self.open.pop() {
            let Some(state) = self.pool.get(open.node).copied() else {
                continue;
            };
            self.last_stats.expanded += 1;

            if state.position != Position::ORIGIN && vision.matches(state.position, goal) {
                found = Some(open.node);
                break;
            }

            let ahead = state.position + state.facing.offset();
            let forward = (vision.contains(ahead) && !vision.matches(ahead, wall))
                .then_some((ahead, state.facing));
            let successors = [
                forward,
                Some((state.position, state.facing.turn_left())),
                Some((state.position, state.facing.turn_right())),
            ];

            let cost = state.cost + 1;
            for (position, facing) in successors.into_iter().flatten() {
                let Some(slot) = state_key(vision, position, facing) else {
                    continue;
                };
                if cost >= self.best_costs[slot] {
                    self.last_stats.pruned += 1;
                    continue;
                }
                self.best_costs[slot] = cost;

                let Some(child) = self.pool.allocate_child(open.node, position, facing) else {
                    continue;
                };
                self.last_stats.generated += 1;
                self.open.push(OpenNode {
                    cost,
                    tie,
                    node: child,
                });
                tie += 1;
            }

            self.pool.release(open.node);
        }

        let plan = self.finish(found)?;
        trace!(
            expanded = self.last_stats.expanded,
            generated = self.last_stats.generated,
            pruned = self.last_stats.pruned,
            cost = plan.as_ref().map(Plan::cost),
            "local search finished"
        );
        Ok(plan)
    }

    /// Copy out the chain ending at `found` and return every search node to
    /// the pool.
    fn finish(&mut self, found: Option<NodeId>) -> Result<Option<Plan>, NavError> {
        let steps = found.map(|goal_node| {
            let steps = self.pool.chain(goal_node);
            self.pool.release(goal_node);
            steps
        });
        while let Some(open) = self.open.pop() {
            self.pool.release(open.node);
        }
        debug_assert_eq!(self.pool.live(), 0, "search nodes leaked");

        Ok(steps.map(Plan::from_steps).transpose()?)
    }
}

fn check_signature(name: &'static str, signature: &[f32], expected: usize) -> Result<(), NavError> {
    if signature.len() != expected {
        return Err(NavError::SignatureLength {
            name,
            expected,
            found: signature.len(),
        });
    }
    Ok(())
}

fn state_key(vision: &VisionWindow<'_>, position: Position, facing: Direction) -> Option<usize> {
    Some(vision.cell_index(position)? * 4 + facing.index())
}
