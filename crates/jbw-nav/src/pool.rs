//! Reference-counted search nodes.
//!
//! Each node holds one count for its own frontier entry plus one per child
//! that names it as predecessor. Releasing a node whose count drops to zero
//! frees it and releases its predecessor in turn.

use jbw_core::{Direction, Position};

use crate::PlanStep;

/// Handle to a pooled node. Handles to freed slots go stale and are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    pub cost: u32,
    pub position: Position,
    pub facing: Direction,
    pub prev: Option<NodeId>,
    refs: u32,
}

impl SearchNode {
    pub fn ref_count(&self) -> u32 {
        self.refs
    }

    fn step(&self) -> PlanStep {
        PlanStep {
            cost: self.cost,
            position: self.position,
            facing: self.facing,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub allocated: u64,
    pub released: u64,
}

impl PoolStats {
    pub fn outstanding(&self) -> u64 {
        self.allocated - self.released
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<SearchNode>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchNodePool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    stats: PoolStats,
}

impl SearchNodePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with no predecessor and cost 0.
    pub fn allocate_root(&mut self, position: Position, facing: Direction) -> NodeId {
        self.insert(SearchNode {
            cost: 0,
            position,
            facing,
            prev: None,
            refs: 1,
        })
    }

    /// Allocate a successor of `parent` one step further along, taking a
    /// reference on `parent`. `None` if `parent` is stale.
    pub fn allocate_child(
        &mut self,
        parent: NodeId,
        position: Position,
        facing: Direction,
    ) -> Option<NodeId> {
        let parent_node = self.get_mut(parent)?;
        parent_node.refs += 1;
        let cost = parent_node.cost + 1;
        Some(self.insert(SearchNode {
            cost,
            position,
            facing,
            prev: Some(parent),
            refs: 1,
        }))
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut SearchNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Take an extra reference on a live node.
    pub fn retain(&mut self, id: NodeId) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.refs += 1;
                true
            }
            None => false,
        }
    }

    /// Drop one reference, freeing the node and cascading to its predecessors
    /// as counts reach zero. Returns `false` (and does nothing) for a stale id.
    pub fn release(&mut self, id: NodeId) -> bool {
        if self.get(id).is_none() {
            return false;
        }

        let mut next = Some(id);
        while let Some(id) = next {
            let Some(slot) = self
                .slots
                .get_mut(id.index as usize)
                .filter(|slot| slot.generation == id.generation)
            else {
                debug_assert!(false, "predecessor {id:?} freed before its dependents");
                break;
            };
            let Some(node) = slot.node.as_mut() else {
                break;
            };

            node.refs -= 1;
            if node.refs > 0 {
                break;
            }
            next = node.prev;
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            self.live -= 1;
            self.stats.released += 1;
        }
        true
    }

    /// The chain from the root to `id`, root first. Empty for a stale id.
    pub fn chain(&self, id: NodeId) -> Vec<PlanStep> {
        let mut steps = Vec::new();
        let mut next = Some(id);
        while let Some(node) = next.and_then(|id| self.get(id)) {
            steps.push(node.step());
            next = node.prev;
        }
        steps.reverse();
        steps
    }

    /// Nodes currently allocated.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    fn insert(&mut self, node: SearchNode) -> NodeId {
        self.live += 1;
        self.stats.allocated += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releasing_a_leaf_cascades_to_unreferenced_ancestors() {
        let mut pool = SearchNodePool::new();
        let root = pool.allocate_root(Position::ORIGIN, Direction::Up);
        let a = pool.allocate_child(root, Position::new(0, 1), Direction::Up).unwrap();
        let b = pool.allocate_child(a, Position::new(0, 1), Direction::Left).unwrap();
        let c = pool.allocate_child(a, Position::new(0, 1), Direction::Right).unwrap();
        assert_eq!(pool.get(b).unwrap().cost, 2);
        assert_eq!(pool.get(a).unwrap().ref_count(), 3);

        // Frontier entries for root and a are done.
        assert!(pool.release(root));
        assert!(pool.release(a));
        assert_eq!(pool.live(), 4);

        assert!(pool.release(b));
        assert_eq!(pool.live(), 3);
        assert!(pool.release(c));
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.stats().outstanding(), 0);
        assert_eq!(pool.stats().allocated, 4);
    }

    #[test]
    fn stale_ids_are_rejected_after_reuse() {
        let mut pool = SearchNodePool::new();
        let first = pool.allocate_root(Position::ORIGIN, Direction::Up);
        assert!(pool.release(first));
        assert!(!pool.release(first));
        assert!(!pool.retain(first));

        let second = pool.allocate_root(Position::new(1, 1), Direction::Down);
        assert_ne!(first, second);
        assert!(pool.get(first).is_none());
        assert!(pool.allocate_child(first, Position::ORIGIN, Direction::Up).is_none());
        assert_eq!(pool.get(second).unwrap().position, Position::new(1, 1));
        assert_eq!(pool.stats().released, 1);
    }

    #[test]
    fn chain_runs_root_first() {
        let mut pool = SearchNodePool::new();
        let root = pool.allocate_root(Position::ORIGIN, Direction::Up);
        let turn = pool.allocate_child(root, Position::ORIGIN, Direction::Right).unwrap();
        let step = pool.allocate_child(turn, Position::new(1, 0), Direction::Right).unwrap();

        let chain = pool.chain(step);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].cost, 0);
        assert_eq!(chain[2].position, Position::new(1, 0));
        assert!(chain.windows(2).all(|w| w[1].cost == w[0].cost + 1));
    }
}
