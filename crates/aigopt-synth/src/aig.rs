//! And-Inverter Graph (AIG) Data Structure
//!
//! AIGs represent Boolean functions using only AND gates and inverters.
//! Nodes live in an append-only arena; a node that loses every reference
//! during substitution is marked dead instead of being removed, so node IDs
//! stay stable for the lifetime of the graph.
//!
//! After [`Aig::substitute_node`] storage order is no longer guaranteed to be
//! topological: a gate may refer to a fanin created after it. Anything that
//! needs fanins before fanouts goes through [`Aig::topological_order`].

use crate::error::{Result, SynthError};
use std::collections::HashMap;

/// Unique identifier for an AIG node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AigNodeId(pub u32);

impl AigNodeId {
    /// The constant false node
    pub const FALSE: AigNodeId = AigNodeId(0);

    /// Arena index of this node
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A literal in the AIG (node reference with optional inversion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AigLit {
    /// The referenced node
    pub node: AigNodeId,
    /// Whether this reference is inverted
    pub inverted: bool,
}

impl AigLit {
    /// Create a new positive literal
    pub fn new(node: AigNodeId) -> Self {
        Self {
            node,
            inverted: false,
        }
    }

    /// Create a new negative (inverted) literal
    pub fn not(node: AigNodeId) -> Self {
        Self {
            node,
            inverted: true,
        }
    }

    /// Create the constant false literal
    pub fn false_lit() -> Self {
        Self::new(AigNodeId::FALSE)
    }

    /// Create the constant true literal
    pub fn true_lit() -> Self {
        Self::not(AigNodeId::FALSE)
    }

    /// Invert this literal
    pub fn invert(self) -> Self {
        Self {
            node: self.node,
            inverted: !self.inverted,
        }
    }

    /// Invert this literal when `cond` holds
    pub fn invert_if(self, cond: bool) -> Self {
        Self {
            node: self.node,
            inverted: self.inverted ^ cond,
        }
    }

    /// Check if this is a constant
    pub fn is_const(&self) -> bool {
        self.node == AigNodeId::FALSE
    }

    /// Get constant value if this is a constant literal
    pub fn const_value(&self) -> Option<bool> {
        if self.is_const() {
            Some(self.inverted)
        } else {
            None
        }
    }
}

/// An AIG node
#[derive(Debug, Clone)]
pub enum AigNode {
    /// Constant false (node 0)
    Const,

    /// Primary input
    Input {
        /// Input name
        name: String,
    },

    /// AND gate with two inputs
    And {
        /// Left input
        left: AigLit,
        /// Right input
        right: AigLit,
    },

    /// Latch (sequential element)
    ///
    /// The latch output is a combinational source at level 0; its data input
    /// is a combinational sink, like a primary output.
    Latch {
        /// Data input
        data: AigLit,
        /// Initial value (if known)
        init: Option<bool>,
    },
}

impl AigNode {
    /// Check if this is an AND node
    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And { .. })
    }

    /// Check if this is an input node
    pub fn is_input(&self) -> bool {
        matches!(self, AigNode::Input { .. })
    }

    /// Check if this is a latch
    pub fn is_latch(&self) -> bool {
        matches!(self, AigNode::Latch { .. })
    }

    /// Check if this is the constant node
    pub fn is_const(&self) -> bool {
        matches!(self, AigNode::Const)
    }

    /// Check if this node starts a combinational path (constant, input or latch output)
    pub fn is_ci(&self) -> bool {
        !self.is_and()
    }

    /// Get the fanin literals for this node
    pub fn fanins(&self) -> Vec<AigLit> {
        match self {
            AigNode::Const | AigNode::Input { .. } => vec![],
            AigNode::And { left, right } => vec![*left, *right],
            AigNode::Latch { data, .. } => vec![*data],
        }
    }

    /// Number of fanin literals
    pub fn fanin_size(&self) -> usize {
        match self {
            AigNode::Const | AigNode::Input { .. } => 0,
            AigNode::And { .. } => 2,
            AigNode::Latch { .. } => 1,
        }
    }
}

/// And-Inverter Graph
#[derive(Debug, Clone)]
pub struct Aig {
    /// Design name
    pub name: String,

    /// All nodes (index 0 is always the constant false node)
    nodes: Vec<AigNode>,

    /// Primary outputs as (name, literal) pairs
    outputs: Vec<(String, AigLit)>,

    /// Structural hash for live AND nodes: (left, right) -> node_id
    strash_map: HashMap<(AigLit, AigLit), AigNodeId>,

    /// Number of references to each node (gate fanins, outputs, latch data)
    fanout_counts: Vec<u32>,

    /// Retired nodes (parallel to nodes vec)
    dead: Vec<bool>,
}

impl Aig {
    /// Create a new empty AIG
    pub fn new(name: String) -> Self {
        let mut aig = Self {
            name,
            nodes: Vec::new(),
            outputs: Vec::new(),
            strash_map: HashMap::new(),
            fanout_counts: Vec::new(),
            dead: Vec::new(),
        };

        // Node 0 is always constant false
        aig.push_node(AigNode::Const);

        aig
    }

    fn push_node(&mut self, node: AigNode) -> AigNodeId {
        let id = AigNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.fanout_counts.push(0);
        self.dead.push(false);
        id
    }

    /// Number of arena slots, including retired nodes
    pub fn arena_size(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of live nodes (including the constant)
    pub fn node_count(&self) -> usize {
        self.dead.iter().filter(|&&d| !d).count()
    }

    /// Get the number of live AND nodes
    pub fn and_count(&self) -> usize {
        self.iter_nodes().filter(|(_, n)| n.is_and()).count()
    }

    /// Get the number of input nodes
    pub fn input_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_input()).count()
    }

    /// Get the number of latch nodes
    pub fn latch_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_latch()).count()
    }

    /// Get the number of outputs
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Get a node by ID (retired nodes are still returned)
    pub fn get_node(&self, id: AigNodeId) -> Option<&AigNode> {
        self.nodes.get(id.index())
    }

    /// Check whether a node has been retired by substitution
    pub fn is_dead(&self, id: AigNodeId) -> bool {
        self.dead.get(id.index()).copied().unwrap_or(false)
    }

    /// Number of fanins of a node, 0 for unknown IDs
    pub fn fanin_size(&self, id: AigNodeId) -> usize {
        self.get_node(id).map_or(0, AigNode::fanin_size)
    }

    /// Number of references to a node
    pub fn fanout_size(&self, id: AigNodeId) -> u32 {
        self.fanout_counts.get(id.index()).copied().unwrap_or(0)
    }

    /// Get all outputs
    pub fn outputs(&self) -> &[(String, AigLit)] {
        &self.outputs
    }

    /// Iterate over all live nodes
    pub fn iter_nodes(&self) -> impl Iterator<Item = (AigNodeId, &AigNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.dead[*i])
            .map(|(i, n)| (AigNodeId(i as u32), n))
    }

    /// Iterate over all live AND nodes
    pub fn iter_and_nodes(&self) -> impl Iterator<Item = (AigNodeId, AigLit, AigLit)> + '_ {
        self.iter_nodes().filter_map(|(id, n)| match n {
            AigNode::And { left, right } => Some((id, *left, *right)),
            _ => None,
        })
    }

    /// Snapshot of the live AND nodes in storage order
    pub fn gate_ids(&self) -> Vec<AigNodeId> {
        self.iter_and_nodes().map(|(id, _, _)| id).collect()
    }

    /// Iterate over all input nodes
    pub fn iter_inputs(&self) -> impl Iterator<Item = (AigNodeId, &str)> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
            AigNode::Input { name } => Some((AigNodeId(i as u32), name.as_str())),
            _ => None,
        })
    }

    /// Iterate over all latch nodes with their data inputs
    pub fn iter_latches(&self) -> impl Iterator<Item = (AigNodeId, AigLit, Option<bool>)> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| match n {
            AigNode::Latch { data, init } => Some((AigNodeId(i as u32), *data, *init)),
            _ => None,
        })
    }

    /// Add a primary input
    pub fn add_input(&mut self, name: impl Into<String>) -> AigNodeId {
        self.push_node(AigNode::Input { name: name.into() })
    }

    /// Add an AND gate with structural hashing
    pub fn add_and(&mut self, mut left: AigLit, mut right: AigLit) -> AigLit {
        // Normalize: smaller node ID first (for structural hashing)
        if left.node.0 > right.node.0 {
            std::mem::swap(&mut left, &mut right);
        }

        // a & 0 = 0
        if left.is_const() && !left.inverted {
            return AigLit::false_lit();
        }
        // a & 1 = a
        if left.is_const() && left.inverted {
            return right;
        }
        // a & a = a
        if left == right {
            return left;
        }
        // a & !a = 0
        if left.node == right.node {
            return AigLit::false_lit();
        }

        let key = (left, right);
        if let Some(&existing) = self.strash_map.get(&key) {
            return AigLit::new(existing);
        }

        let id = self.push_node(AigNode::And { left, right });
        self.fanout_counts[left.node.index()] += 1;
        self.fanout_counts[right.node.index()] += 1;
        self.strash_map.insert(key, id);
        AigLit::new(id)
    }

    /// Build a NAND gate: !(a & b)
    pub fn add_nand(&mut self, left: AigLit, right: AigLit) -> AigLit {
        self.add_and(left, right).invert()
    }

    /// Build an OR gate: a | b = !(!a & !b)
    pub fn add_or(&mut self, left: AigLit, right: AigLit) -> AigLit {
        self.add_nand(left.invert(), right.invert())
    }

    /// Build an XOR gate: a ^ b = (a & !b) | (!a & b)
    pub fn add_xor(&mut self, left: AigLit, right: AigLit) -> AigLit {
        let and1 = self.add_and(left, right.invert());
        let and2 = self.add_and(left.invert(), right);
        self.add_or(and1, and2)
    }

    /// Build a MUX: sel ? then : else = (sel & then) | (!sel & else)
    pub fn add_mux(&mut self, sel: AigLit, then_lit: AigLit, else_lit: AigLit) -> AigLit {
        let sel_then = self.add_and(sel, then_lit);
        let not_sel_else = self.add_and(sel.invert(), else_lit);
        self.add_or(sel_then, not_sel_else)
    }

    /// Add a latch (sequential element)
    pub fn add_latch(&mut self, data: AigLit, init: Option<bool>) -> AigNodeId {
        let id = self.push_node(AigNode::Latch { data, init });
        self.fanout_counts[data.node.index()] += 1;
        id
    }

    /// Point a latch at a new data input (for closing feedback loops)
    pub fn update_latch_data(&mut self, latch: AigNodeId, new_data: AigLit) {
        let Some(AigNode::Latch { data, .. }) = self.nodes.get_mut(latch.index()) else {
            return;
        };
        let old_data = std::mem::replace(data, new_data);
        self.fanout_counts[new_data.node.index()] += 1;
        self.release(old_data.node);
    }

    /// Add a primary output
    pub fn add_output(&mut self, name: impl Into<String>, lit: AigLit) {
        if let Some(count) = self.fanout_counts.get_mut(lit.node.index()) {
            *count += 1;
        }
        self.outputs.push((name.into(), lit));
    }

    /// Drop one reference to a node, retiring it when none are left
    fn release(&mut self, id: AigNodeId) {
        let count = &mut self.fanout_counts[id.index()];
        if *count == 0 {
            return;
        }
        *count -= 1;
        if *count == 0 {
            self.take_out_node(id);
        }
    }

    /// Replace every reference to `old` with `new`
    ///
    /// Gate fanins, primary outputs and latch data inputs are retargeted.
    /// A fanout whose updated fanins simplify trivially, or collide with an
    /// existing gate in the structural hash, is itself substituted in turn.
    /// `old` is retired afterwards, together with any part of its fanin cone
    /// left without references.
    pub fn substitute_node(&mut self, old: AigNodeId, new: AigLit) {
        let mut old_to_new: HashMap<AigNodeId, AigLit> = HashMap::new();
        let mut pending = vec![(old, new)];

        while let Some((old, mut new)) = pending.pop() {
            // The replacement may have been retired earlier in the cascade
            while self.is_dead(new.node) {
                match old_to_new.get(&new.node) {
                    Some(&next) => new = next.invert_if(new.inverted),
                    None => break,
                }
            }
            if self.is_dead(new.node) {
                self.revive_node(new.node);
            }

            for idx in 1..self.nodes.len() {
                if self.dead[idx] || !self.nodes[idx].is_and() {
                    continue;
                }
                if let Some(repl) = self.replace_in_node(AigNodeId(idx as u32), old, new) {
                    pending.push(repl);
                }
            }

            self.replace_in_outputs(old, new);

            if old != new.node {
                self.take_out_node(old);
            }
            old_to_new.insert(old, new);
        }
    }

    /// Retarget the fanin of gate `id` that points at `old`
    ///
    /// Returns the gate and the signal it should be substituted by when the
    /// updated gate is redundant.
    fn replace_in_node(
        &mut self,
        id: AigNodeId,
        old: AigNodeId,
        new: AigLit,
    ) -> Option<(AigNodeId, AigLit)> {
        let AigNode::And { left, right } = self.nodes[id.index()] else {
            return None;
        };

        let (kept, replaced) = if left.node == old {
            (right, new.invert_if(left.inverted))
        } else if right.node == old {
            (left, new.invert_if(right.inverted))
        } else {
            return None;
        };

        let (mut child0, mut child1) = (kept, replaced);
        if child0.node.0 > child1.node.0 {
            std::mem::swap(&mut child0, &mut child1);
        }

        if child0.node == child1.node {
            let lit = if child0.inverted != child1.inverted {
                AigLit::false_lit()
            } else {
                child1
            };
            return Some((id, lit));
        }
        if child0.is_const() {
            let lit = if child0.inverted {
                child1
            } else {
                AigLit::false_lit()
            };
            return Some((id, lit));
        }

        if let Some(&existing) = self.strash_map.get(&(child0, child1)) {
            if existing != old {
                return Some((id, AigLit::new(existing)));
            }
        }

        if self.strash_map.get(&(left, right)) == Some(&id) {
            self.strash_map.remove(&(left, right));
        }
        self.nodes[id.index()] = AigNode::And {
            left: child0,
            right: child1,
        };
        self.strash_map.insert((child0, child1), id);
        self.fanout_counts[replaced.node.index()] += 1;

        None
    }

    /// Retarget primary outputs and latch data inputs that point at `old`
    fn replace_in_outputs(&mut self, old: AigNodeId, new: AigLit) {
        if self.is_dead(old) {
            return;
        }

        let mut added = 0;
        for (_, lit) in self.outputs.iter_mut() {
            if lit.node == old {
                *lit = new.invert_if(lit.inverted);
                added += 1;
            }
        }
        for node in self.nodes.iter_mut() {
            if let AigNode::Latch { data, .. } = node {
                if data.node == old {
                    *data = new.invert_if(data.inverted);
                    added += 1;
                }
            }
        }

        if old != new.node {
            self.fanout_counts[new.node.index()] += added;
        }
    }

    /// Retire a gate and every fanin left without references
    fn take_out_node(&mut self, id: AigNodeId) {
        let mut stack = vec![id];

        while let Some(id) = stack.pop() {
            let idx = id.index();
            // Constants, inputs and latches are never retired
            if self.dead[idx] || !self.nodes[idx].is_and() {
                continue;
            }
            let AigNode::And { left, right } = self.nodes[idx] else {
                continue;
            };

            self.dead[idx] = true;
            self.fanout_counts[idx] = 0;
            if self.strash_map.get(&(left, right)) == Some(&id) {
                self.strash_map.remove(&(left, right));
            }

            for fanin in [left, right] {
                let count = &mut self.fanout_counts[fanin.node.index()];
                if *count == 0 {
                    continue;
                }
                *count -= 1;
                if *count == 0 {
                    stack.push(fanin.node);
                }
            }
        }
    }

    /// Bring a retired gate (and its retired fanins) back to life
    fn revive_node(&mut self, id: AigNodeId) {
        let mut stack = vec![id];

        while let Some(id) = stack.pop() {
            let idx = id.index();
            if !self.dead[idx] {
                continue;
            }
            self.dead[idx] = false;

            if let AigNode::And { left, right } = self.nodes[idx] {
                self.strash_map.entry((left, right)).or_insert(id);
                for fanin in [left, right] {
                    self.fanout_counts[fanin.node.index()] += 1;
                    if self.dead[fanin.node.index()] {
                        stack.push(fanin.node);
                    }
                }
            }
        }
    }

    /// Live nodes ordered so that every gate comes after its fanins
    pub fn topological_order(&self) -> Result<Vec<AigNodeId>> {
        let roots: Vec<AigNodeId> = self.iter_nodes().map(|(id, _)| id).collect();
        self.cone_order(roots)
    }

    /// Post-order of the combinational fanin cones of `roots`
    ///
    /// Latches end the traversal: their data input is not followed.
    pub fn cone_order(&self, roots: impl IntoIterator<Item = AigNodeId>) -> Result<Vec<AigNodeId>> {
        const UNVISITED: u8 = 0;
        const ON_PATH: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNVISITED; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack: Vec<(AigNodeId, bool)> = Vec::new();

        for root in roots {
            if root.index() >= self.nodes.len() || state[root.index()] != UNVISITED {
                continue;
            }
            stack.push((root, false));

            while let Some((id, expanded)) = stack.pop() {
                let idx = id.index();
                if expanded {
                    state[idx] = DONE;
                    order.push(id);
                    continue;
                }
                if state[idx] == DONE {
                    continue;
                }

                let AigNode::And { left, right } = self.nodes[idx] else {
                    state[idx] = DONE;
                    order.push(id);
                    continue;
                };

                state[idx] = ON_PATH;
                stack.push((id, true));
                for fanin in [left, right] {
                    let f = fanin.node.index();
                    if f >= self.nodes.len() {
                        return Err(SynthError::DanglingFanin {
                            node: id,
                            fanin: fanin.node,
                        });
                    }
                    if self.dead[f] {
                        return Err(SynthError::DeadReference {
                            owner: format!("node {}", id.0),
                            node: fanin.node,
                        });
                    }
                    match state[f] {
                        UNVISITED => stack.push((fanin.node, false)),
                        ON_PATH => return Err(SynthError::CombinationalCycle { node: fanin.node }),
                        _ => {}
                    }
                }
            }
        }

        Ok(order)
    }

    /// Compute the level of every node (retired nodes stay at 0)
    pub fn compute_levels(&self) -> Result<Vec<u32>> {
        let mut levels = vec![0u32; self.nodes.len()];
        for id in self.topological_order()? {
            if let AigNode::And { left, right } = self.nodes[id.index()] {
                levels[id.index()] =
                    levels[left.node.index()].max(levels[right.node.index()]) + 1;
            }
        }
        Ok(levels)
    }

    /// Check that the graph is a well-formed combinational DAG
    ///
    /// Every output and latch data input must refer to an existing live
    /// node, and the live gates must be acyclic.
    pub fn validate(&self) -> Result<()> {
        for (name, lit) in &self.outputs {
            if lit.node.index() >= self.nodes.len() {
                return Err(SynthError::DanglingOutput {
                    name: name.clone(),
                    node: lit.node,
                });
            }
            if self.is_dead(lit.node) {
                return Err(SynthError::DeadReference {
                    owner: format!("output '{}'", name),
                    node: lit.node,
                });
            }
        }

        for (id, data, _) in self.iter_latches() {
            if data.node.index() >= self.nodes.len() {
                return Err(SynthError::DanglingFanin {
                    node: id,
                    fanin: data.node,
                });
            }
            if self.is_dead(data.node) {
                return Err(SynthError::DeadReference {
                    owner: format!("latch {}", id.0),
                    node: data.node,
                });
            }
        }

        self.topological_order().map(|_| ())
    }

    /// Compute AIG statistics
    ///
    /// `max_level` is reported as 0 for a graph that fails [`Aig::validate`].
    pub fn compute_stats(&self) -> AigStats {
        let levels = self.compute_levels().unwrap_or_default();
        let max_level = levels.iter().copied().max().unwrap_or(0);

        let live: Vec<AigNodeId> = self.iter_nodes().map(|(id, _)| id).collect();
        let max_fanout = live
            .iter()
            .map(|id| self.fanout_size(*id))
            .max()
            .unwrap_or(0);
        let avg_fanout = if live.len() > 1 {
            live.iter().map(|id| self.fanout_size(*id)).sum::<u32>() as f64
                / (live.len() - 1) as f64
        } else {
            0.0
        };

        AigStats {
            node_count: live.len(),
            and_count: self.and_count(),
            input_count: self.input_count(),
            output_count: self.output_count(),
            latch_count: self.latch_count(),
            max_level,
            max_fanout,
            avg_fanout,
        }
    }
}

/// Statistics for an AIG
#[derive(Debug, Clone, Default)]
pub struct AigStats {
    /// Live nodes (including const)
    pub node_count: usize,
    /// Number of live AND nodes
    pub and_count: usize,
    /// Number of input nodes
    pub input_count: usize,
    /// Number of output nodes
    pub output_count: usize,
    /// Number of latch nodes
    pub latch_count: usize,
    /// Maximum logic level (depth)
    pub max_level: u32,
    /// Maximum fanout
    pub max_fanout: u32,
    /// Average fanout
    pub avg_fanout: f64,
}

impl std::fmt::Display for AigStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "AIG Statistics:")?;
        writeln!(f, "  Nodes: {} ({} AND)", self.node_count, self.and_count)?;
        writeln!(f, "  Inputs: {}", self.input_count)?;
        writeln!(f, "  Outputs: {}", self.output_count)?;
        writeln!(f, "  Latches: {}", self.latch_count)?;
        writeln!(f, "  Levels: {}", self.max_level)?;
        writeln!(f, "  Max fanout: {}", self.max_fanout)?;
        write!(f, "  Avg fanout: {:.2}", self.avg_fanout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aig_creation() {
        let aig = Aig::new("test".to_string());
        assert_eq!(aig.node_count(), 1); // Just const node
        assert_eq!(aig.and_count(), 0);
    }

    #[test]
    fn test_aig_input() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");

        assert_eq!(aig.input_count(), 2);
        assert!(aig.get_node(a).unwrap().is_input());
        assert!(aig.get_node(b).unwrap().is_input());
        assert_eq!(aig.fanin_size(a), 0);
    }

    #[test]
    fn test_aig_strash() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");

        let and1 = aig.add_and(AigLit::new(a), AigLit::new(b));
        let and2 = aig.add_and(AigLit::new(a), AigLit::new(b));
        let and3 = aig.add_and(AigLit::new(b), AigLit::new(a)); // Order swapped

        assert_eq!(and1, and2);
        assert_eq!(and1, and3);
        assert_eq!(aig.and_count(), 1);
        assert_eq!(aig.fanin_size(and1.node), 2);
    }

    #[test]
    fn test_aig_trivial_cases() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");

        // a & 0 = 0
        let and_zero = aig.add_and(AigLit::new(a), AigLit::false_lit());
        assert_eq!(and_zero, AigLit::false_lit());

        // a & 1 = a
        let and_one = aig.add_and(AigLit::new(a), AigLit::true_lit());
        assert_eq!(and_one, AigLit::new(a));

        // a & a = a
        let and_same = aig.add_and(AigLit::new(a), AigLit::new(a));
        assert_eq!(and_same, AigLit::new(a));

        // a & !a = 0
        let and_comp = aig.add_and(AigLit::new(a), AigLit::not(a));
        assert_eq!(and_comp, AigLit::false_lit());

        assert_eq!(aig.and_count(), 0);
    }

    #[test]
    fn test_aig_nand_and_or() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");

        let nand = aig.add_nand(AigLit::new(a), AigLit::new(b));
        let or = aig.add_or(AigLit::not(a), AigLit::not(b));

        // !a | !b == !(a & b)
        assert!(nand.inverted);
        assert_eq!(nand, or);
        assert_eq!(aig.and_count(), 1);
    }

    #[test]
    fn test_aig_xor_mux() {
        let mut aig = Aig::new("test".to_string());
        let s = aig.add_input("s");
        let a = aig.add_input("a");
        let b = aig.add_input("b");

        let xor = aig.add_xor(AigLit::new(a), AigLit::new(b));
        assert_eq!(aig.and_count(), 3);
        assert!(!xor.is_const());

        let mux = aig.add_mux(AigLit::new(s), AigLit::new(a), AigLit::new(b));
        assert_eq!(aig.and_count(), 6);
        assert!(!mux.is_const());
    }

    #[test]
    fn test_fanout_counts() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");

        let ab = aig.add_and(AigLit::new(a), AigLit::new(b));
        let ab2 = aig.add_and(ab, AigLit::not(a));
        aig.add_output("y", ab2);

        assert_eq!(aig.fanout_size(a), 2);
        assert_eq!(aig.fanout_size(b), 1);
        assert_eq!(aig.fanout_size(ab.node), 1);
        assert_eq!(aig.fanout_size(ab2.node), 1);
    }

    #[test]
    fn test_levels_and_stats() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let c = aig.add_input("c");

        let ab = aig.add_and(AigLit::new(a), AigLit::new(b));
        let abc = aig.add_and(ab, AigLit::new(c));
        aig.add_output("y", abc);

        let levels = aig.compute_levels().unwrap();
        assert_eq!(levels[a.index()], 0);
        assert_eq!(levels[ab.node.index()], 1);
        assert_eq!(levels[abc.node.index()], 2);

        let stats = aig.compute_stats();
        assert_eq!(stats.input_count, 3);
        assert_eq!(stats.and_count, 2);
        assert_eq!(stats.output_count, 1);
        assert_eq!(stats.max_level, 2);
    }

    #[test]
    fn test_substitute_retargets_fanouts_and_outputs() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let c = aig.add_input("c");

        let ab = aig.add_and(AigLit::new(a), AigLit::new(b));
        let top = aig.add_and(ab, AigLit::new(c));
        aig.add_output("y", ab.invert());
        aig.add_output("z", top);

        let bc = aig.add_and(AigLit::new(b), AigLit::new(c));
        aig.substitute_node(ab.node, bc);

        assert!(aig.is_dead(ab.node));
        assert_eq!(aig.outputs()[0].1, bc.invert());
        match aig.get_node(top.node) {
            Some(AigNode::And { left, right }) => {
                assert!([*left, *right].contains(&bc));
                assert!([*left, *right].contains(&AigLit::new(c)));
            }
            other => panic!("expected AND, got {:?}", other),
        }
        // b stays alive through bc, a lost its only reference
        assert_eq!(aig.fanout_size(a), 0);
        assert_eq!(aig.fanout_size(bc.node), 2);
        assert!(aig.validate().is_ok());
    }

    #[test]
    fn test_substitute_retires_unreferenced_cone() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let c = aig.add_input("c");

        let ab = aig.add_and(AigLit::new(a), AigLit::new(b));
        let abc = aig.add_and(ab, AigLit::new(c));
        aig.add_output("y", abc);

        aig.substitute_node(abc.node, AigLit::new(c));

        assert!(aig.is_dead(abc.node));
        assert!(aig.is_dead(ab.node));
        assert_eq!(aig.and_count(), 0);
        assert_eq!(aig.outputs()[0].1, AigLit::new(c));
        // A retired gate no longer participates in structural hashing
        let again = aig.add_and(AigLit::new(a), AigLit::new(b));
        assert_ne!(again.node, ab.node);
    }

    #[test]
    fn test_substitute_cascades_through_strash() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let c = aig.add_input("c");

        let ab = aig.add_and(AigLit::new(a), AigLit::new(b));
        let ac = aig.add_and(AigLit::new(a), AigLit::new(c));
        let x = aig.add_and(ab, AigLit::new(c));
        let y = aig.add_and(ac, AigLit::new(c));
        aig.add_output("x", x);
        aig.add_output("y", y);

        // Replacing ac by ab makes y structurally equal to x
        aig.substitute_node(ac.node, ab);

        assert!(aig.is_dead(ac.node));
        assert!(aig.is_dead(y.node));
        assert_eq!(aig.outputs()[0].1, x);
        assert_eq!(aig.outputs()[1].1, x);
        assert_eq!(aig.and_count(), 2);
    }

    #[test]
    fn test_substitute_trivial_collapse() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");

        let ab = aig.add_and(AigLit::new(a), AigLit::new(b));
        let top = aig.add_and(ab, AigLit::not(a));
        aig.add_output("y", top);

        // top becomes a & !a
        aig.substitute_node(ab.node, AigLit::new(a));

        assert_eq!(aig.outputs()[0].1, AigLit::false_lit());
        assert_eq!(aig.and_count(), 0);
    }

    #[test]
    fn test_latch_data_is_retargeted() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");

        let ab = aig.add_and(AigLit::new(a), AigLit::new(b));
        let q = aig.add_latch(ab.invert(), Some(false));
        assert_eq!(aig.fanin_size(q), 1);

        aig.substitute_node(ab.node, AigLit::new(b));

        let (_, data, init) = aig.iter_latches().next().unwrap();
        assert_eq!(data, AigLit::not(b));
        assert_eq!(init, Some(false));
    }

    #[test]
    fn test_update_latch_data_closes_loop() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let q = aig.add_latch(AigLit::false_lit(), None);
        let next = aig.add_and(AigLit::new(a), AigLit::not(q));
        aig.update_latch_data(q, next);

        assert_eq!(aig.fanout_size(next.node), 1);
        // The loop passes through the latch, so the graph is still a DAG
        assert!(aig.validate().is_ok());
    }

    #[test]
    fn test_validate_dangling_output() {
        let mut aig = Aig::new("test".to_string());
        aig.add_input("a");
        aig.add_output("y", AigLit::new(AigNodeId(42)));

        assert_eq!(
            aig.validate(),
            Err(SynthError::DanglingOutput {
                name: "y".to_string(),
                node: AigNodeId(42),
            })
        );
    }

    #[test]
    fn test_validate_detects_cycle() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let c = aig.add_input("c");

        let x = aig.add_and(AigLit::new(a), AigLit::new(b));
        let y = aig.add_and(x, AigLit::new(c));
        aig.add_output("y", y);

        // y depends on x, so using y in place of x closes a loop
        aig.substitute_node(x.node, y);

        assert!(matches!(
            aig.validate(),
            Err(SynthError::CombinationalCycle { .. })
        ));
        assert!(aig.compute_levels().is_err());
    }
}
