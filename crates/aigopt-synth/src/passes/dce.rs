//! Dead Code Elimination Pass
//!
//! Rewriting leaves retired nodes in the arena, and may leave gates that no
//! output depends on. This pass rebuilds the AIG from the fanin cones of the
//! outputs and latch data inputs, so the arena holds only live nodes in
//! topological order.
//!
//! Primary inputs and latches are always kept, in their original order, so
//! the interface of the design does not change.

use super::{Pass, PassResult};
use crate::error::Result;
use crate::{Aig, AigLit, AigNode, AigNodeId};
use indexmap::IndexMap;

/// Dead code elimination pass
pub struct Dce {
    /// Number of arena slots freed
    removed_count: usize,
}

impl Dce {
    /// Create a new DCE pass
    pub fn new() -> Self {
        Self { removed_count: 0 }
    }

    /// Number of arena slots freed by the last run
    pub fn removed_count(&self) -> usize {
        self.removed_count
    }
}

impl Default for Dce {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for Dce {
    fn name(&self) -> &str {
        "dce"
    }

    fn run(&mut self, aig: &mut Aig) -> Result<PassResult> {
        aig.validate()?;

        let mut result = PassResult::new(self.name());
        result.record_before(aig);

        let roots: Vec<AigNodeId> = aig
            .outputs()
            .iter()
            .map(|(_, lit)| lit.node)
            .chain(aig.iter_latches().map(|(_, data, _)| data.node))
            .collect();
        let order = aig.cone_order(roots)?;

        let mut new_aig = Aig::new(aig.name.clone());
        let mut node_map: IndexMap<AigNodeId, AigLit> = IndexMap::new();
        node_map.insert(AigNodeId::FALSE, AigLit::false_lit());

        for (id, name) in aig.iter_inputs() {
            let new_id = new_aig.add_input(name);
            node_map.insert(id, AigLit::new(new_id));
        }

        // Latches first with placeholder data; their data may depend on any gate
        let latches: Vec<(AigNodeId, AigLit, Option<bool>)> = aig.iter_latches().collect();
        for (id, _, init) in &latches {
            let new_id = new_aig.add_latch(AigLit::false_lit(), *init);
            node_map.insert(*id, AigLit::new(new_id));
        }

        for id in order {
            if let Some(AigNode::And { left, right }) = aig.get_node(id) {
                let new_left = resolve_lit(&node_map, *left);
                let new_right = resolve_lit(&node_map, *right);
                let new_lit = new_aig.add_and(new_left, new_right);
                node_map.insert(id, new_lit);
            }
        }

        for (id, data, _) in latches {
            if let Some(new_latch) = node_map.get(&id).map(|lit| lit.node) {
                let new_data = resolve_lit(&node_map, data);
                new_aig.update_latch_data(new_latch, new_data);
            }
        }

        for (name, lit) in aig.outputs() {
            let new_lit = resolve_lit(&node_map, *lit);
            new_aig.add_output(name.clone(), new_lit);
        }

        self.removed_count = aig.arena_size().saturating_sub(new_aig.arena_size());
        *aig = new_aig;

        result.record_after(aig);
        result.changed = self.removed_count > 0;
        result.add_extra("removed", &self.removed_count.to_string());
        Ok(result)
    }
}

/// Resolve a literal through the node mapping
fn resolve_lit(map: &IndexMap<AigNodeId, AigLit>, lit: AigLit) -> AigLit {
    match map.get(&lit.node) {
        Some(&mapped) => mapped.invert_if(lit.inverted),
        None => lit,
    }
}
