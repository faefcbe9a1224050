//! Depth View
//!
//! Attaches a level to every node of an [`Aig`]: the length of the longest
//! path from a combinational source (constant, input, latch output) to the
//! node through AND gates.
//!
//! Levels are a cache. Gates created through the view get their level on
//! creation, but a substitution changes the levels of the whole transitive
//! fanout of the replaced node, so [`DepthView::update_levels`] must run
//! after every substitution and before the next level query.

use crate::aig::{Aig, AigLit, AigNode, AigNodeId};
use crate::error::Result;
use std::ops::Deref;

/// An [`Aig`] together with per-node levels
#[derive(Debug)]
pub struct DepthView<'a> {
    aig: &'a mut Aig,
    levels: Vec<u32>,
    depth: u32,
}

impl<'a> DepthView<'a> {
    /// Compute levels for `aig`
    ///
    /// Fails if the graph is not a well-formed DAG of live nodes.
    pub fn new(aig: &'a mut Aig) -> Result<Self> {
        aig.validate()?;
        let levels = aig.compute_levels()?;
        let depth = Self::max_output_level(aig, &levels);
        Ok(Self { aig, levels, depth })
    }

    /// Level of a node
    pub fn level(&self, id: AigNodeId) -> u32 {
        self.levels.get(id.index()).copied().unwrap_or(0)
    }

    /// Largest level among primary outputs and latch data inputs
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Recompute all levels after a structural edit
    pub fn update_levels(&mut self) -> Result<()> {
        self.levels = self.aig.compute_levels()?;
        self.depth = Self::max_output_level(&*self.aig, &self.levels);
        Ok(())
    }

    fn max_output_level(aig: &Aig, levels: &[u32]) -> u32 {
        let level = |lit: AigLit| levels.get(lit.node.index()).copied().unwrap_or(0);
        aig.outputs()
            .iter()
            .map(|(_, lit)| level(*lit))
            .chain(aig.iter_latches().map(|(_, data, _)| level(data)))
            .max()
            .unwrap_or(0)
    }

    /// Record the level of a gate the view has not seen yet
    fn track(&mut self, lit: AigLit) -> AigLit {
        let idx = lit.node.index();
        if idx >= self.levels.len() {
            let level = match self.aig.get_node(lit.node) {
                Some(AigNode::And { left, right }) => {
                    self.level(left.node).max(self.level(right.node)) + 1
                }
                _ => 0,
            };
            self.levels.resize(idx + 1, 0);
            self.levels[idx] = level;
        }
        lit
    }

    /// Create an AND gate
    pub fn create_and(&mut self, left: AigLit, right: AigLit) -> AigLit {
        let lit = self.aig.add_and(left, right);
        self.track(lit)
    }

    /// Create a NAND gate
    pub fn create_nand(&mut self, left: AigLit, right: AigLit) -> AigLit {
        let lit = self.aig.add_nand(left, right);
        self.track(lit)
    }

    /// Complement a signal
    pub fn create_not(&self, lit: AigLit) -> AigLit {
        lit.invert()
    }

    /// Replace every reference to `old` with `new`
    ///
    /// Levels are stale afterwards until [`DepthView::update_levels`] runs.
    pub fn substitute_node(&mut self, old: AigNodeId, new: AigLit) {
        self.aig.substitute_node(old, new);
    }
}

impl Deref for DepthView<'_> {
    type Target = Aig;

    fn deref(&self) -> &Aig {
        &*self.aig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthError;

    fn chain(aig: &mut Aig, len: usize) -> AigLit {
        let mut acc = AigLit::new(aig.add_input("x0"));
        for i in 1..=len {
            let x = aig.add_input(format!("x{}", i));
            acc = aig.add_and(acc, AigLit::new(x));
        }
        acc
    }

    #[test]
    fn test_levels_of_chain() {
        let mut aig = Aig::new("test".to_string());
        let top = chain(&mut aig, 4);
        aig.add_output("y", top);

        let view = DepthView::new(&mut aig).unwrap();
        assert_eq!(view.level(top.node), 4);
        assert_eq!(view.level(AigNodeId::FALSE), 0);
        assert_eq!(view.depth(), 4);
    }

    #[test]
    fn test_new_gate_gets_level_immediately() {
        let mut aig = Aig::new("test".to_string());
        let top = chain(&mut aig, 3);
        let z = aig.add_input("z");

        let mut view = DepthView::new(&mut aig).unwrap();
        let g = view.create_and(top, AigLit::new(z));
        assert_eq!(view.level(g.node), 4);

        let n = view.create_nand(g, AigLit::new(z));
        assert!(n.inverted);
        assert_eq!(view.level(n.node), 5);
    }

    #[test]
    fn test_update_levels_after_substitution() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let top = chain(&mut aig, 3);
        let y = aig.add_and(top, AigLit::new(a));
        aig.add_output("y", y);

        let mut view = DepthView::new(&mut aig).unwrap();
        assert_eq!(view.level(y.node), 4);
        assert_eq!(view.depth(), 4);

        let ab = view.create_and(AigLit::new(a), AigLit::new(b));
        view.substitute_node(top.node, ab);
        view.update_levels().unwrap();

        assert_eq!(view.level(y.node), 2);
        assert_eq!(view.depth(), 2);
        assert!(view.is_dead(top.node));
    }

    #[test]
    fn test_rejects_malformed_graph() {
        let mut aig = Aig::new("test".to_string());
        aig.add_output("y", AigLit::new(AigNodeId(7)));

        let err = DepthView::new(&mut aig).unwrap_err();
        assert!(matches!(err, SynthError::DanglingOutput { .. }));
    }
}
