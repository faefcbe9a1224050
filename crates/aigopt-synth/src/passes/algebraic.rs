//! Algebraic Depth Rewriting Pass
//!
//! This pass reduces logic depth by rewriting small neighbourhoods of AND
//! gates with Boolean identities: associativity and two- and three-layer
//! distributivity. Every rule fires only when the levels of the matched
//! operands guarantee that the rewritten node ends up strictly shallower.
//!
//! # Algorithm
//!
//! Each sweep visits every live gate present when the sweep starts, in
//! storage order, and tries the rules in a fixed priority:
//!
//! 1. Associativity: `a & (c & d)` => `(a & c) & d`
//! 2. Distributivity: `!(ll & s) & !(s & rr)` => `!(s & !(!ll & !rr))`
//! 3. Three-layer distributivity:
//!    `sl & !(srl & !(srrl & srrr))` => `!(!(sl & !srl) & !((sl & srrl) & srrr))`
//!
//! The first rule that fires replaces the node, and levels are recomputed
//! before the next gate is inspected. Sweeps repeat until one of them
//! changes nothing.
//!
//! All extraction and legality checks of a rule run before it creates any
//! gate, so a rule that does not apply leaves the graph untouched.

use super::{Pass, PassResult};
use crate::depth::DepthView;
use crate::error::{Result, SynthError};
use crate::{Aig, AigLit, AigNode, AigNodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Algebraic rewrite rules, in the order the driver tries them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteRule {
    /// `a & (c & d)` => `(a & c) & d`
    Associativity,
    /// Factor a shared operand out of two complemented ANDs
    Distributivity,
    /// Distributivity across three levels of nesting
    ThreeLayerDistributivity,
}

impl RewriteRule {
    /// All rules in priority order
    pub const ALL: [RewriteRule; 3] = [
        RewriteRule::Associativity,
        RewriteRule::Distributivity,
        RewriteRule::ThreeLayerDistributivity,
    ];

    /// Short name used in logs and pass statistics
    pub fn name(&self) -> &'static str {
        match self {
            RewriteRule::Associativity => "associativity",
            RewriteRule::Distributivity => "distributivity",
            RewriteRule::ThreeLayerDistributivity => "three_layer_distributivity",
        }
    }
}

/// Algebraic rewriting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgebraicRewriteConfig {
    /// Try the associativity rule
    pub associativity: bool,
    /// Try the two-layer distributivity rule
    pub distributivity: bool,
    /// Try the three-layer distributivity rule
    pub three_layer_distributivity: bool,
    /// Stop after this many sweeps even without reaching a fixed point
    pub max_sweeps: Option<usize>,
}

impl Default for AlgebraicRewriteConfig {
    fn default() -> Self {
        Self {
            associativity: true,
            distributivity: true,
            three_layer_distributivity: true,
            max_sweeps: None,
        }
    }
}

impl AlgebraicRewriteConfig {
    /// Config with only the given rules enabled
    pub fn only(rules: &[RewriteRule]) -> Self {
        Self {
            associativity: rules.contains(&RewriteRule::Associativity),
            distributivity: rules.contains(&RewriteRule::Distributivity),
            three_layer_distributivity: rules.contains(&RewriteRule::ThreeLayerDistributivity),
            max_sweeps: None,
        }
    }

    /// Check the configuration before running
    pub fn validate(&self) -> Result<()> {
        if self.max_sweeps == Some(0) {
            return Err(SynthError::InvalidConfig(
                "max_sweeps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a rule is enabled
    pub fn is_enabled(&self, rule: RewriteRule) -> bool {
        match rule {
            RewriteRule::Associativity => self.associativity,
            RewriteRule::Distributivity => self.distributivity,
            RewriteRule::ThreeLayerDistributivity => self.three_layer_distributivity,
        }
    }
}

/// Statistics from an algebraic rewriting run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStats {
    /// Sweeps run, including the final one that found nothing to rewrite
    pub sweeps: usize,
    /// Rewrites by the associativity rule
    pub associativity: usize,
    /// Rewrites by the two-layer distributivity rule
    pub distributivity: usize,
    /// Rewrites by the three-layer distributivity rule
    pub three_layer_distributivity: usize,
    /// Whether the last sweep made no change
    pub converged: bool,
    /// Live AND gates before
    pub ands_before: usize,
    /// Live AND gates after
    pub ands_after: usize,
    /// Output depth before
    pub depth_before: u32,
    /// Output depth after
    pub depth_after: u32,
}

impl RewriteStats {
    /// Total number of accepted rewrites
    pub fn rewrites(&self) -> usize {
        self.associativity + self.distributivity + self.three_layer_distributivity
    }

    /// Rewrites accepted for one rule
    pub fn count(&self, rule: RewriteRule) -> usize {
        match rule {
            RewriteRule::Associativity => self.associativity,
            RewriteRule::Distributivity => self.distributivity,
            RewriteRule::ThreeLayerDistributivity => self.three_layer_distributivity,
        }
    }

    fn record(&mut self, rule: RewriteRule) {
        match rule {
            RewriteRule::Associativity => self.associativity += 1,
            RewriteRule::Distributivity => self.distributivity += 1,
            RewriteRule::ThreeLayerDistributivity => self.three_layer_distributivity += 1,
        }
    }
}

/// The two operands of an AND gate, in stored order until oriented
#[derive(Debug, Clone, Copy)]
struct Operands {
    left: AigLit,
    right: AigLit,
}

impl Operands {
    fn swap(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
    }
}

/// View a node as a two-input AND gate
///
/// Returns `None` for constants, inputs, latches and unknown IDs.
fn extract_and(aig: &Aig, node: AigNodeId) -> Option<Operands> {
    match aig.get_node(node) {
        Some(&AigNode::And { left, right }) => Some(Operands { left, right }),
        _ => None,
    }
}

/// Rule matching and the fixed-point driver over one depth view
struct Rewriter<'a> {
    view: DepthView<'a>,
    config: AlgebraicRewriteConfig,
    stats: RewriteStats,
}

impl<'a> Rewriter<'a> {
    fn new(aig: &'a mut Aig, config: AlgebraicRewriteConfig) -> Result<Self> {
        config.validate()?;
        let ands_before = aig.and_count();
        let view = DepthView::new(aig)?;
        let stats = RewriteStats {
            ands_before,
            depth_before: view.depth(),
            ..Default::default()
        };
        Ok(Self {
            view,
            config,
            stats,
        })
    }

    fn level(&self, lit: AigLit) -> u32 {
        self.view.level(lit.node)
    }

    fn run(mut self) -> Result<RewriteStats> {
        loop {
            if self
                .config
                .max_sweeps
                .is_some_and(|max| self.stats.sweeps >= max)
            {
                break;
            }
            self.stats.sweeps += 1;

            let mut changed = false;
            for n in self.view.gate_ids() {
                // Retired by an earlier rewrite in this sweep
                if self.view.is_dead(n) {
                    continue;
                }
                if let Some(rule) = self.try_algebraic_rules(n) {
                    self.view.update_levels()?;
                    self.stats.record(rule);
                    changed = true;
                }
            }

            if !changed {
                self.stats.converged = true;
                break;
            }
        }

        self.stats.depth_after = self.view.depth();
        self.stats.ands_after = self.view.and_count();
        Ok(self.stats)
    }

    /// Try the enabled rules on `n`; returns the rule that rewrote it
    fn try_algebraic_rules(&mut self, n: AigNodeId) -> Option<RewriteRule> {
        RewriteRule::ALL.into_iter().find(|&rule| {
            self.config.is_enabled(rule)
                && match rule {
                    RewriteRule::Associativity => self.try_associativity(n),
                    RewriteRule::Distributivity => self.try_distributivity(n),
                    RewriteRule::ThreeLayerDistributivity => self.try_3l_distributivity(n),
                }
        })
    }

    /// Substitute `new` for `n`
    ///
    /// Every rule guarantees `level(new) < level(n)`, so `new` is never `n`.
    fn commit(&mut self, n: AigNodeId, new: AigLit, rule: RewriteRule) -> bool {
        let before = self.view.level(n);
        let after = self.view.level(new.node);
        debug_assert!(
            after < before,
            "{} must reduce the level of node {}",
            rule.name(),
            n.0
        );
        trace!(
            "[ALGEBRAIC] {} rewrote node {} (level {} -> {})",
            rule.name(),
            n.0,
            before,
            after
        );

        self.view.substitute_node(n, new);
        true
    }

    fn try_associativity(&mut self, n: AigNodeId) -> bool {
        let Some(mut ops) = extract_and(&self.view, n) else {
            return false;
        };

        // The deep operand goes right
        if self.level(ops.left) > self.level(ops.right) + 1 {
            ops.swap();
        } else if self.level(ops.left) + 1 >= self.level(ops.right) {
            return false;
        }

        if ops.right.inverted {
            return false;
        }

        let Some(mut inner) = extract_and(&self.view, ops.right.node) else {
            return false;
        };

        if self.level(inner.left) > self.level(inner.right) {
            inner.swap();
        } else if self.level(inner.left) == self.level(inner.right) {
            return false;
        }

        let shallow = self.view.create_and(ops.left, inner.left);
        let new = self.view.create_and(shallow, inner.right);
        self.commit(n, new, RewriteRule::Associativity)
    }

    fn try_distributivity(&mut self, n: AigNodeId) -> bool {
        let Some(ops) = extract_and(&self.view, n) else {
            return false;
        };

        if !ops.left.inverted || !ops.right.inverted {
            return false;
        }

        let Some(mut l) = extract_and(&self.view, ops.left.node) else {
            return false;
        };
        let Some(mut r) = extract_and(&self.view, ops.right.node) else {
            return false;
        };

        // Move the shared node to l.right / r.left
        if l.left.node == r.right.node {
            l.swap();
            r.swap();
        } else if l.left.node == r.left.node {
            l.swap();
        } else if l.right.node == r.right.node {
            r.swap();
        } else if l.right.node != r.left.node {
            return false;
        }

        if self.level(l.right) <= self.level(l.left) || self.level(l.right) <= self.level(r.right)
        {
            return false;
        }

        if l.right.inverted != r.left.inverted {
            return false;
        }

        let not_ll = self.view.create_not(l.left);
        let not_rr = self.view.create_not(r.right);
        let either = self.view.create_nand(not_ll, not_rr);
        let new = self.view.create_nand(l.right, either);
        self.commit(n, new, RewriteRule::Distributivity)
    }

    fn try_3l_distributivity(&mut self, n: AigNodeId) -> bool {
        let Some(mut ops) = extract_and(&self.view, n) else {
            return false;
        };

        // sl = ops.left (shallow), sr = ops.right (deep)
        if self.level(ops.left) > self.level(ops.right) + 2 {
            ops.swap();
        } else if self.level(ops.left) + 2 >= self.level(ops.right) {
            return false;
        }

        if !ops.right.inverted {
            return false;
        }

        let Some(mut r) = extract_and(&self.view, ops.right.node) else {
            return false;
        };

        if self.level(r.left) > self.level(r.right) + 1 {
            r.swap();
        } else if self.level(r.left) + 1 >= self.level(r.right) {
            return false;
        }

        if !r.right.inverted {
            return false;
        }

        let Some(mut rr) = extract_and(&self.view, r.right.node) else {
            return false;
        };

        if self.level(rr.left) > self.level(rr.right) {
            rr.swap();
        } else if self.level(rr.left) == self.level(rr.right) {
            return false;
        }

        let sl = ops.left;
        let not_srl = self.view.create_not(r.left);
        let branch_l = self.view.create_nand(sl, not_srl);
        let sl_srrl = self.view.create_and(sl, rr.left);
        let branch_r = self.view.create_nand(sl_srrl, rr.right);
        let new = self.view.create_nand(branch_l, branch_r);
        self.commit(n, new, RewriteRule::ThreeLayerDistributivity)
    }
}

/// Algebraic depth rewriting pass
pub struct AlgebraicRewrite {
    config: AlgebraicRewriteConfig,
    /// Statistics from the last run
    stats: RewriteStats,
}

impl AlgebraicRewrite {
    /// Create a pass with every rule enabled, run to a fixed point
    pub fn new() -> Self {
        Self::with_config(AlgebraicRewriteConfig::default())
    }

    /// Create with specific config
    pub fn with_config(config: AlgebraicRewriteConfig) -> Self {
        Self {
            config,
            stats: RewriteStats::default(),
        }
    }

    /// Statistics from the last run
    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }
}

impl Default for AlgebraicRewrite {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for AlgebraicRewrite {
    fn name(&self) -> &str {
        "algebraic"
    }

    fn run(&mut self, aig: &mut Aig) -> Result<PassResult> {
        let mut result = PassResult::new(self.name());
        result.record_before(aig);

        self.stats = run_algebraic_rewriting_with_config(aig, self.config.clone())?;

        result.record_after(aig);
        result.changed = self.stats.rewrites() > 0;
        result.add_extra("sweeps", &self.stats.sweeps.to_string());
        for rule in RewriteRule::ALL {
            result.add_extra(rule.name(), &self.stats.count(rule).to_string());
        }
        Ok(result)
    }
}

/// Run algebraic rewriting with every rule enabled until no rule applies
pub fn run_algebraic_rewriting(aig: &mut Aig) -> Result<RewriteStats> {
    run_algebraic_rewriting_with_config(aig, AlgebraicRewriteConfig::default())
}

/// Run algebraic rewriting with custom config
///
/// The AIG is checked before anything is rewritten; on error it is left
/// unchanged.
pub fn run_algebraic_rewriting_with_config(
    aig: &mut Aig,
    config: AlgebraicRewriteConfig,
) -> Result<RewriteStats> {
    debug!(
        "[ALGEBRAIC] Starting on '{}' ({} ANDs)",
        aig.name,
        aig.and_count()
    );

    let stats = Rewriter::new(aig, config)?.run()?;

    debug!(
        "[ALGEBRAIC] Done after {} sweeps: {} rewrites (assoc {}, dist {}, 3l-dist {}), depth {} -> {}, ANDs {} -> {}",
        stats.sweeps,
        stats.rewrites(),
        stats.associativity,
        stats.distributivity,
        stats.three_layer_distributivity,
        stats.depth_before,
        stats.depth_after,
        stats.ands_before,
        stats.ands_after
    );
    Ok(stats)
}
