//! AIG Optimization Passes
//!
//! Passes transform an AIG in place while preserving the function of every
//! output.
//!
//! # Pass Categories
//!
//! - **Depth**: `algebraic` - local associativity and distributivity rewrites
//! - **Structural**: `dce` - compact the arena after rewriting
//!
//! # Example
//!
//! ```ignore
//! use aigopt_synth::passes::{AlgebraicRewrite, Dce, Pass};
//!
//! let mut aig = build_aig();
//!
//! AlgebraicRewrite::new().run(&mut aig)?;
//! Dce::new().run(&mut aig)?;
//! ```

mod algebraic;
mod dce;

pub use algebraic::{
    run_algebraic_rewriting, run_algebraic_rewriting_with_config, AlgebraicRewrite,
    AlgebraicRewriteConfig, RewriteRule, RewriteStats,
};
pub use dce::Dce;

use crate::error::Result;
use crate::Aig;

/// Result of running an optimization pass
#[derive(Debug, Clone, Default)]
pub struct PassResult {
    /// Name of the pass
    pub pass_name: String,
    /// Number of nodes before the pass
    pub nodes_before: usize,
    /// Number of nodes after the pass
    pub nodes_after: usize,
    /// Number of AND nodes before
    pub ands_before: usize,
    /// Number of AND nodes after
    pub ands_after: usize,
    /// Maximum level before
    pub levels_before: u32,
    /// Maximum level after
    pub levels_after: u32,
    /// Whether the pass made any changes
    pub changed: bool,
    /// Additional statistics
    pub extra: Vec<(String, String)>,
}

impl PassResult {
    /// Create a new pass result
    pub fn new(pass_name: &str) -> Self {
        Self {
            pass_name: pass_name.to_string(),
            ..Default::default()
        }
    }

    /// Record the "before" stats
    pub fn record_before(&mut self, aig: &Aig) {
        let stats = aig.compute_stats();
        self.nodes_before = stats.node_count;
        self.ands_before = stats.and_count;
        self.levels_before = stats.max_level;
    }

    /// Record the "after" stats
    ///
    /// Passes that know whether they rewrote anything overwrite `changed`
    /// afterwards; the counts alone miss same-size rewrites.
    pub fn record_after(&mut self, aig: &Aig) {
        let stats = aig.compute_stats();
        self.nodes_after = stats.node_count;
        self.ands_after = stats.and_count;
        self.levels_after = stats.max_level;
        self.changed = self.nodes_before != self.nodes_after
            || self.ands_before != self.ands_after
            || self.levels_before != self.levels_after;
    }

    /// Add extra information
    pub fn add_extra(&mut self, key: &str, value: &str) {
        self.extra.push((key.to_string(), value.to_string()));
    }

    /// Look up extra information
    pub fn get_extra(&self, key: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get reduction in AND nodes
    pub fn and_reduction(&self) -> i32 {
        self.ands_before as i32 - self.ands_after as i32
    }

    /// Get reduction in levels
    pub fn level_reduction(&self) -> i32 {
        self.levels_before as i32 - self.levels_after as i32
    }
}

fn signed(delta: i32) -> String {
    if delta >= 0 {
        format!("-{}", delta)
    } else {
        format!("+{}", -delta)
    }
}

impl std::fmt::Display for PassResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: ANDs {} → {} ({}), Levels {} → {} ({})",
            self.pass_name,
            self.ands_before,
            self.ands_after,
            signed(self.and_reduction()),
            self.levels_before,
            self.levels_after,
            signed(self.level_reduction()),
        )
    }
}

/// Trait for AIG optimization passes
pub trait Pass {
    /// Get the name of this pass
    fn name(&self) -> &str;

    /// Run the pass on an AIG
    ///
    /// Errors are reported before the AIG is modified.
    fn run(&mut self, aig: &mut Aig) -> Result<PassResult>;
}

/// Run a sequence of passes on an AIG, stopping at the first error
pub fn run_passes(aig: &mut Aig, passes: &mut [Box<dyn Pass>]) -> Result<Vec<PassResult>> {
    let mut results = Vec::with_capacity(passes.len());
    for pass in passes.iter_mut() {
        let result = pass.run(aig)?;
        tracing::debug!("{}", result);
        results.push(result);
    }
    Ok(results)
}

/// Default depth optimization sequence
pub fn default_optimization_sequence() -> Vec<Box<dyn Pass>> {
    vec![Box::new(AlgebraicRewrite::new()), Box::new(Dce::new())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AigLit;

    #[test]
    fn test_pass_result() {
        let mut result = PassResult::new("test");
        result.nodes_before = 100;
        result.ands_before = 50;
        result.levels_before = 10;
        result.nodes_after = 80;
        result.ands_after = 52;
        result.levels_after = 8;
        result.add_extra("sweeps", "3");

        assert_eq!(result.and_reduction(), -2);
        assert_eq!(result.level_reduction(), 2);
        assert_eq!(result.get_extra("sweeps"), Some("3"));
        assert_eq!(result.get_extra("missing"), None);
        assert_eq!(
            result.to_string(),
            "test: ANDs 50 → 52 (+2), Levels 10 → 8 (-2)"
        );
    }

    #[test]
    fn test_default_sequence() {
        let mut aig = Aig::new("test".to_string());
        let ids: Vec<_> = (0..6).map(|i| aig.add_input(format!("x{}", i))).collect();
        let mut acc = AigLit::new(ids[0]);
        for id in &ids[1..] {
            acc = aig.add_and(acc, AigLit::new(*id));
        }
        aig.add_output("y", acc);

        let mut passes = default_optimization_sequence();
        let results = run_passes(&mut aig, &mut passes).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].pass_name, "algebraic");
        assert_eq!(results[1].pass_name, "dce");
        assert!(results[0].levels_after < results[0].levels_before);
        assert_eq!(aig.node_count(), aig.arena_size());
    }
}
