//! aigopt - depth-oriented algebraic rewriting for And-Inverter Graphs
//!
//! The optimization itself lives in [`aigopt_synth`]; this crate adds
//! synthetic design generators and a command line front end.

pub mod generate;

pub use aigopt_synth::*;

/// Rewrite for depth, then compact the graph
pub fn optimize_depth(aig: &mut Aig) -> Result<Vec<PassResult>> {
    let mut passes = default_optimization_sequence();
    run_passes(aig, &mut passes)
}
