//! AIG Depth Optimization
//!
//! This crate reduces the logic depth of And-Inverter Graphs with local
//! algebraic rewrites. Each rewrite is a Boolean identity, so the function
//! of every output is preserved by construction.
//!
//! # Architecture
//!
//! ```text
//! Aig → DepthView (levels) → [Rule Matchers] → substitute → update levels
//!                 ↑_____________ until no rule applies ______________|
//! ```
//!
//! # Key Components
//!
//! - [`Aig`] - And-Inverter Graph with structural hashing and substitution
//! - [`DepthView`] - per-node levels on top of an [`Aig`]
//! - [`passes::AlgebraicRewrite`] - the depth rewriting pass
//! - [`passes::Dce`] - compacts the graph after rewriting
//!
//! # Example
//!
//! ```ignore
//! use aigopt_synth::{run_algebraic_rewriting, Aig, AigLit};
//!
//! let mut aig = Aig::new("top".to_string());
//! // ... build the graph
//!
//! let stats = run_algebraic_rewriting(&mut aig)?;
//! println!("depth {} -> {}", stats.depth_before, stats.depth_after);
//! ```

mod aig;
mod depth;
pub mod error;
pub mod passes;
pub mod sim;

pub use aig::{Aig, AigLit, AigNode, AigNodeId, AigStats};
pub use depth::DepthView;
pub use error::{Result, SynthError};
pub use passes::{
    default_optimization_sequence, run_algebraic_rewriting, run_algebraic_rewriting_with_config,
    run_passes, AlgebraicRewrite, AlgebraicRewriteConfig, Dce, Pass, PassResult, RewriteRule,
    RewriteStats,
};
