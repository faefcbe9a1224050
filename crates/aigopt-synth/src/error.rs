//! Error types for AIG construction checks and pass setup

use crate::aig::AigNodeId;
use thiserror::Error;

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors that can occur before a pass starts rewriting
///
/// Rule preconditions that do not hold are never errors; a rule that does
/// not match simply leaves the graph alone.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// A node refers to a fanin that does not exist in the arena
    #[error("node {node:?} refers to missing fanin {fanin:?}")]
    DanglingFanin {
        /// Node holding the reference
        node: AigNodeId,
        /// Out-of-range fanin
        fanin: AigNodeId,
    },

    /// A live node or output still refers to a retired node
    #[error("{owner} refers to retired node {node:?}")]
    DeadReference {
        /// Description of the referring node or output
        owner: String,
        /// Retired node
        node: AigNodeId,
    },

    /// A primary output refers to a node that does not exist
    #[error("output '{name}' refers to missing node {node:?}")]
    DanglingOutput {
        /// Output name
        name: String,
        /// Out-of-range node
        node: AigNodeId,
    },

    /// The AND gates do not form a DAG
    #[error("combinational cycle through node {node:?}")]
    CombinationalCycle {
        /// A node on the cycle
        node: AigNodeId,
    },

    /// Invalid pass configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
