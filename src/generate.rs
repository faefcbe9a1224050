//! Synthetic AIG generators
//!
//! Deterministic designs used by the command line front end, the integration
//! tests and the benchmarks.

use aigopt_synth::{Aig, AigLit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

/// Kind of generated design
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignKind {
    /// Left-leaning AND chain
    Chain,
    /// Priority multiplexer chain
    MuxChain,
    /// Random DAG with local connections
    Random,
}

impl FromStr for DesignKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chain" => Ok(DesignKind::Chain),
            "mux" | "mux-chain" => Ok(DesignKind::MuxChain),
            "random" => Ok(DesignKind::Random),
            other => Err(format!(
                "unknown design '{}' (expected chain, mux or random)",
                other
            )),
        }
    }
}

impl fmt::Display for DesignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DesignKind::Chain => "chain",
            DesignKind::MuxChain => "mux",
            DesignKind::Random => "random",
        };
        write!(f, "{}", name)
    }
}

/// Parameters for [`random_aig`]
#[derive(Debug, Clone)]
pub struct RandomAigConfig {
    /// Number of primary inputs
    pub inputs: usize,
    /// Number of AND gates to attempt
    pub gates: usize,
    /// Number of primary outputs
    pub outputs: usize,
    /// The first operand of each gate is drawn from the last `window` signals
    pub window: usize,
    /// Probability of complementing an operand
    pub invert_probability: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for RandomAigConfig {
    fn default() -> Self {
        Self {
            inputs: 8,
            gates: 64,
            outputs: 4,
            window: 4,
            invert_probability: 0.5,
            seed: 42,
        }
    }
}

fn add_inputs(aig: &mut Aig, prefix: &str, count: usize) -> Vec<AigLit> {
    (0..count)
        .map(|i| AigLit::new(aig.add_input(format!("{}{}", prefix, i))))
        .collect()
}

/// `x0 & x1 & ... & x(width-1)`, one gate per level
pub fn and_chain(width: usize) -> Aig {
    let mut aig = Aig::new(format!("chain_{}", width));
    let xs = add_inputs(&mut aig, "x", width.max(1));
    let y = xs[1..]
        .iter()
        .fold(xs[0], |acc, x| aig.add_and(acc, *x));
    aig.add_output("y", y);
    aig
}

/// `s0 ? d0 : (s1 ? d1 : ... : d(width))`
pub fn mux_chain(width: usize) -> Aig {
    let mut aig = Aig::new(format!("mux_{}", width));
    let sel = add_inputs(&mut aig, "s", width);
    let data = add_inputs(&mut aig, "d", width + 1);

    let mut acc = data[width];
    for i in (0..width).rev() {
        acc = aig.add_mux(sel[i], data[i], acc);
    }
    aig.add_output("y", acc);
    aig
}

/// Random combinational DAG
///
/// Gates lean on recently created signals so the result is deep rather
/// than wide. The same config always yields the same graph.
pub fn random_aig(config: &RandomAigConfig) -> Aig {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let p = config.invert_probability.clamp(0.0, 1.0);

    let mut aig = Aig::new(format!("random_{}", config.seed));
    let mut pool = add_inputs(&mut aig, "i", config.inputs.max(2));

    for _ in 0..config.gates {
        let recent = pool.len().saturating_sub(config.window.max(1));
        let a = pool[rng.gen_range(recent..pool.len())];
        let b = pool[rng.gen_range(0..pool.len())];
        let lit = aig.add_and(a.invert_if(rng.gen_bool(p)), b.invert_if(rng.gen_bool(p)));
        if !lit.is_const() {
            pool.push(lit);
        }
    }

    for i in 0..config.outputs.max(1) {
        let lit = pool[pool.len() - 1 - i % pool.len()];
        aig.add_output(format!("o{}", i), lit.invert_if(rng.gen_bool(p)));
    }
    aig
}

/// Build a design of the given kind
pub fn generate(kind: DesignKind, width: usize, seed: u64) -> Aig {
    match kind {
        DesignKind::Chain => and_chain(width),
        DesignKind::MuxChain => mux_chain(width),
        DesignKind::Random => random_aig(&RandomAigConfig {
            gates: width,
            seed,
            ..Default::default()
        }),
    }
}
