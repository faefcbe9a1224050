//! Bit-Parallel Simulation
//!
//! Evaluates an AIG on 64 input patterns at once. Every combinational source
//! (primary input, then latch output, in storage order) gets one 64-bit word;
//! each bit position is an independent assignment.
//!
//! Used to check that rewriting preserved the function of every output:
//! exhaustively for up to six sources, with random words otherwise.

use crate::aig::{Aig, AigLit, AigNode};
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Input words that enumerate all assignments of up to six variables
const PROJECTIONS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// Number of combinational sources (inputs followed by latch outputs)
pub fn source_count(aig: &Aig) -> usize {
    aig.input_count() + aig.latch_count()
}

/// Simulate every node; missing source words are treated as all-zero
pub fn simulate_nodes(aig: &Aig, source_words: &[u64]) -> Result<Vec<u64>> {
    let mut values = vec![0u64; aig.arena_size()];

    let sources = aig
        .iter_inputs()
        .map(|(id, _)| id)
        .chain(aig.iter_latches().map(|(id, _, _)| id));
    for (id, word) in sources.zip(source_words.iter()) {
        values[id.index()] = *word;
    }

    let lit_value = |values: &[u64], lit: AigLit| {
        let v = values[lit.node.index()];
        if lit.inverted {
            !v
        } else {
            v
        }
    };

    for id in aig.topological_order()? {
        if let Some(AigNode::And { left, right }) = aig.get_node(id) {
            let v = lit_value(&values, *left) & lit_value(&values, *right);
            values[id.index()] = v;
        }
    }

    Ok(values)
}

/// Simulate the primary outputs followed by the latch data inputs
pub fn simulate(aig: &Aig, source_words: &[u64]) -> Result<Vec<u64>> {
    let values = simulate_nodes(aig, source_words)?;
    let lit_value = |lit: AigLit| {
        let v = values[lit.node.index()];
        if lit.inverted {
            !v
        } else {
            v
        }
    };

    Ok(aig
        .outputs()
        .iter()
        .map(|(_, lit)| lit_value(*lit))
        .chain(aig.iter_latches().map(|(_, data, _)| lit_value(data)))
        .collect())
}

/// Truth tables of all sinks, if the AIG has at most six sources
///
/// Bit `b` of a table is the sink value under the assignment where source
/// `i` takes bit `i` of `b`.
pub fn truth_tables(aig: &Aig) -> Result<Option<Vec<u64>>> {
    let n = source_count(aig);
    if n > PROJECTIONS.len() {
        return Ok(None);
    }

    let mask = if n == 6 {
        u64::MAX
    } else {
        (1u64 << (1u32 << n)) - 1
    };
    let tables = simulate(aig, &PROJECTIONS[..n])?
        .into_iter()
        .map(|word| word & mask)
        .collect();
    Ok(Some(tables))
}

/// Deterministic pseudo-random source words
pub fn random_words(count: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen()).collect()
}

/// Compare the sinks of two AIGs with the same sources
///
/// Exhaustive when both have at most six sources, otherwise `rounds`
/// batches of 64 random patterns. A `true` result from the random mode is
/// evidence, not proof.
pub fn equivalent_by_simulation(a: &Aig, b: &Aig, rounds: usize, seed: u64) -> Result<bool> {
    let n = source_count(a);
    if n != source_count(b) || a.output_count() != b.output_count() {
        return Ok(false);
    }

    if let (Some(ta), Some(tb)) = (truth_tables(a)?, truth_tables(b)?) {
        return Ok(ta == tb);
    }

    for round in 0..rounds {
        let words = random_words(n, seed.wrapping_add(round as u64));
        if simulate(a, &words)? != simulate(b, &words)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truth_table_of_and() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let ab = aig.add_and(AigLit::new(a), AigLit::new(b));
        aig.add_output("y", ab);
        aig.add_output("ny", ab.invert());

        let tables = truth_tables(&aig).unwrap().unwrap();
        assert_eq!(tables, vec![0b1000, 0b0111]);
    }

    #[test]
    fn test_truth_table_of_xor() {
        let mut aig = Aig::new("test".to_string());
        let a = aig.add_input("a");
        let b = aig.add_input("b");
        let x = aig.add_xor(AigLit::new(a), AigLit::new(b));
        aig.add_output("y", x);

        assert_eq!(truth_tables(&aig).unwrap().unwrap(), vec![0b0110]);
    }

    #[test]
    fn test_constant_outputs() {
        let mut aig = Aig::new("test".to_string());
        aig.add_input("a");
        aig.add_output("zero", AigLit::false_lit());
        aig.add_output("one", AigLit::true_lit());

        assert_eq!(truth_tables(&aig).unwrap().unwrap(), vec![0b00, 0b11]);
    }

    #[test]
    fn test_random_words_are_deterministic() {
        assert_eq!(random_words(4, 7), random_words(4, 7));
        assert_ne!(random_words(4, 7), random_words(4, 8));
        assert_eq!(random_words(3, 0).len(), 3);
    }

    #[test]
    fn test_equivalence_by_random_simulation() {
        let build = |swap: bool| {
            let mut aig = Aig::new("test".to_string());
            let ids: Vec<_> = (0..8).map(|i| aig.add_input(format!("x{}", i))).collect();
            let mut acc = AigLit::new(ids[0]);
            for id in &ids[1..] {
                acc = if swap {
                    aig.add_and(AigLit::new(*id), acc)
                } else {
                    aig.add_and(acc, AigLit::new(*id))
                };
            }
            aig.add_output("y", acc);
            aig
        };

        let a = build(false);
        let b = build(true);
        assert!(equivalent_by_simulation(&a, &b, 8, 1).unwrap());

        let mut c = build(false);
        let x0 = c.iter_inputs().next().map(|(id, _)| id).unwrap();
        c.add_output("extra", AigLit::new(x0));
        assert!(!equivalent_by_simulation(&a, &c, 8, 1).unwrap());
    }
}
