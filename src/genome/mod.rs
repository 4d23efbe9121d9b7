//! Program tapes treated as genomes: measuring, seeding, mutating and copying them.
//!
//! Randomness always comes from the caller so a seeded rng reproduces a lineage.

use rand::Rng;

use crate::bytecode::Opcode;

/// Longest tape the evolutionary layer keeps
pub const MAX_TAPE_LEN: usize = 64;
/// Shortest tape a replica is padded up to
pub const MIN_TAPE_LEN: usize = 8;

/// Chance for a filler byte to be copied exactly by `replicate`
const REPLICATION_FIDELITY: f64 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// The byte at `position` was replaced with an opcode
    Overwrite { position: usize, op: Opcode },
    /// The byte at `position` was shifted by `delta`, wrapping
    Nudge { position: usize, delta: i8 },
}

/// Number of bytes in the tape that are opcodes
pub fn complexity(tape: &[u8]) -> usize {
    tape.iter().filter(|b| Opcode::is_opcode(**b)).count()
}

pub fn random_opcode<R: Rng + ?Sized>(rng: &mut R) -> Opcode {
    Opcode::ALL[rng.random_range(0..Opcode::ALL.len())]
}

/// A tape of `len` bytes where each byte is an opcode with probability `opcode_density`
/// and uniform filler otherwise.
pub fn random_tape<R: Rng + ?Sized>(rng: &mut R, len: usize, opcode_density: f64) -> Vec<u8> {
    let density = opcode_density.clamp(0.0, 1.0);
    (0..len)
        .map(|_| {
            if rng.random_bool(density) {
                random_opcode(rng).as_byte()
            } else {
                rng.random()
            }
        })
        .collect()
}

/// A short starter tape: a handful of opcodes padded with filler
pub fn seed_food_tape<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    let ops = rng.random_range(2..=5);
    let mut tape: Vec<u8> = (0..ops).map(|_| random_opcode(rng).as_byte()).collect();
    while tape.len() < MIN_TAPE_LEN {
        tape.push(rng.random());
    }
    tape
}

/// Apply one random point mutation in place
pub fn mutate<R: Rng + ?Sized>(rng: &mut R, tape: &mut [u8]) -> Option<Mutation> {
    if tape.is_empty() {
        return None;
    }

    let roll: f64 = rng.random();
    let position = rng.random_range(0..tape.len());
    let mutation = if roll < 0.6 {
        let op = random_opcode(rng);
        tape[position] = op.as_byte();
        Mutation::Overwrite { position, op }
    } else {
        let delta: i8 = rng.random_range(-5..=5);
        tape[position] = tape[position].wrapping_add_signed(delta);
        Mutation::Nudge { position, delta }
    };
    Some(mutation)
}

/// Copy a tape the way a replicating organism does: opcodes are copied exactly,
/// filler occasionally drifts a little. The result is between
/// `MIN_TAPE_LEN` and `MAX_TAPE_LEN` bytes long.
pub fn replicate<R: Rng + ?Sized>(rng: &mut R, tape: &[u8]) -> Vec<u8> {
    let mut copy: Vec<u8> = tape
        .iter()
        .map(|&b| {
            if Opcode::is_opcode(b) || rng.random_bool(REPLICATION_FIDELITY) {
                b
            } else {
                b.wrapping_add_signed(rng.random_range(-2..=2))
            }
        })
        .collect();

    while copy.len() < MIN_TAPE_LEN {
        copy.push(random_opcode(rng).as_byte());
    }
    copy.truncate(MAX_TAPE_LEN);
    copy
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    #[test]
    fn complexity_counts_opcodes_only() {
        assert_eq!(complexity(b"+-ab[]"), 4);
        assert_eq!(complexity(&[0, 1, 2]), 0);
        assert_eq!(complexity(b""), 0);
    }

    #[test]
    fn food_tapes_are_short_and_start_with_code() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let tape = seed_food_tape(&mut rng);
            assert_eq!(tape.len(), MIN_TAPE_LEN);
            assert!(tape[..2].iter().all(|b| Opcode::is_opcode(*b)));
        }
    }

    #[test]
    fn density_bounds_are_respected() {
        let mut rng = SmallRng::seed_from_u64(1);
        let all_code = random_tape(&mut rng, MAX_TAPE_LEN, 1.0);
        assert_eq!(complexity(&all_code), MAX_TAPE_LEN);
        let tape = random_tape(&mut rng, 32, 0.25);
        assert_eq!(tape.len(), 32);
    }

    #[test]
    fn mutate_changes_at_most_one_byte() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let original = random_tape(&mut rng, 16, 0.5);
            let mut tape = original.clone();
            let mutation = mutate(&mut rng, &mut tape).unwrap();
            let changed: Vec<usize> = (0..tape.len()).filter(|i| tape[*i] != original[*i]).collect();
            assert!(changed.len() <= 1);
            match mutation {
                Mutation::Overwrite { position, op } => assert_eq!(tape[position], op.as_byte()),
                Mutation::Nudge { position, delta } => {
                    assert!((-5..=5).contains(&delta));
                    assert_eq!(tape[position], original[position].wrapping_add_signed(delta));
                }
            }
        }
    }

    #[test]
    fn mutate_empty_tape_is_noop() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(mutate(&mut rng, &mut []), None);
    }

    #[test]
    fn replicate_keeps_opcodes_and_bounds_length() {
        let mut rng = SmallRng::seed_from_u64(11);
        let copy = replicate(&mut rng, b"+>");
        assert_eq!(copy.len(), MIN_TAPE_LEN);
        assert_eq!(&copy[..2], b"+>");
        assert_eq!(complexity(&copy), MIN_TAPE_LEN);

        let long = vec![b'+'; 100];
        assert_eq!(replicate(&mut rng, &long), vec![b'+'; MAX_TAPE_LEN]);
    }

    #[test]
    fn replicate_is_reproducible_with_a_seed() {
        let tape = random_tape(&mut SmallRng::seed_from_u64(5), 40, 0.1);
        let a = replicate(&mut SmallRng::seed_from_u64(9), &tape);
        let b = replicate(&mut SmallRng::seed_from_u64(9), &tape);
        assert_eq!(a, b);
        for (orig, copied) in tape.iter().zip(&a) {
            if Opcode::is_opcode(*orig) {
                assert_eq!(orig, copied);
            }
        }
    }
}
