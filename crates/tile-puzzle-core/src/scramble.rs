//! Scramble generation: uniformly random, guaranteed non-identity piece
//! arrangements.

use crate::{GridDimensions, PieceId, Position};
use std::collections::HashSet;

/// Retry bound for rejection sampling. An identity shuffle has probability
/// 1/n! per attempt, so for any grid with at least 2 pieces this bound is
/// never reached in practice.
const MAX_ATTEMPTS: usize = 64;

/// A scrambled arrangement together with its displaced positions.
///
/// `assignment` is a permutation of the identity arrangement in row-major
/// position order; `displaced` is exactly the set of positions whose
/// assigned piece is not their home piece.
#[derive(Debug, Clone)]
pub struct Scramble {
    pub assignment: Vec<PieceId>,
    pub displaced: HashSet<Position>,
}

/// Generates random piece arrangements, rejecting the identity permutation.
///
/// A fresh scramble must never come out already solved: the identity is a
/// valid shuffle output, so it is rejection-sampled away rather than
/// special-cased.
pub struct Scrambler {
    rng: SimpleRng,
}

impl Default for Scrambler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrambler {
    /// Create a scrambler seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: SimpleRng::new(),
        }
    }

    /// Create a scrambler with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Produce a random arrangement of the grid's pieces with at least one
    /// piece out of place.
    ///
    /// A single-piece grid has no non-identity permutation and comes back
    /// solved; every larger grid is guaranteed unsolved. If rejection
    /// sampling ever exhausts its retry bound, the first two pieces are
    /// transposed deterministically, which still satisfies the non-identity
    /// postcondition.
    pub fn scramble(&mut self, grid: GridDimensions) -> Scramble {
        let identity: Vec<PieceId> = grid.positions().map(PieceId::home).collect();
        let mut assignment = identity.clone();

        if assignment.len() < 2 {
            return Self::resolve(grid, assignment);
        }

        for _ in 0..MAX_ATTEMPTS {
            self.shuffle(&mut assignment);
            if assignment != identity {
                return Self::resolve(grid, assignment);
            }
        }

        debug_assert!(false, "scramble rejection sampling exhausted");
        assignment.swap(0, 1);
        Self::resolve(grid, assignment)
    }

    /// Derive the displaced set for an assignment.
    fn resolve(grid: GridDimensions, assignment: Vec<PieceId>) -> Scramble {
        let displaced = grid
            .positions()
            .filter(|pos| assignment[grid.index_of(*pos)] != PieceId::home(*pos))
            .collect();
        Scramble {
            assignment,
            displaced,
        }
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.rng.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Simple PCG-style PRNG, seedable and WASM-compatible.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: a static counter if entropy is unavailable
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}
