//! # RNG Module - Skip-Ahead Deterministic Stream
//!
//! This module provides the single source of randomness for the transport loop: a
//! reproducible 64-bit linear congruential generator with an O(log k) `jump(k)`
//! primitive. Reproducibility under an arbitrary thread count hinges entirely on
//! `jump` being a closed-form function of k (the classic LCG jump-ahead-by-doubling
//! trick), not an iterated application of the step function.
//!
//! ## Why not `rand::rngs::StdRng`
//!
//! `StdRng`/ChaCha have no public skip-ahead primitive; PCG-family generators (as
//! pulled in by some of the other example crates) expose `advance` only on specific
//! concrete types. The cycle controller (`crate::cycle`) needs every worker's stream
//! to be derivable from the master stream by a pure function of its bank index, so we
//! own the generator instead of going through `rand::Rng` for the hot path. We do
//! still implement `rand_core::RngCore` so `rand_distr` samplers (used for the
//! free-gas target velocity in `crate::physics::kinematics`) can ride on top of it.

pub mod tests;

use rand_core::RngCore;

/// Multiplier and increment of the classic Knuth MMIX 64-bit LCG.
const LCG_MULT: u64 = 6364136223846793005;
const LCG_INC: u64 = 1442695040888963407;

/// Deterministic, skip-ahead-capable uniform source.
///
/// `state` is the raw 64-bit LCG state; `uniform()` derives a `[0, 1)` double from
/// the upper 53 bits of state, the standard trick for turning a 64-bit LCG into a
/// full-precision double without losing the low-order bits (which are the least
/// random ones in an LCG).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Creates a new stream seeded deterministically from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = Rng {
            state: seed.wrapping_add(LCG_INC),
        };
        // Discard the first step so seed=0 doesn't start at a fixed point.
        rng.step();
        rng
    }

    /// Advances the raw LCG state by one step: `state' = state * MULT + INC`.
    #[inline]
    fn step(&mut self) {
        self.state = self.state.wrapping_mul(LCG_MULT).wrapping_add(LCG_INC);
    }

    /// Draws the next uniform variate in `[0, 1)`.
    ///
    /// Advances state by exactly one step, matching the cost model `jump(k)` assumes.
    pub fn uniform(&mut self) -> f64 {
        self.step();
        // Top 53 bits -> f64 mantissa precision, scaled into [0, 1).
        let bits = self.state >> 11;
        (bits as f64) * (1.0 / (1u64 << 53) as f64)
    }

    /// Advances the stream by exactly `k` draws, in O(log k) time.
    ///
    /// Uses the standard LCG jump-ahead-by-doubling identity: composing the affine
    /// map `x -> a*x + c` with itself `k` times is again affine, `x -> A*x + C`, with
    /// `(A, C)` obtainable by repeated squaring instead of `k` applications.
    pub fn jump(&mut self, mut k: u64) {
        let (mut cur_mult, mut cur_inc) = (LCG_MULT, LCG_INC);
        let (mut acc_mult, mut acc_inc): (u64, u64) = (1, 0);

        while k > 0 {
            if k & 1 == 1 {
                acc_mult = acc_mult.wrapping_mul(cur_mult);
                acc_inc = acc_inc.wrapping_mul(cur_mult).wrapping_add(cur_inc);
            }
            cur_inc = cur_mult.wrapping_add(1).wrapping_mul(cur_inc);
            cur_mult = cur_mult.wrapping_mul(cur_mult);
            k >>= 1;
        }

        self.state = acc_mult.wrapping_mul(self.state).wrapping_add(acc_inc);
    }

    /// Derives an independent stream for bank slot `slot`, reserving
    /// `per_history` draws per slot. Equivalent to `self.clone(); jump(slot *
    /// per_history)`, the rule the cycle controller uses to hand each worker an
    /// independent stream regardless of thread count.
    pub fn derive(&self, slot: u64, per_history: u64) -> Self {
        let mut r = *self;
        r.jump(slot.saturating_mul(per_history));
        r
    }
}

impl RngCore for Rng {
    fn next_u32(&mut self) -> u32 {
        self.step();
        (self.state >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step();
        self.state
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut chunks = dest.chunks_exact_mut(8);
        for chunk in &mut chunks {
            chunk.copy_from_slice(&self.next_u64().to_le_bytes());
        }
        let rem = chunks.into_remainder();
        if !rem.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            rem.copy_from_slice(&bytes[..rem.len()]);
        }
    }
}
