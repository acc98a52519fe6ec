//! Park–Miller ("minimal standard") sequence used to shape the tree.

use crate::types::Seed;

const MULTIPLIER: u64 = 16807;
const MODULUS: u64 = 2_147_483_647;

/// Deterministic sequence of reals in [0,1) driven by an integer seed.
///
/// `state = state * 16807 mod 2147483647`, output `state / 2147483647`.
/// The same seed yields the same sequence on every platform because all
/// arithmetic is exact integer math until the final division.
///
/// This is consumed once, in a fixed order, while building a tree. Per-frame
/// attributes use [`crate::hash`] instead so that they never depend on
/// render order.
#[derive(Clone, Debug)]
pub struct SeededSequence {
    state: u64,
}

impl SeededSequence {
    /// Creates a sequence from `seed`.
    ///
    /// The seed is reduced modulo 2147483647 with a non-negative remainder.
    /// A remainder of zero is replaced by one, since zero is a fixed point
    /// of the recurrence.
    pub fn new(seed: Seed) -> Self {
        let reduced = seed.0.rem_euclid(MODULUS as i64) as u64;
        Self {
            state: if reduced == 0 { 1 } else { reduced },
        }
    }

    /// Advances the recurrence and returns the next value in [0,1).
    pub fn next_unit(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Maps the next value linearly into `[lo, hi)`.
    pub fn next_in(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (self.next_unit() as f32) * (hi - lo)
    }
}
