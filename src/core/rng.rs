//! Seedable randomness for pools.
//!
//! Each pool owns its own generator so a fixed seed replays identically.

use rand::{Rng, SeedableRng};
pub use rand_xoshiro::Xoshiro256StarStar;

/// Generator used by every pool.
pub type SimRng = Xoshiro256StarStar;

/// Build a generator from an optional seed, drawing one from the OS when absent.
#[must_use]
pub fn seeded(seed: Option<u64>) -> SimRng {
    let seed = seed.unwrap_or_else(rand::random);
    SimRng::seed_from_u64(seed)
}

/// Generate a random float in the range [low, high).
#[inline]
pub fn random_uniform(rng: &mut SimRng, low: f32, high: f32) -> f32 {
    rng.r#gen::<f32>() * (high - low) + low
}
