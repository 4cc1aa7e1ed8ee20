use rand_xoshiro::Xoshiro128PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

/// Pseudo-random generator owned by streams and animations
pub type EngineRng = Xoshiro128PlusPlus;

/// Deterministic generator for `seed`
pub fn seeded(seed: u64) -> EngineRng {
    EngineRng::seed_from_u64(seed)
}

/// Derive an independent seed for a child generator
pub(crate) const fn fork(seed: u64, salt: u64) -> u64 {
    seed ^ salt.wrapping_mul(0x9e37_79b9_7f4a_7c15)
}
