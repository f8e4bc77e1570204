//! Test helpers.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Creates a seeded RNG for tests.
///
/// When `seed` is `None` a fresh seed is drawn from the thread RNG. The seed
/// is printed so that a failing run can be replayed by passing it back in.
pub fn make_test_rng(seed: Option<[u8; 32]>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    eprintln!("Test RNG seed: {seed:?}");
    StdRng::from_seed(seed)
}
