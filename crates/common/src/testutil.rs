//! Shared helpers for unit and integration tests across the workspace.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call repeatedly.
pub fn init() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// A small, fast, non-cryptographic RNG seeded for reproducible tests.
pub fn get_rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

/// Random ASCII bytes of exactly `n` bytes.
pub fn get_random_byte_vec(rng: &mut SmallRng, n: usize) -> Vec<u8> {
    (0..n).map(|_| rng.gen_range(b'a'..=b'z')).collect()
}

/// `count` random byte buffers, each with a length uniformly drawn from
/// `[min_size, max_size]`.
pub fn get_random_vec_of_byte_vec(
    rng: &mut SmallRng,
    count: usize,
    min_size: usize,
    max_size: usize,
) -> Vec<Vec<u8>> {
    (0..count)
        .map(|_| {
            let size = if min_size == max_size {
                min_size
            } else {
                rng.gen_range(min_size..=max_size)
            };
            get_random_byte_vec(rng, size)
        })
        .collect()
}
