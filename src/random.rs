use std::sync::Mutex;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
// Process-wide stream; re-seeding it is visible to every other user.
static SHARED_RNG: Lazy<Mutex<StdRng>> = Lazy::new(|| Mutex::new(StdRng::from_entropy()));
/// Runs `f` with exclusive access to the shared stream.
pub fn with_shared_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    let mut guard = SHARED_RNG.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut *guard)
}
/// Re-seeds the shared stream and draws `amount` distinct entries under one lock.
pub fn seeded_sample(seed: u64, frames: &[usize], amount: usize) -> Vec<usize> {
    with_shared_rng(|rng| {
        *rng = StdRng::seed_from_u64(seed);
        sample_without_replacement(rng, frames, amount)
    })
}
pub fn sample_without_replacement(rng: &mut StdRng, frames: &[usize], amount: usize) -> Vec<usize> {
    frames.choose_multiple(rng, amount).copied().collect()
}
