//! Deterministic random number generation with named sub-stream forking.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Forkable**: Named child streams for independent subsystems
//!
//! Every subsystem that consumes randomness (combat, enemy moves, agent
//! decisions) should use its own forked stream so that consuming values
//! in one does not perturb another. This is what makes regression tests
//! and parallel batch execution reproducible.
//!
//! ```
//! use spire_sim::core::GameRng;
//!
//! let rng = GameRng::new(42);
//! let mut combat = rng.fork("combat");
//! let mut agent = rng.fork("agent");
//!
//! // Independent streams, both fully determined by the parent seed.
//! let _ = combat.random_int(0, 99);
//! let _ = agent.random_float();
//!
//! // Forking the same name again yields the same child seed.
//! assert_eq!(rng.fork("combat").seed(), GameRng::new(42).fork("combat").seed());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Deterministic RNG that can be forked into independent named sub-streams.
///
/// Uses ChaCha8 for speed while maintaining high-quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was initialised with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive a child stream for a named subsystem.
    ///
    /// The child seed is the first 8 bytes (big-endian) of
    /// `SHA-256("{seed}:{name}")`, so the derivation is stable across
    /// platforms, Rust versions, and worker processes. Forking the same
    /// name from an RNG in the same state always yields the same child.
    #[must_use]
    pub fn fork(&self, name: &str) -> Self {
        let digest = Sha256::digest(format!("{}:{}", self.seed, name).as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self::new(u64::from_be_bytes(bytes))
    }

    /// Uniform random integer in the inclusive range `[low, high]`.
    pub fn random_int(&mut self, low: i32, high: i32) -> i32 {
        self.inner.gen_range(low..=high)
    }

    /// Uniform random float in the half-open interval `[0.0, 1.0)`.
    pub fn random_float(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform random index into a collection of `len` elements.
    ///
    /// Returns `None` if `len` is 0.
    pub fn choice_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.inner.gen_range(0..len))
    }

    /// Choose a random element from a slice.
    pub fn choice<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
