use crate::Contestant;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Reorders a contestant list before pairing. Injected into the engine so
/// tests and replays can pin the bracket path.
pub trait Shuffler {
    fn shuffle(&mut self, contestants: &mut [Contestant]);
}

/// ChaCha8-backed shuffle. Same seed, same bracket.
#[derive(Debug, Clone)]
pub struct SeededShuffle {
    rng: ChaCha8Rng,
}

impl SeededShuffle {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_os_rng() }
    }
}

impl Default for SeededShuffle {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Shuffler for SeededShuffle {
    fn shuffle(&mut self, contestants: &mut [Contestant]) {
        contestants.shuffle(&mut self.rng);
    }
}

/// Keeps arrival order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShuffle;

impl Shuffler for NoShuffle {
    fn shuffle(&mut self, _contestants: &mut [Contestant]) {}
}

impl<S: Shuffler + ?Sized> Shuffler for &mut S {
    fn shuffle(&mut self, contestants: &mut [Contestant]) {
        (**self).shuffle(contestants);
    }
}
