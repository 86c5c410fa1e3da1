pub use dicedist::Roller;
use hashbrown::HashMap;
use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    Rng, RngCore, SeedableRng,
};
use squirrel_rng::SquirrelRng;

/// A roller backed by any `rand` generator.
///
/// One `Uniform` is kept per face range so repeated rolls of the same dice skip the setup.
#[derive(Debug, Default)]
pub struct RandomRoller<R> {
    rng: R,
    ranges: HashMap<(u32, u32), Uniform<u32>>,
}

impl<R: Default + Rng> RandomRoller<R> {
    pub fn new() -> Self {
        Self::with_rng(R::default())
    }
}

impl<R: Rng> RandomRoller<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            ranges: HashMap::new(),
        }
    }
}

impl<R: Rng> Roller for RandomRoller<R> {
    fn uniform(&mut self, low: u32, high: u32) -> u32 {
        self.ranges
            .entry((low, high))
            .or_insert_with(|| Uniform::from(low..=high))
            .sample(&mut self.rng)
    }
}

/// Roller type used by the shell: entropy-seeded by default, reproducible when given a seed.
pub type DynRoller = RandomRoller<Box<dyn RngCore>>;

pub fn roller(seed: Option<u64>) -> DynRoller {
    match seed {
        Some(seed) => RandomRoller::with_rng(Box::new(StdRng::seed_from_u64(seed))),
        None => RandomRoller::with_rng(Box::new(SquirrelRng::default())),
    }
}
