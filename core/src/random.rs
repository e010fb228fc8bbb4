use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

// Source of the jitter values the generator consumes.
// Seeding and every displaced cell each take exactly one draw, in a fixed order,
// so the same source sequence always yields the same field.
pub trait RandomSource {
    // Next value, expected in [0, 1)
    fn next_unit(&mut self) -> f64;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

// Adapter over any `rand` generator
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    // Reproducible stream for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    // Fresh stream seeded by the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

// Replays a fixed list of values, wrapping around at the end.
// Lets a test predict every draw the generator makes.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    values: Vec<f64>,
    pos: usize,
}

impl ReplaySource {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "replay source needs at least one value");
        Self { values, pos: 0 }
    }

    // Number of values handed out so far
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ReplaySource {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
