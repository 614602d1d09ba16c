use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cli::ScenarioSelection;

/// Picks catalog indices for the requests of a tick.
#[derive(Debug)]
pub enum ScenarioSelector {
    RoundRobin { next: usize },
    Random(StdRng),
}

impl ScenarioSelector {
    pub fn new(policy: ScenarioSelection) -> Self {
        match policy {
            ScenarioSelection::RoundRobin => ScenarioSelector::RoundRobin { next: 0 },
            ScenarioSelection::Random => ScenarioSelector::Random(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        ScenarioSelector::Random(StdRng::seed_from_u64(seed))
    }

    /// Choose `count` indices into a catalog of `catalog_len` scenarios.
    ///
    /// Always returns exactly `count` indices, repeating scenarios when `count` exceeds the
    /// catalog size. Returns nothing for an empty catalog.
    pub fn select(&mut self, catalog_len: usize, count: usize) -> Vec<usize> {
        if catalog_len == 0 {
            return Vec::new();
        }

        match self {
            ScenarioSelector::RoundRobin { next } => (0..count)
                .map(|_| {
                    let index = *next % catalog_len;
                    *next = (index + 1) % catalog_len;
                    index
                })
                .collect(),
            ScenarioSelector::Random(rng) => {
                (0..count).map(|_| rng.gen_range(0..catalog_len)).collect()
            }
        }
    }
}
