//! Randomized, illustrative values.
//!
//! Ranges are chosen to look plausible in fixtures, not to cover the full
//! domain of each type:
//!
//! - strings: one to three lorem-ipsum words
//! - integers: `[0, 65536]`, longs: `[0, 2^32]`
//! - doubles: `[0, 256)` rounded to three decimals
//! - date-times: the current UTC time

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

use super::ValueGenerator;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit",
    "sed", "do", "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore",
    "magna", "aliqua", "enim", "ad", "minim", "veniam", "quis", "nostrud",
    "exercitation", "ullamco", "laboris", "nisi", "aliquip", "ex", "ea", "commodo",
    "consequat", "duis", "aute", "irure", "in", "reprehenderit", "voluptate",
    "velit", "esse", "cillum", "fugiat", "nulla", "pariatur",
];

enum Source {
    /// Process-wide thread-local generator.
    Thread,
    /// Reproducible stream, shared behind a lock.
    Seeded(Mutex<StdRng>),
}

/// Random sample values.
pub struct SampleValueGenerator {
    source: Source,
}

impl SampleValueGenerator {
    pub fn new() -> Self {
        Self { source: Source::Thread }
    }

    /// Reproducible output for tests and snapshots.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn draw<T>(&self, f: impl FnOnce(&mut dyn RngCore) -> T) -> T {
        match &self.source {
            Source::Thread => f(&mut rand::thread_rng()),
            Source::Seeded(rng) => f(&mut *rng.lock()),
        }
    }
}

impl Default for SampleValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SampleValueGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.source {
            Source::Thread => "thread",
            Source::Seeded(_) => "seeded",
        };
        f.debug_struct("SampleValueGenerator").field("source", &source).finish()
    }
}

impl ValueGenerator for SampleValueGenerator {
    fn get_string(&self) -> String {
        self.draw(|rng| {
            let count = rng.gen_range(1..=3);
            (0..count)
                .filter_map(|_| WORDS.choose(rng).copied())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }

    fn get_integer(&self) -> i32 {
        self.draw(|rng| rng.gen_range(0..=1 << 16))
    }

    fn get_long(&self) -> i64 {
        self.draw(|rng| rng.gen_range(0..=1i64 << 32))
    }

    fn get_double(&self) -> f64 {
        let raw: f64 = self.draw(|rng| rng.gen_range(0.0..256.0));
        (raw * 1000.0).round() / 1000.0
    }

    fn get_boolean(&self) -> bool {
        self.draw(|rng| rng.gen_bool(0.5))
    }

    fn get_date_time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn get_enum<'a>(&self, literals: &'a [String]) -> &'a str {
        self.draw(|rng| literals.choose(rng).map(String::as_str).unwrap_or_default())
    }
}
