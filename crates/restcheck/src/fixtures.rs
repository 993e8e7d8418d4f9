//! Randomized fixtures for the items resource.
//!
//! Fixtures are disposable inputs: every generated item carries a fresh
//! isbn13-like identifier so independent scenarios cannot collide on state
//! held by the remote resource. Collision avoidance is probabilistic: the
//! identifier space holds ~8.1e12 values, so two identical draws within a
//! run are vanishingly unlikely, not impossible.
//!
//! The randomness source is injected so tests can replay a run
//! deterministically:
//!
//! ```rust
//! use restcheck::FixtureGenerator;
//!
//! let mut a = FixtureGenerator::seeded(42);
//! let mut b = FixtureGenerator::seeded(42);
//! assert_eq!(a.isbn13(), b.isbn13());
//! ```

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::GenerationError;

/// An item payload as sent to the resource: everything except the
/// server-assigned `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Item kind, e.g. "cd", "dvd", "book". Open enumeration; the remote
    /// resource is authoritative on accepted values.
    #[serde(rename = "type")]
    pub item_type: String,

    /// Five-segment identifier, treated as an opaque token downstream.
    pub isbn13: String,

    /// Non-negative decimal price.
    pub price: f64,

    /// Non-negative stock count.
    pub numberinstock: u32,
}

impl ItemDraft {
    /// Creates a draft with explicit field values.
    pub fn new(item_type: &str, isbn13: &str, price: f64, numberinstock: u32) -> Self {
        Self {
            item_type: item_type.to_string(),
            isbn13: isbn13.to_string(),
            price,
            numberinstock,
        }
    }

    /// Returns the draft as the JSON object the resource expects.
    pub fn to_json(&self) -> Value {
        json!({
            "type": self.item_type,
            "isbn13": self.isbn13,
            "price": self.price,
            "numberinstock": self.numberinstock,
        })
    }

    /// Returns a copy with a different price.
    pub fn with_price(&self, price: f64) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    /// Returns a copy with a different stock count.
    pub fn with_stock(&self, numberinstock: u32) -> Self {
        Self {
            numberinstock,
            ..self.clone()
        }
    }
}

/// Generates structurally valid, randomized item fixtures.
///
/// Pure function of the injected random source: no network, no persistent
/// state.
#[derive(Debug)]
pub struct FixtureGenerator<R: Rng = StdRng> {
    rng: R,
}

impl FixtureGenerator<StdRng> {
    /// Creates a generator seeded from OS entropy (live runs).
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministic generator for replayable tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for FixtureGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FixtureGenerator<R> {
    /// Wraps an arbitrary random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Produces a five-segment identifier with fixed digit widths 3-1-2-6-1,
    /// each segment drawn uniformly and independently.
    pub fn isbn13(&mut self) -> String {
        let segment1 = self.rng.random_range(100..=999);
        let segment2 = self.rng.random_range(0..=9);
        let segment3 = self.rng.random_range(10..=99);
        let segment4 = self.rng.random_range(100_000..=999_999);
        let segment5 = self.rng.random_range(0..=9);

        format!("{segment1}-{segment2}-{segment3}-{segment4}-{segment5}")
    }

    /// Produces an item draft with a fresh identifier, a price drawn from the
    /// inclusive continuous `price` range and a stock count from the
    /// inclusive integer `stock` range.
    ///
    /// Inverted ranges are rejected, never swapped.
    pub fn item(
        &mut self,
        item_type: &str,
        price: RangeInclusive<f64>,
        stock: RangeInclusive<u32>,
    ) -> Result<ItemDraft, GenerationError> {
        if price.start() > price.end() {
            return Err(GenerationError::InvalidPriceRange {
                min: *price.start(),
                max: *price.end(),
            });
        }
        if stock.start() > stock.end() {
            return Err(GenerationError::InvalidStockRange {
                min: *stock.start(),
                max: *stock.end(),
            });
        }

        Ok(ItemDraft {
            item_type: item_type.to_string(),
            isbn13: self.isbn13(),
            price: self.rng.random_range(price),
            numberinstock: self.rng.random_range(stock),
        })
    }
}
