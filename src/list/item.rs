//! Shopping items and their identifiers

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::ID_SUFFIX_LEN;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque item identifier: creation timestamp digits followed by a random base36 suffix.
///
/// Ids are the only stable handle to an item; never hold `&Item` across a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single shopping list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    /// Trimmed display name
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub purchased: bool,
    /// Unix timestamp (ms) when the item was added
    pub created_at: i64,
}

/// Generates item ids that never repeat within one generator.
///
/// The timestamp part is forced to strictly increase, so two ids from the same
/// generator differ even before the random suffix is considered.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: Pcg32,
    last_millis: i64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Generator seeded from OS entropy
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    /// Deterministic generator (tests)
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_millis: i64::MIN,
        }
    }

    /// Produce the next id for an item created at `now_millis`
    pub fn next_id(&mut self, now_millis: i64) -> ItemId {
        let millis = if now_millis > self.last_millis {
            now_millis
        } else {
            self.last_millis.saturating_add(1)
        };
        self.last_millis = millis;

        let mut id = millis.to_string();
        for _ in 0..ID_SUFFIX_LEN {
            let idx = self.rng.random_range(0..BASE36.len());
            id.push(char::from(BASE36[idx]));
        }
        ItemId(id)
    }
}
