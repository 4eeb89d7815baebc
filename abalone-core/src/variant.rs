//! Variant - starting layout definition
//!
//! A variant names the player count and each player's starting positions
//! (by position id). Catalogs are plain JSON maps of name -> variant.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Position, NUM_POSITIONS};
use crate::error::EngineError;

/// Variant used when a requested name is unknown
pub const DEFAULT_VARIANT: &str = "classical";

/// Supported player counts
pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: u8 = 4;

/// Starting layout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub name: String,
    pub players: u8,
    pub players_sets: Vec<Vec<Position>>,
}

impl Variant {
    pub fn new(name: &str, players_sets: Vec<Vec<Position>>) -> Self {
        Self {
            name: name.to_string(),
            players: players_sets.len() as u8,
            players_sets,
        }
    }

    /// Check player count, set count and position ids
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: String| EngineError::InvalidVariant {
            name: self.name.clone(),
            reason,
        };

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(invalid(format!("{} players (expected 2..=4)", self.players)));
        }
        if self.players_sets.len() != self.players as usize {
            return Err(invalid(format!(
                "{} position sets for {} players",
                self.players_sets.len(),
                self.players
            )));
        }

        let mut seen = [false; NUM_POSITIONS];
        for &pos in self.players_sets.iter().flatten() {
            let slot = seen
                .get_mut(pos as usize)
                .ok_or_else(|| invalid(format!("position {} out of range", pos)))?;
            if *slot {
                return Err(invalid(format!("position {} used twice", pos)));
            }
            *slot = true;
        }

        Ok(())
    }

    /// Marbles per player at the start
    pub fn marble_counts(&self) -> Vec<usize> {
        self.players_sets.iter().map(Vec::len).collect()
    }

    /// Standard opening: two full back rows plus the middle three of the third
    pub fn classical() -> Self {
        let top: Vec<Position> = (0..=10).chain(13..=15).collect();
        let bottom: Vec<Position> = (45..=47).chain(50..=60).collect();
        Self::new("classical", vec![top, bottom])
    }

    /// Two daisies per side, sharing the back rows
    pub fn belgian_daisy() -> Self {
        Self::new(
            "belgian_daisy",
            vec![
                vec![0, 1, 5, 6, 7, 12, 13, 47, 48, 53, 54, 55, 59, 60],
                vec![3, 4, 8, 9, 10, 15, 16, 44, 45, 50, 51, 52, 56, 57],
            ],
        )
    }

    /// Two daisies per side, pulled one row toward the center
    pub fn german_daisy() -> Self {
        Self::new(
            "german_daisy",
            vec![
                vec![5, 6, 11, 12, 13, 19, 20, 40, 41, 47, 48, 49, 54, 55],
                vec![9, 10, 15, 16, 17, 23, 24, 36, 37, 43, 44, 45, 50, 51],
            ],
        )
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::classical()
    }
}

/// Named collection of variants
#[derive(Clone, Debug, Default)]
pub struct VariantCatalog {
    variants: BTreeMap<String, Variant>,
}

impl VariantCatalog {
    /// Catalog of the built-in two-player layouts
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog.insert(Variant::classical());
        catalog.insert(Variant::belgian_daisy());
        catalog.insert(Variant::german_daisy());
        catalog
    }

    /// Load a catalog from a JSON map of name -> variant
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read variants file: {}", path.display()))?;
        let raw: BTreeMap<String, Variant> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse variants file: {}", path.display()))?;

        let mut catalog = Self::default();
        for (name, mut variant) in raw {
            variant.name = name;
            variant.validate()?;
            catalog.insert(variant);
        }
        Ok(catalog)
    }

    /// Save as a JSON map of name -> variant
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(&self.variants)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn insert(&mut self, variant: Variant) {
        self.variants.insert(variant.name.clone(), variant);
    }

    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.variants.get(name)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Variants in name order
    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values()
    }

    /// Select a variant: uniformly at random when `random_pick` is set,
    /// otherwise by name, falling back to the classical layout.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        name: &str,
        random_pick: bool,
        rng: &mut R,
    ) -> Result<Variant, EngineError> {
        if random_pick {
            if let Some(variant) = self.variants.values().choose(rng) {
                return Ok(variant.clone());
            }
        }

        if let Some(variant) = self.get(name) {
            return Ok(variant.clone());
        }

        tracing::debug!("Unknown variant '{}', falling back to {}", name, DEFAULT_VARIANT);
        self.get(DEFAULT_VARIANT)
            .cloned()
            .ok_or_else(|| EngineError::UnknownVariant(name.to_string()))
    }
}
