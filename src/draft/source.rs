//! Where packs come from.
//!
//! The session asks a [`PackSource`] for a flat list of packs once all players
//! are connected. How a source composes boosters is its own business; the
//! draft only relies on each pack being an ordered list of distinct cards.

use std::collections::HashSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::draft::card::{CardRef, Pack};
use crate::error::{DraftError, Result};

/// Supplies the packs for a draft
pub trait PackSource {
    /// Produce exactly `total` packs
    fn generate_packs(&mut self, total: usize) -> Result<Vec<Pack>>;
}

/// A pool of cards to cut boosters from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cube {
    pub name: String,
    cards: Vec<CardRef>,
}

/// On-disk cube file: `{"name": ..., "card_ids": [...], "card_info": {...}}`
#[derive(Debug, Deserialize)]
struct CubeFile {
    name: String,
    card_ids: Vec<String>,
}

impl Cube {
    /// Build a cube, skipping blank ids and dropping repeats
    pub fn new<I, S>(name: impl Into<String>, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let mut seen = HashSet::new();
        let mut cards = Vec::new();

        for id in ids {
            let id = id.into();
            let id = id.trim();
            if id.is_empty() {
                continue;
            }
            let card = CardRef::new(id).map_err(|e| {
                DraftError::Configuration(format!("Cube '{name}' has a bad card id: {e}"))
            })?;
            if seen.insert(card.clone()) {
                cards.push(card);
            } else {
                warn!(cube = %name, card = %card, "Dropping duplicate card from cube");
            }
        }

        Ok(Self { name, cards })
    }

    /// Parse the JSON cube format
    pub fn from_json(content: &str) -> Result<Self> {
        let file: CubeFile = serde_json::from_str(content)
            .map_err(|e| DraftError::Configuration(format!("Failed to parse cube: {e}")))?;
        Self::new(file.name, file.card_ids)
    }

    /// Parse a plain list with one card id per line
    pub fn from_list(name: impl Into<String>, content: &str) -> Result<Self> {
        Self::new(name, content.lines())
    }

    /// Load a cube file; `.json` and `.cube` files are JSON, anything else is a plain list
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DraftError::Configuration(format!("Failed to read cube {}: {e}", path.display()))
        })?;

        let is_json = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("json") | Some("cube")
        );
        if is_json {
            Self::from_json(&content)
        } else {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            Self::from_list(name, &content)
        }
    }

    pub fn cards(&self) -> &[CardRef] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Cuts shuffled boosters of a fixed size from a cube
#[derive(Debug)]
pub struct CubePackSource {
    cube: Cube,
    pack_size: usize,
    rng: StdRng,
}

impl CubePackSource {
    pub fn new(cube: Cube, pack_size: usize) -> Self {
        Self {
            cube,
            pack_size,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic shuffling, for reproducible drafts and tests
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl PackSource for CubePackSource {
    fn generate_packs(&mut self, total: usize) -> Result<Vec<Pack>> {
        if self.pack_size == 0 {
            return Err(DraftError::Configuration(
                "Pack size must be greater than 0".to_string(),
            ));
        }

        let needed = total * self.pack_size;
        if needed > self.cube.len() {
            return Err(DraftError::Configuration(format!(
                "Cube '{}' has {} cards but {total} packs of {} need {needed}",
                self.cube.name,
                self.cube.len(),
                self.pack_size
            )));
        }

        let mut pool = self.cube.cards.clone();
        pool.shuffle(&mut self.rng);
        debug!(cube = %self.cube.name, total, pack_size = self.pack_size, "Generating packs");

        // the cube is deduplicated, so no pack can repeat a card
        pool.chunks(self.pack_size)
            .take(total)
            .map(|chunk| Pack::new(chunk.to_vec()))
            .collect()
    }
}

/// Hands out a prepared list of packs
#[derive(Debug, Clone, Default)]
pub struct FixedPacks {
    packs: Vec<Pack>,
}

impl FixedPacks {
    pub fn new(packs: Vec<Pack>) -> Self {
        Self { packs }
    }
}

impl PackSource for FixedPacks {
    fn generate_packs(&mut self, total: usize) -> Result<Vec<Pack>> {
        if total != self.packs.len() {
            return Err(DraftError::Configuration(format!(
                "Requested {total} packs but {} were prepared",
                self.packs.len()
            )));
        }
        Ok(std::mem::take(&mut self.packs))
    }
}
