//! Card references and packs.
//!
//! The draft never looks inside a card: a [`CardRef`] is an opaque identifier
//! (a multiverse id) and only identity and pack membership matter.

use std::collections::HashSet;
use std::fmt;

use crate::error::{constants, DraftError, Result};
use crate::protocol::message::{NEXT_PACK, STOP_DRAFTING};

/// Opaque unique identifier of a card
///
/// Identifiers travel space-separated on the wire, so they may not be empty,
/// contain whitespace, or collide with a sentinel message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardRef(String);

impl CardRef {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DraftError::Protocol(constants::ERR_EMPTY_CARD_REF.to_string()));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(DraftError::Protocol(format!(
                "Card reference contains whitespace: {id:?}"
            )));
        }
        if id == NEXT_PACK || id == STOP_DRAFTING {
            return Err(DraftError::Protocol(format!(
                "Card reference collides with sentinel: {id}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CardRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered collection of distinct card references that shrinks as picks are made
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pack {
    cards: Vec<CardRef>,
}

impl Pack {
    /// Build a pack, rejecting duplicate references
    pub fn new(cards: Vec<CardRef>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(card) {
                return Err(DraftError::Configuration(format!(
                    "Pack contains card {card} more than once"
                )));
            }
        }
        Ok(Self { cards })
    }

    /// Convenience for building a pack from raw identifiers
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cards = ids
            .into_iter()
            .map(CardRef::new)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| DraftError::Configuration(e.to_string()))?;
        Self::new(cards)
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

    pub fn contains(&self, card: &CardRef) -> bool {
        self.cards.contains(card)
    }

    /// Remove a picked card, preserving the order of the rest.
    ///
    /// A card that is not in the pack is a protocol violation, never a no-op.
    pub fn take(&mut self, card: &CardRef) -> Result<CardRef> {
        let pos = self.cards.iter().position(|c| c == card).ok_or_else(|| {
            DraftError::Protocol(format!("Picked card {card} is not in the offered pack"))
        })?;
        Ok(self.cards.remove(pos))
    }
}
