//! Draft messages and their text form.
//!
//! Everything after framing is one of the [`Message`] variants. Pack offers
//! and picks travel as space-separated card ids; group and session ends are
//! the two sentinel strings below.

use crate::draft::card::{CardRef, Pack};
use crate::error::{constants, DraftError, Result};

/// Sentinel sent between pack groups
pub const NEXT_PACK: &str = "NEXT_PACK";

/// Sentinel sent once the last group is drafted
pub const STOP_DRAFTING: &str = "STOP_DRAFTING";

/// Messages of the draft protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Draft display name, sent once before any pack
    Announce(String),
    /// Contents of the pack a player currently holds
    PackOffer(Vec<CardRef>),
    /// The current pack group is finished
    RoundBoundary,
    /// The draft is over
    SessionEnd,
    /// A player's choice from the last offer
    Pick(CardRef),
}

impl Message {
    pub fn offer(pack: &Pack) -> Self {
        Message::PackOffer(pack.cards().to_vec())
    }

    /// Serialize to the text carried inside a frame
    pub fn to_wire(&self) -> String {
        match self {
            Message::Announce(name) => name.clone(),
            Message::PackOffer(cards) => cards
                .iter()
                .map(CardRef::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            Message::RoundBoundary => NEXT_PACK.to_string(),
            Message::SessionEnd => STOP_DRAFTING.to_string(),
            Message::Pick(card) => card.as_str().to_string(),
        }
    }

    /// Parse the first message of a session.
    ///
    /// The announcement and pack offers are both free text on the wire, so the
    /// receiver tells them apart by position.
    pub fn parse_announce(text: &str) -> Result<Self> {
        if text == NEXT_PACK || text == STOP_DRAFTING {
            return Err(DraftError::Protocol(format!(
                "Expected draft announcement, got sentinel {text}"
            )));
        }
        Ok(Message::Announce(text.to_string()))
    }

    /// Parse any server message after the announcement
    pub fn parse_server(text: &str) -> Result<Self> {
        match text {
            NEXT_PACK => Ok(Message::RoundBoundary),
            STOP_DRAFTING => Ok(Message::SessionEnd),
            _ => {
                let cards = text
                    .split(' ')
                    .filter(|id| !id.is_empty())
                    .map(CardRef::new)
                    .collect::<Result<Vec<_>>>()?;
                if cards.is_empty() {
                    return Err(DraftError::Protocol(constants::ERR_EMPTY_OFFER.to_string()));
                }
                Ok(Message::PackOffer(cards))
            }
        }
    }

    /// Parse a client's reply to a pack offer
    pub fn parse_pick(text: &str) -> Result<Self> {
        CardRef::new(text.trim()).map(Message::Pick)
    }
}
