//! # Draft Client
//!
//! The player side of the protocol. Reads the announcement, then answers every
//! pack offer with one card until the server says the draft is over.
//!
//! Choosing the card is delegated to a [`Picker`], so the same loop drives an
//! interactive terminal player and an automated one.

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info, instrument, warn};

use crate::core::codec::TextCodec;
use crate::draft::card::CardRef;
use crate::error::{DraftError, Result};
use crate::protocol::message::Message;

/// Chooses one card from an offered pack
pub trait Picker {
    /// `pack_number` counts pack groups from 1
    fn pick(&mut self, pack_number: usize, offer: &[CardRef]) -> Result<CardRef>;
}

impl<F> Picker for F
where
    F: FnMut(usize, &[CardRef]) -> Result<CardRef>,
{
    fn pick(&mut self, pack_number: usize, offer: &[CardRef]) -> Result<CardRef> {
        self(pack_number, offer)
    }
}

/// Always takes the first card offered
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstCardPicker;

impl Picker for FirstCardPicker {
    fn pick(&mut self, _pack_number: usize, offer: &[CardRef]) -> Result<CardRef> {
        offer
            .first()
            .cloned()
            .ok_or_else(|| DraftError::Protocol("Cannot pick from an empty pack".to_string()))
    }
}

/// What a player took home
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSummary {
    pub draft_name: String,
    pub pile: Vec<CardRef>,
    pub packs_opened: usize,
}

/// A player's connection to a draft server
pub struct DraftClient<S = TcpStream> {
    framed: Framed<S, TextCodec>,
}

impl DraftClient<TcpStream> {
    /// Connect to a hosting server
    #[instrument(level = "debug")]
    pub async fn connect(address: &str, header_width: usize) -> Result<Self> {
        let stream = TcpStream::connect(address).await?;
        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "Failed to disable Nagle on client socket");
        }
        info!(%address, "Connected to draft server");
        Ok(Self::from_stream(stream, header_width))
    }
}

impl<S> DraftClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn from_stream(stream: S, header_width: usize) -> Self {
        Self {
            framed: Framed::new(stream, TextCodec::new(header_width)),
        }
    }

    async fn receive(&mut self) -> Result<String> {
        self.framed
            .next()
            .await
            .ok_or(DraftError::ConnectionLost)?
    }

    /// Read the draft name sent before any pack
    pub async fn wait_for_announcement(&mut self) -> Result<String> {
        let text = self.receive().await?;
        match Message::parse_announce(&text)? {
            Message::Announce(name) => Ok(name),
            other => Err(DraftError::Protocol(format!(
                "Expected draft announcement, got {other:?}"
            ))),
        }
    }

    /// Read the next pack offer or sentinel
    pub async fn next_message(&mut self) -> Result<Message> {
        let text = self.receive().await?;
        Message::parse_server(&text)
    }

    pub async fn send_pick(&mut self, card: &CardRef) -> Result<()> {
        self.framed.send(card.as_str()).await
    }

    /// Play the whole draft with `picker`
    pub async fn run<P>(mut self, picker: &mut P) -> Result<ClientSummary>
    where
        P: Picker + ?Sized,
    {
        let draft_name = self.wait_for_announcement().await?;
        info!(draft = %draft_name, "Joined draft");

        let mut pile = Vec::new();
        let mut packs_opened = 1;

        loop {
            match self.next_message().await? {
                Message::PackOffer(offer) => {
                    let card = picker.pick(packs_opened, &offer)?;
                    if !offer.contains(&card) {
                        return Err(DraftError::Protocol(format!(
                            "Picked card {card} is not in the offered pack"
                        )));
                    }
                    self.send_pick(&card).await?;
                    debug!(pack = packs_opened, %card, "Sent pick");
                    pile.push(card);
                }
                Message::RoundBoundary => {
                    packs_opened += 1;
                    info!(pack = packs_opened, "Opening next pack");
                }
                Message::SessionEnd => break,
                other => {
                    return Err(DraftError::Protocol(format!(
                        "Unexpected server message {other:?}"
                    )))
                }
            }
        }

        if let Err(e) = SinkExt::<&str>::close(&mut self.framed).await {
            debug!(error = %e, "Server closed before client shutdown");
        }

        info!(draft = %draft_name, cards = pile.len(), "Draft finished");
        Ok(ClientSummary {
            draft_name,
            pile,
            packs_opened,
        })
    }
}
