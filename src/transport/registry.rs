//! # Connection Registry
//!
//! Accepts players up to the configured count and gives each one a slot.
//!
//! Slots are handed out in arrival order and never change for the lifetime of
//! a session. Every [`Connection`] owns its stream exclusively and speaks the
//! framed text protocol through [`TextCodec`].
//!
//! ## Responsibilities
//! - Accept exactly `count` players, logging each peer address
//! - Send and receive whole messages per connection
//! - Broadcast to every connection without letting one failure stop the rest

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;
use tracing::{debug, error, info, instrument, warn};

use crate::core::codec::TextCodec;
use crate::draft::card::CardRef;
use crate::error::{DraftError, Result};
use crate::protocol::message::Message;

/// A player's slot bound to its transport channel
pub struct Connection<S = TcpStream> {
    slot: usize,
    peer: String,
    framed: Framed<S, TextCodec>,
}

impl<S> std::fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("slot", &self.slot)
            .field("peer", &self.peer)
            .finish()
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(slot: usize, peer: impl Into<String>, stream: S, header_width: usize) -> Self {
        Self {
            slot,
            peer: peer.into(),
            framed: Framed::new(stream, TextCodec::new(header_width)),
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Send one framed text message
    #[instrument(skip(self, text), fields(slot = self.slot, bytes = text.len()), level = "debug")]
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.framed.send(text).await
    }

    /// Wait for the next complete message
    #[instrument(skip(self), fields(slot = self.slot), level = "debug")]
    pub async fn receive(&mut self) -> Result<String> {
        let text = self
            .framed
            .next()
            .await
            .ok_or(DraftError::ConnectionLost)??;
        debug!(bytes = text.len(), "Message received");
        Ok(text)
    }

    /// Serialize and send `message`; returns the payload size
    pub async fn send_message(&mut self, message: &Message) -> Result<usize> {
        let text = message.to_wire();
        self.send(&text).await?;
        Ok(text.len())
    }

    /// Receive a reply that must be a single card reference.
    ///
    /// Also returns the payload size as received, before trimming.
    pub async fn receive_pick(&mut self) -> Result<(CardRef, usize)> {
        let text = self.receive().await?;
        match Message::parse_pick(&text)? {
            Message::Pick(card) => Ok((card, text.len())),
            other => Err(DraftError::Protocol(format!(
                "Expected a pick from slot {}, got {other:?}",
                self.slot
            ))),
        }
    }

    /// Flush pending frames and shut down the write half
    pub async fn close(mut self) -> Result<()> {
        SinkExt::<&str>::close(&mut self.framed).await
    }
}

/// Accept connections until `count` players are seated.
///
/// Blocks with no timeout; a player that never arrives stalls the draft.
#[instrument(skip(listener), fields(local = ?listener.local_addr().ok()))]
pub async fn accept_players(
    count: usize,
    listener: &TcpListener,
    header_width: usize,
) -> Result<Vec<Connection<TcpStream>>> {
    let mut connections = Vec::with_capacity(count);

    while connections.len() < count {
        match listener.accept().await {
            Ok((stream, peer)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    warn!(%peer, error = %e, "Failed to disable Nagle on player socket");
                }
                let slot = connections.len();
                info!(slot, %peer, "Queued drafter");
                connections.push(Connection::new(slot, peer.to_string(), stream, header_width));
            }
            Err(e) => {
                error!(error = %e, "Error accepting connection");
            }
        }
    }

    Ok(connections)
}

/// Send `text` to every connection in slot order.
///
/// Each send is independent: a failed peer is logged and skipped, the rest
/// still receive the message. The first failure is returned afterwards.
pub async fn broadcast<S>(connections: &mut [Connection<S>], text: &str) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut first_error = None;

    for connection in connections.iter_mut() {
        if let Err(e) = connection.send(text).await {
            warn!(
                slot = connection.slot(),
                peer = %connection.peer(),
                error = %e,
                "Broadcast failed"
            );
            first_error.get_or_insert(e);
        }
    }

    first_error.map_or(Ok(()), Err)
}
