//! # Error Types
//!
//! Error handling for the draft protocol.
//!
//! Every failure in the core surfaces immediately and terminates the session;
//! nothing in this crate retries on its own.
//!
//! ## Error Categories
//! - **Framing**: a length header that does not parse, or a frame that cannot be built
//! - **Connection lost**: the peer closed or reset the stream mid-message
//! - **Configuration**: packs that cannot be distributed, bad settings, bad cube data
//! - **Protocol**: a pick for a card that is not in the offered pack, unexpected messages
//!
//! ## Example Usage
//! ```rust
//! use booster_draft::error::{DraftError, Result};
//!
//! fn check_players(players: usize) -> Result<()> {
//!     if players == 0 {
//!         return Err(DraftError::Configuration("no players".into()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_players(0).is_err());
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Framing errors
    pub const ERR_HEADER_NOT_NUMERIC: &str = "Length header is not an unsigned decimal integer";
    pub const ERR_PAYLOAD_NOT_UTF8: &str = "Frame payload is not valid UTF-8";
    pub const ERR_HEADER_OVERFLOW: &str = "Payload length does not fit in the header width";

    /// Protocol errors
    pub const ERR_EMPTY_OFFER: &str = "Pack offer contains no cards";
    pub const ERR_EMPTY_CARD_REF: &str = "Card reference is empty";
    pub const ERR_ROUND_INCOMPLETE: &str = "Round finished before every slot picked";

    /// Configuration errors
    pub const ERR_NO_GROUPS: &str = "Draft has no pack groups";
    pub const ERR_ZERO_PLAYERS: &str = "Player count must be greater than 0";
}

/// Primary error type for all draft operations
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("Framing error: {0}")]
    Framing(String),

    #[error("Connection lost")]
    ConnectionLost,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl From<io::Error> for DraftError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => DraftError::ConnectionLost,
            _ => DraftError::Io(err),
        }
    }
}

/// Type alias for Results using DraftError
pub type Result<T> = std::result::Result<T, DraftError>;
