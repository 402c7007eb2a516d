//! # Transport Layer
//!
//! Framed TCP channels between the draft server and its players.
//!
//! ## Components
//! - **Registry**: Server-side slots, one [`Connection`] per seated player
//! - **Client**: Player-side loop that answers offers through a [`Picker`]

pub mod client;
pub mod registry;

pub use client::{ClientSummary, DraftClient, FirstCardPicker, Picker};
pub use registry::{accept_players, broadcast, Connection};
