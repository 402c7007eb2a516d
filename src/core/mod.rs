//! # Core Protocol Components
//!
//! Low-level framing of text messages over byte streams.
//!
//! ## Components
//! - **Codec**: Tokio codec that frames UTF-8 text with a fixed-width decimal length header
//!
//! ## Wire Format
//! ```text
//! [Length(header_width ASCII digits, left-justified, space-padded)] [Payload(N UTF-8 bytes)]
//! ```
//!
//! The header width is a protocol parameter shared by both ends; it is never negotiated.

pub mod codec;
