//! # Protocol Layer
//!
//! Application messages exchanged once framing is done.
//!
//! Server to client: the draft announcement, pack offers, and the
//! `NEXT_PACK` / `STOP_DRAFTING` sentinels. Client to server: one pick per
//! pack offer. Internal code works on [`message::Message`]; raw strings only
//! exist at the wire boundary.

pub mod message;

pub use message::Message;
