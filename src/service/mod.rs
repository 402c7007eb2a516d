//! # Draft Service
//!
//! The server side of a draft: seat players, rotate packs, collect picks.
//!
//! ## Components
//! - **Session**: State machine that runs announcement, groups and shutdown
//! - **Observer**: Event hooks injected into the session for logging and metrics

pub mod observer;
pub mod session;

pub use observer::{DraftObserver, NoopObserver, TracingObserver};
pub use session::{host, serve, DraftOutcome, DraftSession, SessionState};
