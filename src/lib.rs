//! # Booster Draft
//!
//! Server and client for a networked booster draft over TCP.
//!
//! A host seats a fixed number of players, announces the draft, and rotates
//! packs among them. Every round each player receives the pack currently in
//! front of them, picks one card, and the packs move one seat along. When a
//! group of packs runs dry the next group starts, until the host sends the
//! final stop sentinel.
//!
//! ## Layers
//! - [`core`]: length-prefixed text framing
//! - [`protocol`]: messages and sentinels carried inside frames
//! - [`draft`]: cards, packs, and the rotation algorithm (no I/O)
//! - [`transport`]: per-player connections and the client loop
//! - [`service`]: the session state machine and its observer hooks
//! - [`config`] and [`utils`]: settings, logging and metrics
//!
//! ## Hosting
//! ```no_run
//! use std::sync::Arc;
//! use booster_draft::config::DraftConfig;
//! use booster_draft::draft::{Cube, CubePackSource};
//! use booster_draft::service::{host, TracingObserver};
//!
//! # async fn example() -> booster_draft::error::Result<()> {
//! let config = DraftConfig::from_env()?;
//! let cube = Cube::load("cube.json")?;
//! let mut source = CubePackSource::new(cube, config.draft.pack_size);
//! let outcome = host(&config, &mut source, Arc::new(TracingObserver::new())).await?;
//! println!("{} rounds drafted", outcome.rounds);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod draft;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;
pub mod utils;

pub use config::DraftConfig;
pub use error::{DraftError, Result};
