//! # Draft Domain
//!
//! Cards, packs and the pure pack-rotation algorithm. Nothing in this module
//! performs I/O; the session layer feeds it picks and sends what it computes.
//!
//! ## Components
//! - **Card**: opaque card references and packs of them
//! - **Scheduler**: partitions packs into groups and rotates them among player slots
//! - **Source**: the boundary through which packs are generated (cube-backed or fixed)

pub mod card;
pub mod scheduler;
pub mod source;

pub use card::{CardRef, Pack};
pub use scheduler::{partition, rotate, validate_groups, GroupRotation, PackGroup, RoundOutcome};
pub use source::{Cube, CubePackSource, FixedPacks, PackSource};
