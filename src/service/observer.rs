//! Session event hooks.
//!
//! The orchestrator reports what happens through a [`DraftObserver`] handed to
//! it at construction instead of writing to a global logger. Every hook has a
//! no-op default so observers implement only what they care about.

use tracing::{debug, info};

use crate::draft::card::CardRef;
use crate::service::session::{DraftOutcome, SessionState};
use crate::utils::metrics::DraftMetrics;

/// Receives session-level events from the orchestrator
pub trait DraftObserver: Send + Sync {
    fn player_joined(&self, _slot: usize, _peer: &str) {}

    fn state_changed(&self, _state: &SessionState) {}

    fn message_sent(&self, _slot: usize, _bytes: usize) {}

    fn message_received(&self, _slot: usize, _bytes: usize) {}

    /// A pick round is about to send its offers
    fn round_started(&self, _group: usize, _round: usize, _shift: usize) {}

    fn pick_applied(&self, _group: usize, _slot: usize, _card: &CardRef) {}

    fn group_completed(&self, _group: usize, _rounds: usize) {}

    fn draft_completed(&self, _outcome: &DraftOutcome) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DraftObserver for NoopObserver {}

/// Emits `tracing` events and keeps [`DraftMetrics`]
#[derive(Debug, Default)]
pub struct TracingObserver {
    metrics: DraftMetrics,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &DraftMetrics {
        &self.metrics
    }
}

impl DraftObserver for TracingObserver {
    fn player_joined(&self, slot: usize, peer: &str) {
        self.metrics.player_joined();
        info!(slot, peer, "Player joined");
    }

    fn state_changed(&self, state: &SessionState) {
        debug!(?state, "Session state changed");
    }

    fn message_sent(&self, _slot: usize, bytes: usize) {
        self.metrics.message_sent(bytes as u64);
    }

    fn message_received(&self, _slot: usize, bytes: usize) {
        self.metrics.message_received(bytes as u64);
    }

    fn round_started(&self, group: usize, round: usize, shift: usize) {
        info!(group, round, shift, "Rotating packs");
    }

    fn pick_applied(&self, group: usize, slot: usize, card: &CardRef) {
        self.metrics.pick_applied();
        debug!(group, slot, %card, "Pick applied");
    }

    fn group_completed(&self, group: usize, rounds: usize) {
        self.metrics.group_completed(rounds as u64);
        info!(group, rounds, "Pack group drafted");
    }

    fn draft_completed(&self, outcome: &DraftOutcome) {
        info!(
            draft = %outcome.name,
            groups = outcome.groups,
            rounds = outcome.rounds,
            "Draft complete"
        );
        self.metrics.log_metrics();
    }
}
