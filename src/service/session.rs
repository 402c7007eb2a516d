//! # Draft Session
//!
//! Drives one draft from seated players to the final sentinel.
//!
//! ```text
//! AwaitingPlayers -> Announcing -> DraftingGroup -> RotatingPick (loop)
//!     -> GroupComplete -> (DraftingGroup | DraftComplete)
//! ```
//!
//! Each round sends every slot its pack before reading any pick, so all
//! players choose from the packs as they stood when the round began. Picks are
//! then read in slot order and the round only closes once every slot has
//! picked. Execution is sequential; a silent player stalls the whole table.
//!
//! Any transport or protocol failure aborts the session. There is no per-player
//! drop tolerance and no retry.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, instrument, warn};

use crate::config::{DraftConfig, DraftSettings};
use crate::draft::card::CardRef;
use crate::draft::scheduler::{partition, validate_groups, GroupRotation, PackGroup, RoundOutcome};
use crate::draft::source::PackSource;
use crate::error::{DraftError, Result};
use crate::protocol::message::Message;
use crate::service::observer::DraftObserver;
use crate::transport::registry::{accept_players, broadcast, Connection};
use crate::utils::metrics::Timer;

/// Where the orchestrator is in the protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingPlayers,
    Announcing,
    DraftingGroup { group: usize },
    RotatingPick { group: usize, round: usize, shift: usize },
    GroupComplete { group: usize },
    DraftComplete,
}

/// What each player ended up with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOutcome {
    pub name: String,
    /// Picks per slot, in pick order
    pub picks: Vec<Vec<CardRef>>,
    pub groups: usize,
    pub rounds: usize,
}

/// A draft with all of its players connected
pub struct DraftSession<S = TcpStream> {
    name: String,
    total_packs: usize,
    connections: Vec<Connection<S>>,
    observer: Arc<dyn DraftObserver>,
    state: SessionState,
    picks: Vec<Vec<CardRef>>,
    rounds: usize,
}

impl<S> DraftSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Seat the connected players.
    ///
    /// Connections must be in slot order and match the configured player count.
    pub fn new(
        settings: &DraftSettings,
        connections: Vec<Connection<S>>,
        observer: Arc<dyn DraftObserver>,
    ) -> Result<Self> {
        let errors = settings.validate();
        if !errors.is_empty() {
            return Err(DraftError::Configuration(errors.join("; ")));
        }
        if connections.len() != settings.players {
            return Err(DraftError::Configuration(format!(
                "Draft expects {} players but {} are connected",
                settings.players,
                connections.len()
            )));
        }
        if let Some((index, conn)) = connections
            .iter()
            .enumerate()
            .find(|(index, conn)| conn.slot() != *index)
        {
            return Err(DraftError::Configuration(format!(
                "Connection at position {index} claims slot {}",
                conn.slot()
            )));
        }

        let players = connections.len();
        Ok(Self {
            name: settings.name.clone(),
            total_packs: settings.total_packs(),
            connections,
            observer,
            state: SessionState::AwaitingPlayers,
            picks: vec![Vec::new(); players],
            rounds: 0,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn players(&self) -> usize {
        self.connections.len()
    }

    /// Announce, pull packs from `source`, and draft every group
    pub async fn run<P>(mut self, source: &mut P) -> Result<DraftOutcome>
    where
        P: PackSource + ?Sized,
    {
        self.announce().await?;

        let total = self.total_packs;
        let packs = source.generate_packs(total)?;
        if packs.len() != total {
            return Err(DraftError::Configuration(format!(
                "Pack source produced {} packs, expected {total}",
                packs.len()
            )));
        }
        let groups = partition(packs, self.players())?;

        self.draft(groups).await
    }

    /// Announce and draft groups that were built elsewhere
    pub async fn run_with_groups(mut self, groups: Vec<PackGroup>) -> Result<DraftOutcome> {
        validate_groups(&groups, self.players())?;
        self.announce().await?;
        self.draft(groups).await
    }

    fn transition(&mut self, state: SessionState) {
        self.observer.state_changed(&state);
        self.state = state;
    }

    async fn announce(&mut self) -> Result<()> {
        self.transition(SessionState::Announcing);
        let announcement = Message::Announce(self.name.clone());
        self.broadcast(&announcement).await
    }

    async fn broadcast(&mut self, message: &Message) -> Result<()> {
        let text = message.to_wire();
        broadcast(&mut self.connections, &text).await?;
        for slot in 0..self.connections.len() {
            self.observer.message_sent(slot, text.len());
        }
        Ok(())
    }

    async fn draft(mut self, groups: Vec<PackGroup>) -> Result<DraftOutcome> {
        validate_groups(&groups, self.players())?;
        let group_count = groups.len();

        for (index, group) in groups.into_iter().enumerate() {
            let rounds = self.draft_group(index, group).await?;

            self.transition(SessionState::GroupComplete { group: index });
            self.observer.group_completed(index, rounds);
            if index + 1 < group_count {
                self.broadcast(&Message::RoundBoundary).await?;
            }
        }

        self.transition(SessionState::DraftComplete);
        self.broadcast(&Message::SessionEnd).await?;

        for connection in self.connections.drain(..) {
            let slot = connection.slot();
            if let Err(e) = connection.close().await {
                warn!(slot, error = %e, "Failed to close player connection");
            }
        }

        let outcome = DraftOutcome {
            name: self.name,
            picks: self.picks,
            groups: group_count,
            rounds: self.rounds,
        };
        self.observer.draft_completed(&outcome);
        Ok(outcome)
    }

    /// Rotate one group until its packs are empty; returns the rounds played
    async fn draft_group(&mut self, index: usize, group: PackGroup) -> Result<usize> {
        self.transition(SessionState::DraftingGroup { group: index });
        let _timer = Timer::start("draft_group");
        let mut rotation = GroupRotation::new(group);

        loop {
            let (round, shift) = (rotation.round(), rotation.shift());
            self.transition(SessionState::RotatingPick {
                group: index,
                round,
                shift,
            });
            self.observer.round_started(index, round, shift);

            for (slot, pack) in rotation.offers().iter().enumerate() {
                let bytes = self.connections[slot].send_message(&Message::offer(pack)).await?;
                self.observer.message_sent(slot, bytes);
            }

            for slot in 0..self.connections.len() {
                let (card, bytes) = self.connections[slot].receive_pick().await?;
                self.observer.message_received(slot, bytes);
                let taken = rotation.apply_pick(slot, &card)?;
                self.observer.pick_applied(index, slot, &taken);
                self.picks[slot].push(taken);
            }

            self.rounds += 1;
            if rotation.finish_round()? == RoundOutcome::Exhausted {
                return Ok(rotation.round());
            }
        }
    }
}

/// Wait for every player on `listener`, then run the draft
#[instrument(skip_all, fields(draft = %settings.name, players = settings.players))]
pub async fn serve<P>(
    listener: TcpListener,
    header_width: usize,
    settings: &DraftSettings,
    source: &mut P,
    observer: Arc<dyn DraftObserver>,
) -> Result<DraftOutcome>
where
    P: PackSource + ?Sized,
{
    let errors = settings.validate();
    if !errors.is_empty() {
        return Err(DraftError::Configuration(errors.join("; ")));
    }

    observer.state_changed(&SessionState::AwaitingPlayers);
    info!(address = ?listener.local_addr().ok(), "Hosting draft");

    let connections = accept_players(settings.players, &listener, header_width).await?;
    for connection in &connections {
        observer.player_joined(connection.slot(), connection.peer());
    }

    DraftSession::new(settings, connections, observer)?
        .run(source)
        .await
}

/// Bind the configured address and host a draft on it
pub async fn host<P>(
    config: &DraftConfig,
    source: &mut P,
    observer: Arc<dyn DraftObserver>,
) -> Result<DraftOutcome>
where
    P: PackSource + ?Sized,
{
    config.validate_strict()?;
    let listener = TcpListener::bind(&config.server.address).await?;
    serve(
        listener,
        config.server.header_width,
        &config.draft,
        source,
        observer,
    )
    .await
}
