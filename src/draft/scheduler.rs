//! Pack partitioning and round-robin rotation.
//!
//! Packs are dealt into groups and each group is drafted on its own: every
//! round each player slot holds `group[(slot + shift) % len]`, makes one pick
//! from it, and the shift advances by one. All packs of a group shrink in
//! lockstep, so the group is done as soon as its first pack is empty.
//!
//! Rotation only reaches every pack exactly once per slot when a group holds
//! one pack per player. [`validate_groups`] checks that up front so a bad
//! layout is a configuration error rather than a mid-draft surprise.

use crate::draft::card::{CardRef, Pack};
use crate::error::{constants, DraftError, Result};

/// Packs drafted together in one rotation sequence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackGroup {
    packs: Vec<Pack>,
}

impl PackGroup {
    pub fn new(packs: Vec<Pack>) -> Self {
        Self { packs }
    }

    pub fn packs(&self) -> &[Pack] {
        &self.packs
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// True once the group has been fully drafted
    pub fn is_exhausted(&self) -> bool {
        self.packs.first().map_or(true, Pack::is_empty)
    }
}

/// Deal a flat pack sequence into `num_players` groups by `index % num_players`.
///
/// Fails without allocating anything when the packs cannot be split evenly.
pub fn partition(packs: Vec<Pack>, num_players: usize) -> Result<Vec<PackGroup>> {
    if num_players == 0 {
        return Err(DraftError::Configuration(
            constants::ERR_ZERO_PLAYERS.to_string(),
        ));
    }
    if packs.is_empty() {
        return Err(DraftError::Configuration(constants::ERR_NO_GROUPS.to_string()));
    }
    if packs.len() % num_players != 0 {
        return Err(DraftError::Configuration(format!(
            "{} packs cannot be evenly distributed among {} players",
            packs.len(),
            num_players
        )));
    }

    let per_group = packs.len() / num_players;
    let mut buckets: Vec<Vec<Pack>> = (0..num_players)
        .map(|_| Vec::with_capacity(per_group))
        .collect();
    for (i, pack) in packs.into_iter().enumerate() {
        buckets[i % num_players].push(pack);
    }

    Ok(buckets.into_iter().map(PackGroup::new).collect())
}

/// Index of the pack a slot holds at the given shift
#[inline]
pub fn pack_index(slot: usize, shift: usize, group_len: usize) -> usize {
    (slot + shift) % group_len
}

/// Map every player slot to the pack it currently holds; index is the slot.
pub fn rotate(group: &PackGroup, shift: usize) -> Vec<&Pack> {
    let len = group.len();
    (0..len)
        .map(|slot| &group.packs[pack_index(slot, shift, len)])
        .collect()
}

/// Check the rotation precondition for every group before any pick is taken
pub fn validate_groups(groups: &[PackGroup], num_players: usize) -> Result<()> {
    if num_players == 0 {
        return Err(DraftError::Configuration(
            constants::ERR_ZERO_PLAYERS.to_string(),
        ));
    }
    if groups.is_empty() {
        return Err(DraftError::Configuration(constants::ERR_NO_GROUPS.to_string()));
    }

    for (index, group) in groups.iter().enumerate() {
        if group.len() != num_players {
            return Err(DraftError::Configuration(format!(
                "Pack group {index} holds {} packs but there are {num_players} players",
                group.len()
            )));
        }

        let size = group.packs[0].len();
        if size == 0 {
            return Err(DraftError::Configuration(format!(
                "Pack group {index} contains an empty pack"
            )));
        }
        if let Some(odd) = group.packs.iter().find(|p| p.len() != size) {
            return Err(DraftError::Configuration(format!(
                "Pack group {index} mixes pack sizes {size} and {}",
                odd.len()
            )));
        }
    }

    Ok(())
}

/// Result of closing a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Packs still hold cards; the next round uses this shift
    Continue { shift: usize },
    /// Every pack in the group is empty
    Exhausted,
}

/// Drives one pack group through its rounds.
///
/// A round is: read [`offers`](Self::offers), apply one pick per slot, then
/// [`finish_round`](Self::finish_round). Finishing is the round barrier; it
/// refuses to advance until every slot has picked.
#[derive(Debug, Clone)]
pub struct GroupRotation {
    group: PackGroup,
    shift: usize,
    round: usize,
    picked: Vec<bool>,
}

impl GroupRotation {
    pub fn new(group: PackGroup) -> Self {
        let slots = group.len();
        Self {
            group,
            shift: 0,
            round: 0,
            picked: vec![false; slots],
        }
    }

    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Rounds completed so far
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn group(&self) -> &PackGroup {
        &self.group
    }

    pub fn is_exhausted(&self) -> bool {
        self.group.is_exhausted()
    }

    /// Pack currently held by `slot`
    pub fn assigned_pack(&self, slot: usize) -> Option<&Pack> {
        let len = self.group.len();
        (slot < len).then(|| &self.group.packs[pack_index(slot, self.shift, len)])
    }

    /// Snapshot of every slot's pack as it stands at the start of the round
    pub fn offers(&self) -> Vec<Pack> {
        rotate(&self.group, self.shift).into_iter().cloned().collect()
    }

    /// Remove `card` from the pack `slot` holds this round
    pub fn apply_pick(&mut self, slot: usize, card: &CardRef) -> Result<CardRef> {
        let len = self.group.len();
        if slot >= len {
            return Err(DraftError::Protocol(format!(
                "Slot {slot} is outside a group of {len} packs"
            )));
        }
        if self.picked[slot] {
            return Err(DraftError::Protocol(format!(
                "Slot {slot} already picked this round"
            )));
        }

        let taken = self.group.packs[pack_index(slot, self.shift, len)].take(card)?;
        self.picked[slot] = true;
        Ok(taken)
    }

    /// Close the round once all slots have picked
    pub fn finish_round(&mut self) -> Result<RoundOutcome> {
        if self.picked.iter().any(|picked| !picked) {
            return Err(DraftError::Protocol(
                constants::ERR_ROUND_INCOMPLETE.to_string(),
            ));
        }
        self.picked.iter_mut().for_each(|picked| *picked = false);
        self.round += 1;

        if self.group.is_exhausted() {
            return Ok(RoundOutcome::Exhausted);
        }
        self.shift = (self.shift + 1) % self.group.len();
        Ok(RoundOutcome::Continue { shift: self.shift })
    }
}
