//! Contestant ledger and the fairness-weighted picker.
//!
//! The next winner is always drawn uniformly from the eligible contestants with
//! the lowest win count, so nobody wins twice before everyone in their tier
//! has won once.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contestant::{ContestantRecord, display_name, normalize};
use crate::error::{RaffleError, RaffleResult};

/// Number of placeholder contestants in a fresh ledger.
pub const DEFAULT_SEED_SIZE: usize = 28;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    // Sorted so that a seeded draw iterates the tier in a stable order.
    #[serde(rename = "score")]
    entries: BTreeMap<String, ContestantRecord>,
    history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { key: String, count: i64 },
    AlreadyParticipating(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(String),
    NotInList(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Undone(String),
    /// The undone winner was removed from the list after being picked.
    UndoneRemoved(String),
    NothingToUndo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Unchanged,
    Applied,
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOutcome::Added { key, count } => {
                write!(f, "Added {} with {} win(s).", display_name(key), count)
            }
            AddOutcome::AlreadyParticipating(key) => {
                write!(f, "{} is already participating.", display_name(key))
            }
        }
    }
}

impl fmt::Display for RemoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveOutcome::Removed(key) => write!(f, "Removed {}.", display_name(key)),
            RemoveOutcome::NotInList(name) => write!(
                f,
                "Could not remove {}. Contestant not in list.",
                display_name(name.trim())
            ),
        }
    }
}

impl fmt::Display for UndoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoOutcome::Undone(key) => write!(f, "Removed last entry: {}", display_name(key)),
            UndoOutcome::UndoneRemoved(key) => write!(
                f,
                "Removed last entry: {} (no longer in the list)",
                display_name(key)
            ),
            UndoOutcome::NothingToUndo => write!(f, "Cannot undo any further"),
        }
    }
}

impl Ledger {
    /// Empty ledger with no contestants and no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger with the given contestants, all at zero wins.
    /// Blank names are skipped and duplicates collapse into one entry.
    pub fn with_contestants<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = names
            .into_iter()
            .filter_map(|name| normalize(name.as_ref()))
            .map(|key| (key, ContestantRecord::default()))
            .collect();
        Self { entries, history: Vec::new() }
    }

    /// Placeholder ledger: `contestant 0` .. `contestant {size - 1}`.
    pub fn seeded(size: usize) -> Self {
        Self::with_contestants((0..size).map(|i| format!("contestant {i}")))
    }

    pub fn entries(&self) -> &BTreeMap<String, ContestantRecord> {
        &self.entries
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn get(&self, name: &str) -> Option<&ContestantRecord> {
        normalize(name).and_then(|key| self.entries.get(&key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current minimum count among eligible contestants and the keys sharing it.
    pub fn eligible_tier(&self) -> Option<(i64, Vec<&str>)> {
        let min_count = self
            .entries
            .values()
            .filter(|record| !record.excluded)
            .map(|record| record.count)
            .min()?;
        let tier = self
            .entries
            .iter()
            .filter(|(_, record)| !record.excluded && record.count == min_count)
            .map(|(key, _)| key.as_str())
            .collect();
        Some((min_count, tier))
    }

    /// Adds a contestant tied with the least-picked contestant.
    pub fn add_contestant(&mut self, name: &str) -> RaffleResult<AddOutcome> {
        let key = normalize(name).ok_or(RaffleError::EmptyName)?;
        if self.entries.contains_key(&key) {
            info!("{} is already participating", display_name(&key));
            return Ok(AddOutcome::AlreadyParticipating(key));
        }

        let count = self.entries.values().map(|record| record.count).min().unwrap_or(0);
        self.entries.insert(key.clone(), ContestantRecord::new(count));
        debug!(contestant = %key, count, "added contestant");
        Ok(AddOutcome::Added { key, count })
    }

    /// Deletes a contestant. Past wins stay in the history.
    pub fn remove_contestant(&mut self, name: &str) -> RemoveOutcome {
        match normalize(name) {
            Some(key) if self.entries.remove(&key).is_some() => {
                debug!(contestant = %key, "removed contestant");
                RemoveOutcome::Removed(key)
            }
            _ => {
                info!("Could not remove {:?}: contestant not in list", name);
                RemoveOutcome::NotInList(name.to_string())
            }
        }
    }

    /// Sets the exclusion flag, returning whether it changed.
    pub fn set_excluded(&mut self, name: &str, excluded: bool) -> RaffleResult<bool> {
        let key = normalize(name).ok_or(RaffleError::EmptyName)?;
        let record = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| RaffleError::UnknownContestant(display_name(&key)))?;
        let changed = record.excluded != excluded;
        record.excluded = excluded;
        debug!(contestant = %key, excluded, changed, "set exclusion");
        Ok(changed)
    }

    /// Draws a winner from the lowest eligible tier and records the win.
    /// Returns the winner's display name.
    pub fn pick_winner<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RaffleResult<String> {
        let (_, tier) = self.eligible_tier().ok_or(RaffleError::EmptyPool)?;
        let winner = tier
            .choose(rng)
            .map(|key| key.to_string())
            .ok_or(RaffleError::EmptyPool)?;

        if let Some(record) = self.entries.get_mut(&winner) {
            record.count = record
                .count
                .checked_add(1)
                .ok_or_else(|| RaffleError::CountOverflow(display_name(&winner)))?;
        }
        let name = display_name(&winner);
        info!(winner = %name, "picked winner");
        self.history.push(winner);
        Ok(name)
    }

    /// Reverts the most recent pick. Counts are not floored at zero, but stop
    /// at `i64::MIN`.
    pub fn undo_last_pick(&mut self) -> UndoOutcome {
        let Some(last) = self.history.pop() else {
            return UndoOutcome::NothingToUndo;
        };
        match self.entries.get_mut(&last) {
            Some(record) => {
                record.count = record.count.saturating_sub(1);
                info!(contestant = %last, count = record.count, "undid pick");
                UndoOutcome::Undone(last)
            }
            None => {
                info!(contestant = %last, "undid pick of a removed contestant");
                UndoOutcome::UndoneRemoved(last)
            }
        }
    }

    /// Zeroes every count and forgets the history. Membership and exclusions stay.
    pub fn reset_scores(&mut self) {
        for record in self.entries.values_mut() {
            record.count = 0;
        }
        self.history.clear();
        info!("scores reset");
    }

    /// Replaces the name/count grid with an edited one.
    ///
    /// An identical grid is a no-op. Any difference replaces the entries
    /// (exclusion flags survive for names still present) and clears the history,
    /// since the counts no longer follow from it.
    pub fn apply_edits<I, S>(&mut self, proposed: I) -> RaffleResult<EditOutcome>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut grid = BTreeMap::new();
        for (name, count) in proposed {
            let key = normalize(name.as_ref())
                .ok_or_else(|| RaffleError::InvalidEdit("empty contestant name".to_string()))?;
            if grid.insert(key.clone(), count).is_some() {
                return Err(RaffleError::InvalidEdit(format!(
                    "{} appears more than once",
                    display_name(&key)
                )));
            }
        }

        if grid == self.counts() {
            return Ok(EditOutcome::Unchanged);
        }

        let entries = grid
            .into_iter()
            .map(|(key, count)| {
                let excluded = self.entries.get(&key).is_some_and(|record| record.excluded);
                (key, ContestantRecord { count, excluded })
            })
            .collect();
        self.entries = entries;
        self.history.clear();
        info!(contestants = self.entries.len(), "applied edited table, history cleared");
        Ok(EditOutcome::Applied)
    }

    /// Edits a single count through `apply_edits`.
    pub fn set_count(&mut self, name: &str, count: i64) -> RaffleResult<EditOutcome> {
        let key = normalize(name).ok_or(RaffleError::EmptyName)?;
        if !self.entries.contains_key(&key) {
            return Err(RaffleError::UnknownContestant(display_name(&key)));
        }
        let mut grid = self.counts();
        grid.insert(key, count);
        self.apply_edits(grid)
    }

    fn counts(&self) -> BTreeMap<String, i64> {
        self.entries
            .iter()
            .map(|(key, record)| (key.clone(), record.count))
            .collect()
    }
}
