//! Side (player) state

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbiter_protocol::SideId;

use super::combatant::Combatant;

/// One player's side of the match
///
/// `entry` holds working copies of the party members taking part in this
/// match. They are written back into `party` by id whenever a turn
/// settles, so both views always agree between turns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Side {
    pub id: SideId,

    /// Display name (usually the agent or model name)
    pub name: String,

    /// Full roster
    pub party: Vec<Combatant>,

    /// Party indices eligible for entry, in default order
    pub pool: Vec<usize>,

    /// Members entered into this match
    pub entry: Vec<Combatant>,

    /// Index into `entry`; `None` exactly when a replacement is pending
    pub active: Option<usize>,

    /// Ids of fainted entry members, in fainting order
    pub fainted: Vec<String>,

    pub special_uses_remaining: u8,
}

impl Side {
    pub fn new(id: SideId, name: impl Into<String>, party: Vec<Combatant>, pool: Vec<usize>) -> Self {
        Self {
            id,
            name: name.into(),
            party,
            pool,
            entry: Vec::new(),
            active: None,
            fainted: Vec::new(),
            special_uses_remaining: 0,
        }
    }

    /// Fill `entry` from pool positions (0-based, in the order given)
    pub fn enter(&mut self, pool_order: &[usize], entry_size: usize) {
        self.entry = pool_order
            .iter()
            .filter_map(|&pos| self.pool.get(pos))
            .filter_map(|&party_idx| self.party.get(party_idx))
            .take(entry_size)
            .cloned()
            .collect();
        self.active = None;
        self.fainted.clear();
    }

    pub fn active_combatant(&self) -> Option<&Combatant> {
        self.active.and_then(|idx| self.entry.get(idx))
    }

    pub fn active_combatant_mut(&mut self) -> Option<&mut Combatant> {
        match self.active {
            Some(idx) => self.entry.get_mut(idx),
            None => None,
        }
    }

    pub fn is_fainted(&self, entry_idx: usize) -> bool {
        self.entry
            .get(entry_idx)
            .is_some_and(|c| c.is_fainted() || self.fainted.contains(&c.id))
    }

    /// Entry indices a switch may target: not fainted, not active
    pub fn switch_options(&self) -> Vec<usize> {
        (0..self.entry.len())
            .filter(|&idx| Some(idx) != self.active && !self.is_fainted(idx))
            .collect()
    }

    /// Put an entry member on the field, switching out the current one
    pub fn set_active(&mut self, entry_idx: usize) {
        if let Some(old) = self.active_combatant_mut() {
            old.on_switch_out();
        }
        self.active = Some(entry_idx);
    }

    /// Record the active combatant as fainted and clear the slot
    pub fn faint_active(&mut self) -> Option<String> {
        let idx = self.active.take()?;
        let combatant = self.entry.get_mut(idx)?;
        combatant.hp = 0;
        combatant.on_switch_out();
        let id = combatant.id.clone();
        if !self.fainted.contains(&id) {
            self.fainted.push(id.clone());
        }
        Some(id)
    }

    pub fn alive_count(&self) -> usize {
        (0..self.entry.len()).filter(|&i| !self.is_fainted(i)).count()
    }

    /// Every entered member has fainted
    pub fn all_fainted(&self) -> bool {
        !self.entry.is_empty() && self.fainted.len() == self.entry.len()
    }

    /// A replacement must be chosen before the next turn
    pub fn needs_replacement(&self) -> bool {
        self.active.is_none() && !self.all_fainted() && !self.switch_options().is_empty()
    }

    /// Write entry copies back into the party, matched by id
    pub fn sync_party(&mut self) {
        for member in &self.entry {
            if let Some(slot) = self.party.iter_mut().find(|p| p.id == member.id) {
                *slot = member.clone();
            }
        }
    }
}
