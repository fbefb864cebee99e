//! Latest known facts about every unit seen in the log

use hashbrown::HashMap;

use crate::combat_log::records::{CombatantRecord, UnitInfoRecord};
use crate::combat_log::{Guid, Unit};

#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    info: HashMap<Guid, UnitInfoRecord>,
    players: HashMap<Guid, CombatantRecord>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that already knows the recording player, as a friendly unit.
    pub fn with_me(me: &Unit, seen: chrono::NaiveDateTime) -> Self {
        let mut registry = Self::new();
        if !me.guid.is_zero() {
            registry.info.insert(
                me.guid,
                UnitInfoRecord {
                    seen,
                    guid: me.guid,
                    is_player: true,
                    name: me.name.clone(),
                    can_cooperate: true,
                    owner: None,
                },
            );
        }
        registry
    }

    pub fn get(&self, guid: Guid) -> Option<&UnitInfoRecord> {
        self.info.get(&guid)
    }

    pub fn player(&self, guid: Guid) -> Option<&CombatantRecord> {
        self.players.get(&guid)
    }

    pub fn name(&self, guid: Guid) -> Option<&str> {
        self.info.get(&guid).map(|info| info.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.info.len()
    }

    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// Store the latest snapshot; returns `true` on first sighting.
    pub fn update(&mut self, info: UnitInfoRecord) -> bool {
        if info.guid.is_zero() {
            return false;
        }
        let guid = info.guid;
        let is_new = self.info.insert(guid, info).is_none();
        if is_new {
            tracing::debug!(guid = %guid, name = self.name(guid).unwrap_or_default(), "New unit");
        }
        is_new
    }

    /// Store the latest combatant snapshot; returns `true` on first sighting.
    ///
    /// Combatants are players of the own faction, so a unit without
    /// `UNIT_INFO` is registered as a friendly player.
    pub fn update_player(&mut self, combatant: &CombatantRecord) -> bool {
        if combatant.guid.is_zero() {
            return false;
        }

        let is_new = self.players.insert(combatant.guid, combatant.clone()).is_none();
        if is_new {
            tracing::debug!(
                guid = %combatant.guid,
                name = %combatant.name,
                class = %combatant.class,
                "New combatant"
            );
        }

        self.info.entry(combatant.guid).or_insert_with(|| UnitInfoRecord {
            seen: combatant.seen,
            guid: combatant.guid,
            is_player: true,
            name: combatant.name.clone(),
            can_cooperate: true,
            owner: None,
        });
        is_new
    }
}
