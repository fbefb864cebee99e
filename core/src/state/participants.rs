//! Session wide statistics per player

use std::fmt;

use hashbrown::HashMap;

use crate::combat_log::records::{CastRecord, CombatantRecord};
use crate::combat_log::Guid;
use crate::context::{IStr, intern, resolve};

#[derive(Debug, Clone, Default)]
pub struct ParticipantStats {
    pub guid: Guid,
    /// Latest `COMBATANT_INFO` snapshot, absent for players only seen casting.
    pub combatant: Option<CombatantRecord>,
    /// Spell id to name of every distinct spell cast.
    pub unique_spells: HashMap<u32, IStr>,
    pub spell_damage: u64,
}

impl ParticipantStats {
    fn new(guid: Guid) -> Self {
        Self {
            guid,
            ..Self::default()
        }
    }

    pub fn spell_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.unique_spells.values().map(|k| resolve(*k)).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for ParticipantStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, class) = match &self.combatant {
            Some(c) => (c.name.as_str(), c.class.as_str()),
            None => ("Unknown", "UNKNOWN"),
        };
        write!(
            f,
            "{}: {} the {} had {} unique spells and did {} damage",
            self.guid,
            name,
            class,
            self.unique_spells.len(),
            self.spell_damage
        )
    }
}

/// Player statistics keyed by GUID. Non player units are ignored.
#[derive(Debug, Clone, Default)]
pub struct Participants {
    stats: HashMap<Guid, ParticipantStats>,
}

impl Participants {
    pub fn get(&self, guid: Guid) -> Option<&ParticipantStats> {
        self.stats.get(&guid)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Ordered by guid.
    pub fn iter(&self) -> impl Iterator<Item = &ParticipantStats> {
        let mut all: Vec<&ParticipantStats> = self.stats.values().collect();
        all.sort_unstable_by_key(|s| s.guid);
        all.into_iter()
    }

    pub fn combatant(&mut self, combatant: &CombatantRecord) {
        if !tracked(combatant.guid) {
            return;
        }
        self.entry(combatant.guid).combatant = Some(combatant.clone());
    }

    pub fn cast(&mut self, cast: &CastRecord) {
        let caster = cast.caster.guid;
        if !tracked(caster) {
            return;
        }
        self.entry(caster)
            .unique_spells
            .entry(cast.spell.id)
            .or_insert_with(|| intern(&cast.spell.name));
    }

    pub fn spell_damage(&mut self, caster: Guid, amount: u32) {
        if !tracked(caster) {
            return;
        }
        self.entry(caster).spell_damage += u64::from(amount);
    }

    fn entry(&mut self, guid: Guid) -> &mut ParticipantStats {
        self.stats.entry(guid).or_insert_with(|| ParticipantStats::new(guid))
    }
}

fn tracked(guid: Guid) -> bool {
    !guid.is_zero() && guid.is_player()
}
