//! Event parser: an ordered cascade of line grammars
//!
//! Each preprocessed line is offered to [`MATCHERS`] front to back and the
//! first grammar that matches decides the result. Ordering is part of the
//! contract: a more specific grammar sits in front of the general one that
//! would otherwise shadow it, and the known malformed spell-hit phrasing is
//! caught early so it never reaches the regular spell damage grammar.

mod captures;
mod matchers;

use chrono::NaiveDateTime;

use crate::combat_log::{Message, ParseError};

pub type MatchFn = fn(NaiveDateTime, &str) -> Result<Option<Vec<Message>>, ParseError>;

/// One entry of the cascade.
#[derive(Clone, Copy)]
pub struct Matcher {
    pub name: &'static str,
    pub func: MatchFn,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher").field("name", &self.name).finish()
    }
}

const fn matcher(name: &'static str, func: MatchFn) -> Matcher {
    Matcher { name, func }
}

pub static MATCHERS: &[Matcher] = &[
    matcher("CombatantInfo", matchers::combatant_info),
    matcher("UnitInfo", matchers::unit_info),
    matcher("ZoneInfo", matchers::zone_info),
    matcher("Casts", matchers::casts),
    matcher("Loot", matchers::loot),
    matcher("BugDamageSpellHitOrCrit", matchers::bug_damage_spell_hit_or_crit),
    matcher("SpellCastAttempt", matchers::spell_cast_attempt),
    matcher("GainWithSource", matchers::gain_with_source),
    matcher("GainNoSource", matchers::gain_no_source),
    matcher("DamageSpellHitOrCrit", matchers::damage_spell_hit_or_crit),
    matcher("DamageSpellHitOrCritSchool", matchers::damage_spell_hit_or_crit_school),
    matcher("DamagePeriodic", matchers::damage_periodic),
    matcher("DamageShield", matchers::damage_shield),
    matcher("DamageHitOrCrit", matchers::damage_hit_or_crit),
    matcher("DamageHitOrCritSchool", matchers::damage_hit_or_crit_school),
    matcher("Heal", matchers::heal),
    matcher("AuraGainHarmfulHelpful", matchers::aura_gain),
    matcher("AuraFade", matchers::aura_fade),
    matcher("DamageSpellSplit", matchers::damage_spell_split),
    matcher("DamageSpellMiss", matchers::damage_spell_miss),
    matcher(
        "DamageSpellBlockParryEvadeDodgeResistDeflect",
        matchers::damage_spell_block_parry,
    ),
    matcher("DamageSpellAbsorb", matchers::damage_spell_absorb),
    matcher("DamageSpellAbsorbSelf", matchers::damage_spell_absorb_self),
    matcher("DamageReflect", matchers::damage_reflect),
    matcher("DamageProcResist", matchers::damage_proc_resist),
    matcher("DamageSpellImmune", matchers::damage_spell_immune),
    matcher("DamageMiss", matchers::damage_miss),
    matcher("DamageBlockParryEvadeDodgeDeflect", matchers::damage_block_parry),
    matcher("DamageAbsorbResist", matchers::damage_absorb_resist),
    matcher("DamageImmune", matchers::damage_immune),
    matcher("SpellCastPerformDurability", matchers::spell_cast_perform_durability),
    matcher("SpellCastPerform", matchers::spell_cast_perform),
    matcher("SpellCastPerformUnknown", matchers::spell_cast_perform_unknown),
    matcher("HonorableKill", matchers::honorable_kill),
    matcher("UnitDieDestroyed", matchers::unit_die_destroyed),
    matcher("UnitSlay", matchers::unit_slay),
    matcher("AuraDispel", matchers::aura_dispel),
    matcher("AuraInterrupt", matchers::aura_interrupt),
    matcher("Creates", matchers::creates),
    matcher("GainsAttack", matchers::gains_attack),
    matcher("FallDamage", matchers::fall_damage),
];

/// Stateless line to [`Message`] conversion.
#[derive(Debug, Clone, Copy)]
pub struct EventParser {
    matchers: &'static [Matcher],
}

impl Default for EventParser {
    fn default() -> Self {
        Self::new()
    }
}

impl EventParser {
    pub fn new() -> Self {
        Self { matchers: MATCHERS }
    }

    /// Name of the grammar that claims `content`, if any.
    pub fn matcher_for(&self, ts: NaiveDateTime, content: &str) -> Option<&'static str> {
        self.matchers
            .iter()
            .find(|m| !matches!((m.func)(ts, content), Ok(None)))
            .map(|m| m.name)
    }

    /// Parse one trimmed, preprocessed content string.
    ///
    /// A line no grammar claims becomes a single `Unparsed` message; an error
    /// means a grammar matched but a capture could not be converted.
    pub fn parse(&self, ts: NaiveDateTime, content: &str) -> Result<Vec<Message>, ParseError> {
        if content.is_empty() {
            return Ok(vec![Message::skip(ts, "empty line")]);
        }

        for m in self.matchers {
            match (m.func)(ts, content)? {
                Some(messages) if !messages.is_empty() => return Ok(messages),
                _ => continue,
            }
        }

        tracing::debug!(content = %content, "No grammar matched line");
        Ok(vec![Message::unparsed(ts, content)])
    }
}
