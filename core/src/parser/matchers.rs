//! Line grammars of the event cascade
//!
//! Every matcher returns `Ok(None)` when its pattern does not match so the
//! next one is tried. Patterns are unanchored, a grammar may match anywhere
//! in the content.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::captures::Captures;
use crate::combat_log::records::{CastRecord, CombatantRecord, LootRecord, UnitInfoRecord, ZoneRecord};
use crate::combat_log::{
    AuraApplication, Aura, Create, Damage, Direction, FallDamage, Guid, Heal, HitType, Interrupt, Message,
    MessageKind, ParseError, PeriodicDamage, ResourceChange, School, Slain, SpellDamage, Trailer,
};

pub(super) type MatchResult = Result<Option<Vec<Message>>, ParseError>;

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("valid matcher regex"));
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

pattern!(BUG_DAMAGE_SPELL_HIT_OR_CRIT, r"(.+[^\s])\s?'s (cr|h)its (.+[^\s]) for (\d+)\.\s?(.*)");
pattern!(SPELL_CAST_ATTEMPT, r"(.+[^\s]) begins to (cast|perform) (.+[^\s])\.");
pattern!(
    GAIN_WITH_SOURCE,
    r"(.+[^\s]) (gains|loses) (\d+) (Health|health|Mana|Rage|Energy|Happiness|happiness|Focus) from (.+[^\s])\s?'s (.+[^\s])\."
);
pattern!(
    GAIN_NO_SOURCE,
    r"(.+[^\s]) (gains|loses) (\d+) (Health|health|Mana|Rage|Energy|Happiness|happiness|Focus)\."
);
pattern!(
    DAMAGE_SPELL_HIT_OR_CRIT,
    r"(.+[^\s])\s?'s (.+[^\s]) (cr|h)its (.+[^\s]) for (\d+)\.\s?(.*)"
);
pattern!(
    DAMAGE_SPELL_HIT_OR_CRIT_SCHOOL,
    r"(.+[^\s])\s?'s (.+[^\s]) (cr|h)its (.+[^\s]) for (\d+) ([a-zA-Z]+) damage\.\s?(.*)"
);
pattern!(
    DAMAGE_PERIODIC,
    r"(.+[^\s]) suffers (\d+) ([a-zA-Z]+) damage from (.+[^\s])\s?'s (.+[^\s])\.\s?(.*)"
);
pattern!(DAMAGE_SHIELD, r"(.+[^\s]) reflects (\d+) ([a-zA-Z]+) damage to (.+[^\s])\.");
pattern!(DAMAGE_HIT_OR_CRIT, r"(.+[^\s]) (cr|h)its (.+[^\s]) for (\d+)\.\s?(.*)");
pattern!(
    DAMAGE_HIT_OR_CRIT_SCHOOL,
    r"(.+[^\s]) (cr|h)its (.+[^\s]) for (\d+) ([a-zA-Z]+) damage\.\s?(.*)"
);
// lazy spell name so "critically" lands in its own group
pattern!(HEAL, r"(.+[^\s])\s?'s (.+?[^\s]) (critically )?heals (.+[^\s]) for (\d+)\.");
pattern!(AURA_GAIN, r"(.+[^\s]) (is afflicted by|gains) (.+[^\s]) \((\d+)\)\.");
pattern!(AURA_FADE, r"(.+[^\s]) fades from (.+[^\s])\.");
pattern!(DAMAGE_SPELL_SPLIT, r"(.+[^\s])\s?'s (.+[^\s]) causes (.+[^\s]) (\d+) damage\.\s?(.*)");
pattern!(DAMAGE_SPELL_MISS, r"(.+[^\s])\s?'s (.+[^\s]) misse(s|d) (.+[^\s])\.");
pattern!(
    DAMAGE_SPELL_BLOCK_PARRY,
    r"(.+[^\s])\s?'s (.+[^\s]) was (blocked|parried|evaded|dodged|resisted|deflected) by (.+[^\s])\.?"
);
pattern!(DAMAGE_SPELL_ABSORB, r"(.+[^\s])\s?'s (.+[^\s]) is absorbed by (.+[^\s])\.");
pattern!(DAMAGE_SPELL_ABSORB_SELF, r"(.+[^\s]) absorbs (.+[^\s])\s?'s (.+[^\s])\.");
pattern!(DAMAGE_REFLECT, r"(.+[^\s])\s?'s (.+[^\s]) is reflected back by (.+[^\s])\.");
pattern!(DAMAGE_PROC_RESIST, r"(.+[^\s]) resists (.+[^\s])\s?'s (.+[^\s])\.");
pattern!(DAMAGE_SPELL_IMMUNE, r"(.+[^\s])\s?'s (.+[^\s]) fails\. (.+[^\s]) is immune\.");
pattern!(DAMAGE_MISS, r"(.+[^\s]) misses (.+[^\s])\.");
pattern!(
    DAMAGE_BLOCK_PARRY,
    r"(.+[^\s]) attacks\. (.+[^\s]) (blocks|parries|evades|dodges|deflects)\.?"
);
pattern!(DAMAGE_ABSORB_RESIST, r"(.+[^\s]) attacks\. (.+[^\s]) (absorbs|resists) all the damage\.");
pattern!(DAMAGE_IMMUNE, r"(.+[^\s]) attacks but (.+[^\s]) is immune\.");
pattern!(SPELL_CAST_PERFORM_DURABILITY, r"(.+[^\s]) (casts|performs) (.+[^\s]) on (.+[^\s]): (.+)\.");
pattern!(SPELL_CAST_PERFORM, r"(.+[^\s]) (casts|performs) (.+[^\s]) on (.+[^\s])\.");
pattern!(SPELL_CAST_PERFORM_UNKNOWN, r"(.+[^\s]) (casts|performs) (.+[^\s])\.");
pattern!(
    HONORABLE_KILL,
    r"(.+[^\s]) dies, honorable kill Rank: (.+[^\s])\s+\(Estimated Honor Points: (\d+)\)"
);
pattern!(UNIT_DIE_DESTROYED, r"(.+[^\s]) (dies|is destroyed)\.");
pattern!(UNIT_SLAY, r"(.+[^\s]) is slain by (.+[^\s])(!|\.)");
pattern!(AURA_DISPEL, r"(.+[^\s])\s?'s (.+[^\s]) is removed\.");
pattern!(AURA_INTERRUPT, r"(.+[^\s]) interrupts (.+[^\s])\s?'s (.+[^\s])\.");
pattern!(CREATES, r"(.+[^\s]) creates (.+[^\s])\.");
pattern!(GAINS_ATTACK, r"(.+[^\s]) gains (\d+) extra attacks? through (.+[^\s])\.");
pattern!(FALL_DAMAGE, r"(.+[^\s]) falls and loses (\d+) health\.");

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn emit(ts: NaiveDateTime, kind: MessageKind) -> MatchResult {
    Ok(Some(vec![Message::new(ts, kind)]))
}

fn skip(ts: NaiveDateTime, reason: impl Into<String>) -> MatchResult {
    Ok(Some(vec![Message::skip(ts, reason)]))
}

fn unparsed(ts: NaiveDateTime, reason: impl Into<String>) -> MatchResult {
    Ok(Some(vec![Message::unparsed(ts, reason)]))
}

fn no_guids(ts: NaiveDateTime, matcher: &str) -> MatchResult {
    skip(ts, format!("{matcher}: not using guids"))
}

fn captures<'a>(matcher: &'static str, re: &Regex, content: &'a str) -> Option<Captures<'a>> {
    re.captures(content).map(|caps| Captures::new(matcher, caps))
}

// ─────────────────────────────────────────────────────────────────────────────
// Add-on records
// ─────────────────────────────────────────────────────────────────────────────

pub(super) fn combatant_info(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !CombatantRecord::is_combatant(content) {
        return Ok(None);
    }
    let record = CombatantRecord::parse(content)?;
    emit(ts, MessageKind::Combatant(Box::new(record)))
}

pub(super) fn unit_info(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !UnitInfoRecord::is_unit_info(content) {
        return Ok(None);
    }
    emit(ts, MessageKind::UnitInfo(UnitInfoRecord::parse(content)?))
}

pub(super) fn zone_info(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !ZoneRecord::is_zone(content) {
        return Ok(None);
    }
    emit(ts, MessageKind::Zone(ZoneRecord::parse(content)?))
}

pub(super) fn casts(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !CastRecord::is_cast(content) {
        return Ok(None);
    }
    emit(ts, MessageKind::Cast(CastRecord::parse(content)?))
}

pub(super) fn loot(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !LootRecord::is_loot(content) {
        return Ok(None);
    }
    LootRecord::parse(content)?;
    skip(ts, "loot info")
}

// ─────────────────────────────────────────────────────────────────────────────
// Client narration
// ─────────────────────────────────────────────────────────────────────────────

/// `X 's hits Y for 10.`: a spell hit with the spell name missing.
pub(super) fn bug_damage_spell_hit_or_crit(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !BUG_DAMAGE_SPELL_HIT_OR_CRIT.is_match(content) {
        return Ok(None);
    }
    tracing::error!(content = %content, "Bugged line in logs, skipping");
    skip(ts, "bugged line in logs")
}

pub(super) fn spell_cast_attempt(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !SPELL_CAST_ATTEMPT.is_match(content) {
        return Ok(None);
    }
    skip(ts, "handled castsv2")
}

pub(super) fn gain_with_source(ts: NaiveDateTime, content: &str) -> MatchResult {
    gain("GainWithSource", &GAIN_WITH_SOURCE, true, ts, content)
}

pub(super) fn gain_no_source(ts: NaiveDateTime, content: &str) -> MatchResult {
    gain("GainNoSource", &GAIN_NO_SOURCE, false, ts, content)
}

fn gain(name: &'static str, re: &Regex, has_source: bool, ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures(name, re, content) else {
        return Ok(None);
    };

    let target = caps.unit_or_guid();
    let direction = caps.str();
    let amount = caps.u32();
    let resource = caps.resource();
    let (caster, spell) = if has_source {
        (Some(caps.unit_or_guid()), Some(caps.str()))
    } else {
        (None, None)
    };
    caps.finish()?;

    let Some(direction) = Direction::parse(&direction) else {
        return Err(ParseError::InvalidValue {
            matcher: name,
            detail: format!("unknown direction: {direction:?}"),
        });
    };

    if target.is_zero() {
        return no_guids(ts, name);
    }

    emit(
        ts,
        MessageKind::ResourceChange(ResourceChange {
            target,
            amount,
            resource,
            direction,
            caster,
            spell,
        }),
    )
}

// 0xF1400844930090A2's Firebolt hits 0xF130000950003FB5 for 38 Fire damage.
pub(super) fn damage_spell_hit_or_crit(ts: NaiveDateTime, content: &str) -> MatchResult {
    spell_hit("DamageSpellHitOrCrit", &DAMAGE_SPELL_HIT_OR_CRIT, false, ts, content)
}

pub(super) fn damage_spell_hit_or_crit_school(ts: NaiveDateTime, content: &str) -> MatchResult {
    spell_hit("DamageSpellHitOrCritSchool", &DAMAGE_SPELL_HIT_OR_CRIT_SCHOOL, true, ts, content)
}

fn spell_hit(name: &'static str, re: &Regex, has_school: bool, ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures(name, re, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let spell = caps.str();
    let hit_type = caps.short_hit();
    let target = caps.unit_or_guid();
    let amount = caps.u32();
    let school = if has_school { caps.school() } else { School::default() };
    let mut trailer = caps.trailer();
    caps.finish()?;

    if caster.is_zero() || target.is_zero() {
        return no_guids(ts, name);
    }

    trailer.mark(hit_type);

    emit(
        ts,
        MessageKind::SpellDamage(SpellDamage {
            caster,
            spell,
            hit_type,
            target,
            amount,
            school,
            trailer,
        }),
    )
}

pub(super) fn damage_periodic(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamagePeriodic", &DAMAGE_PERIODIC, content) else {
        return Ok(None);
    };

    let target = caps.unit_or_guid();
    let amount = caps.u32();
    let school = caps.school();
    let caster = caps.unit_or_guid();
    let spell = caps.str();
    let trailer = caps.trailer();
    caps.finish()?;

    if target.is_zero() || caster.is_zero() {
        return no_guids(ts, "DamagePeriodic");
    }

    emit(
        ts,
        MessageKind::PeriodicDamage(PeriodicDamage {
            caster,
            target,
            amount,
            school,
            spell,
            hit_type: HitType::HIT | HitType::PERIODIC,
            trailer,
        }),
    )
}

/// Thorns style damage returned to the attacker.
pub(super) fn damage_shield(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamageShield", &DAMAGE_SHIELD, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let amount = caps.u32();
    let school = caps.school();
    let target = caps.unit_or_guid();
    caps.finish()?;

    if caster.is_zero() || target.is_zero() {
        return no_guids(ts, "DamageShield");
    }

    emit(
        ts,
        MessageKind::Damage(Damage {
            caster,
            target,
            hit_type: HitType::HIT | HitType::REFLECT,
            amount,
            school,
            trailer: Trailer::default(),
        }),
    )
}

pub(super) fn damage_hit_or_crit(ts: NaiveDateTime, content: &str) -> MatchResult {
    melee_hit("DamageHitOrCrit", &DAMAGE_HIT_OR_CRIT, false, ts, content)
}

pub(super) fn damage_hit_or_crit_school(ts: NaiveDateTime, content: &str) -> MatchResult {
    melee_hit("DamageHitOrCritSchool", &DAMAGE_HIT_OR_CRIT_SCHOOL, true, ts, content)
}

fn melee_hit(name: &'static str, re: &Regex, has_school: bool, ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures(name, re, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let hit_type = caps.short_hit();
    let target = caps.unit_or_guid();
    let amount = caps.u32();
    let school = if has_school { caps.school() } else { School::default() };
    let trailer = caps.trailer();
    caps.finish()?;

    if caster.is_zero() || target.is_zero() {
        return no_guids(ts, name);
    }

    emit(
        ts,
        MessageKind::Damage(Damage {
            caster,
            target,
            hit_type,
            amount,
            school,
            trailer,
        }),
    )
}

pub(super) fn heal(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("Heal", &HEAL, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let spell = caps.str();
    let crit = caps.str() == "critically ";
    let target = caps.unit_or_guid();
    let amount = caps.u32();
    caps.finish()?;

    if caster.is_zero() || target.is_zero() {
        return no_guids(ts, "Heal");
    }

    emit(
        ts,
        MessageKind::Heal(Heal {
            caster,
            target,
            spell,
            amount,
            hit_type: if crit { HitType::CRIT } else { HitType::HIT },
        }),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Auras
// ─────────────────────────────────────────────────────────────────────────────

pub(super) fn aura_gain(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("AuraGainHarmfulHelpful", &AURA_GAIN, content) else {
        return Ok(None);
    };

    let target = caps.unit_or_guid();
    caps.skip();
    let spell = caps.str();
    let amount = caps.u32();
    caps.finish()?;

    if target.is_zero() {
        return no_guids(ts, "AuraGainHarmfulHelpful");
    }

    emit(
        ts,
        MessageKind::Aura(Aura {
            target,
            spell,
            amount: Some(amount),
            application: AuraApplication::Gains,
        }),
    )
}

pub(super) fn aura_fade(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("AuraFade", &AURA_FADE, content) else {
        return Ok(None);
    };

    let spell = caps.str();
    let target = caps.unit_or_guid();
    caps.finish()?;

    if target.is_zero() {
        return no_guids(ts, "AuraFade");
    }

    emit(
        ts,
        MessageKind::Aura(Aura {
            target,
            spell,
            amount: None,
            application: AuraApplication::Fades,
        }),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Avoided spells
// ─────────────────────────────────────────────────────────────────────────────

pub(super) fn damage_spell_split(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !DAMAGE_SPELL_SPLIT.is_match(content) {
        return Ok(None);
    }
    unparsed(ts, "DamageSpellSplit not implemented")
}

// spell line with a zero amount, the outcome lives in the hit type
fn avoided_spell(
    ts: NaiveDateTime,
    name: &'static str,
    caster: Guid,
    spell: String,
    hit_type: HitType,
    target: Guid,
) -> MatchResult {
    if caster.is_zero() || target.is_zero() {
        return no_guids(ts, name);
    }

    emit(
        ts,
        MessageKind::SpellDamage(SpellDamage {
            caster,
            spell,
            hit_type,
            target,
            amount: 0,
            school: School::default(),
            trailer: Trailer::default(),
        }),
    )
}

pub(super) fn damage_spell_miss(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamageSpellMiss", &DAMAGE_SPELL_MISS, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let spell = caps.str();
    caps.skip();
    let target = caps.unit_or_guid();
    caps.finish()?;

    avoided_spell(ts, "DamageSpellMiss", caster, spell, HitType::MISS, target)
}

pub(super) fn damage_spell_block_parry(ts: NaiveDateTime, content: &str) -> MatchResult {
    let name = "DamageSpellBlockParryEvadeDodgeResistDeflect";
    let Some(mut caps) = captures(name, &DAMAGE_SPELL_BLOCK_PARRY, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let spell = caps.str();
    let hit_type = caps.hit_mask();
    let target = caps.unit_or_guid();
    caps.finish()?;

    avoided_spell(ts, name, caster, spell, hit_type, target)
}

/// Full absorb, partial absorbs show up in the hit trailer.
pub(super) fn damage_spell_absorb(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamageSpellAbsorb", &DAMAGE_SPELL_ABSORB, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let spell = caps.str();
    let target = caps.unit_or_guid();
    caps.finish()?;

    avoided_spell(ts, "DamageSpellAbsorb", caster, spell, HitType::FULL_ABSORB, target)
}

pub(super) fn damage_spell_absorb_self(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !DAMAGE_SPELL_ABSORB_SELF.is_match(content) {
        return Ok(None);
    }
    unparsed(ts, "DamageSpellAbsorbSelf not implemented")
}

pub(super) fn damage_reflect(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamageReflect", &DAMAGE_REFLECT, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let spell = caps.str();
    let target = caps.unit_or_guid();
    caps.finish()?;

    avoided_spell(ts, "DamageReflect", caster, spell, HitType::REFLECT, target)
}

pub(super) fn damage_proc_resist(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !DAMAGE_PROC_RESIST.is_match(content) {
        return Ok(None);
    }
    unparsed(ts, "DamageProcResist not implemented")
}

pub(super) fn damage_spell_immune(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamageSpellImmune", &DAMAGE_SPELL_IMMUNE, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let spell = caps.str();
    let target = caps.unit_or_guid();
    caps.finish()?;

    avoided_spell(ts, "DamageSpellImmune", caster, spell, HitType::IMMUNE, target)
}

// ─────────────────────────────────────────────────────────────────────────────
// Avoided melee
// ─────────────────────────────────────────────────────────────────────────────

fn avoided_melee(ts: NaiveDateTime, name: &'static str, caster: Guid, target: Guid, hit_type: HitType) -> MatchResult {
    if caster.is_zero() || target.is_zero() {
        return no_guids(ts, name);
    }

    emit(
        ts,
        MessageKind::Damage(Damage {
            caster,
            target,
            hit_type,
            amount: 0,
            school: School::default(),
            trailer: Trailer::default(),
        }),
    )
}

pub(super) fn damage_miss(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamageMiss", &DAMAGE_MISS, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let target = caps.unit_or_guid();
    caps.finish()?;

    avoided_melee(ts, "DamageMiss", caster, target, HitType::MISS)
}

pub(super) fn damage_block_parry(ts: NaiveDateTime, content: &str) -> MatchResult {
    let name = "DamageBlockParryEvadeDodgeDeflect";
    let Some(mut caps) = captures(name, &DAMAGE_BLOCK_PARRY, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let target = caps.unit_or_guid();
    let hit_type = caps.hit_mask();
    caps.finish()?;

    avoided_melee(ts, name, caster, target, hit_type)
}

pub(super) fn damage_absorb_resist(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamageAbsorbResist", &DAMAGE_ABSORB_RESIST, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let target = caps.unit_or_guid();
    let hit_type = caps.hit_mask();
    caps.finish()?;

    avoided_melee(ts, "DamageAbsorbResist", caster, target, hit_type)
}

pub(super) fn damage_immune(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("DamageImmune", &DAMAGE_IMMUNE, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let target = caps.unit_or_guid();
    caps.finish()?;

    avoided_melee(ts, "DamageImmune", caster, target, HitType::IMMUNE)
}

// ─────────────────────────────────────────────────────────────────────────────
// Casts narrated by the client, superseded by CAST records
// ─────────────────────────────────────────────────────────────────────────────

/// Item durability loss on resurrection.
pub(super) fn spell_cast_perform_durability(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !SPELL_CAST_PERFORM_DURABILITY.is_match(content) {
        return Ok(None);
    }
    unparsed(ts, "SpellCastPerformDurability not implemented")
}

pub(super) fn spell_cast_perform(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !SPELL_CAST_PERFORM.is_match(content) {
        return Ok(None);
    }
    skip(ts, "'SpellCastPerform' handled by castsv2")
}

pub(super) fn spell_cast_perform_unknown(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !SPELL_CAST_PERFORM_UNKNOWN.is_match(content) {
        return Ok(None);
    }
    skip(ts, "'SpellCastPerformUnknown' handled by castsv2")
}

// ─────────────────────────────────────────────────────────────────────────────
// Deaths
// ─────────────────────────────────────────────────────────────────────────────

fn slain(ts: NaiveDateTime, name: &'static str, victim: Guid, killer: Option<Guid>) -> MatchResult {
    if victim.is_zero() {
        return unparsed(ts, format!("{name}: not using guids"));
    }
    emit(ts, MessageKind::Slain(Slain { victim, killer }))
}

pub(super) fn honorable_kill(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("HonorableKill", &HONORABLE_KILL, content) else {
        return Ok(None);
    };

    let victim = caps.unit_or_guid();
    // rank and honor are not tracked
    caps.skip();
    caps.u32();
    caps.finish()?;

    slain(ts, "HonorableKill", victim, None)
}

pub(super) fn unit_die_destroyed(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("UnitDieDestroyed", &UNIT_DIE_DESTROYED, content) else {
        return Ok(None);
    };

    let victim = caps.unit_or_guid();
    caps.finish()?;

    slain(ts, "UnitDieDestroyed", victim, None)
}

pub(super) fn unit_slay(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("UnitSlay", &UNIT_SLAY, content) else {
        return Ok(None);
    };

    let victim = caps.unit_or_guid();
    let killer = caps.unit_or_guid();
    caps.finish()?;

    slain(ts, "UnitSlay", victim, (!killer.is_zero()).then_some(killer))
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispels, interrupts and the rest
// ─────────────────────────────────────────────────────────────────────────────

pub(super) fn aura_dispel(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("AuraDispel", &AURA_DISPEL, content) else {
        return Ok(None);
    };

    let target = caps.unit_or_guid();
    let spell = caps.str();
    caps.finish()?;

    if target.is_zero() {
        return no_guids(ts, "AuraDispel");
    }

    emit(
        ts,
        MessageKind::Aura(Aura {
            target,
            spell,
            amount: None,
            application: AuraApplication::Removed,
        }),
    )
}

pub(super) fn aura_interrupt(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("AuraInterrupt", &AURA_INTERRUPT, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let target = caps.unit_or_guid();
    let spell = caps.str();
    caps.finish()?;

    if caster.is_zero() || target.is_zero() {
        return no_guids(ts, "AuraInterrupt");
    }

    emit(ts, MessageKind::Interrupt(Interrupt { caster, target, spell }))
}

pub(super) fn creates(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("Creates", &CREATES, content) else {
        return Ok(None);
    };

    let caster = caps.unit_or_guid();
    let created = caps.str();
    caps.finish()?;

    if caster.is_zero() {
        return no_guids(ts, "Creates");
    }

    emit(ts, MessageKind::Create(Create { caster, created }))
}

pub(super) fn gains_attack(ts: NaiveDateTime, content: &str) -> MatchResult {
    if !GAINS_ATTACK.is_match(content) {
        return Ok(None);
    }
    unparsed(ts, "GainsAttack not implemented")
}

pub(super) fn fall_damage(ts: NaiveDateTime, content: &str) -> MatchResult {
    let Some(mut caps) = captures("FallDamage", &FALL_DAMAGE, content) else {
        return Ok(None);
    };

    let target = caps.unit_or_guid();
    let amount = caps.u32();
    caps.finish()?;

    if target.is_zero() {
        return no_guids(ts, "FallDamage");
    }

    emit(ts, MessageKind::FallDamage(FallDamage { target, amount }))
}
