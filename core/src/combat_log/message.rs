//! Typed events produced by the event parser
//!
//! A [`Message`] is a timestamp plus one [`MessageKind`]. Consumers dispatch
//! with an exhaustive `match` so a new kind has to be handled everywhere.

use chrono::NaiveDateTime;

use super::guid::Guid;
use super::records::{CastRecord, CombatantRecord, UnitInfoRecord, ZoneRecord};
use super::types::{AuraApplication, HitType, Resource, School, Trailer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Gains,
    Loses,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Direction> {
        match s {
            "gains" => Some(Self::Gains),
            "loses" => Some(Self::Loses),
            _ => None,
        }
    }
}

/// `Naga gains 35 Happiness from Kryaa's Feed Pet Effect.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChange {
    pub target: Guid,
    pub amount: u32,
    pub resource: Resource,
    pub direction: Direction,
    pub caster: Option<Guid>,
    pub spell: Option<String>,
}

/// Melee swing or reflect damage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Damage {
    pub caster: Guid,
    pub target: Guid,
    pub hit_type: HitType,
    pub amount: u32,
    pub school: School,
    pub trailer: Trailer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellDamage {
    pub caster: Guid,
    pub spell: String,
    pub hit_type: HitType,
    pub target: Guid,
    pub amount: u32,
    pub school: School,
    pub trailer: Trailer,
}

/// Damage over time tick, `hit_type` always contains [`HitType::PERIODIC`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicDamage {
    pub caster: Guid,
    pub target: Guid,
    pub amount: u32,
    pub school: School,
    pub spell: String,
    pub hit_type: HitType,
    pub trailer: Trailer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heal {
    pub caster: Guid,
    pub target: Guid,
    pub spell: String,
    pub amount: u32,
    pub hit_type: HitType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aura {
    pub target: Guid,
    pub spell: String,
    /// Stack count, only written on gains.
    pub amount: Option<u32>,
    pub application: AuraApplication,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interrupt {
    pub caster: Guid,
    pub target: Guid,
    pub spell: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Create {
    pub caster: Guid,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallDamage {
    pub target: Guid,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slain {
    pub victim: Guid,
    pub killer: Option<Guid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Skip(String),
    Unparsed(String),
    Zone(ZoneRecord),
    Combatant(Box<CombatantRecord>),
    UnitInfo(UnitInfoRecord),
    Cast(CastRecord),
    ResourceChange(ResourceChange),
    Damage(Damage),
    SpellDamage(SpellDamage),
    PeriodicDamage(PeriodicDamage),
    Heal(Heal),
    Aura(Aura),
    Interrupt(Interrupt),
    Create(Create),
    FallDamage(FallDamage),
    Slain(Slain),
}

impl MessageKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Skip(_) => "Skip",
            Self::Unparsed(_) => "Unparsed",
            Self::Zone(_) => "Zone",
            Self::Combatant(_) => "Combatant",
            Self::UnitInfo(_) => "UnitInfo",
            Self::Cast(_) => "Cast",
            Self::ResourceChange(_) => "ResourceChange",
            Self::Damage(_) => "Damage",
            Self::SpellDamage(_) => "SpellDamage",
            Self::PeriodicDamage(_) => "PeriodicDamage",
            Self::Heal(_) => "Heal",
            Self::Aura(_) => "Aura",
            Self::Interrupt(_) => "Interrupt",
            Self::Create(_) => "Create",
            Self::FallDamage(_) => "FallDamage",
            Self::Slain(_) => "Slain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub timestamp: NaiveDateTime,
    pub kind: MessageKind,
}

impl Message {
    pub fn new(timestamp: NaiveDateTime, kind: MessageKind) -> Self {
        Self { timestamp, kind }
    }

    pub fn skip(timestamp: NaiveDateTime, reason: impl Into<String>) -> Self {
        Self::new(timestamp, MessageKind::Skip(reason.into()))
    }

    pub fn unparsed(timestamp: NaiveDateTime, content: impl Into<String>) -> Self {
        Self::new(timestamp, MessageKind::Unparsed(content.into()))
    }

    pub fn is_skip(&self) -> bool {
        matches!(self.kind, MessageKind::Skip(_))
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self.kind, MessageKind::Unparsed(_))
    }
}
