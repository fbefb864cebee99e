//! Value types shared by records, messages and the event parser

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::LazyLock;

use phf::phf_map;
use regex::Regex;

use super::error::ParseError;
use super::guid::{GUID_STR_LEN, Guid};

// ─────────────────────────────────────────────────────────────────────────────
// Unit
// ─────────────────────────────────────────────────────────────────────────────

/// A participant as named by a log line. Bare names carry a zero guid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Unit {
    pub name: String,
    pub guid: Guid,
}

impl Unit {
    pub fn new(name: impl Into<String>, guid: Guid) -> Self {
        Self {
            name: name.into(),
            guid,
        }
    }

    /// Parse `0x…`, `0x…(Name)` or a bare name.
    pub fn parse(s: &str) -> Result<Unit, ParseError> {
        if !s.starts_with("0x") {
            return Ok(Unit::new(s, Guid::ZERO));
        }

        let invalid = |detail: &str| ParseError::InvalidRecord {
            kind: "unit",
            detail: format!("{detail}: {s}"),
        };

        if s.len() < GUID_STR_LEN {
            return Err(invalid("too short for a guid"));
        }
        let guid = Guid::parse(&s[..GUID_STR_LEN])?;
        let rest = &s[GUID_STR_LEN..];
        if rest.is_empty() {
            return Ok(Unit::new("", guid));
        }

        match rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            Some(name) if !name.is_empty() => Ok(Unit::new(name, guid)),
            _ => Err(invalid("expected `(name)` after guid")),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.guid.is_zero(), self.name.is_empty()) {
            (true, _) => f.write_str(&self.name),
            (false, true) => write!(f, "{}", self.guid),
            (false, false) => write!(f, "{}({})", self.guid, self.name),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Spell
// ─────────────────────────────────────────────────────────────────────────────

static SPELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+\S)\((\d+)\)(\(.+\))?$").expect("valid spell regex"));

/// `Conjure Water(10140)(Rank 7)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Spell {
    pub name: String,
    pub id: u32,
    pub rank: Option<u32>,
}

impl Spell {
    pub fn parse(s: &str) -> Result<Spell, ParseError> {
        let invalid = |detail: String| ParseError::InvalidRecord {
            kind: "spell",
            detail,
        };

        let caps = SPELL_RE
            .captures(s)
            .ok_or_else(|| invalid(format!("invalid spell string: {s}")))?;

        let id = caps[2]
            .parse::<u32>()
            .map_err(|e| invalid(format!("spell id {}: {e}", &caps[2])))?;

        let rank = match caps.get(3) {
            Some(m) => {
                let raw = m.as_str().trim_matches(|c| c == '(' || c == ')');
                let raw = raw.strip_prefix("Rank ").unwrap_or(raw);
                Some(
                    raw.parse::<u32>()
                        .map_err(|e| invalid(format!("rank {raw}: {e}")))?,
                )
            }
            None => None,
        };

        Ok(Spell {
            name: caps[1].to_string(),
            id,
            rank,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HitType
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome flags of a single strike. A crit can also be partially resisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HitType(u32);

impl HitType {
    pub const NONE: HitType = HitType(0);
    pub const HIT: HitType = HitType(1 << 0);
    pub const CRIT: HitType = HitType(1 << 1);
    pub const MISS: HitType = HitType(1 << 2);
    pub const BLOCK: HitType = HitType(1 << 3);
    pub const PARRY: HitType = HitType(1 << 4);
    pub const EVADE: HitType = HitType(1 << 5);
    pub const DODGE: HitType = HitType(1 << 6);
    pub const DEFLECT: HitType = HitType(1 << 7);
    pub const IMMUNE: HitType = HitType(1 << 8);
    pub const FULL_RESIST: HitType = HitType(1 << 9);
    pub const FULL_ABSORB: HitType = HitType(1 << 10);
    pub const PARTIAL_RESIST: HitType = HitType(1 << 11);
    pub const PARTIAL_BLOCK: HitType = HitType(1 << 12);
    pub const PARTIAL_ABSORB: HitType = HitType(1 << 13);
    pub const GLANCING: HitType = HitType(1 << 14);
    pub const CRUSHING: HitType = HitType(1 << 15);
    pub const REFLECT: HitType = HitType(1 << 16);
    pub const PERIODIC: HitType = HitType(1 << 17);

    const NAMES: [(HitType, &'static str); 18] = [
        (Self::HIT, "HIT"),
        (Self::CRIT, "CRIT"),
        (Self::MISS, "MISS"),
        (Self::BLOCK, "BLOCK"),
        (Self::PARRY, "PARRY"),
        (Self::EVADE, "EVADE"),
        (Self::DODGE, "DODGE"),
        (Self::DEFLECT, "DEFLECT"),
        (Self::IMMUNE, "IMMUNE"),
        (Self::FULL_RESIST, "FULL_RESIST"),
        (Self::FULL_ABSORB, "FULL_ABSORB"),
        (Self::PARTIAL_RESIST, "PARTIAL_RESIST"),
        (Self::PARTIAL_BLOCK, "PARTIAL_BLOCK"),
        (Self::PARTIAL_ABSORB, "PARTIAL_ABSORB"),
        (Self::GLANCING, "GLANCING"),
        (Self::CRUSHING, "CRUSHING"),
        (Self::REFLECT, "REFLECT"),
        (Self::PERIODIC, "PERIODIC"),
    ];

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: HitType) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: HitType) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `h` / `cr` as written in "hits" / "crits".
    pub fn from_short(s: &str) -> Option<HitType> {
        match s {
            "h" => Some(Self::HIT),
            "cr" => Some(Self::CRIT),
            _ => None,
        }
    }

    /// Avoidance verbs, both the melee ("dodges") and spell ("dodged") forms.
    pub fn from_avoidance(s: &str) -> Option<HitType> {
        match s {
            "blocks" | "blocked" => Some(Self::BLOCK),
            "parries" | "parried" => Some(Self::PARRY),
            "evades" | "evaded" => Some(Self::EVADE),
            "dodges" | "dodged" => Some(Self::DODGE),
            "deflects" | "deflected" => Some(Self::DEFLECT),
            "resists" | "resisted" => Some(Self::FULL_RESIST),
            "absorbs" => Some(Self::FULL_ABSORB),
            _ => None,
        }
    }
}

impl BitOr for HitType {
    type Output = HitType;

    fn bitor(self, rhs: HitType) -> HitType {
        HitType(self.0 | rhs.0)
    }
}

impl BitOrAssign for HitType {
    fn bitor_assign(&mut self, rhs: HitType) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for HitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// School / Resource
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum School {
    #[default]
    Physical,
    Holy,
    Fire,
    Nature,
    Frost,
    Shadow,
    Arcane,
}

static SCHOOLS: phf::Map<&'static str, School> = phf_map! {
    "Physical" => School::Physical,
    "Holy" => School::Holy,
    "Fire" => School::Fire,
    "Nature" => School::Nature,
    "Frost" => School::Frost,
    "Shadow" => School::Shadow,
    "Arcane" => School::Arcane,
};

impl School {
    pub fn from_name(s: &str) -> Option<School> {
        SCHOOLS.get(s).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Health,
    Mana,
    Rage,
    Energy,
    Happiness,
    Focus,
}

static RESOURCES: phf::Map<&'static str, Resource> = phf_map! {
    "Health" => Resource::Health,
    "health" => Resource::Health,
    "Mana" => Resource::Mana,
    "Rage" => Resource::Rage,
    "Energy" => Resource::Energy,
    "Happiness" => Resource::Happiness,
    "happiness" => Resource::Happiness,
    "Focus" => Resource::Focus,
};

impl Resource {
    pub fn from_name(s: &str) -> Option<Resource> {
        RESOURCES.get(s).copied()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aura / Cast enums
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuraApplication {
    Gains,
    Fades,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastAction {
    Casts,
    BeginsToCast,
    Channels,
    FailsCasting,
}

impl CastAction {
    pub fn from_phrase(s: &str) -> Option<CastAction> {
        match s {
            "casts" => Some(Self::Casts),
            "begins to cast" => Some(Self::BeginsToCast),
            "channels" => Some(Self::Channels),
            "fails casting" => Some(Self::FailsCasting),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Casts => "casts",
            Self::BeginsToCast => "begins to cast",
            Self::Channels => "channels",
            Self::FailsCasting => "fails casting",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trailer
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerEntry {
    pub amount: Option<u32>,
    pub hit_type: HitType,
}

static TRAILER_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("valid trailer regex"));

/// Parenthesised suffix of a damage line, e.g. `(4 resisted) (crushing)`.
///
/// Groups may or may not be separated by spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trailer(pub Vec<TrailerEntry>);

impl Trailer {
    pub fn parse(s: &str) -> Result<Trailer, ParseError> {
        let mut entries = Vec::new();

        for group in TRAILER_GROUP_RE.captures_iter(s) {
            let part = group.get(1).map_or("", |m| m.as_str().trim());
            match part {
                "" => {}
                "glancing" => entries.push(TrailerEntry {
                    amount: None,
                    hit_type: HitType::GLANCING,
                }),
                "crushing" => entries.push(TrailerEntry {
                    amount: None,
                    hit_type: HitType::CRUSHING,
                }),
                other => {
                    let mut words = other.split(' ');
                    let (Some(amount), Some(kind)) = (words.next(), words.next()) else {
                        continue;
                    };
                    // private server "vulnerability bonus", not part of the game
                    if kind == "vulnerability" {
                        continue;
                    }
                    let Ok(amount) = amount.parse::<u32>() else {
                        continue;
                    };
                    let hit_type = match kind {
                        "resisted" => HitType::PARTIAL_RESIST,
                        "blocked" => HitType::PARTIAL_BLOCK,
                        "absorbed" => HitType::PARTIAL_ABSORB,
                        _ => {
                            return Err(ParseError::InvalidRecord {
                                kind: "trailer",
                                detail: format!("unexpected hit type: {kind}"),
                            });
                        }
                    };
                    entries.push(TrailerEntry {
                        amount: Some(amount),
                        hit_type,
                    });
                }
            }
        }

        Ok(Trailer(entries))
    }

    pub fn entries(&self) -> &[TrailerEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// OR `hit_type` into every entry.
    pub fn mark(&mut self, hit_type: HitType) {
        for entry in &mut self.0 {
            entry.hit_type |= hit_type;
        }
    }
}
