//! `COMBATANT_INFO:` player snapshots
//!
//! `&` separated: time, name, class, race, gender, pet, guild name, guild rank
//! name, guild rank index, 19 gear slots, talents and (newer add-on versions) guid.

use std::fmt;

use chrono::NaiveDateTime;

use super::{parse_addon_time, strip_record_prefix};
use crate::combat_log::error::ParseError;
use crate::combat_log::guid::Guid;

pub const COMBATANT_PREFIX: &str = "COMBATANT_INFO:";

const KIND: &str = "COMBATANT_INFO";
const GEAR_START: usize = 9;
const GEAR_SLOTS: usize = 19;
const TALENTS: usize = GEAR_START + GEAR_SLOTS;
const GUID: usize = TALENTS + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroClass {
    Druid,
    Hunter,
    Mage,
    Paladin,
    Priest,
    Rogue,
    Shaman,
    Warlock,
    Warrior,
}

impl HeroClass {
    pub fn parse(s: &str) -> Option<HeroClass> {
        Some(match s {
            "DRUID" => Self::Druid,
            "HUNTER" => Self::Hunter,
            "MAGE" => Self::Mage,
            "PALADIN" => Self::Paladin,
            "PRIEST" => Self::Priest,
            "ROGUE" => Self::Rogue,
            "SHAMAN" => Self::Shaman,
            "WARLOCK" => Self::Warlock,
            "WARRIOR" => Self::Warrior,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Druid => "DRUID",
            Self::Hunter => "HUNTER",
            Self::Mage => "MAGE",
            Self::Paladin => "PALADIN",
            Self::Priest => "PRIEST",
            Self::Rogue => "ROGUE",
            Self::Shaman => "SHAMAN",
            Self::Warlock => "WARLOCK",
            Self::Warrior => "WARRIOR",
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Race {
    Scourge,
    Orc,
    Troll,
    Tauren,
    Goblin,
    Human,
    Gnome,
    Dwarf,
    NightElf,
    BloodElf,
}

impl Race {
    pub fn parse(s: &str) -> Option<Race> {
        Some(match s {
            "Scourge" => Self::Scourge,
            "Orc" => Self::Orc,
            "Troll" => Self::Troll,
            "Tauren" => Self::Tauren,
            "Goblin" => Self::Goblin,
            "Human" => Self::Human,
            "Gnome" => Self::Gnome,
            "Dwarf" => Self::Dwarf,
            "NightElf" => Self::NightElf,
            "BloodElf" => Self::BloodElf,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Gender {
    #[default]
    NotSet,
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub fn from_code(code: u8) -> Option<Gender> {
        match code {
            0 => Some(Self::NotSet),
            1 => Some(Self::Unknown),
            2 => Some(Self::Male),
            3 => Some(Self::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub name: String,
    pub rank_name: String,
    pub rank_index: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearItem {
    pub item_id: u32,
    pub enchant_id: Option<u32>,
}

/// Points spent per talent, one digit per talent, three trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talents {
    pub summary: [u8; 3],
    pub trees: [Vec<u8>; 3],
}

impl Talents {
    /// `005103000000000000}055051000050122231}00000000000000000000`, `nil` is no talents.
    pub fn parse(s: &str) -> Result<Option<Talents>, ParseError> {
        if s == "nil" {
            return Ok(None);
        }

        let trees: Vec<&str> = s.split('}').collect();
        let [a, b, c] = trees.as_slice() else {
            return Err(invalid(format!("invalid talents format: {s}")));
        };

        let mut talents = Talents {
            summary: [0; 3],
            trees: [Vec::new(), Vec::new(), Vec::new()],
        };
        for (i, tree) in [a, b, c].into_iter().enumerate() {
            for ch in tree.chars() {
                let points = ch
                    .to_digit(10)
                    .ok_or_else(|| invalid(format!("invalid talent character {ch:?} in {s}")))?
                    as u8;
                talents.trees[i].push(points);
                talents.summary[i] = talents.summary[i].saturating_add(points);
            }
        }

        Ok(Some(talents))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatantRecord {
    pub seen: NaiveDateTime,
    pub name: String,
    pub guid: Guid,
    pub class: HeroClass,
    pub race: Race,
    pub gender: Gender,
    pub pet_name: String,
    pub guild: Option<Guild>,
    pub gear: Vec<GearItem>,
    pub talents: Option<Talents>,
}

fn invalid(detail: String) -> ParseError {
    ParseError::InvalidRecord { kind: KIND, detail }
}

fn nil_to_empty(s: &str) -> String {
    if s == "nil" { String::new() } else { s.to_string() }
}

fn parse_gear_item(slot: &str) -> Option<GearItem> {
    if slot == "nil" {
        return None;
    }
    let mut parts = slot.split(':');
    let item_id = parts.next()?.parse::<u32>().ok()?;
    let enchant_id = parts.next()?.parse::<u32>().ok()?;
    Some(GearItem {
        item_id,
        enchant_id: (enchant_id != 0).then_some(enchant_id),
    })
}

impl CombatantRecord {
    pub fn is_combatant(content: &str) -> bool {
        strip_record_prefix(COMBATANT_PREFIX, content).is_some()
    }

    pub fn parse(content: &str) -> Result<CombatantRecord, ParseError> {
        let payload = strip_record_prefix(COMBATANT_PREFIX, content)
            .ok_or_else(|| invalid(format!("not a combatant record: {content}")))?;

        let fields: Vec<&str> = payload.split('&').collect();
        if fields.len() < TALENTS {
            return Err(invalid(format!(
                "insufficient arguments, got {}, want at least {TALENTS}",
                fields.len()
            )));
        }

        let seen = parse_addon_time(KIND, fields[0])?;
        let class = HeroClass::parse(fields[2]).ok_or_else(|| invalid(format!("invalid class {}", fields[2])))?;
        let race = Race::parse(fields[3]).ok_or_else(|| invalid(format!("invalid race {}", fields[3])))?;
        let gender = fields[4]
            .parse::<u8>()
            .ok()
            .and_then(Gender::from_code)
            .ok_or_else(|| invalid(format!("invalid gender {}", fields[4])))?;

        let guild = match fields[6] {
            "" | "nil" => None,
            name => Some(Guild {
                name: name.to_string(),
                rank_name: nil_to_empty(fields[7]),
                rank_index: nil_to_empty(fields[8]),
            }),
        };

        let gear = fields[GEAR_START..TALENTS]
            .iter()
            .filter_map(|slot| parse_gear_item(slot))
            .collect();

        let talents = Talents::parse(fields.get(TALENTS).copied().unwrap_or("nil"))?;

        let guid = match fields.get(GUID).copied() {
            None | Some("nil") | Some("") => Guid::ZERO,
            Some(value) => Guid::parse(value)?,
        };

        Ok(CombatantRecord {
            seen,
            name: fields[1].to_string(),
            guid,
            class,
            race,
            gender,
            pet_name: nil_to_empty(fields[5]),
            guild,
            gear,
            talents,
        })
    }

    /// Only the recording player's own snapshot carries talents.
    pub fn is_me(&self) -> bool {
        self.talents.is_some() && self.guid.is_player()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOYD_NO_GUID: &str = "COMBATANT_INFO: 11.11.25 08:58:09&Doyd&ROGUE&Scourge&2&nil&Exalted with Doordash&Friendly&4&8176:0:0:0&61422:0:0:0&9647:0:0:0&60058:0:0:0&83401:18:0:0&14598:0:0:0&8193:18:0:0&9633:18:0:0&7378:0:0:0&4107:17:0:0&9533:0:0:0&60835:0:0:0&60587:0:0:0&58073:0:0:0&6432:0:0:0&9684:0:0:0&61330:0:0:0&55474:0:0:0&5976:0:0:0&005103000000000000}055051000050122231}00000000000000000000";
    const ARAMARAH: &str = "COMBATANT_INFO: 20.11.25 22:07:48&Aramarah&WARLOCK&Troll&3&nil&nil&nil&nil&55337:0:0:0&nil&1769:0:0:0&2575:0:0:0&6465:44:0:0&14373:0:0:0&15449:0:0:0&3065:0:0:0&15452:41:0:0&14162:0:761:0&12053:0:0:0&55317:0:0:0&55340:0:0:0&70033:0:0:0&70224:0:0:0&15444:0:0:0&nil&5243:0:0:0&nil&nil&0x00000000000EBF01";
    const ME_DOYD: &str = "COMBATANT_INFO: 20.11.25 19:33:23&Doyd&ROGUE&Scourge&2&nil&Exalted with Doordash&Friendly&4&8176:0:0:0&60300:0:0:0&9647:0:0:0&60058:0:0:0&83401:18:0:0&13118:0:0:0&60268:1843:0:0&9948:1843:612:0&16710:0:0:0&4107:17:0:0&9533:0:0:0&60835:0:0:0&60587:0:0:0&58073:0:0:0&6432:0:0:0&9684:0:0:0&61330:0:0:0&55474:0:0:0&5976:0:0:0&005103000000000000}055051000050122231}00000000000000000000&0x000000000001C7AC";

    #[test]
    fn test_combatant_without_guid() {
        let c = CombatantRecord::parse(DOYD_NO_GUID).unwrap();
        assert_eq!(c.name, "Doyd");
        assert_eq!(c.class, HeroClass::Rogue);
        assert_eq!(c.race, Race::Scourge);
        assert_eq!(c.gender, Gender::Male);
        assert_eq!(c.pet_name, "");
        assert!(c.guid.is_zero());
        assert_eq!(
            c.guild,
            Some(Guild {
                name: "Exalted with Doordash".to_string(),
                rank_name: "Friendly".to_string(),
                rank_index: "4".to_string(),
            })
        );
        assert_eq!(c.seen.to_string(), "2025-11-11 08:58:09");
        assert_eq!(c.gear.len(), 19);
        assert_eq!(c.gear[4], GearItem { item_id: 83401, enchant_id: Some(18) });
        assert_eq!(c.gear[0].enchant_id, None);

        let talents = c.talents.as_ref().unwrap();
        assert_eq!(talents.summary, [9, 32, 0]);
        assert_eq!(talents.trees[0].len(), 18);
        assert!(!c.is_me());
    }

    #[test]
    fn test_combatant_other_player() {
        let c = CombatantRecord::parse(ARAMARAH).unwrap();
        assert_eq!(c.name, "Aramarah");
        assert_eq!(c.guid, Guid(0x00000000000EBF01));
        assert_eq!(c.class, HeroClass::Warlock);
        assert_eq!(c.race, Race::Troll);
        assert_eq!(c.gender, Gender::Female);
        assert_eq!(c.guild, None);
        assert_eq!(c.gear.len(), 16);
        assert!(c.talents.is_none());
        assert!(!c.is_me());
    }

    #[test]
    fn test_combatant_is_me() {
        let c = CombatantRecord::parse(ME_DOYD).unwrap();
        assert_eq!(c.guid, Guid(0x000000000001C7AC));
        assert!(c.is_me());
    }

    #[test]
    fn test_combatant_rejects_bad_input() {
        assert!(CombatantRecord::parse("COMBATANT_INFO: 20.11.25 19:33:23&Doyd&ROGUE").is_err());
        let bad_class = ARAMARAH.replace("WARLOCK", "BARD");
        assert!(CombatantRecord::parse(&bad_class).is_err());
        let bad_talents = ME_DOYD.replace("}055051", "}05x051");
        assert!(CombatantRecord::parse(&bad_talents).is_err());
    }
}
