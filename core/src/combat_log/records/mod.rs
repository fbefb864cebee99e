//! Structured records written by the companion add-on
//!
//! Each record starts with an upper case prefix (`CAST:`, `COMBATANT_INFO:` ...)
//! followed by a single space and the payload. Most payloads are `&` separated.

mod cast;
mod combatant;
mod loot;
mod unit_info;
mod zone;

pub use cast::{CAST_PREFIX, CastRecord};
pub use combatant::{COMBATANT_PREFIX, CombatantRecord, Gender, GearItem, Guild, HeroClass, Race, Talents};
pub use loot::{LOOT_PREFIX, LootRecord};
pub use unit_info::{UNIT_INFO_PREFIX, UnitInfoRecord};
pub use zone::{ZONE_PREFIX, ZoneRecord};

use chrono::NaiveDateTime;

use super::error::ParseError;

/// `chrono` layout of the add-on's own timestamps (`20.11.25 22:07:48`).
pub const ADDON_DATE_FORMAT: &str = "%d.%m.%y %H:%M:%S";

/// Payload after `prefix` and the separating character, if `content` is a record of that kind.
pub fn strip_record_prefix<'a>(prefix: &str, content: &'a str) -> Option<&'a str> {
    let rest = content.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    chars.next()?;
    Some(chars.as_str())
}

pub(crate) fn parse_addon_time(kind: &'static str, value: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, ADDON_DATE_FORMAT).map_err(|e| ParseError::InvalidRecord {
        kind,
        detail: format!("invalid date {value:?}: {e}"),
    })
}

pub(crate) fn parse_flag(kind: &'static str, value: &str) -> Result<bool, ParseError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(ParseError::InvalidRecord {
            kind,
            detail: format!("invalid flag {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_record_prefix() {
        assert_eq!(strip_record_prefix("CAST:", "CAST: Doyd casts X(1)."), Some("Doyd casts X(1)."));
        assert_eq!(strip_record_prefix("CAST:", "CAST:"), None);
        assert_eq!(strip_record_prefix("CAST:", "Doyd casts"), None);
        assert_eq!(strip_record_prefix("LOOT:", "LOOT: "), Some(""));
    }

    #[test]
    fn test_parse_addon_time() {
        let ts = parse_addon_time("test", "01.12.25 18:08:55").unwrap();
        assert_eq!(ts.to_string(), "2025-12-01 18:08:55");
        assert!(parse_addon_time("test", "2025-12-01").is_err());
    }
}
