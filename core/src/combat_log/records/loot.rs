//! `LOOT:` records: `time&<loot text>`. Recognised so they never reach the grammar.

use chrono::NaiveDateTime;

use super::{parse_addon_time, strip_record_prefix};
use crate::combat_log::error::ParseError;

pub const LOOT_PREFIX: &str = "LOOT:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootRecord {
    pub seen: NaiveDateTime,
    pub text: String,
}

impl LootRecord {
    pub fn is_loot(content: &str) -> bool {
        strip_record_prefix(LOOT_PREFIX, content).is_some()
    }

    pub fn parse(content: &str) -> Result<LootRecord, ParseError> {
        let invalid = |detail: String| ParseError::InvalidRecord { kind: "LOOT", detail };

        let payload = strip_record_prefix(LOOT_PREFIX, content)
            .ok_or_else(|| invalid(format!("not a loot record: {content}")))?;
        let (seen, text) = payload
            .split_once('&')
            .ok_or_else(|| invalid(format!("missing loot text: {payload}")))?;

        Ok(LootRecord {
            seen: parse_addon_time("LOOT", seen)?,
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loot() {
        let l = LootRecord::parse(
            "LOOT: 20.11.25 14:37:08&0x000000000001C7AC receives loot: |cffffffff|Hitem:4306::::::::60:::::::|h[Silk Cloth]|h|rx2.",
        )
        .unwrap();
        assert_eq!(l.seen.to_string(), "2025-11-20 14:37:08");
        assert!(l.text.starts_with("0x000000000001C7AC receives loot"));
    }

    #[test]
    fn test_rejects_loot_without_text() {
        assert!(LootRecord::parse("LOOT: 20.11.25 14:37:08").is_err());
        assert!(LootRecord::is_loot("LOOT: x"));
    }
}
