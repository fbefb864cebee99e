//! `CAST:` records
//!
//! ```text
//! CAST: Maldrissa begins to cast Immolate(1094)(Rank 3) on Gray Bear.
//! CAST: 0x00000000000E8AB6(Mooshuggah) casts Skinning(8618) on 0xF13000092F003EE0(Gray Bear).
//! ```
//!
//! The formatted log names units, the raw client log adds guids.

use std::sync::LazyLock;

use regex::Regex;

use super::strip_record_prefix;
use crate::combat_log::error::ParseError;
use crate::combat_log::types::{CastAction, Spell, Unit};

pub const CAST_PREFIX: &str = "CAST:";

static CAST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?) (casts|begins to cast|channels|fails casting) (.+?\(\d+\)(?:\(Rank \d+\))?)(?: on (.+))?\.$")
        .expect("valid cast regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastRecord {
    pub caster: Unit,
    pub action: CastAction,
    pub spell: Spell,
    pub target: Option<Unit>,
}

impl CastRecord {
    pub fn is_cast(content: &str) -> bool {
        strip_record_prefix(CAST_PREFIX, content).is_some()
    }

    pub fn parse(content: &str) -> Result<CastRecord, ParseError> {
        let invalid = |detail: String| ParseError::InvalidRecord { kind: "CAST", detail };

        let payload = strip_record_prefix(CAST_PREFIX, content)
            .ok_or_else(|| invalid(format!("not a cast record: {content}")))?;
        let caps = CAST_RE
            .captures(payload)
            .ok_or_else(|| invalid(format!("unrecognised cast: {payload}")))?;

        let caster = Unit::parse(&caps[1])?;
        let action = CastAction::from_phrase(&caps[2]).ok_or_else(|| invalid(format!("unknown action {}", &caps[2])))?;
        let spell = Spell::parse(&caps[3])?;
        let target = caps.get(4).map(|m| Unit::parse(m.as_str())).transpose()?;

        Ok(CastRecord {
            caster,
            action,
            spell,
            target,
        })
    }

    /// Caster and (if any) target are identified by guid, i.e. the line came from the raw log.
    pub fn has_guids(&self) -> bool {
        !self.caster.guid.is_zero() && self.target.as_ref().is_none_or(|t| !t.guid.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::guid::Guid;

    #[test]
    fn test_fails_casting() {
        let c = CastRecord::parse("CAST: Chotuk fails casting Firebolt(7800)(Rank 3).").unwrap();
        assert_eq!(c.caster, Unit::new("Chotuk", Guid::ZERO));
        assert_eq!(c.action, CastAction::FailsCasting);
        assert_eq!(c.spell.name, "Firebolt");
        assert_eq!(c.spell.id, 7800);
        assert_eq!(c.spell.rank, Some(3));
        assert!(c.target.is_none());
        assert!(!c.has_guids());
    }

    #[test]
    fn test_spell_name_with_colon() {
        let c = CastRecord::parse("CAST: Gretti casts Teleport: Undercity(3563).").unwrap();
        assert_eq!(c.action, CastAction::Casts);
        assert_eq!(c.spell.name, "Teleport: Undercity");
        assert_eq!(c.spell.rank, None);
    }

    #[test]
    fn test_actions_with_target() {
        let c = CastRecord::parse("CAST: Maldrissa begins to cast Immolate(1094)(Rank 3) on Gray Bear.").unwrap();
        assert_eq!(c.action, CastAction::BeginsToCast);
        assert_eq!(c.target, Some(Unit::new("Gray Bear", Guid::ZERO)));

        let c = CastRecord::parse("CAST: Maldrissa channels Drain Life(689)(Rank 1) on Gray Bear.").unwrap();
        assert_eq!(c.action, CastAction::Channels);
        assert_eq!(c.spell.name, "Drain Life");
        assert_eq!(c.spell.rank, Some(1));
    }

    #[test]
    fn test_raw_cast_with_guids() {
        let c = CastRecord::parse(
            "CAST: 0xF140084493000090(Chotuk) begins to cast Firebolt(7800)(Rank 3) on 0xF13000092F003EDD(Gray Bear).",
        )
        .unwrap();
        assert_eq!(c.caster, Unit::new("Chotuk", Guid(0xF140084493000090)));
        assert_eq!(c.target, Some(Unit::new("Gray Bear", Guid(0xF13000092F003EDD))));
        assert!(c.has_guids());
    }

    #[test]
    fn test_raw_cast_without_target_has_guids() {
        let c = CastRecord::parse("CAST: 0x000000000001C7AC(Doyd) casts Stealth(1787)(Rank 3).").unwrap();
        assert!(c.has_guids());
    }

    #[test]
    fn test_rejects_non_cast() {
        assert!(CastRecord::parse("Doyd casts Stealth(1787).").is_err());
        assert!(CastRecord::parse("CAST: Doyd casts Stealth.").is_err());
        assert!(!CastRecord::is_cast("COMBATANT_INFO: x"));
    }
}
