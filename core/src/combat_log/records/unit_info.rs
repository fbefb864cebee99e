//! `UNIT_INFO:` records: `time&guid&isPlayer&name&canCooperate&owner`

use chrono::NaiveDateTime;

use super::{parse_addon_time, parse_flag, strip_record_prefix};
use crate::combat_log::error::ParseError;
use crate::combat_log::guid::Guid;

pub const UNIT_INFO_PREFIX: &str = "UNIT_INFO:";

const KIND: &str = "UNIT_INFO";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitInfoRecord {
    pub seen: NaiveDateTime,
    pub guid: Guid,
    pub is_player: bool,
    pub name: String,
    pub can_cooperate: bool,
    pub owner: Option<Guid>,
}

impl UnitInfoRecord {
    pub fn is_unit_info(content: &str) -> bool {
        strip_record_prefix(UNIT_INFO_PREFIX, content).is_some()
    }

    pub fn parse(content: &str) -> Result<UnitInfoRecord, ParseError> {
        let payload = strip_record_prefix(UNIT_INFO_PREFIX, content).ok_or_else(|| ParseError::InvalidRecord {
            kind: KIND,
            detail: format!("not a unit info record: {content}"),
        })?;

        let fields: Vec<&str> = payload.split('&').collect();
        let [seen, guid, is_player, name, can_cooperate, owner, ..] = fields.as_slice() else {
            return Err(ParseError::InvalidRecord {
                kind: KIND,
                detail: format!("insufficient arguments, got {}, want at least 6", fields.len()),
            });
        };

        let owner = match *owner {
            "" | "nil" => None,
            value => Some(Guid::parse(value)?),
        };

        Ok(UnitInfoRecord {
            seen: parse_addon_time(KIND, seen)?,
            guid: Guid::parse(guid)?,
            is_player: parse_flag(KIND, is_player)?,
            name: name.to_string(),
            can_cooperate: parse_flag(KIND, can_cooperate)?,
            owner,
        })
    }

    /// The add-on only flags the recording player itself.
    pub fn is_me(&self) -> bool {
        self.is_player
    }
}
