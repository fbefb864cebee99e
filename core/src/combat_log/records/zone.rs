//! `ZONE_INFO:` records: `time&name&instanceId`

use chrono::NaiveDateTime;

use super::{parse_addon_time, strip_record_prefix};
use crate::combat_log::error::ParseError;

pub const ZONE_PREFIX: &str = "ZONE_INFO:";

const KIND: &str = "ZONE_INFO";

#[derive(Debug, Clone)]
pub struct ZoneRecord {
    pub seen: NaiveDateTime,
    pub name: String,
    pub instance_id: u32,
}

/// Two sightings are the same zone when name and instance match, regardless of when.
impl PartialEq for ZoneRecord {
    fn eq(&self, other: &Self) -> bool {
        self.instance_id == other.instance_id && self.name == other.name
    }
}

impl Eq for ZoneRecord {}

impl ZoneRecord {
    pub fn is_zone(content: &str) -> bool {
        strip_record_prefix(ZONE_PREFIX, content).is_some()
    }

    pub fn parse(content: &str) -> Result<ZoneRecord, ParseError> {
        let invalid = |detail: String| ParseError::InvalidRecord { kind: KIND, detail };

        let payload = strip_record_prefix(ZONE_PREFIX, content)
            .ok_or_else(|| invalid(format!("not a zone record: {content}")))?;

        let fields: Vec<&str> = payload.split('&').collect();
        let [seen, name, instance_id, ..] = fields.as_slice() else {
            return Err(invalid(format!(
                "insufficient arguments, got {}, want at least 3",
                fields.len()
            )));
        };

        Ok(ZoneRecord {
            seen: parse_addon_time(KIND, seen)?,
            name: name.to_string(),
            instance_id: instance_id
                .parse()
                .map_err(|e| invalid(format!("invalid instance id {instance_id:?}: {e}")))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zone() {
        let z = ZoneRecord::parse("ZONE_INFO: 20.11.25 21:55:12&Alterac Valley&30").unwrap();
        assert_eq!(z.name, "Alterac Valley");
        assert_eq!(z.instance_id, 30);
        assert_eq!(z.seen.to_string(), "2025-11-20 21:55:12");
    }

    #[test]
    fn test_zone_equality_ignores_time() {
        let a = ZoneRecord::parse("ZONE_INFO: 20.11.25 21:55:12&Alterac Valley&30").unwrap();
        let b = ZoneRecord::parse("ZONE_INFO: 20.11.25 22:10:00&Alterac Valley&30").unwrap();
        let c = ZoneRecord::parse("ZONE_INFO: 20.11.25 22:10:00&Alterac Valley&31").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rejects_bad_zone() {
        assert!(ZoneRecord::parse("ZONE_INFO: 20.11.25 21:55:12&Alterac Valley").is_err());
        assert!(ZoneRecord::parse("ZONE_INFO: 20.11.25 21:55:12&Alterac Valley&-1").is_err());
    }
}
