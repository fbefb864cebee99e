//! Stock merge filters

use chrono::NaiveDateTime;

use crate::combat_log::records::CastRecord;

/// Keep only `CAST:` lines carrying guids.
///
/// Both logs write every cast. The formatted copy names units only, the raw
/// copy adds guids, so the formatted duplicate is dropped. Casts that do not
/// parse are dropped as well, everything else passes.
pub fn only_raw_casts(_ts: NaiveDateTime, content: &str) -> bool {
    if !CastRecord::is_cast(content) {
        return true;
    }
    match CastRecord::parse(content) {
        Ok(cast) => cast.has_guids(),
        Err(error) => {
            tracing::debug!(%error, content, "Dropping unparseable cast");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> NaiveDateTime {
        NaiveDateTime::default()
    }

    #[test]
    fn test_keeps_non_cast_lines() {
        assert!(only_raw_casts(ts(), "ZONE_INFO: 18.11.25 07:20:42&hillsbrad foothills&0"));
        assert!(only_raw_casts(ts(), "Mooshuggah hits Gray Bear for 12."));
    }

    #[test]
    fn test_filters_casts_by_guid() {
        assert!(only_raw_casts(
            ts(),
            "CAST: 0x00000000000E8AB6(Mooshuggah) casts Skinning(8618) on 0xF13000092F003EE0(Gray Bear)."
        ));
        assert!(only_raw_casts(
            ts(),
            "CAST: 0x00000000000F5F4B(Irontooth) begins to cast Hearthstone(8690)."
        ));
        assert!(!only_raw_casts(ts(), "CAST: Mooshuggah casts Skinning(8618) on Gray Bear."));
        assert!(!only_raw_casts(ts(), "CAST: Irontooth begins to cast Hearthstone(8690)."));
        assert!(!only_raw_casts(ts(), "CAST: garbage"));
    }
}
