use super::*;
use crate::merge::middleware::only_raw_casts;

const FORMATTED_LOG: &str = "11/18 07:20:42.699  COMBATANT_GUID: 18.11.25 07:20:42&Maldrissa&0x00000000000EB167
11/18 07:20:42.699  COMBATANT_INFO: 18.11.25 07:20:42&Maldrissa&WARLOCK&Orc&3&Chotuk&Exalted with Doordash&Uber Eats&5&nil&nil&nil&nil&6266:0:96:0&nil&6568:0:237:0&4915:0:0:0&nil&nil&nil&nil&nil&nil&4695:0:0:0&4925:0:0:0&nil&11287:0:0:0&5976:0:0:0&0000000000000000000}000000000000000000}0505001100000000
11/18 07:20:42.731  CAST: Unknown casts LOGINEFFECT(836) on Unknown.
11/18 07:20:42.747  ZONE_INFO: 18.11.25 07:20:42&hillsbrad foothills&0
11/18 07:20:42.920  CAST: Unknown casts Blood Pact(7804)(Rank 2) on Unknown.
11/18 07:20:42.926  ZONE_INFO: 18.11.25 07:20:42&hillsbrad foothills&0
11/18 07:20:43.703  CAST: Mooshuggah casts Skinning(8618) on Gray Bear.
11/18 07:20:46.282  CAST: Mooshuggah casts Flame Shock(8052)(Rank 2) on Gray Bear.
11/18 07:20:49.561  CAST: Mooshuggah casts Lightning Strike(51387)(Rank 1) on Gray Bear.
11/18 07:20:49.561  CAST: Mooshuggah casts Flurry(16257)(Rank 1) on Mooshuggah.
11/18 07:20:51.658  CAST: Mooshuggah casts Flurry(16257)(Rank 1) on Mooshuggah.
11/18 07:20:56.842  CAST: Mooshuggah begins to cast Skinning(8618) on Gray Bear.
11/18 07:20:59.162  CAST: Irontooth begins to cast Hearthstone(8690).
11/18 07:20:59.674  CAST: Mooshuggah casts Skinning(8618) on Gray Bear.
11/18 07:21:00.810  CAST: Mooshuggah begins to cast Lesser Healing Wave(8004)(Rank 1) on Mooshuggah.
11/18 07:21:02.156  CAST: Mooshuggah casts Lesser Healing Wave(8004)(Rank 1) on Mooshuggah.";

const RAW_LOG: &str = "11/18 07:20:42.731  CAST: 0x00000000000EB167(Unknown) casts LOGINEFFECT(836) on 0x00000000000EB167(Unknown).
11/18 07:20:42.920  CAST: 0xF1400844930090A2(Unknown) casts Blood Pact(7804)(Rank 2) on 0xF1400844930090A2(Unknown).
11/18 07:20:43.703  CAST: 0x00000000000E8AB6(Mooshuggah) casts Skinning(8618) on 0xF13000092F003EE0(Gray Bear).
11/18 07:20:46.282  CAST: 0x00000000000E8AB6(Mooshuggah) casts Flame Shock(8052)(Rank 2) on 0xF13000092F00408E(Gray Bear).
11/18 07:20:49.561  CAST: 0x00000000000E8AB6(Mooshuggah) casts Lightning Strike(51387)(Rank 1) on 0xF13000092F00408E(Gray Bear).
11/18 07:20:49.561  CAST: 0x00000000000E8AB6(Mooshuggah) casts Flurry(16257)(Rank 1) on 0x00000000000E8AB6(Mooshuggah).
11/18 07:20:51.658  CAST: 0x00000000000E8AB6(Mooshuggah) casts Flurry(16257)(Rank 1) on 0x00000000000E8AB6(Mooshuggah).
11/18 07:20:56.842  CAST: 0x00000000000E8AB6(Mooshuggah) begins to cast Skinning(8618) on 0xF13000092F00408E(Gray Bear).
11/18 07:20:59.162  CAST: 0x00000000000F5F4B(Irontooth) begins to cast Hearthstone(8690).
11/18 07:20:59.674  CAST: 0x00000000000E8AB6(Mooshuggah) casts Skinning(8618) on 0xF13000092F00408E(Gray Bear).
11/18 07:21:00.810  CAST: 0x00000000000E8AB6(Mooshuggah) begins to cast Lesser Healing Wave(8004)(Rank 1) on 0x00000000000E8AB6(Mooshuggah).
11/18 07:21:02.156  CAST: 0x00000000000E8AB6(Mooshuggah) casts Lesser Healing Wave(8004)(Rank 1) on 0x00000000000E8AB6(Mooshuggah).";

fn lines(s: &str) -> std::vec::IntoIter<io::Result<String>> {
    s.lines().map(|l| Ok(l.to_string())).collect::<Vec<_>>().into_iter()
}

fn merger(a: &str, b: &str) -> Merger {
    Merger::new(lines(a), lines(b)).with_decoder(LineDecoder::with_year(2025))
}

fn collect(m: &mut Merger) -> Vec<MergedLine> {
    let mut out = Vec::new();
    while let Some(line) = m.next_line().unwrap() {
        out.push(line);
    }
    out
}

#[test]
fn test_merge_is_ordered_and_complete() {
    let mut m = merger(FORMATTED_LOG, RAW_LOG);
    let merged = collect(&mut m);

    assert_eq!(merged.len(), 16 + 12);
    assert!(merged.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert!(m.failed_lines().is_empty());
    assert_eq!(m.year(), Some(2025));
}

#[test]
fn test_ties_prefer_first_source() {
    let mut m = merger(FORMATTED_LOG, RAW_LOG);
    let merged = collect(&mut m);

    // 07:20:42.731 appears in both logs
    let tied: Vec<&str> = merged
        .iter()
        .filter(|l| l.timestamp.format("%H:%M:%S%.3f").to_string() == "07:20:42.731")
        .map(|l| l.content.as_str())
        .collect();
    assert_eq!(
        tied,
        vec![
            "CAST: Unknown casts LOGINEFFECT(836) on Unknown.",
            "CAST: 0x00000000000EB167(Unknown) casts LOGINEFFECT(836) on 0x00000000000EB167(Unknown).",
        ]
    );
}

#[test]
fn test_only_raw_casts_drops_formatted_duplicates() {
    let mut m = merger(FORMATTED_LOG, RAW_LOG).with_middleware(only_raw_casts);
    let merged = collect(&mut m);

    assert_eq!(merged.len(), 4 + 12);
    for line in merged.iter().filter(|l| l.content.starts_with("CAST:")) {
        assert!(line.content.starts_with("CAST: 0x"), "{}", line.content);
    }
}

#[test]
fn test_one_source_exhausted_drains_other() {
    let a = "11/18 07:20:42.699  a1";
    let b = "11/18 07:20:40.000  b1\n11/18 07:20:50.000  b2\n11/18 07:21:00.000  b3";
    let mut m = merger(a, b);
    let contents: Vec<String> = collect(&mut m).into_iter().map(|l| l.content).collect();
    assert_eq!(contents, vec!["b1", "a1", "b2", "b3"]);
}

#[test]
fn test_malformed_lines_are_recorded_and_skipped() {
    let a = "11/18 07:20:42.699  a1\nnot a log line\n11/18 07:20:43.000  a2";
    let b = "garbage\n11/18 07:20:42.800  b1";
    let mut m = merger(a, b);
    let contents: Vec<String> = collect(&mut m).into_iter().map(|l| l.content).collect();

    assert_eq!(contents, vec!["a1", "b1", "a2"]);
    let failed = m.failed_lines();
    assert_eq!(failed.len(), 2);
    assert!(failed.iter().any(|f| f.source_id == SourceId::A && f.line == "not a log line"));
    assert!(failed.iter().any(|f| f.source_id == SourceId::B && f.line == "garbage"));
}

#[test]
fn test_empty_sources() {
    let mut m = merger("", "");
    assert_eq!(m.next_line().unwrap(), None);
    assert_eq!(m.next_line().unwrap(), None);
}

#[test]
fn test_cancelled_merge_stops() {
    let m = merger(FORMATTED_LOG, RAW_LOG);
    let token = m.cancel_token();
    let mut m = m;
    assert!(m.next_line().unwrap().is_some());

    token.cancel();
    assert!(matches!(m.next_line(), Err(MergeError::Cancelled)));
}

#[test]
fn test_read_error_is_fatal() {
    let failing = vec![
        Ok("11/18 07:20:42.699  a1".to_string()),
        Err(io::Error::other("disk gone")),
    ]
    .into_iter();
    let mut m = Merger::new(failing, std::iter::empty()).with_decoder(LineDecoder::with_year(2025));
    assert!(matches!(
        m.next_line(),
        Err(MergeError::Read {
            source_id: SourceId::A,
            ..
        })
    ));
}

#[test]
fn test_merge_logs_writes_formatted_lines() {
    let mut out = Vec::new();
    let written = merger(FORMATTED_LOG, RAW_LOG).write_to(&mut out).unwrap();
    assert_eq!(written, 28);

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 28);
    assert!(text.starts_with("11/18 07:20:42.699  COMBATANT_GUID:"));

    // re-feeding the output as a single source yields the same lines
    let mut again = Merger::single(lines(&text)).with_decoder(LineDecoder::with_year(2025));
    assert_eq!(collect(&mut again).len(), 28);
}

#[test]
fn test_merge_logs_free_function() {
    let mut out = Vec::new();
    let written = merge_logs(lines("11/18 07:20:42.699  a"), lines("11/18 07:20:41.000  b"), &mut out).unwrap();
    assert_eq!(written, 2);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().next(), Some("11/18 07:20:41.000  b"));
}
