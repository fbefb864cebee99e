//! Finding the recording player
//!
//! Second person lines ("You hit ...") can only be rewritten once we know who
//! "you" is. The add-on writes a snapshot of the player early in every log, so
//! the merged stream is scanned for it within a bounded lookahead. Every line
//! consumed on the way is buffered and replayed afterwards.

use std::collections::VecDeque;

use chronicle_types::DEFAULT_BOOTSTRAP_LOOKAHEAD;
use thiserror::Error;

use crate::combat_log::Unit;
use crate::combat_log::records::{CombatantRecord, UnitInfoRecord};
use crate::merge::{LineStream, MergeError, MergedLine};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("recording player not found within {lines_read} lines")]
    NotFound { lines_read: usize },

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Identified player plus the stream to continue reading from.
pub struct Bootstrap<S> {
    pub me: Unit,
    pub lines_read: usize,
    pub stream: ReplayStream<S>,
}

/// Replays buffered lines before reading from the inner stream again.
pub struct ReplayStream<S> {
    buffer: VecDeque<MergedLine>,
    inner: S,
}

impl<S> ReplayStream<S> {
    pub fn new(buffer: VecDeque<MergedLine>, inner: S) -> Self {
        Self { buffer, inner }
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Timestamp of the next buffered line.
    pub fn peek_timestamp(&self) -> Option<chrono::NaiveDateTime> {
        self.buffer.front().map(|line| line.timestamp)
    }
}

impl<S: LineStream> LineStream for ReplayStream<S> {
    fn next_line(&mut self) -> Result<Option<MergedLine>, MergeError> {
        match self.buffer.pop_front() {
            Some(line) => Ok(Some(line)),
            None => self.inner.next_line(),
        }
    }
}

/// The player a line identifies as the recorder, if any.
fn identify(content: &str) -> Option<Unit> {
    if CombatantRecord::is_combatant(content) {
        return match CombatantRecord::parse(content) {
            Ok(c) if c.is_me() => Some(Unit::new(c.name, c.guid)),
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(%error, content, "Skipping unreadable combatant record during bootstrap");
                None
            }
        };
    }

    if UnitInfoRecord::is_unit_info(content) {
        return match UnitInfoRecord::parse(content) {
            Ok(u) if u.is_me() => Some(Unit::new(u.name, u.guid)),
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(%error, content, "Skipping unreadable unit info record during bootstrap");
                None
            }
        };
    }

    None
}

/// Scan at most `lookahead` lines of `stream` for the recording player.
pub fn find_me_within<S: LineStream>(mut stream: S, lookahead: usize) -> Result<Bootstrap<S>, BootstrapError> {
    let mut buffer = VecDeque::new();

    while buffer.len() < lookahead {
        let Some(line) = stream.next_line()? else {
            break;
        };
        let me = identify(&line.content);
        buffer.push_back(line);

        if let Some(me) = me {
            let lines_read = buffer.len();
            tracing::info!(name = %me.name, guid = %me.guid, lines_read, "Found recording player");
            return Ok(Bootstrap {
                me,
                lines_read,
                stream: ReplayStream::new(buffer, stream),
            });
        }
    }

    Err(BootstrapError::NotFound {
        lines_read: buffer.len(),
    })
}

pub fn find_me<S: LineStream>(stream: S) -> Result<Bootstrap<S>, BootstrapError> {
    find_me_within(stream, DEFAULT_BOOTSTRAP_LOOKAHEAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::{Guid, LineDecoder};
    use crate::merge::Merger;

    const ME_DOYD: &str = "11/20 19:33:23.000  COMBATANT_INFO: 20.11.25 19:33:23&Doyd&ROGUE&Scourge&2&nil&Exalted with Doordash&Friendly&4&8176:0:0:0&60300:0:0:0&9647:0:0:0&60058:0:0:0&83401:18:0:0&13118:0:0:0&60268:1843:0:0&9948:1843:612:0&16710:0:0:0&4107:17:0:0&9533:0:0:0&60835:0:0:0&60587:0:0:0&58073:0:0:0&6432:0:0:0&9684:0:0:0&61330:0:0:0&55474:0:0:0&5976:0:0:0&005103000000000000}055051000050122231}00000000000000000000&0x000000000001C7AC";
    const OTHER: &str = "11/20 19:33:22.000  COMBATANT_INFO: 20.11.25 22:07:48&Aramarah&WARLOCK&Troll&3&nil&nil&nil&nil&55337:0:0:0&nil&1769:0:0:0&2575:0:0:0&6465:44:0:0&14373:0:0:0&15449:0:0:0&3065:0:0:0&15452:41:0:0&14162:0:761:0&12053:0:0:0&55317:0:0:0&55340:0:0:0&70033:0:0:0&70224:0:0:0&15444:0:0:0&nil&5243:0:0:0&nil&nil&0x00000000000EBF01";

    fn stream(lines: &[&str]) -> Merger {
        let owned: Vec<std::io::Result<String>> = lines.iter().map(|l| Ok(l.to_string())).collect();
        Merger::single(owned.into_iter()).with_decoder(LineDecoder::with_year(2025))
    }

    fn drain(mut s: impl LineStream) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = s.next_line().unwrap() {
            out.push(line.content);
        }
        out
    }

    #[test]
    fn test_finds_combatant_and_replays_lines() {
        let lines = [
            "11/20 19:33:20.000  ZONE_INFO: 20.11.25 19:33:20&Orgrimmar&0",
            OTHER,
            ME_DOYD,
            "11/20 19:33:24.000  0x000000000001C7AC hits 0xF13000092F003EE0 for 12.",
        ];
        let found = find_me(stream(&lines)).unwrap();
        assert_eq!(found.me, Unit::new("Doyd", Guid(0x1C7AC)));
        assert_eq!(found.lines_read, 3);
        assert_eq!(found.stream.buffered(), 3);

        let replayed = drain(found.stream);
        assert_eq!(replayed.len(), 4);
        assert!(replayed[0].starts_with("ZONE_INFO:"));
        assert_eq!(replayed[3], "0x000000000001C7AC hits 0xF13000092F003EE0 for 12.");
    }

    #[test]
    fn test_finds_unit_info() {
        let lines = [
            "11/20 19:33:20.000  UNIT_INFO: 20.11.25 19:33:20&0xF1300022D5000EA4&0&Quarry Slave&0&&",
            "11/20 19:33:21.000  UNIT_INFO: 20.11.25 19:33:21&0x000000000001C7AC&1&Doyd&1&nil",
        ];
        let found = find_me(stream(&lines)).unwrap();
        assert_eq!(found.me.guid, Guid(0x1C7AC));
        assert_eq!(found.me.name, "Doyd");
    }

    #[test]
    fn test_not_found_at_end_of_stream() {
        let lines = [OTHER, "11/20 19:33:24.000  Doyd hits Gray Bear for 12."];
        match find_me(stream(&lines)) {
            Err(BootstrapError::NotFound { lines_read }) => assert_eq!(lines_read, 2),
            _ => panic!("expected NotFound"),
        }
    }

    #[test]
    fn test_lookahead_is_bounded() {
        let filler = "11/20 19:33:20.000  Doyd hits Gray Bear for 12.";
        let mut lines = vec![filler; 5];
        lines.push(ME_DOYD);

        match find_me_within(stream(&lines), 5) {
            Err(BootstrapError::NotFound { lines_read }) => assert_eq!(lines_read, 5),
            _ => panic!("expected NotFound"),
        }
        assert!(find_me_within(stream(&lines), 6).is_ok());
    }

    #[test]
    fn test_bad_records_are_skipped() {
        let lines = [
            "11/20 19:33:20.000  COMBATANT_INFO: 20.11.25 19:33:20&Broken",
            "11/20 19:33:20.500  UNIT_INFO: nonsense",
            ME_DOYD,
        ];
        let found = find_me(stream(&lines)).unwrap();
        assert_eq!(found.lines_read, 3);
    }
}
