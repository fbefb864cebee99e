//! Merge, bootstrap, rewrite, parse and track in one pull loop

use std::path::Path;

use chrono::{Duration, NaiveDateTime};

use super::config::{AppConfig, AppConfigExt};
use super::error::SessionError;
use crate::bootstrap::{BootstrapError, ReplayStream, find_me_within};
use crate::combat_log::{LineSource, Message, Unit};
use crate::merge::{FailedLine, LineStream, Merger, middleware};
use crate::parser::EventParser;
use crate::preprocess::{PreprocessError, Preprocessor};
use crate::state::State;

pub struct ParsingSession<S> {
    stream: ReplayStream<S>,
    me: Unit,
    preprocessor: Option<Preprocessor>,
    parser: EventParser,
    state: State,
    lines_read: u64,
}

impl<S: LineStream> ParsingSession<S> {
    /// Identify the recording player, then get ready to parse from the first line.
    pub fn start(stream: S, config: &AppConfig) -> Result<Self, SessionError> {
        let bootstrap = find_me_within(stream, config.bootstrap_lookahead).map_err(|e| match e {
            BootstrapError::NotFound { lines_read } => SessionError::BootstrapNotFound { lines_read },
            BootstrapError::Merge(e) => e.into(),
        })?;

        let seen = bootstrap.stream.peek_timestamp().unwrap_or(NaiveDateTime::MIN);
        let state = State::new(bootstrap.me.clone(), seen)
            .with_recent_inactivity(Duration::milliseconds(config.recent_inactivity_ms));

        Ok(Self {
            preprocessor: config.preprocess.then(|| Preprocessor::new(bootstrap.me.guid)),
            me: bootstrap.me,
            stream: bootstrap.stream,
            parser: EventParser::new(),
            state,
            lines_read: 0,
        })
    }

    pub fn me(&self) -> &Unit {
        &self.me
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_state(self) -> State {
        self.state
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn stream(&self) -> &ReplayStream<S> {
        &self.stream
    }

    /// Parse the next line and feed its messages to the state.
    ///
    /// `Ok(None)` at end of stream. A [`SessionError::Line`] only concerns the
    /// line just read; the session can keep advancing.
    pub fn advance(&mut self) -> Result<Option<Vec<Message>>, SessionError> {
        let Some(line) = self.stream.next_line()? else {
            return Ok(None);
        };
        self.lines_read += 1;

        let content = match &self.preprocessor {
            Some(preprocessor) => preprocessor.process(&line.content).map_err(|e| match e {
                PreprocessError::MissingPlayerIdentity => SessionError::MissingPlayerIdentity,
            })?,
            None => line.content,
        };

        let content = content.trim();
        if content.is_empty() {
            return Ok(Some(vec![Message::skip(line.timestamp, "empty line")]));
        }

        let messages = self.parser.parse(line.timestamp, content).map_err(SessionError::Line)?;
        for msg in &messages {
            self.state.process(msg);
        }
        Ok(Some(messages))
    }
}

impl ParsingSession<Merger> {
    /// Session over one or two log files, honouring the merge settings of `config`.
    pub fn open(a: &Path, b: Option<&Path>, config: &AppConfig) -> Result<Self, SessionError> {
        let a = config.resolve_log_path(a);
        let mut merger = match b {
            Some(b) => Merger::open(a, config.resolve_log_path(b))?,
            None => Merger::single(LineSource::open(a)?),
        };
        if config.only_raw_casts {
            merger = merger.with_middleware(middleware::only_raw_casts);
        }
        Self::start(merger, config)
    }

    /// Raw lines the decoder rejected so far.
    pub fn failed_lines(&self) -> &[FailedLine] {
        self.stream.inner().failed_lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::{Guid, MessageKind};

    const ME_DOYD: &str = "11/18 07:21:00.000  COMBATANT_INFO: 18.11.24 07:21:00&Doyd&ROGUE&Scourge&2&nil&Exalted with Doordash&Friendly&4&8176:0:0:0&60300:0:0:0&9647:0:0:0&60058:0:0:0&83401:18:0:0&13118:0:0:0&60268:1843:0:0&9948:1843:612:0&16710:0:0:0&4107:17:0:0&9533:0:0:0&60835:0:0:0&60587:0:0:0&58073:0:0:0&6432:0:0:0&9684:0:0:0&61330:0:0:0&55474:0:0:0&5976:0:0:0&005103000000000000}055051000050122231}00000000000000000000&0x000000000001C7AC";

    fn merger(a: &[&str], b: &[&str]) -> Merger {
        let a: Vec<std::io::Result<String>> = a.iter().map(|l| Ok(l.to_string())).collect();
        let b: Vec<std::io::Result<String>> = b.iter().map(|l| Ok(l.to_string())).collect();
        Merger::new(a.into_iter(), b.into_iter())
    }

    fn drain(session: &mut ParsingSession<Merger>) -> (Vec<Message>, usize) {
        let mut messages = Vec::new();
        let mut line_errors = 0;
        loop {
            match session.advance() {
                Ok(Some(batch)) => messages.extend(batch),
                Ok(None) => break,
                Err(e) if !e.is_fatal() => line_errors += 1,
                Err(e) => panic!("fatal: {e}"),
            }
        }
        (messages, line_errors)
    }

    #[test]
    fn test_session_end_to_end() {
        let formatted = [
            "11/18 07:21:00.500  UNIT_INFO: 18.11.24 07:21:00&0xF13000092F003EE0&0&Gray Bear&0&nil",
            "11/18 07:21:01.000  You hit 0xF13000092F003EE0 for 27.",
            "11/18 07:21:03.000  0xF13000092F003EE0 dies.",
        ];
        let raw = [
            ME_DOYD,
            "11/18 07:21:02.000  0xF13000092F003EE0 hits you for 12.",
            "11/18 07:21:02.500  You fail to cast Stealth: Can't do that while moving.",
        ];

        let mut session = ParsingSession::start(merger(&formatted, &raw), &AppConfig::default()).unwrap();
        assert_eq!(session.me().guid, Guid(0x1C7AC));

        let (messages, line_errors) = drain(&mut session);
        assert_eq!(line_errors, 0);
        assert_eq!(session.lines_read(), 6);
        assert!(matches!(messages[0].kind, MessageKind::Combatant(_)));
        assert!(
            messages
                .iter()
                .any(|m| matches!(&m.kind, MessageKind::Skip(reason) if reason == "empty line"))
        );

        let state = session.into_state();
        let fight = &state.fights().completed()[0];
        assert_eq!(fight.metrics().get(&Guid(0x1C7AC)).unwrap().damage_done, 27);
        assert_eq!(fight.metrics().get(&Guid(0x1C7AC)).unwrap().damage_taken, 12);
    }

    #[test]
    fn test_session_without_player() {
        let lines = ["11/18 07:21:01.000  0xF13000092F003EE0 hits 0x000000000001C7AC for 12."];
        let result = ParsingSession::start(merger(&lines, &[]), &AppConfig::default());
        match result {
            Err(e @ SessionError::BootstrapNotFound { lines_read: 1 }) => assert!(e.is_fatal()),
            other => panic!("unexpected: {:?}", other.err()),
        }
    }

    #[test]
    fn test_line_errors_are_not_fatal() {
        let lines = [
            ME_DOYD,
            "11/18 07:21:01.000  0x000000000001C7AC hits 0xF13000092F003EE0 for 99999999999.",
            "11/18 07:21:02.000  0x000000000001C7AC hits 0xF13000092F003EE0 for 27.",
        ];
        let mut session = ParsingSession::start(merger(&lines, &[]), &AppConfig::default()).unwrap();
        let (messages, line_errors) = drain(&mut session);
        assert_eq!(line_errors, 1);
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_whitespace_only_line_is_skipped() {
        let lines = [ME_DOYD, "11/18 07:21:01.000     ", "11/18 07:21:02.000  0xF13000092F003EE0 dies.   "];
        let mut session = ParsingSession::start(merger(&lines, &[]), &AppConfig::default()).unwrap();
        let (messages, line_errors) = drain(&mut session);
        assert_eq!(line_errors, 0);
        assert!(matches!(&messages[1].kind, MessageKind::Skip(reason) if reason == "empty line"));
        assert!(matches!(messages[2].kind, MessageKind::Slain(_)));
    }

    #[test]
    fn test_cancelled_session() {
        let lines = [ME_DOYD, "11/18 07:21:02.000  0x000000000001C7AC hits 0xF13000092F003EE0 for 27."];
        let merger = merger(&lines, &[]);
        let cancel = merger.cancel_token();
        let mut session = ParsingSession::start(merger, &AppConfig::default()).unwrap();

        cancel.cancel();
        // the bootstrap line is already buffered
        assert!(session.advance().unwrap().is_some());
        match session.advance() {
            Err(e @ SessionError::Cancelled) => assert!(e.is_fatal()),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
