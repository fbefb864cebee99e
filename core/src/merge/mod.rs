//! Online interleave of two individually time ordered logs
//!
//! The add-on's formatted log and the client's raw log are written side by
//! side. [`Merger`] holds one decoded line per source and always emits the
//! earlier one, so both inputs must already be sorted. Lines the
//! [`LineDecoder`] rejects are recorded and skipped.

pub mod middleware;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::combat_log::{LineDecoder, LineSource, ParseError, ReaderError};

/// Filter applied to a line after it was picked. `false` drops the line.
pub type Middleware = fn(NaiveDateTime, &str) -> bool;

type RawLines = Box<dyn Iterator<Item = io::Result<String>>>;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("failed to read log source {source_id}")]
    Read {
        source_id: SourceId,
        #[source]
        source: io::Error,
    },

    #[error("failed to write merged line")]
    Write {
        #[source]
        source: io::Error,
    },

    #[error("merge cancelled")]
    Cancelled,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cancellation
// ─────────────────────────────────────────────────────────────────────────────

/// Cooperative cancellation flag, polled once per decoded line.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lines
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceId {
    A,
    B,
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceId::A => f.write_str("A"),
            SourceId::B => f.write_str("B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedLine {
    pub timestamp: NaiveDateTime,
    pub content: String,
}

impl MergedLine {
    pub fn format(&self) -> String {
        LineDecoder::format_line(&self.timestamp, &self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLine {
    pub source_id: SourceId,
    pub line: String,
    pub error: ParseError,
}

/// Pull based stream of decoded lines.
pub trait LineStream {
    fn next_line(&mut self) -> Result<Option<MergedLine>, MergeError>;
}

struct Source {
    id: SourceId,
    lines: RawLines,
    pending: Option<MergedLine>,
}

impl Source {
    fn new(id: SourceId, lines: RawLines) -> Self {
        Self {
            id,
            lines,
            pending: None,
        }
    }

    // Decode raw lines until one is accepted or the source runs dry.
    fn refill(
        &mut self,
        decoder: &mut LineDecoder,
        cancel: &CancelToken,
        failed: &mut Vec<FailedLine>,
    ) -> Result<(), MergeError> {
        self.pending = None;
        loop {
            if cancel.is_cancelled() {
                return Err(MergeError::Cancelled);
            }

            let Some(raw) = self.lines.next() else {
                return Ok(());
            };
            let raw = raw.map_err(|source| MergeError::Read {
                source_id: self.id,
                source,
            })?;

            match decoder.decode(&raw) {
                Ok((timestamp, content)) => {
                    self.pending = Some(MergedLine {
                        timestamp,
                        content: content.to_string(),
                    });
                    return Ok(());
                }
                Err(error) => {
                    tracing::warn!(source = %self.id, line = %raw, error = %error, "Skipping undecodable line");
                    failed.push(FailedLine {
                        source_id: self.id,
                        line: raw,
                        error,
                    });
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Merger
// ─────────────────────────────────────────────────────────────────────────────

pub struct Merger {
    a: Source,
    b: Source,
    decoder: LineDecoder,
    middleware: Vec<Middleware>,
    cancel: CancelToken,
    failed: Vec<FailedLine>,
    primed: bool,
}

impl Merger {
    pub fn new<A, B>(a: A, b: B) -> Self
    where
        A: Iterator<Item = io::Result<String>> + 'static,
        B: Iterator<Item = io::Result<String>> + 'static,
    {
        Self {
            a: Source::new(SourceId::A, Box::new(a)),
            b: Source::new(SourceId::B, Box::new(b)),
            decoder: LineDecoder::new(),
            middleware: Vec::new(),
            cancel: CancelToken::new(),
            failed: Vec::new(),
            primed: false,
        }
    }

    /// A single, already merged log.
    pub fn single<A>(a: A) -> Self
    where
        A: Iterator<Item = io::Result<String>> + 'static,
    {
        Self::new(a, std::iter::empty())
    }

    /// Merge two log files, `a` being the formatted add-on log and `b` the raw client log.
    pub fn open(a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let a: LineSource<BufReader<File>> = LineSource::open(a)?;
        let b: LineSource<BufReader<File>> = LineSource::open(b)?;
        Ok(Self::new(a, b))
    }

    pub fn with_decoder(mut self, decoder: LineDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_middleware(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Year picked by the decoder, once the first line was decoded.
    pub fn year(&self) -> Option<i32> {
        self.decoder.year()
    }

    /// Every raw line the decoder rejected so far.
    pub fn failed_lines(&self) -> &[FailedLine] {
        &self.failed
    }

    fn prime(&mut self) -> Result<(), MergeError> {
        if self.primed {
            return Ok(());
        }
        self.primed = true;
        self.a.refill(&mut self.decoder, &self.cancel, &mut self.failed)?;
        self.b.refill(&mut self.decoder, &self.cancel, &mut self.failed)
    }

    fn take_earliest(&mut self) -> Result<Option<MergedLine>, MergeError> {
        let pick = match (&self.a.pending, &self.b.pending) {
            (None, None) => return Ok(None),
            (Some(_), None) => SourceId::A,
            (None, Some(_)) => SourceId::B,
            // ties go to A
            (Some(a), Some(b)) if a.timestamp <= b.timestamp => SourceId::A,
            (Some(_), Some(_)) => SourceId::B,
        };
        let source = match pick {
            SourceId::A => &mut self.a,
            SourceId::B => &mut self.b,
        };

        let line = source.pending.take();
        source.refill(&mut self.decoder, &self.cancel, &mut self.failed)?;
        Ok(line)
    }

    /// Write the whole merge to `writer`, one formatted line each. Returns lines written.
    pub fn write_to<W: Write>(&mut self, mut writer: W) -> Result<u64, MergeError> {
        let mut written = 0;
        while let Some(line) = self.next_line()? {
            let mut serialized = line.format();
            serialized.push('\n');
            writer
                .write_all(serialized.as_bytes())
                .map_err(|source| MergeError::Write { source })?;
            written += 1;
        }
        writer.flush().map_err(|source| MergeError::Write { source })?;
        Ok(written)
    }
}

impl LineStream for Merger {
    fn next_line(&mut self) -> Result<Option<MergedLine>, MergeError> {
        self.prime()?;
        loop {
            let Some(line) = self.take_earliest()? else {
                return Ok(None);
            };
            if self.middleware.iter().all(|mw| mw(line.timestamp, &line.content)) {
                return Ok(Some(line));
            }
        }
    }
}

impl Iterator for Merger {
    type Item = Result<MergedLine, MergeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

/// Merge `a` and `b` into `writer`.
pub fn merge_logs<A, B, W>(a: A, b: B, writer: W) -> Result<u64, MergeError>
where
    A: Iterator<Item = io::Result<String>> + 'static,
    B: Iterator<Item = io::Result<String>> + 'static,
    W: Write,
{
    Merger::new(a, b).write_to(writer)
}

#[cfg(test)]
mod tests;
