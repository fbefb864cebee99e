//! Line-at-a-time access to a log source
//!
//! Logs are mostly UTF-8, but older clients write Windows-1252 item and player
//! names. Lines that are not valid UTF-8 are decoded as Windows-1252.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;

use super::error::ReaderError;

pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
    lines_read: u64,
}

impl LineSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReaderError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
            lines_read: 0,
        }
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Next line without its terminator, `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.lines_read += 1;

        let mut end = self.buf.len();
        if self.buf[..end].ends_with(b"\n") {
            end -= 1;
        }
        if self.buf[..end].ends_with(b"\r") {
            end -= 1;
        }

        let bytes = &self.buf[..end];
        let line = match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => WINDOWS_1252.decode(bytes).0.into_owned(),
        };
        Ok(Some(line))
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

/// Read every line of `path` at once.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>, ReaderError> {
    let path: PathBuf = path.as_ref().to_path_buf();
    LineSource::open(&path)?
        .collect::<io::Result<Vec<_>>>()
        .map_err(|source| ReaderError::ReadFile { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_strips_line_endings() {
        let input = "a\r\nb\nc";
        let lines: Vec<String> = LineSource::new(Cursor::new(input))
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_keeps_empty_lines() {
        let mut source = LineSource::new(Cursor::new("a\n\nb\n"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(source.next_line().unwrap(), None);
        assert_eq!(source.lines_read(), 3);
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "Dûm" in Windows-1252
        let bytes: &[u8] = b"D\xfbm\n";
        let mut source = LineSource::new(Cursor::new(bytes));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("Dûm"));
    }

    #[test]
    fn test_read_lines_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "11/18 07:20:42.699  first").unwrap();
        writeln!(file, "11/18 07:20:43.703  second").unwrap();

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "11/18 07:20:43.703  second");
    }

    #[test]
    fn test_open_missing_file() {
        let err = LineSource::open("/definitely/not/here.txt").err().unwrap();
        assert!(matches!(err, ReaderError::OpenFile { .. }));
    }
}
