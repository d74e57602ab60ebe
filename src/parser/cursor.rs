//! Line streams with look-ahead and rewind
//!
//! Block and array-body boundaries are only known after reading one line
//! too many, so every reader marks its position before peeking and resets
//! to the mark when the line belongs to someone else.

use crate::error::Result;
use std::io::{BufRead, Seek, SeekFrom};

/// Saved stream position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    offset: u64,
    line: usize,
}

/// A line-oriented stream that can rewind to a previous [`Mark`]
pub trait LineSource {
    /// Next line without its terminator, `None` at end of input
    fn next_line(&mut self) -> Result<Option<String>>;

    fn mark(&mut self) -> Result<Mark>;

    fn reset(&mut self, mark: Mark) -> Result<()>;

    /// 1-based number of the line last returned
    fn line_number(&self) -> usize;
}

/// In-memory line stream over a string
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 0,
        }
    }

    /// Unread remainder
    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }
}

impl LineSource for LineCursor<'_> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let rest = self.remaining();
        if rest.is_empty() {
            return Ok(None);
        }
        let (line, consumed) = match rest.find('\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        self.line += 1;
        Ok(Some(line.trim_end_matches('\r').to_string()))
    }

    fn mark(&mut self) -> Result<Mark> {
        Ok(Mark {
            offset: self.pos as u64,
            line: self.line,
        })
    }

    fn reset(&mut self, mark: Mark) -> Result<()> {
        self.pos = mark.offset as usize;
        self.line = mark.line;
        Ok(())
    }

    fn line_number(&self) -> usize {
        self.line
    }
}

/// Line stream over any seekable buffered reader, e.g. `BufReader<File>`
#[derive(Debug)]
pub struct SeekLines<R> {
    inner: R,
    line: usize,
}

impl<R: BufRead + Seek> SeekLines<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, line: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead + Seek> LineSource for SeekLines<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    fn mark(&mut self) -> Result<Mark> {
        Ok(Mark {
            offset: self.inner.stream_position()?,
            line: self.line,
        })
    }

    fn reset(&mut self, mark: Mark) -> Result<()> {
        self.inner.seek(SeekFrom::Start(mark.offset))?;
        self.line = mark.line;
        Ok(())
    }

    fn line_number(&self) -> usize {
        self.line
    }
}
