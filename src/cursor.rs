use crate::error::{IffError, IffErrorType};

use std::iter::Fuse;

/// Pull stream over physical lines with a single line of lookahead.
///
/// Once the source has run dry it is never polled again.
pub struct LineCursor<I> {
    lines: Fuse<I>,
    buffered: Option<String>,
    consumed: u64,
}

impl<I: Iterator<Item = String>> LineCursor<I> {
    pub fn new(lines: I) -> Self {
        Self {
            lines: lines.fuse(),
            buffered: None,
            consumed: 0,
        }
    }

    /// 1-based number of the line most recently returned by `next_line`.
    pub fn line_number(&self) -> u64 {
        self.consumed
    }

    pub fn next_line(&mut self) -> Result<String, IffError> {
        let line = match self.buffered.take() {
            Some(x) => x,
            None => match self.lines.next() {
                Some(x) => x,
                None => return Err(IffError::new(IffErrorType::EndOfInput, self.consumed + 1, 0)),
            },
        };
        self.consumed += 1;
        Ok(line)
    }

    /// Returns the next line without consuming it; `None` once the source is exhausted.
    pub fn peek(&mut self) -> Option<&str> {
        if self.buffered.is_none() {
            self.buffered = self.lines.next();
        }
        self.buffered.as_deref()
    }

    /// Leading marker character of the next line, if there is one.
    pub fn peek_marker(&mut self) -> Option<char> {
        self.peek().and_then(|line| line.chars().next())
    }
}
