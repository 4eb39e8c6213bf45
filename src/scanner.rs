//! Block comment stripping scanner
//!
//! Removes `/* ... */` comments from script text in a single forward pass.
//! Comments nest: every `/*` inside an open comment must be matched by its
//! own `*/` before the outer comment closes. Everything else, including
//! `--` line comments and quoted literals, is passed through untouched.

use std::io;
use crate::stream::{CharStream, StrStream};
use crate::{Error, Result};

const SLASH: char = '/';
const STAR: char = '*';

/// Single-use scanner bound to one character stream
pub struct CommentStrippingScanner<S> {
    stream: S,
    in_comment: bool,
    depth: u32,
    chars_read: usize,
}

impl<S: CharStream> CommentStrippingScanner<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            in_comment: false,
            depth: 0,
            chars_read: 0,
        }
    }

    fn strip(&mut self) -> std::result::Result<String, S::Error> {
        let mut out = String::new();

        while let Some(current) = self.read()? {
            if self.in_comment && current == STAR && self.next_is(SLASH)? {
                self.depth -= 1;
                self.read()?;
                if self.depth == 0 {
                    self.in_comment = false;
                }
            } else if current == SLASH && self.next_is(STAR)? {
                self.in_comment = true;
                self.depth += 1;
                self.read()?;
            } else if !self.in_comment {
                out.push(current);
            }
            debug_assert_eq!(self.in_comment, self.depth > 0, "comment flag out of step with depth");
        }

        if self.in_comment {
            tracing::warn!(depth = self.depth, "input ended inside an unterminated block comment");
        }
        tracing::debug!(chars_read = self.chars_read, chars_kept = out.chars().count(), "comment scan complete");

        Ok(out)
    }

    fn read(&mut self) -> std::result::Result<Option<char>, S::Error> {
        let c = self.stream.read_char()?;
        if c.is_some() {
            self.chars_read += 1;
        }
        Ok(c)
    }

    fn next_is(&mut self, expected: char) -> std::result::Result<bool, S::Error> {
        Ok(self.stream.peek_char()? == Some(expected))
    }
}

impl<S: CharStream<Error = io::Error>> CommentStrippingScanner<S> {
    /// Scan the whole stream and return the text with block comments removed.
    ///
    /// An unterminated comment is not an error; its content is dropped.
    /// A read failure aborts the scan and nothing is returned.
    pub fn read_to_end(mut self) -> Result<String> {
        self.strip().map_err(Error::StreamRead)
    }
}

/// Strip block comments from an in-memory string
pub fn strip_comments(input: &str) -> String {
    match CommentStrippingScanner::new(StrStream::new(input)).strip() {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// Scan any fallible stream, convenience over `CommentStrippingScanner`
pub fn scan(stream: impl CharStream<Error = io::Error>) -> Result<String> {
    CommentStrippingScanner::new(stream).read_to_end()
}
