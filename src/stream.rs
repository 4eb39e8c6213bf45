//! Forward-only character streams with one character of lookahead

use encoding_rs::{Decoder, DecoderResult, Encoding};
use std::convert::Infallible;
use std::io::{self, BufRead, BufReader, Read};
use std::iter::Peekable;
use std::str::Chars;

/// A read-once character cursor.
///
/// `peek_char` never advances the stream; calling it repeatedly returns the
/// same character until `read_char` consumes it.
pub trait CharStream {
    type Error;

    /// Consume and return the next character, `None` at end of input
    fn read_char(&mut self) -> Result<Option<char>, Self::Error>;

    /// Look at the next character without consuming it
    fn peek_char(&mut self) -> Result<Option<char>, Self::Error>;
}

impl<S: CharStream + ?Sized> CharStream for &mut S {
    type Error = S::Error;

    fn read_char(&mut self) -> Result<Option<char>, Self::Error> {
        (**self).read_char()
    }

    fn peek_char(&mut self) -> Result<Option<char>, Self::Error> {
        (**self).peek_char()
    }
}

/// Stream over an in-memory string. Never fails.
#[derive(Debug, Clone)]
pub struct StrStream<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> StrStream<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }
}

impl CharStream for StrStream<'_> {
    type Error = Infallible;

    fn read_char(&mut self) -> Result<Option<char>, Infallible> {
        Ok(self.chars.next())
    }

    fn peek_char(&mut self) -> Result<Option<char>, Infallible> {
        Ok(self.chars.peek().copied())
    }
}

/// Decodes bytes from any reader into characters with `encoding_rs`.
///
/// Malformed input is reported as `io::ErrorKind::InvalidData` rather than
/// replaced, so a mis-labelled script fails instead of being silently
/// rewritten.
pub struct DecodingReader<R> {
    inner: BufReader<R>,
    decoder: Decoder,
    decoded: String,
    pos: usize,
    finished: bool,
    malformed: bool,
}

impl<R: Read> DecodingReader<R> {
    /// Sniff a UTF-8 or UTF-16 BOM, falling back to `encoding`. The BOM is
    /// not part of the decoded text.
    pub fn new(reader: R, encoding: &'static Encoding) -> Self {
        Self::with_decoder(reader, encoding.new_decoder())
    }

    /// Decode strictly as `encoding`; a BOM is kept as U+FEFF
    pub fn without_bom_handling(reader: R, encoding: &'static Encoding) -> Self {
        Self::with_decoder(reader, encoding.new_decoder_without_bom_handling())
    }

    pub fn utf8(reader: R) -> Self {
        Self::new(reader, encoding_rs::UTF_8)
    }

    fn with_decoder(reader: R, decoder: Decoder) -> Self {
        Self {
            inner: BufReader::new(reader),
            decoder,
            decoded: String::new(),
            pos: 0,
            finished: false,
            malformed: false,
        }
    }

    /// The encoding in use, after any BOM sniffing so far
    pub fn encoding(&self) -> &'static Encoding {
        self.decoder.encoding()
    }

    /// Make sure a decoded character is buffered unless input is exhausted.
    /// A malformed sequence is reported once everything decoded before it
    /// has been handed out.
    fn fill(&mut self) -> io::Result<()> {
        while self.pos == self.decoded.len() {
            if self.malformed {
                return Err(invalid_data(format!(
                    "malformed {} sequence",
                    self.decoder.encoding().name()
                )));
            }
            if self.finished {
                break;
            }
            self.decoded.clear();
            self.pos = 0;

            let chunk = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let last = chunk.is_empty();

            let needed = self
                .decoder
                .max_utf8_buffer_length_without_replacement(chunk.len())
                .ok_or_else(|| invalid_data("decoded chunk length overflows".to_string()))?;
            self.decoded.reserve(needed);

            let (result, read) = self
                .decoder
                .decode_to_string_without_replacement(chunk, &mut self.decoded, last);
            self.inner.consume(read);

            match result {
                DecoderResult::InputEmpty => self.finished = last,
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(_, _) => self.malformed = true,
            }
        }
        Ok(())
    }
}

impl<R: Read> CharStream for DecodingReader<R> {
    type Error = io::Error;

    fn read_char(&mut self) -> io::Result<Option<char>> {
        self.fill()?;
        let c = self.decoded[self.pos..].chars().next();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        Ok(c)
    }

    fn peek_char(&mut self) -> io::Result<Option<char>> {
        self.fill()?;
        Ok(self.decoded[self.pos..].chars().next())
    }
}

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}
