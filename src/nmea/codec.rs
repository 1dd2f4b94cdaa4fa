use bytes::Buf;
use bytes::BytesMut;

use std::cmp;
use std::fmt;
use std::io;

use tokio_util::codec::Decoder;

/// Splits receiver output into `\r\n`-delimited lines.
///
/// Delimiters are stripped and invalid UTF-8 is replaced rather than
/// dropped, so a noisy serial link cannot stall the reader. Lines
/// longer than `max_length` are discarded up to the next delimiter.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LineCodec {
    next_index: usize,
    max_length: usize,
    is_discarding: bool,
}

impl LineCodec {
    pub fn new() -> LineCodec {
        LineCodec {
            next_index: 0,
            max_length: 128,
            is_discarding: false,
        }
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, CodecError> {
        loop {
            let read_to = cmp::min(self.max_length + 1, buf.len());

            let newline_offset = buf[self.next_index..read_to]
                .iter()
                .position(|b| *b == b'\n');

            match (self.is_discarding, newline_offset) {
                (true, Some(offset)) => {
                    buf.advance(offset + self.next_index + 1);
                    self.is_discarding = false;
                    self.next_index = 0;
                }
                (true, None) => {
                    buf.advance(read_to);
                    self.next_index = 0;

                    if buf.is_empty() {
                        return Ok(None);
                    }
                }
                (false, Some(offset)) => {
                    let newline_index = offset + self.next_index;
                    self.next_index = 0;

                    let line = buf.split_to(newline_index + 1);
                    let line = strip_delimiter(&line);

                    return Ok(Some(String::from_utf8_lossy(line).into_owned()));
                }
                (false, None) if buf.len() > self.max_length => {
                    self.is_discarding = true;

                    return Err(CodecError::LineTooLong);
                }
                (false, None) => {
                    self.next_index = read_to;

                    return Ok(None);
                }
            }
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_delimiter(line: &[u8]) -> &[u8] {
    let line = match line.last() {
        Some(b'\n') => &line[..line.len() - 1],
        _ => line,
    };

    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}

#[derive(Debug)]
pub enum CodecError {
    LineTooLong,
    Io(io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::LineTooLong => write!(f, "line exceeds the receiver sentence length"),
            CodecError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> CodecError {
        CodecError::Io(e)
    }
}

impl std::error::Error for CodecError {}
