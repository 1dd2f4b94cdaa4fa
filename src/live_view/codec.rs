use bytes::BufMut;
use bytes::BytesMut;

use serde::Serialize;

use std::fmt;
use std::io;

use tokio_util::codec::Encoder;

use tracing::trace;

/// Writes each outbound value as one line of JSON.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct JsonLineCodec {}

impl JsonLineCodec {
    pub fn new() -> JsonLineCodec {
        JsonLineCodec {}
    }
}

impl<T> Encoder<T> for JsonLineCodec
where
    T: Serialize,
{
    type Error = CodecError;

    fn encode(&mut self, value: T, buf: &mut BytesMut) -> Result<(), CodecError> {
        let out = match serde_json::to_string(&value) {
            Ok(s) => s,
            Err(_) => return Err(CodecError::InternalError),
        };

        buf.reserve(out.len() + 1);
        buf.put(out.as_bytes());
        buf.put_u8(b'\n');

        trace!("live view sent {:?}", out);

        Ok(())
    }
}

#[derive(Debug)]
pub enum CodecError {
    InternalError,
    Io(io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InternalError => write!(f, "internal error"),
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
