//! Newline-delimited text codec.
//!
//! Decodes `\n` or `\r\n` terminated UTF-8 lines into `String`s and encodes
//! outgoing strings with a trailing `\n`.

use std::io;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

// ---- Codec ------------------------------------------------------------------

const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

/// Tokio codec for one text line per frame.
pub struct LineCodec {
    max_line_length: usize,
    /// Bytes already scanned for a newline without finding one.
    scanned: usize,
}

impl LineCodec {
    /// Create a codec with the default 8 KB line limit.
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a codec with a custom line limit (in bytes, excluding the newline).
    pub fn with_max_line_length(max_bytes: usize) -> Self {
        Self {
            max_line_length: max_bytes,
            scanned: 0,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn too_long(limit: usize) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("line exceeds {limit} bytes"),
    )
}

fn to_text(raw: &[u8]) -> Result<String, io::Error> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid UTF-8: {e}")))
}

// ---- Decoder ----------------------------------------------------------------

impl Decoder for LineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let newline = src[self.scanned..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.scanned + offset);

        match newline {
            Some(idx) => {
                self.scanned = 0;
                if idx > self.max_line_length + 1 {
                    return Err(too_long(self.max_line_length));
                }
                let frame = src.split_to(idx + 1);
                let line = to_text(&frame[..idx])?;
                if line.len() > self.max_line_length {
                    return Err(too_long(self.max_line_length));
                }
                Ok(Some(line))
            }
            None => {
                if src.len() > self.max_line_length + 1 {
                    return Err(too_long(self.max_line_length));
                }
                self.scanned = src.len();
                Ok(None)
            }
        }
    }

    /// A final line without a terminating newline is still delivered.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        self.scanned = 0;
        let frame = src.split_to(src.len());
        to_text(&frame).map(Some)
    }
}

// ---- Encoder ----------------------------------------------------------------

impl Encoder<String> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
