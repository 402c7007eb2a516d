//! Fixed-width length-header framing for text messages.
//!
//! A frame is `header_width` ASCII bytes holding the decimal byte length of the
//! payload, left-justified and padded with spaces, followed directly by the
//! UTF-8 payload. There is no delimiter; the receiver relies on the declared
//! length alone, so the decoder tolerates any split of the byte stream.
//!
//! Header parsing is lenient the way peers in the wild write it: surrounding
//! spaces and a leading `+` are accepted. Signs other than `+`, inner spaces
//! and non-digits are framing errors.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::config::{DEFAULT_HEADER_WIDTH, MAX_PAYLOAD_SIZE};
use crate::error::{constants, DraftError, Result};

/// Codec for length-prefixed UTF-8 text frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCodec {
    header_width: usize,
    max_payload: usize,
}

impl Default for TextCodec {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_WIDTH)
    }
}

impl TextCodec {
    /// Create a codec with the given header width.
    pub fn new(header_width: usize) -> Self {
        Self {
            header_width,
            max_payload: MAX_PAYLOAD_SIZE,
        }
    }

    /// Override the largest payload this codec will accept or produce
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    fn parse_header(&self, header: &[u8]) -> Result<usize> {
        std::str::from_utf8(header)
            .ok()
            .map(str::trim)
            .filter(|digits| !digits.is_empty())
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| {
                DraftError::Framing(format!(
                    "{}: {:?}",
                    constants::ERR_HEADER_NOT_NUMERIC,
                    String::from_utf8_lossy(header)
                ))
            })
    }
}

impl Decoder for TextCodec {
    type Item = String;
    type Error = DraftError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < self.header_width {
            src.reserve(self.header_width - src.len());
            return Ok(None);
        }

        let payload_len = self.parse_header(&src[..self.header_width])?;
        if payload_len > self.max_payload {
            return Err(DraftError::Framing(format!(
                "declared payload of {payload_len} bytes exceeds limit of {}",
                self.max_payload
            )));
        }

        let frame_len = self.header_width + payload_len;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(self.header_width);
        let payload = src.split_to(payload_len);

        String::from_utf8(payload.to_vec())
            .map(Some)
            .map_err(|_| DraftError::Framing(constants::ERR_PAYLOAD_NOT_UTF8.to_string()))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None if buf.is_empty() => Ok(None),
            // stream ended partway through a frame
            None => Err(DraftError::ConnectionLost),
        }
    }
}

impl<'a> Encoder<&'a str> for TextCodec {
    type Error = DraftError;

    fn encode(&mut self, item: &'a str, dst: &mut BytesMut) -> Result<()> {
        let payload = item.as_bytes();
        if payload.len() > self.max_payload {
            return Err(DraftError::Framing(format!(
                "payload of {} bytes exceeds limit of {}",
                payload.len(),
                self.max_payload
            )));
        }

        let header = format!("{:<width$}", payload.len(), width = self.header_width);
        if header.len() > self.header_width {
            return Err(DraftError::Framing(format!(
                "{}: {} bytes in {} columns",
                constants::ERR_HEADER_OVERFLOW,
                payload.len(),
                self.header_width
            )));
        }

        dst.reserve(self.header_width + payload.len());
        dst.put_slice(header.as_bytes());
        dst.put_slice(payload);
        Ok(())
    }
}

impl Encoder<String> for TextCodec {
    type Error = DraftError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&str>::encode(self, item.as_str(), dst)
    }
}
