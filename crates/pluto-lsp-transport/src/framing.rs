//! Message framing for the LSP Base Protocol
//!
//! Implements Content-Length based framing over a raw byte stream. The
//! decoder is deliberately buffer-driven rather than reader-driven: the
//! server appends whatever a socket read returned and drains as many
//! complete frames as the buffer holds.

use pluto_lsp_protocol::{JsonRpcNotification, JsonRpcResponse};
use std::io::{self, Write};

const HEADER_PREFIX: &[u8] = b"Content-Length: ";
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Framing failure. Any of these ends the connection.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The bytes at a frame boundary were not a well-formed
    /// `Content-Length` header.
    #[error("malformed frame header: {0}")]
    MalformedFrame(String),
}

/// Incremental decoder for `Content-Length`-framed messages.
///
/// Feed raw bytes with [`push`](Self::push), then drain complete frames
/// with [`next_frame`](Self::next_frame) until it returns `Ok(None)`.
/// Byte-by-byte delivery produces exactly the same frames as bulk
/// delivery.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Unconsumed bytes from the stream.
    buffer: Vec<u8>,
    /// Body bytes still expected for the current frame, once the header
    /// has been consumed.
    expected_len: Option<usize>,
}

impl FrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly received bytes to the receive buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Extract the next complete frame body, if the buffer holds one.
    ///
    /// Returns `Ok(None)` when more bytes are needed. Returns
    /// [`FrameError::MalformedFrame`] when the length is not a decimal
    /// number or something other than a `Content-Length` header sits at
    /// a frame boundary.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        if self.expected_len.is_none() && !self.consume_header()? {
            return Ok(None);
        }

        if let Some(len) = self.expected_len {
            if self.buffer.len() >= len {
                let body = self.buffer.drain(..len).collect();
                self.expected_len = None;
                return Ok(Some(body));
            }
        }
        Ok(None)
    }

    /// Consume a `Content-Length` header from the front of the buffer.
    ///
    /// Returns `Ok(true)` when a complete header was consumed and
    /// `expected_len` is now set, `Ok(false)` when more bytes are needed.
    fn consume_header(&mut self) -> Result<bool, FrameError> {
        if self.buffer.len() < HEADER_PREFIX.len() {
            // Could still grow into a header; anything else is already a
            // framing violation.
            if HEADER_PREFIX.starts_with(&self.buffer) {
                return Ok(false);
            }
            return Err(self.malformed("unexpected bytes at frame boundary"));
        }

        if !self.buffer.starts_with(HEADER_PREFIX) {
            return Err(self.malformed("unexpected bytes at frame boundary"));
        }

        let Some(sep) = find_subsequence(&self.buffer[HEADER_PREFIX.len()..], HEADER_TERMINATOR)
        else {
            return Ok(false);
        };
        let sep = sep + HEADER_PREFIX.len();

        let digits = &self.buffer[HEADER_PREFIX.len()..sep];
        let len = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| self.malformed("content length is not a decimal number"))?;

        self.expected_len = Some(len);
        self.buffer.drain(..sep + HEADER_TERMINATOR.len());
        Ok(true)
    }

    fn malformed(&self, what: &str) -> FrameError {
        let prefix: Vec<u8> = self.buffer.iter().copied().take(32).collect();
        FrameError::MalformedFrame(format!("{what}: {:?}", String::from_utf8_lossy(&prefix)))
    }
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Encode a message body with `Content-Length` framing.
pub fn encode_frame(body: &str) -> Vec<u8> {
    let mut frame = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    frame.extend_from_slice(body.as_bytes());
    frame
}

/// Write an LSP response to a writer with proper framing
pub fn write_message<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    let content = serde_json::to_string(response)?;
    writer.write_all(&encode_frame(&content))?;
    writer.flush()
}

/// Write an LSP notification to a writer with proper framing
pub fn write_notification<W: Write>(
    writer: &mut W,
    notification: &JsonRpcNotification,
) -> io::Result<()> {
    let content = serde_json::to_string(notification)?;
    writer.write_all(&encode_frame(&content))?;
    writer.flush()
}
