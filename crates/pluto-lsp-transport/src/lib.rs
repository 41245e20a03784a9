//! LSP transport layer for pluto-lsp.
//!
//! The LSP Base Protocol frames every message as
//! `Content-Length: <decimal>\r\n\r\n<body>`. This crate provides:
//!
//! - [`FrameDecoder`] - an incremental decoder fed from a session's
//!   receive buffer, tolerant of arbitrary fragmentation of the byte
//!   stream (a TCP read may deliver half a header or three frames at
//!   once)
//! - [`write_message`] / [`write_notification`] - framed write helpers
//!   for responses and server-initiated notifications
//!
//! # Example
//!
//! ```
//! use pluto_lsp_transport::FrameDecoder;
//!
//! let mut decoder = FrameDecoder::new();
//! decoder.push(b"Content-Length: 2\r\n\r\n{}");
//! let frame = decoder.next_frame().unwrap();
//! assert_eq!(frame.as_deref(), Some(&b"{}"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod framing;

pub use framing::{FrameDecoder, FrameError, encode_frame, write_message, write_notification};
