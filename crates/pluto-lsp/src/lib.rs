//! Pluto Language Server runtime
//!
//! A Language Server Protocol implementation for the Pluto dialect of
//! Lua. The server owns no analysis of its own: every diagnostic and
//! every completion candidate comes from driving the `plutoc` compiler
//! in parse mode over the tracked buffer contents (see the
//! `pluto-compiler` crate).
//!
//! # Architecture
//!
//! - [`state`] - process configuration and per-connection session state
//! - [`server`] - TCP listener and the per-connection receive loop
//! - `dispatch` - JSON-RPC routing and the LSP lifecycle handlers
//! - [`convert`] - scraped compiler hints to LSP wire types
//!
//! Transport framing and protocol types live in the
//! `pluto-lsp-transport` and `pluto-lsp-protocol` crates.
//!
//! # Usage
//!
//! ```no_run
//! use pluto_lsp::{LspServer, ServerConfig};
//!
//! # fn main() -> std::io::Result<()> {
//! let server = LspServer::new(ServerConfig::default());
//! server.run()?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod convert;
mod dispatch;
pub mod server;
pub mod state;

pub use server::{ConnectionError, LspServer};
pub use state::{ServerConfig, Session};
