//! Server configuration and per-connection session state.

use pluto_lsp_transport::FrameDecoder;
use std::collections::HashMap;
use std::path::PathBuf;

/// Process-wide configuration, set once at startup and read-only after.
///
/// Passed to the listener constructor; connections see it behind an
/// `Arc`, never through globals.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the `plutoc` executable to drive.
    pub plutoc_path: PathBuf,
    /// TCP port to listen on.
    pub port: u16,
    /// When set, an `exit` notification terminates the process instead
    /// of just closing the client's socket.
    pub honour_exit: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { plutoc_path: PathBuf::from("plutoc"), port: 9170, honour_exit: false }
    }
}

/// Per-connection state, created on accept and dropped on disconnect.
///
/// Nothing in here is shared across connections.
#[derive(Debug, Default)]
pub struct Session {
    /// Receive buffer and framing state for this connection.
    pub decoder: FrameDecoder,
    /// Whether the client advertised `textDocument.diagnostic` support
    /// during `initialize`.
    pub supports_pull_diagnostics: bool,
    /// Whether `initialize` has completed.
    pub initialized: bool,
    /// Whether `shutdown` has been received.
    pub shutdown_received: bool,
    /// Open files by URI, contents normalized to `\n` line endings.
    pub files: HashMap<String, String>,
}

impl Session {
    /// Create a fresh session for a new connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the live contents of an open file.
    ///
    /// `\r\n` sequences are normalized to `\n`; a standalone `\r` or
    /// `\n` is left alone.
    pub fn update_file_contents(&mut self, uri: &str, contents: &str) {
        self.files.insert(uri.to_string(), contents.replace("\r\n", "\n"));
    }

    /// Forget a closed file.
    pub fn close_file(&mut self, uri: &str) {
        self.files.remove(uri);
    }
}
