//! TCP listener and per-connection receive loop.
//!
//! One thread accepts connections; each connection runs its own thread
//! with a blocking read loop, so a long compile on one connection never
//! stalls another. Within a connection, messages are handled strictly in
//! arrival order and each response is written before the next message is
//! read off the buffer.

use crate::state::{ServerConfig, Session};
use pluto_lsp_protocol::JsonRpcRequest;
use pluto_lsp_transport::FrameError;
use std::io::{self, Read};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

/// Why a connection ended. Every variant terminates only the one
/// connection it occurred on.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The client sent bytes that do not frame-decode.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A frame body was not a valid JSON-RPC message.
    #[error("received invalid JSON data: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The client pulled diagnostics without advertising the capability.
    #[error("client requested pull diagnostics without advertising support")]
    UnsupportedByClient,

    /// Socket I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Dispatch outcome: keep reading, or close this connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Close,
}

/// One accepted client connection.
pub(crate) struct Connection {
    pub(crate) stream: TcpStream,
    pub(crate) session: Session,
    pub(crate) config: Arc<ServerConfig>,
    pub(crate) peer: String,
}

impl Connection {
    fn new(stream: TcpStream, config: Arc<ServerConfig>) -> Self {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "<unknown>".to_string());
        Self { stream, session: Session::new(), config, peer }
    }

    /// Blocking receive loop: read, frame, dispatch, until disconnect.
    fn run(&mut self) -> Result<(), ConnectionError> {
        let mut buf = [0u8; 4096];
        loop {
            let n = self.stream.read(&mut buf)?;
            if n == 0 {
                return Ok(());
            }
            self.session.decoder.push(&buf[..n]);

            while let Some(frame) = self.session.decoder.next_frame()? {
                let request: JsonRpcRequest = serde_json::from_slice(&frame)?;
                if self.handle_message(request)? == Flow::Close {
                    return Ok(());
                }
            }
        }
    }
}

/// The language server: a TCP listener plus the configuration every
/// connection shares.
pub struct LspServer {
    config: Arc<ServerConfig>,
}

impl LspServer {
    /// Create a server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self { config: Arc::new(config) }
    }

    /// Bind the listening socket. Kept separate from [`serve`] so the
    /// caller can turn a bind failure into its own exit code.
    ///
    /// [`serve`]: Self::serve
    pub fn bind(&self) -> io::Result<TcpListener> {
        TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, self.config.port)))
    }

    /// Accept connections forever, one receive thread per client.
    pub fn serve(&self, listener: TcpListener) -> io::Result<()> {
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    eprintln!("Failed to accept connection: {e}");
                    continue;
                }
            };

            let config = Arc::clone(&self.config);
            thread::spawn(move || {
                let mut connection = Connection::new(stream, config);
                eprintln!("{} - connection established", connection.peer);
                match connection.run() {
                    Ok(()) => eprintln!("{} - connection lost", connection.peer),
                    Err(e) => eprintln!("{} - connection terminated: {e}", connection.peer),
                }
            });
        }
        Ok(())
    }

    /// Bind and serve in one step.
    pub fn run(&self) -> io::Result<()> {
        let listener = self.bind()?;
        self.serve(listener)
    }
}
