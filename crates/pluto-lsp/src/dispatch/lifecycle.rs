//! Lifecycle request handlers
//!
//! `initialize`, `shutdown`, and `exit`. The capability answer depends
//! on whether the client advertised pull-diagnostic support; everything
//! downstream keys off the flag recorded here.

use super::*;
use pluto_lsp_protocol::server_capabilities;
use serde_json::json;

impl Connection {
    /// Handle the initialize request
    pub(super) fn handle_initialize(
        &mut self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> Result<(), ConnectionError> {
        let pull = params
            .as_ref()
            .and_then(|p| p.get("capabilities"))
            .and_then(|caps| caps.get("textDocument"))
            .and_then(|td| td.get("diagnostic"))
            .is_some();
        self.session.supports_pull_diagnostics = pull;
        self.session.initialized = true;
        eprintln!(
            "{} - initialized, diagnostics will be {}",
            self.peer,
            if pull { "pulled" } else { "pushed" }
        );

        let result = json!({
            "capabilities": server_capabilities(pull),
            "serverInfo": {
                "name": "pluto-lsp",
                "version": env!("CARGO_PKG_VERSION"),
            }
        });
        self.respond(JsonRpcResponse::success(id, result))?;

        self.notify(
            methods::WINDOW_SHOW_MESSAGE,
            json!({
                "type": 3,
                "message": "[Pluto Language Server] Socket established."
            }),
        )?;
        Ok(())
    }

    /// Handle the shutdown request
    pub(super) fn handle_shutdown(&mut self, id: Option<Value>) -> Result<(), ConnectionError> {
        self.session.shutdown_received = true;
        if id.is_some() {
            self.respond(JsonRpcResponse::null(id))?;
        }
        Ok(())
    }

    /// Handle the exit notification
    ///
    /// With `--honour-exit` the whole process terminates; otherwise only
    /// this client's socket closes, since some clients expect to restart
    /// the server by reconnecting.
    pub(super) fn handle_exit(&mut self) -> Result<Flow, ConnectionError> {
        if !self.session.shutdown_received {
            eprintln!("{} - exit received without a prior shutdown", self.peer);
        }
        if self.config.honour_exit {
            eprintln!("{} - exit received, terminating", self.peer);
            std::process::exit(0);
        }
        eprintln!("{} - exit received, closing socket", self.peer);
        Ok(Flow::Close)
    }
}
