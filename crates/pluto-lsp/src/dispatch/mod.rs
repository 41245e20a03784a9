//! Request dispatch and routing for the LSP server
//!
//! Implements the JSON-RPC routing layer: incoming messages are matched
//! by method string and handed to the handlers in the submodules.
//!
//! - **lifecycle**: `initialize`, `initialized`, `shutdown`, `exit`
//! - **text_document**: document sync, pull diagnostics, completion
//!
//! Requests arriving before `initialize` are answered with
//! `ServerNotInitialized` (`-32002`); notifications in the wrong state
//! and unhandled methods are logged and ignored. `shutdown` and `exit`
//! are honored in any state. Notifications never produce a response.

mod lifecycle;
mod text_document;

use crate::server::{Connection, ConnectionError, Flow};
use pluto_lsp_protocol::{
    JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, SERVER_NOT_INITIALIZED,
    methods,
};
use pluto_lsp_transport::{write_message, write_notification};
use serde_json::Value;
use std::io;

impl Connection {
    /// Route one decoded message. Returns whether the connection should
    /// keep reading.
    pub(crate) fn handle_message(
        &mut self,
        request: JsonRpcRequest,
    ) -> Result<Flow, ConnectionError> {
        let JsonRpcRequest { id, method, params, .. } = request;
        eprintln!("{} - {} (id {:?})", self.peer, method, id);

        match method.as_str() {
            methods::INITIALIZE => self.handle_initialize(id, params)?,
            methods::INITIALIZED => eprintln!("{} - client reports initialized", self.peer),
            methods::SHUTDOWN => self.handle_shutdown(id)?,
            methods::EXIT => return self.handle_exit(),
            _ if !self.session.initialized => {
                if id.is_none() {
                    eprintln!("{} - dropping {} received before initialize", self.peer, method);
                } else {
                    self.respond(JsonRpcResponse::error(
                        id,
                        JsonRpcError::new(SERVER_NOT_INITIALIZED, "Server not initialized"),
                    ))?;
                }
            }
            methods::TEXT_DOCUMENT_DID_OPEN => self.handle_did_open(params)?,
            methods::TEXT_DOCUMENT_DID_CHANGE => self.handle_did_change(params)?,
            methods::TEXT_DOCUMENT_DID_CLOSE => self.handle_did_close(params),
            methods::TEXT_DOCUMENT_DIAGNOSTIC => self.handle_document_diagnostic(id, params)?,
            methods::TEXT_DOCUMENT_COMPLETION => self.handle_completion(id, params)?,
            other => eprintln!("{} - ignoring unhandled method {other}", self.peer),
        }
        Ok(Flow::Continue)
    }

    /// Write a response with proper framing.
    pub(crate) fn respond(&mut self, response: JsonRpcResponse) -> io::Result<()> {
        write_message(&mut self.stream, &response)
    }

    /// Write a server-initiated notification with proper framing.
    pub(crate) fn notify(&mut self, method: &str, params: Value) -> io::Result<()> {
        write_notification(&mut self.stream, &JsonRpcNotification::new(method, params))
    }
}

/// Pull `params.textDocument.uri` out of request params.
fn params_uri(params: Option<&Value>) -> Option<&str> {
    params?.get("textDocument")?.get("uri")?.as_str()
}

/// Pull the 0-based `params.position` out of request params.
fn params_position(params: Option<&Value>) -> Option<(usize, usize)> {
    let position = params?.get("position")?;
    let line = usize::try_from(position.get("line")?.as_u64()?).ok()?;
    let character = usize::try_from(position.get("character")?.as_u64()?).ok()?;
    Some((line, character))
}
