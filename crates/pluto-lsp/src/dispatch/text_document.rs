//! Text document handlers
//!
//! Full-text document sync plus the two analysis features: diagnostics
//! (pull or push, depending on the client) and completion. Every
//! analysis request drives the compiler over the tracked contents of the
//! file, never over what is on disk.

use super::*;
use crate::convert;
use pluto_compiler::{CompilerDriver, Hint, complete, parse_hints};
use pluto_lsp_protocol::INVALID_PARAMS;
use serde_json::json;

impl Connection {
    /// Handle the textDocument/didOpen notification
    pub(super) fn handle_did_open(
        &mut self,
        params: Option<Value>,
    ) -> Result<(), ConnectionError> {
        let text_document = params.as_ref().and_then(|p| p.get("textDocument"));
        let uri = text_document.and_then(|td| td.get("uri")).and_then(Value::as_str);
        let text = text_document.and_then(|td| td.get("text")).and_then(Value::as_str);
        let (Some(uri), Some(text)) = (uri, text) else {
            eprintln!("{} - didOpen without a document, ignoring", self.peer);
            return Ok(());
        };

        self.session.update_file_contents(uri, text);
        if !self.session.supports_pull_diagnostics {
            self.publish_diagnostics(uri)?;
        }
        Ok(())
    }

    /// Handle the textDocument/didChange notification (full-text sync)
    pub(super) fn handle_did_change(
        &mut self,
        params: Option<Value>,
    ) -> Result<(), ConnectionError> {
        let uri = params_uri(params.as_ref());
        let text = params
            .as_ref()
            .and_then(|p| p.get("contentChanges"))
            .and_then(|changes| changes.get(0))
            .and_then(|change| change.get("text"))
            .and_then(Value::as_str);
        let (Some(uri), Some(text)) = (uri, text) else {
            eprintln!("{} - didChange without full text, ignoring", self.peer);
            return Ok(());
        };

        self.session.update_file_contents(uri, text);
        if !self.session.supports_pull_diagnostics {
            self.publish_diagnostics(uri)?;
        }
        Ok(())
    }

    /// Handle the textDocument/didClose notification
    pub(super) fn handle_did_close(&mut self, params: Option<Value>) {
        if let Some(uri) = params_uri(params.as_ref()) {
            self.session.close_file(uri);
        }
    }

    /// Handle the textDocument/diagnostic pull request
    ///
    /// Only legal when the client advertised the capability; a client
    /// that pulls anyway is out of protocol and loses the connection.
    pub(super) fn handle_document_diagnostic(
        &mut self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> Result<(), ConnectionError> {
        if !self.session.supports_pull_diagnostics {
            return Err(ConnectionError::UnsupportedByClient);
        }
        if id.is_none() {
            eprintln!("{} - diagnostic pull sent as a notification, ignoring", self.peer);
            return Ok(());
        }

        let Some(uri) = params_uri(params.as_ref()) else {
            return Ok(self.reject(id, "missing textDocument.uri")?);
        };
        let Some(contents) = self.session.files.get(uri) else {
            return Ok(self.reject(id, "document not found")?);
        };

        let items = lint(&self.config.plutoc_path, &self.peer, contents);
        self.respond(JsonRpcResponse::success(id, json!({ "kind": "full", "items": items })))?;
        Ok(())
    }

    /// Handle the textDocument/completion request
    pub(super) fn handle_completion(
        &mut self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> Result<(), ConnectionError> {
        if id.is_none() {
            eprintln!("{} - completion sent as a notification, ignoring", self.peer);
            return Ok(());
        }
        let Some(uri) = params_uri(params.as_ref()) else {
            return Ok(self.reject(id, "missing textDocument.uri")?);
        };
        let Some((line, character)) = params_position(params.as_ref()) else {
            return Ok(self.reject(id, "missing position")?);
        };
        let Some(contents) = self.session.files.get(uri) else {
            return Ok(self.reject(id, "document not found")?);
        };

        let driver = CompilerDriver::new(&self.config.plutoc_path);
        let items = match complete(&driver, contents, line, character) {
            Ok(items) => items,
            Err(e) => {
                eprintln!("{} - completion failed: {e}", self.peer);
                Vec::new()
            }
        };
        self.respond(JsonRpcResponse::success(id, convert::completions_to_value(&items)))?;
        Ok(())
    }

    /// Lint tracked contents and push the result to the client.
    fn publish_diagnostics(&mut self, uri: &str) -> Result<(), ConnectionError> {
        let Some(contents) = self.session.files.get(uri) else {
            return Ok(());
        };
        let diagnostics = lint(&self.config.plutoc_path, &self.peer, contents);
        self.notify(
            methods::TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS,
            json!({ "uri": uri, "diagnostics": diagnostics }),
        )?;
        Ok(())
    }

    /// Answer a request whose parameters cannot be honored.
    fn reject(&mut self, id: Option<Value>, message: &str) -> io::Result<()> {
        if id.is_none() {
            eprintln!("{} - {message}", self.peer);
            return Ok(());
        }
        self.respond(JsonRpcResponse::error(id, JsonRpcError::new(INVALID_PARAMS, message)))
    }
}

/// Drive the compiler over `contents` and keep the diagnostics.
///
/// A compiler that cannot be spawned or output that cannot be scraped
/// degrades to an empty list; the failure only shows up in the server
/// log, never as a protocol error.
fn lint(plutoc_path: &std::path::Path, peer: &str, contents: &str) -> Vec<lsp_types::Diagnostic> {
    let driver = CompilerDriver::new(plutoc_path);
    let output = match driver.run(contents) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{peer} - compiler unavailable: {e}");
            return Vec::new();
        }
    };

    match parse_hints(&output) {
        Ok(hints) => hints
            .into_iter()
            .filter_map(|hint| match hint {
                Hint::Diagnostic(d) => Some(convert::to_lsp_diagnostic(contents, &d)),
                Hint::Completions(_) => None,
            })
            .collect(),
        Err(e) => {
            eprintln!("{peer} - {e}");
            Vec::new()
        }
    }
}
