//! Server capability configuration announced during `initialize`.
//!
//! The capability object depends on what the client advertised: clients
//! that support pull diagnostics (LSP 3.17 `textDocument.diagnostic`)
//! get a `diagnosticProvider`, everyone else is served by push
//! (`textDocument/publishDiagnostics`) and the provider is omitted so the
//! client does not issue pull requests the server would refuse.

use serde_json::{Value, json};

/// Build the `capabilities` object for the `initialize` result.
///
/// `pull_diagnostics` reflects whether the client advertised
/// `textDocument.diagnostic` support.
pub fn server_capabilities(pull_diagnostics: bool) -> Value {
    let mut caps = json!({
        "textDocumentSync": 1,
        "completionProvider": {
            "triggerCharacters": [".", ":"]
        }
    });
    if pull_diagnostics {
        caps["diagnosticProvider"] = json!(true);
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_capable_clients_get_a_diagnostic_provider() {
        let caps = server_capabilities(true);
        assert_eq!(caps["textDocumentSync"], json!(1));
        assert_eq!(caps["diagnosticProvider"], json!(true));
        assert_eq!(caps["completionProvider"]["triggerCharacters"], json!([".", ":"]));
    }

    #[test]
    fn push_mode_omits_the_diagnostic_provider() {
        let caps = server_capabilities(false);
        assert!(caps.get("diagnosticProvider").is_none());
        assert!(caps.get("completionProvider").is_some());
    }
}
