//! LSP method name constants for request/notification routing.
//!
//! Centralizes the method identifiers the dispatcher matches on so the
//! routing logic, capability registration, and log lines all agree on
//! one spelling.

// ============================================================================
// Lifecycle Methods
// ============================================================================

/// Initialize request - first request from client to server
pub const INITIALIZE: &str = "initialize";

/// Initialized notification - sent after the initialize response
pub const INITIALIZED: &str = "initialized";

/// Shutdown request - graceful server shutdown
pub const SHUTDOWN: &str = "shutdown";

/// Exit notification - terminate the server
pub const EXIT: &str = "exit";

// ============================================================================
// Text Document Synchronization
// ============================================================================

/// Document opened notification
pub const TEXT_DOCUMENT_DID_OPEN: &str = "textDocument/didOpen";

/// Document changed notification
pub const TEXT_DOCUMENT_DID_CHANGE: &str = "textDocument/didChange";

/// Document closed notification
pub const TEXT_DOCUMENT_DID_CLOSE: &str = "textDocument/didClose";

/// Publish diagnostics notification (server to client)
pub const TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS: &str = "textDocument/publishDiagnostics";

// ============================================================================
// Language Features
// ============================================================================

/// Pull diagnostics request (LSP 3.17)
pub const TEXT_DOCUMENT_DIAGNOSTIC: &str = "textDocument/diagnostic";

/// Code completion request
pub const TEXT_DOCUMENT_COMPLETION: &str = "textDocument/completion";

// ============================================================================
// Window Features
// ============================================================================

/// Show message notification (server to client)
pub const WINDOW_SHOW_MESSAGE: &str = "window/showMessage";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_methods() {
        assert_eq!(INITIALIZE, "initialize");
        assert_eq!(INITIALIZED, "initialized");
        assert_eq!(SHUTDOWN, "shutdown");
        assert_eq!(EXIT, "exit");
    }

    #[test]
    fn test_text_document_methods() {
        assert_eq!(TEXT_DOCUMENT_DID_OPEN, "textDocument/didOpen");
        assert_eq!(TEXT_DOCUMENT_DID_CHANGE, "textDocument/didChange");
        assert_eq!(TEXT_DOCUMENT_DID_CLOSE, "textDocument/didClose");
        assert_eq!(TEXT_DOCUMENT_DIAGNOSTIC, "textDocument/diagnostic");
        assert_eq!(TEXT_DOCUMENT_COMPLETION, "textDocument/completion");
    }

    #[test]
    fn test_server_to_client_methods() {
        assert_eq!(TEXT_DOCUMENT_PUBLISH_DIAGNOSTICS, "textDocument/publishDiagnostics");
        assert_eq!(WINDOW_SHOW_MESSAGE, "window/showMessage");
    }
}
