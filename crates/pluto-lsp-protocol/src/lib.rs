//! JSON-RPC and LSP protocol types for the Pluto language server.
//!
//! This crate holds everything about the shape of messages on the wire:
//! the JSON-RPC 2.0 request/response/notification records, the standard
//! error codes the server answers with, the LSP method name constants the
//! dispatcher routes on, and the construction of the capability object
//! announced during `initialize`.
//!
//! It deliberately knows nothing about transports or about `plutoc`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod capabilities;
mod jsonrpc;
pub mod methods;

pub use capabilities::server_capabilities;
pub use jsonrpc::{
    INVALID_PARAMS, METHOD_NOT_FOUND, SERVER_NOT_INITIALIZED, JsonRpcError, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse,
};
