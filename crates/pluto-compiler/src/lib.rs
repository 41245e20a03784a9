//! Compiler integration for the Pluto language server.
//!
//! `plutoc` is a batch compiler; this crate is the glue that makes it
//! behave like an interactive analysis service:
//!
//! - [`CompilerDriver`] - writes a buffer to a `.lua` temp file and runs
//!   `plutoc -p` over it, returning the raw diagnostic text
//! - [`parse_hints`] - scrapes that text into structured [`Hint`]s,
//!   reassembling multi-line messages and decoding `suggest:` lists
//! - [`complete`] - rewrites a buffer with a sentinel identifier at the
//!   cursor so the compiler emits completion candidates for exactly that
//!   context
//!
//! The diagnostic text format is not versioned; the parser tolerates
//! continuation lines it does not recognize but refuses to guess about
//! unrecognized top-level lines (see [`HintError`]).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod completion;
mod driver;
mod hint;

pub use completion::{CompletionError, complete, inject_sentinel};
pub use driver::{CompilerDriver, CompilerError};
pub use hint::{CompletionItem, CompletionKind, Diagnostic, Hint, HintError, Severity, parse_hints};
