//! Pluto Language Server binary
//!
//! Listens on a TCP port and serves LSP clients, using an external
//! `plutoc` executable as the analysis backend.
//!
//! Usage:
//!   pluto-lsp \[options\]
//!
//! Options:
//!   --plutoc <path>  Compiler executable to drive (default: plutoc)
//!   --port <port>    Port to listen on (default: 9170)
//!   --honour-exit    Terminate the process on the LSP exit notification
//!   --version        Show version information
//!   --help           Show this help message

use pluto_lsp::{LspServer, ServerConfig};
use std::env;
use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = ServerConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--plutoc" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("--plutoc requires a path");
                    process::exit(2);
                };
                config.plutoc_path = PathBuf::from(path);
            }
            "--port" => {
                i += 1;
                let port = args.get(i).and_then(|p| p.parse::<u16>().ok());
                let Some(port) = port else {
                    eprintln!("--port requires a number between 0 and 65535");
                    process::exit(2);
                };
                config.port = port;
            }
            "--honour-exit" | "--honor-exit" => config.honour_exit = true,
            "--version" => {
                println!("pluto-lsp {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                print_help();
                process::exit(2);
            }
        }
        i += 1;
    }

    let port = config.port;
    let server = LspServer::new(config);
    let listener = match server.bind() {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind to port {port}: {e}");
            process::exit(1);
        }
    };

    eprintln!("Pluto Language Server is listening on port {port}.");
    if let Err(e) = server.serve(listener) {
        eprintln!("LSP server error: {e}");
        process::exit(1);
    }
}

fn print_help() {
    eprintln!("Pluto Language Server");
    eprintln!();
    eprintln!("Usage: pluto-lsp [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --plutoc <path>  Compiler executable to drive (default: plutoc)");
    eprintln!("  --port <port>    Port to listen on (default: 9170)");
    eprintln!("  --honour-exit    Terminate the process on the LSP exit notification");
    eprintln!("  --version        Show version information");
    eprintln!("  --help           Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  # Serve editors on the default port");
    eprintln!("  pluto-lsp");
    eprintln!();
    eprintln!("  # Use a specific compiler build");
    eprintln!("  pluto-lsp --plutoc /opt/pluto/bin/plutoc --port 9300");
}
