//! # kmeta-lsp — Metadata Language Server
//!
//! Serves diagnostics for Kaggle `dataset-metadata.json` and
//! `kernel-metadata.json` files to any editor that speaks the Language Server
//! Protocol over stdio.
//!
//! ## Modules
//!
//! - [`transport`]: `Content-Length` framing.
//! - [`protocol`]: JSON-RPC envelope and error codes.
//! - [`documents`]: open-document store.
//! - [`settings`]: client configuration.
//! - [`convert`]: kmeta diagnostics to `lsp-types`.
//! - [`server`]: the dispatch loop.
//!
//! ## Crate Policy
//!
//! - Logs go through `tracing`; the binary routes them to stderr so stdout
//!   carries protocol frames only.
//! - Only transport failures end the loop with an error.

pub mod convert;
pub mod documents;
pub mod error;
pub mod protocol;
pub mod server;
pub mod settings;
pub mod transport;

pub use documents::{Document, DocumentStore};
pub use error::ServerError;
pub use server::{initialize_result, Flow, Server, SERVER_NAME};
pub use settings::{Settings, SETTINGS_SECTION};

use std::io;

/// Run the language server on this process's stdin and stdout.
///
/// Returns whether `shutdown` was requested before the loop ended.
pub fn serve_stdio() -> Result<bool, ServerError> {
    let mut server = Server::new(io::stdin().lock(), io::stdout().lock());
    server.run()?;
    Ok(server.shutdown_requested())
}
