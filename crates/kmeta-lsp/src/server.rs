//! # Server Loop
//!
//! A single-threaded language server: read a frame, dispatch it, write any
//! response or `textDocument/publishDiagnostics` notification, repeat.
//!
//! ## Lifecycle
//!
//! - Before `initialize`, requests are answered with
//!   `ServerNotInitialized` and notifications other than `exit` are dropped.
//! - After `shutdown`, requests are answered with `InvalidRequest`.
//! - `exit` ends [`Server::run`]. End of input ends it too.
//!
//! Every publication is the complete list for its document; an empty list
//! clears the editor's markers.

use std::io::{BufRead, Write};

use kmeta_core::Diagnostic;
use kmeta_schema::DiagnosticEngine;
use lsp_types::notification::{
    DidChangeConfiguration, DidChangeTextDocument, DidChangeWatchedFiles, DidCloseTextDocument,
    DidOpenTextDocument, DidSaveTextDocument, Exit, Initialized, Notification, PublishDiagnostics,
};
use lsp_types::request::{Initialize, Request, Shutdown};
use lsp_types::{
    DidChangeConfigurationParams, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DidSaveTextDocumentParams, InitializeResult,
    PublishDiagnosticsParams, SaveOptions, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions,
    TextDocumentSyncSaveOptions, Uri,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::convert::to_lsp_diagnostic;
use crate::documents::DocumentStore;
use crate::error::ServerError;
use crate::protocol::{self, Message};
use crate::settings::Settings;
use crate::transport;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "kmeta";

/// Whether the loop keeps reading after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Language server over a reader/writer pair.
#[derive(Debug)]
pub struct Server<R, W> {
    reader: R,
    writer: W,
    engine: DiagnosticEngine,
    documents: DocumentStore,
    settings: Settings,
    initialized: bool,
    shutdown_requested: bool,
}

/// Capabilities sent in the `initialize` response.
pub fn initialize_result() -> InitializeResult {
    InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(false),
                    })),
                    ..Default::default()
                },
            )),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: SERVER_NAME.to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
        ..Default::default()
    }
}

impl<R: BufRead, W: Write> Server<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_engine(reader, writer, DiagnosticEngine::new())
    }

    pub fn with_engine(reader: R, writer: W, engine: DiagnosticEngine) -> Self {
        Self {
            reader,
            writer,
            engine,
            documents: DocumentStore::new(),
            settings: Settings::default(),
            initialized: false,
            shutdown_requested: false,
        }
    }

    /// Serve until `exit` or end of input.
    ///
    /// Only transport failures are returned; client mistakes are answered
    /// on the wire.
    pub fn run(&mut self) -> Result<(), ServerError> {
        tracing::info!("language server started");
        loop {
            let Some(body) = transport::read_frame(&mut self.reader)? else {
                tracing::info!("client closed the stream");
                return Ok(());
            };
            let value: Value = match serde_json::from_slice(&body) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping frame with invalid JSON");
                    self.send(&protocol::error_response(
                        Value::Null,
                        protocol::PARSE_ERROR,
                        &format!("parse error: {e}"),
                    ))?;
                    continue;
                }
            };
            if self.handle(value)? == Flow::Exit {
                tracing::info!(clean = self.shutdown_requested, "language server exiting");
                return Ok(());
            }
        }
    }

    /// Dispatch one parsed message.
    pub fn handle(&mut self, value: Value) -> Result<Flow, ServerError> {
        match Message::parse(value) {
            Ok(Message::Request { id, method, params }) => {
                self.handle_request(id, &method, params)?;
                Ok(Flow::Continue)
            }
            Ok(Message::Notification { method, params }) => self.handle_notification(&method, params),
            Ok(Message::Response { id }) => {
                tracing::debug!(%id, "ignoring response from client");
                Ok(Flow::Continue)
            }
            Err(invalid) => {
                tracing::warn!(reason = %invalid.reason, "invalid message");
                self.send(&protocol::error_response(
                    invalid.id,
                    protocol::INVALID_REQUEST,
                    &invalid.reason,
                ))?;
                Ok(Flow::Continue)
            }
        }
    }

    /// True once `shutdown` has been answered.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// The writer, for inspecting what was sent.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn handle_request(&mut self, id: Value, method: &str, _params: Value) -> Result<(), ServerError> {
        if self.shutdown_requested {
            return self.send(&protocol::error_response(
                id,
                protocol::INVALID_REQUEST,
                "server is shutting down",
            ));
        }
        if !self.initialized && method != Initialize::METHOD {
            return self.send(&protocol::error_response(
                id,
                protocol::SERVER_NOT_INITIALIZED,
                "server has not been initialized",
            ));
        }

        match method {
            m if m == Initialize::METHOD => {
                if self.initialized {
                    return self.send(&protocol::error_response(
                        id,
                        protocol::INVALID_REQUEST,
                        "server is already initialized",
                    ));
                }
                self.initialized = true;
                tracing::info!("initialize");
                let result = serde_json::to_value(initialize_result())?;
                self.send(&protocol::response(id, result))
            }
            m if m == Shutdown::METHOD => {
                self.shutdown_requested = true;
                tracing::info!("shutdown requested");
                self.send(&protocol::response(id, Value::Null))
            }
            _ => {
                tracing::debug!(method, "method not found");
                self.send(&protocol::error_response(
                    id,
                    protocol::METHOD_NOT_FOUND,
                    &format!("method not found: {method}"),
                ))
            }
        }
    }

    fn handle_notification(&mut self, method: &str, params: Value) -> Result<Flow, ServerError> {
        if method == Exit::METHOD {
            return Ok(Flow::Exit);
        }
        if !self.initialized {
            tracing::debug!(method, "dropping notification before initialize");
            return Ok(Flow::Continue);
        }

        match method {
            m if m == Initialized::METHOD => self.revalidate_all()?,
            m if m == DidOpenTextDocument::METHOD => {
                if let Some(params) = decode::<DidOpenTextDocumentParams>(method, params) {
                    let document = params.text_document;
                    let key = self.documents.open(document.uri, document.version, document.text);
                    self.validate_document(&key)?;
                }
            }
            m if m == DidChangeTextDocument::METHOD => {
                if let Some(params) = decode::<DidChangeTextDocumentParams>(method, params) {
                    self.did_change(params)?;
                }
            }
            m if m == DidSaveTextDocument::METHOD => {
                if let Some(params) = decode::<DidSaveTextDocumentParams>(method, params) {
                    let key = params.text_document.uri.as_str().to_string();
                    if let Some(text) = params.text {
                        self.documents.replace_text(&key, text);
                    }
                    self.validate_document(&key)?;
                }
            }
            m if m == DidCloseTextDocument::METHOD => {
                if let Some(params) = decode::<DidCloseTextDocumentParams>(method, params) {
                    let uri = params.text_document.uri;
                    self.documents.close(uri.as_str());
                    self.publish(uri, None, &[])?;
                }
            }
            m if m == DidChangeWatchedFiles::METHOD => self.revalidate_all()?,
            m if m == DidChangeConfiguration::METHOD => {
                if let Some(params) = decode::<DidChangeConfigurationParams>(method, params) {
                    self.did_change_configuration(&params.settings)?;
                }
            }
            _ => tracing::debug!(method, "ignoring notification"),
        }
        Ok(Flow::Continue)
    }

    fn did_change(&mut self, params: DidChangeTextDocumentParams) -> Result<(), ServerError> {
        let key = params.text_document.uri.as_str().to_string();
        let Some(change) = params.content_changes.into_iter().last() else {
            return Ok(());
        };
        if change.range.is_some() {
            tracing::warn!(uri = %key, "ignoring ranged change; the server only accepts full text");
            return Ok(());
        }
        if !self.documents.update(&key, params.text_document.version, change.text) {
            tracing::debug!(uri = %key, "change for a document that is not open");
            return Ok(());
        }
        self.validate_document(&key)
    }

    fn did_change_configuration(&mut self, payload: &Value) -> Result<(), ServerError> {
        match Settings::from_payload(payload) {
            Ok(Some(settings)) => {
                tracing::info!(?settings, "settings updated");
                self.settings = settings;
            }
            Ok(None) => tracing::debug!("configuration change without kmeta settings"),
            Err(e) => tracing::warn!(error = %e, "keeping previous settings"),
        }
        self.engine.reload();
        self.revalidate_all()
    }

    fn revalidate_all(&mut self) -> Result<(), ServerError> {
        for key in self.documents.keys() {
            self.validate_document(&key)?;
        }
        Ok(())
    }

    fn validate_document(&mut self, key: &str) -> Result<(), ServerError> {
        let Some(document) = self.documents.get(key) else {
            return Ok(());
        };
        let diagnostics = self
            .settings
            .apply(self.engine.assemble(document.uri.as_str(), &document.text));
        let uri = document.uri.clone();
        let version = document.version;
        self.publish(uri, Some(version), &diagnostics)
    }

    fn publish(
        &mut self,
        uri: Uri,
        version: Option<i32>,
        diagnostics: &[Diagnostic],
    ) -> Result<(), ServerError> {
        tracing::debug!(uri = uri.as_str(), count = diagnostics.len(), "publishing diagnostics");
        let params = PublishDiagnosticsParams::new(
            uri,
            diagnostics.iter().map(to_lsp_diagnostic).collect(),
            version,
        );
        let message = protocol::notification(PublishDiagnostics::METHOD, serde_json::to_value(params)?);
        self.send(&message)
    }

    fn send(&mut self, message: &Value) -> Result<(), ServerError> {
        transport::write_message(&mut self.writer, message)
    }
}

fn decode<P: DeserializeOwned>(method: &str, params: Value) -> Option<P> {
    match serde_json::from_value(params) {
        Ok(params) => Some(params),
        Err(e) => {
            tracing::warn!(method, error = %e, "ignoring notification with invalid params");
            None
        }
    }
}
