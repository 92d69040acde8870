//! # Document Store
//!
//! Full text of every document the client has open, keyed by URI string.
//! Changes are full-text replacements; the server advertises full sync.

use std::collections::BTreeMap;

use lsp_types::Uri;

/// An open text document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub uri: Uri,
    pub version: i32,
    pub text: String,
}

/// Open documents, iterated in URI order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<String, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly opened document, replacing any stale entry. Returns the
    /// store key.
    pub fn open(&mut self, uri: Uri, version: i32, text: String) -> String {
        let key = uri.as_str().to_string();
        self.documents.insert(key.clone(), Document { uri, version, text });
        key
    }

    /// Replace the text of an open document. Returns `false` when the
    /// document is not open.
    pub fn update(&mut self, key: &str, version: i32, text: String) -> bool {
        match self.documents.get_mut(key) {
            Some(document) => {
                document.version = version;
                document.text = text;
                true
            }
            None => false,
        }
    }

    /// Replace the text without touching the version (save with text).
    pub fn replace_text(&mut self, key: &str, text: String) -> bool {
        match self.documents.get_mut(key) {
            Some(document) => {
                document.text = text;
                true
            }
            None => false,
        }
    }

    /// Forget a document.
    pub fn close(&mut self, key: &str) -> Option<Document> {
        self.documents.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.documents.get(key)
    }

    /// Store keys of every open document.
    pub fn keys(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
