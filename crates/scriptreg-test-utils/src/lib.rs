//! Testing utilities for scriptreg workspace
//!
//! Shared test doubles, fixtures, and tracing setup.

#![allow(missing_docs)]

use dashmap::DashMap;
use parking_lot::Mutex;
use scriptreg_core::{
    DefaultScriptOperations, Document, DocumentOperations, ExecutableScript, NamedScript,
    StoreError, ID_FIELD,
};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory document store
///
/// Keeps documents per collection keyed by `_id`, records every command it
/// is sent, and answers commands from a queue of scripted replies (an empty
/// `{ "ok": 1 }` reply once the queue runs dry). A failure installed with
/// [`fail_with`](Self::fail_with) is returned by every operation until
/// cleared.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: DashMap<String, BTreeMap<String, Document>>,
    commands: Mutex<Vec<Document>>,
    replies: Mutex<VecDeque<Result<Document, StoreError>>>,
    failure: Mutex<Option<StoreError>>,
    saves: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the reply for the next command
    pub fn push_reply(&self, reply: Result<Document, StoreError>) {
        self.replies.lock().push_back(reply);
    }

    /// Queue a successful reply carrying `retval`
    pub fn push_retval(&self, retval: Value) {
        let mut reply = ok_reply();
        reply.insert("retval".to_string(), retval);
        self.push_reply(Ok(reply));
    }

    /// Fail every operation with `error`
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock() = Some(error);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock() = None;
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> Vec<Document> {
        self.commands.lock().clone()
    }

    /// Documents stored in `collection`, ordered by `_id`
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        match self.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl DocumentOperations for InMemoryDocumentStore {
    async fn save(&self, document: Document, collection: &str) -> Result<Document, StoreError> {
        self.check_failure()?;
        let id = match document.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            _ => return Err(StoreError::Other(format!("document has no string {ID_FIELD}"))),
        };

        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, document.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(document)
    }

    async fn exists(&self, filter: Document, collection: &str) -> Result<bool, StoreError> {
        self.check_failure()?;
        let Some(docs) = self.collections.get(collection) else {
            return Ok(false);
        };
        Ok(docs
            .values()
            .any(|doc| filter.iter().all(|(k, v)| doc.get(k) == Some(v))))
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.check_failure()?;
        Ok(self.documents(collection))
    }

    async fn run_command(&self, command: Document) -> Result<Document, StoreError> {
        self.check_failure()?;
        self.commands.lock().push(command);
        self.replies.lock().pop_front().unwrap_or_else(|| Ok(ok_reply()))
    }
}

fn ok_reply() -> Document {
    let mut reply = Document::new();
    reply.insert("ok".to_string(), Value::from(1.0));
    reply
}

pub fn create_named_script(name: &str) -> NamedScript {
    NamedScript::new(name, format!("function() {{ return '{name}'; }}")).unwrap()
}

pub fn create_executable_script() -> ExecutableScript {
    ExecutableScript::new("function(x) { return x * 2; }")
}

/// Facade over a fresh in-memory store; the store handle is returned for assertions
pub fn setup_test_scripts() -> (DefaultScriptOperations, Arc<InMemoryDocumentStore>) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let ops = DefaultScriptOperations::new(Arc::clone(&store) as Arc<dyn DocumentOperations>);
    (ops, store)
}

/// Install a test-friendly tracing subscriber (RUST_LOG driven). Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
