//! Document store seam
//!
//! The facade never talks to a database directly. Everything goes through
//! [`DocumentOperations`], so any driver (or a test double) can sit behind it.

use crate::error::StoreError;
use crate::script::Document;

/// Generic document store operations
///
/// Implement this trait to back the script facade with a real database.
/// Implementations own connections, retries and timeouts.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentOperations: Send + Sync {
    /// Insert or replace `document` in `collection`, keyed by its `_id`
    async fn save(&self, document: Document, collection: &str) -> Result<Document, StoreError>;

    /// Whether any document in `collection` matches `filter`
    async fn exists(&self, filter: Document, collection: &str) -> Result<bool, StoreError>;

    /// Every document in `collection`
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Run a database command and return the server's reply
    async fn run_command(&self, command: Document) -> Result<Document, StoreError>;
}
