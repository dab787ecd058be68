//! scriptreg Core - Server-Side Script Registry
//!
//! A thin facade for JavaScript kept in a document database's `system.js`
//! collection:
//! - Registers named scripts, or anonymous ones under a generated name
//! - Checks whether a script exists and lists stored names
//! - Evaluates ad-hoc scripts and calls stored ones by name
//!
//! Persistence and execution belong to a [`DocumentOperations`]
//! implementation; the facade only validates arguments and shapes requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptreg_core::{DefaultScriptOperations, ExecutableScript, NamedScript, ScriptOperations};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example(store: Arc<dyn scriptreg_core::DocumentOperations>) -> Result<(), scriptreg_core::ScriptError> {
//! let scripts = DefaultScriptOperations::new(store);
//!
//! scripts.register(NamedScript::new("echo", "function(x) { return x; }")?).await?;
//! let anonymous = scripts.register_executable(ExecutableScript::new("function() { return 1; }")).await?;
//!
//! assert!(scripts.exists("echo").await?);
//! let value = scripts.call("echo", &[json!("hi")]).await?;
//! println!("{} returned {value}", anonymous.name());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod facade;
pub mod operations;
pub mod script;

// Re-exports for convenience
pub use config::{NameStrategy, ScriptConfig, DEFAULT_NAME_PREFIX};
pub use error::{ConfigError, ScriptError, StoreError};
pub use facade::{DefaultScriptOperations, ScriptOperations, SCRIPT_COLLECTION};
pub use operations::DocumentOperations;
pub use script::{Document, ExecutableScript, NamedScript, ServerSideScript, ID_FIELD, VALUE_FIELD};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with scriptreg
    pub use crate::{
        DefaultScriptOperations, DocumentOperations, ExecutableScript, NamedScript,
        ScriptError, ScriptOperations, ServerSideScript, StoreError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
