//! Script registry facade
//!
//! [`DefaultScriptOperations`] validates arguments and forwards each call to
//! a [`DocumentOperations`] implementation:
//! - registrations become `save` calls against [`SCRIPT_COLLECTION`]
//! - executions and calls become `$eval` commands
//! - existence checks and listings become `_id` queries
//!
//! Validation failures are returned before the store is touched. Store
//! failures come back unchanged.
//!
//! `call` splices the script name into a JavaScript expression, so the name
//! must be a plain identifier. Arguments are always quoted or inlined as
//! JSON and cannot escape their position.

use crate::config::ScriptConfig;
use crate::error::ScriptError;
use crate::operations::DocumentOperations;
use crate::script::{
    require_text, Document, ExecutableScript, NamedScript, ServerSideScript, ID_FIELD,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Collection holding server-side scripts
pub const SCRIPT_COLLECTION: &str = "system.js";

const EVAL_FIELD: &str = "$eval";
const ARGS_FIELD: &str = "args";
const RETVAL_FIELD: &str = "retval";

/// Operations on server-side scripts
#[async_trait::async_trait]
pub trait ScriptOperations: Send + Sync {
    /// Store a named script in [`SCRIPT_COLLECTION`]
    ///
    /// Name and source were already checked by [`NamedScript::new`].
    async fn register(&self, script: NamedScript) -> Result<NamedScript, ScriptError>;

    /// Store an anonymous script under a generated name
    ///
    /// # Errors
    /// [`ScriptError::InvalidArgument`] if the script source is blank.
    async fn register_executable(
        &self,
        script: ExecutableScript,
    ) -> Result<NamedScript, ScriptError>;

    /// Evaluate `script` on the server with `args`
    ///
    /// # Errors
    /// [`ScriptError::InvalidArgument`] if the script source is blank.
    async fn execute(&self, script: &ExecutableScript, args: &[Value])
        -> Result<Value, ScriptError>;

    /// Invoke the stored script `name` with `args`
    ///
    /// # Errors
    /// [`ScriptError::InvalidArgument`] if `name` is blank or not a
    /// JavaScript identifier.
    async fn call(&self, name: &str, args: &[Value]) -> Result<Value, ScriptError>;

    /// Whether a script called `name` is stored
    ///
    /// # Errors
    /// [`ScriptError::InvalidArgument`] if `name` is blank.
    async fn exists(&self, name: &str) -> Result<bool, ScriptError>;

    /// Names of all stored scripts
    ///
    /// # Errors
    /// [`ScriptError::InvalidDocument`] if a stored entry is not a script.
    async fn script_names(&self) -> Result<BTreeSet<String>, ScriptError>;
}

/// Default script facade over a document store
#[derive(Clone)]
pub struct DefaultScriptOperations {
    store: Arc<dyn DocumentOperations>,
    config: ScriptConfig,
}

impl DefaultScriptOperations {
    /// Create facade with default configuration
    #[must_use]
    pub fn new(store: Arc<dyn DocumentOperations>) -> Self {
        Self::with_config(store, ScriptConfig::default())
    }

    /// Create facade with custom configuration
    #[must_use]
    pub fn with_config(store: Arc<dyn DocumentOperations>, config: ScriptConfig) -> Self {
        Self { store, config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }
}

impl fmt::Debug for DefaultScriptOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultScriptOperations")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ScriptOperations for DefaultScriptOperations {
    async fn register(&self, script: NamedScript) -> Result<NamedScript, ScriptError> {
        tracing::debug!("Saving script '{}' to {}", script.name(), SCRIPT_COLLECTION);
        self.store
            .save(script.to_document(), SCRIPT_COLLECTION)
            .await?;
        Ok(script)
    }

    async fn register_executable(
        &self,
        script: ExecutableScript,
    ) -> Result<NamedScript, ScriptError> {
        let named = NamedScript::from_executable(self.config.generate_name(), script)?;
        tracing::debug!("Generated name '{}' for anonymous script", named.name());
        self.register(named).await
    }

    async fn execute(
        &self,
        script: &ExecutableScript,
        args: &[Value],
    ) -> Result<Value, ScriptError> {
        require_text(script.code(), "script code")?;

        tracing::debug!("Evaluating anonymous script with {} args", args.len());
        let reply = self.store.run_command(eval_command(script, args)).await?;
        Ok(retval(reply))
    }

    async fn call(&self, name: &str, args: &[Value]) -> Result<Value, ScriptError> {
        require_text(name, "script name")?;
        require_identifier(name)?;

        tracing::debug!("Calling stored script '{}' with {} args", name, args.len());
        let reply = self.store.run_command(call_command(name, args)).await?;
        Ok(retval(reply))
    }

    async fn exists(&self, name: &str) -> Result<bool, ScriptError> {
        require_text(name, "script name")?;

        let mut filter = Document::new();
        filter.insert(ID_FIELD.to_string(), Value::String(name.to_string()));
        Ok(self.store.exists(filter, SCRIPT_COLLECTION).await?)
    }

    async fn script_names(&self) -> Result<BTreeSet<String>, ScriptError> {
        let documents = self.store.find_all(SCRIPT_COLLECTION).await?;
        tracing::debug!("Found {} stored scripts", documents.len());

        documents
            .into_iter()
            .map(|doc| NamedScript::try_from(doc).map(|s| s.name().to_string()))
            .collect()
    }
}

/// `{ "$eval": <code>, "args": [...] }`
fn eval_command(script: &ExecutableScript, args: &[Value]) -> Document {
    let mut command = Document::new();
    command.insert(EVAL_FIELD.to_string(), Value::String(script.code().to_string()));
    command.insert(ARGS_FIELD.to_string(), Value::Array(args.to_vec()));
    command
}

/// `{ "$eval": "<name>(<args>)" }`
fn call_command(name: &str, args: &[Value]) -> Document {
    let mut command = Document::new();
    command.insert(EVAL_FIELD.to_string(), Value::String(call_expression(name, args)));
    command
}

/// Render a JavaScript call of `name`
///
/// Strings are single-quoted, everything else is inlined as JSON.
fn call_expression(name: &str, args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(render_arg).collect();
    format!("{name}({})", rendered.join(", "))
}

fn render_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => quote(s),
        other => other.to_string(),
    }
}

/// Single-quoted JavaScript string literal
///
/// Line terminators are not allowed raw inside a literal, so they are
/// escaped along with the delimiter and backslash.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Name usable as a bare JavaScript callee: `[A-Za-z_$][A-Za-z0-9_$]*`
/// (Unicode letters and digits allowed)
fn require_identifier(name: &str) -> Result<(), ScriptError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$');
    if valid_start && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return Ok(());
    }
    tracing::warn!("Rejected script name '{}' for call", name);
    Err(ScriptError::invalid_argument(format!(
        "script name '{name}' is not a JavaScript identifier"
    )))
}

fn retval(mut reply: Document) -> Value {
    reply.remove(RETVAL_FIELD).unwrap_or(Value::Null)
}
