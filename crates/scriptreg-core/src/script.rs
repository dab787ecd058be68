//! Server-side script types
//!
//! Provides [`NamedScript`] and [`ExecutableScript`], the two shapes a
//! script takes on its way into the `system.js` collection, plus the
//! stored document form of a named script.

use crate::error::ScriptError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// Document exchanged with the store
pub type Document = Map<String, Value>;

/// Identifier field of a stored script
pub const ID_FIELD: &str = "_id";

/// Source field of a stored script
pub const VALUE_FIELD: &str = "value";

/// Anything carrying server-side JavaScript source
pub trait ServerSideScript {
    /// Script source
    fn code(&self) -> &str;
}

/// Anonymous script: source only, no name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutableScript {
    code: String,
}

impl ExecutableScript {
    /// Create new executable script
    #[inline]
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl ServerSideScript for ExecutableScript {
    fn code(&self) -> &str {
        &self.code
    }
}

impl Display for ExecutableScript {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Script stored under a name
///
/// The name is the document identity. A `NamedScript` can only be built
/// with a non-blank name and non-blank source.
///
/// Stored as `{ "_id": <name>, "value": <code> }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Document", into = "Document")]
pub struct NamedScript {
    name: String,
    code: String,
}

impl NamedScript {
    /// Create new named script
    ///
    /// # Errors
    /// Returns [`ScriptError::InvalidArgument`] if `name` or `code` is empty
    /// or blank.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Result<Self, ScriptError> {
        let name = name.into();
        let code = code.into();
        require_text(&name, "script name")?;
        require_text(&code, "script code")?;
        Ok(Self { name, code })
    }

    /// Name an executable script
    ///
    /// # Errors
    /// Returns [`ScriptError::InvalidArgument`] if `name` or the script
    /// source is empty or blank.
    pub fn from_executable(
        name: impl Into<String>,
        script: ExecutableScript,
    ) -> Result<Self, ScriptError> {
        Self::new(name, script.code)
    }

    /// Script name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drop the name, keeping the source
    #[inline]
    #[must_use]
    pub fn into_executable(self) -> ExecutableScript {
        ExecutableScript::new(self.code)
    }

    /// Stored document form
    #[must_use]
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(ID_FIELD.to_string(), Value::String(self.name.clone()));
        doc.insert(VALUE_FIELD.to_string(), Value::String(self.code.clone()));
        doc
    }
}

impl ServerSideScript for NamedScript {
    fn code(&self) -> &str {
        &self.code
    }
}

impl From<NamedScript> for Document {
    fn from(script: NamedScript) -> Self {
        let mut doc = Document::new();
        doc.insert(ID_FIELD.to_string(), Value::String(script.name));
        doc.insert(VALUE_FIELD.to_string(), Value::String(script.code));
        doc
    }
}

impl TryFrom<Document> for NamedScript {
    type Error = ScriptError;

    fn try_from(mut doc: Document) -> Result<Self, Self::Error> {
        let name = match doc.remove(ID_FIELD) {
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(ScriptError::invalid_document(format!(
                    "{ID_FIELD} must be a string, got {other}"
                )))
            }
            None => return Err(ScriptError::invalid_document(format!("missing {ID_FIELD}"))),
        };
        if name.trim().is_empty() {
            return Err(ScriptError::invalid_document(format!("blank {ID_FIELD}")));
        }

        let code = match doc.remove(VALUE_FIELD) {
            Some(Value::String(code)) => code,
            Some(other) => {
                return Err(ScriptError::invalid_document(format!(
                    "{VALUE_FIELD} of '{name}' must be a string, got {other}"
                )))
            }
            None => {
                return Err(ScriptError::invalid_document(format!(
                    "missing {VALUE_FIELD} for '{name}'"
                )))
            }
        };
        if code.trim().is_empty() {
            return Err(ScriptError::invalid_document(format!(
                "blank {VALUE_FIELD} for '{name}'"
            )));
        }

        Ok(Self { name, code })
    }
}

impl Display for NamedScript {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.code)
    }
}

/// Reject empty or whitespace-only text
pub(crate) fn require_text(value: &str, what: &str) -> Result<(), ScriptError> {
    if value.trim().is_empty() {
        tracing::warn!("Rejected blank {}", what);
        return Err(ScriptError::invalid_argument(format!(
            "{what} must not be empty"
        )));
    }
    Ok(())
}
