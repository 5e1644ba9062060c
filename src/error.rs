//! Compilation errors.
//!
//! Every failure is raised while building or rendering, before any SQL text
//! leaves the compiler. A statement is either complete or not produced.

use crate::sql::dialect::Capability;

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while compiling SQL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The active dialect cannot express a requested feature.
    #[error("{dialect} does not support {capability}")]
    CapabilityUnsupported {
        capability: Capability,
        dialect: String,
    },

    /// An identifier exceeds the dialect's limit for its kind.
    #[error("name \"{name}\" is {length} characters long; the maximum is {max}")]
    NameTooLong {
        name: String,
        length: usize,
        max: usize,
    },

    /// Every candidate derived from a name is already taken.
    #[error("no unique name can be derived from \"{name}\"")]
    NameSpaceExhausted { name: String },

    /// Internal invariant violation: an alias or scope was never created.
    #[error("alias resolution failed: {0}")]
    AliasResolution(String),

    /// A native outer join was requested over constant-valued key columns.
    #[error("native outer join to {table} cannot carry constant join columns")]
    NativeJoinConstant { table: String },

    /// NaN and infinities have no SQL literal form.
    #[error("float literal {value} has no SQL representation")]
    NonFiniteLiteral { value: String },
}

impl CompileError {
    pub(crate) fn unsupported(capability: Capability, dialect: impl Into<String>) -> Self {
        CompileError::CapabilityUnsupported {
            capability,
            dialect: dialect.into(),
        }
    }

    /// Whether this error reports a missing dialect capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CompileError::CapabilityUnsupported { .. })
    }
}
