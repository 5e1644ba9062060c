//! # quarry
//!
//! A dialect-aware SQL compiler for relational persistence engines.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        VendorProbe / Settings (quarry.toml)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [detect / resolve_profile]
//! ┌─────────────────────────────────────────────────────────┐
//! │   DialectProfile (capabilities, quirks, clauses, types)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!            ┌─────────────┼──────────────┐
//!            ▼             ▼              ▼
//!      QueryBuilder    bulk rewrite    DdlCompiler
//!   (JoinGraph, range,  (DELETE /     (CREATE / ALTER
//!    lock, expr)         UPDATE)        / DROP)
//!            │             │              │
//!            ▼             ▼              ▼
//!     CompiledSelect   BulkStatement   Vec<String>
//! ```
//!
//! Schema descriptors ([`schema`]) come from reflection elsewhere; the
//! compiler only reads them.

pub mod config;
pub mod error;
pub mod schema;
pub mod sql;

pub use error::{CompileError, CompileResult};
pub use sql::dialect;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::error::{CompileError, CompileResult};
    pub use crate::schema::{
        Column, ForeignKey, Index, PrimaryKey, ReferentialAction, Sequence, Table, Unique,
    };
    pub use crate::sql::bulk::{self, BulkKind, BulkStatement};
    pub use crate::sql::ddl::DdlCompiler;
    pub use crate::sql::dialect::{Capability, DialectProfile, JoinSyntax, Vendor, VendorProbe};
    pub use crate::sql::expr::{
        // Constructors
        avg,
        col,
        count,
        count_distinct,
        count_star,
        exists,
        lit_bool,
        lit_float,
        lit_int,
        lit_null,
        lit_str,
        max,
        min,
        not_exists,
        param,
        sum,
        // Types
        Expr,
        ExprExt,
        Literal,
    };
    pub use crate::sql::join::{Alias, JoinKind, JoinPath, Relation, ScopeId};
    pub use crate::sql::lock::{IsolationLevel, LockRequest};
    pub use crate::sql::select::{CompiledSelect, QueryBuilder};
    pub use crate::sql::types::TypeCode;
}
