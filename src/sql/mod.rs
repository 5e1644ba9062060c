//! SQL generation.
//!
//! - [`dialect`] - vendor profiles, capabilities and detection
//! - [`types`] - column type names per profile
//! - [`identifier`] - identifier shortening and uniqueness
//! - [`join`] - alias allocation and join graphs
//! - [`expr`] - expression tree and rendering
//! - [`select`] - SELECT builder and renderer
//! - [`range`] - row-range (pagination) strategies
//! - [`lock`] - pessimistic lock clauses
//! - [`bulk`] - bulk DELETE / UPDATE rewriting
//! - [`ddl`] - schema DDL
//! - [`token`] - token types every statement is built from

pub mod bulk;
pub mod ddl;
pub mod dialect;
pub mod expr;
pub mod identifier;
pub mod join;
pub mod lock;
pub mod range;
pub mod select;
pub mod token;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use bulk::{BulkKind, BulkStatement};
pub use ddl::DdlCompiler;
pub use dialect::{Capability, DialectProfile, JoinSyntax, NameKind, Vendor, VendorProbe};
pub use expr::{
    avg, col, count, count_distinct, count_star, exists, lit_bool, lit_float, lit_int, lit_null,
    lit_str, max, min, not_exists, param, sum, BinaryOperator, Expr, ExprExt, Literal,
    UnaryOperator,
};
pub use identifier::{IdentifierValidator, NameSet};
pub use join::{Alias, JoinGraph, JoinKind, JoinPath, Relation, ScopeId};
pub use lock::{IsolationLevel, LockRequest};
pub use range::RangeSpec;
pub use select::{CompiledSelect, OutputColumn, QueryBuilder};
pub use token::{Token, TokenStream};
pub use types::{TypeCatalog, TypeCode};
