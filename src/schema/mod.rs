//! Resolved schema descriptors.
//!
//! These are produced by schema reflection elsewhere and only read by the
//! compiler: table and column identity, type codes, sizes, nullability and
//! key membership.

mod keys;
mod table;

pub use keys::{ForeignKey, Index, PrimaryKey, ReferentialAction, Sequence, Unique};
pub use table::{Column, Table};
