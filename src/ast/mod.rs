//! Query and statement AST.
//!
//! - [`PredicateNode`]: the parsed, schema-agnostic filter tree.
//! - [`QuerySpec`]: selection, sort, paging and filter of one request.
//! - [`Statement`]: the compiled, dialect-aware statement handle.

pub mod operators;
pub mod predicate;
pub mod query;
pub mod statement;
pub mod values;

pub use operators::*;
pub use predicate::PredicateNode;
pub use query::{PageSpec, QuerySpec, SortTerm};
pub use statement::*;
pub use values::Value;
