//! # cmgraph-error
//!
//! Unified error handling for cmgraph.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what invariant broke (e.g., UnresolvedDependencyId)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use cmgraph_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::UnresolvedDependencyId, "no target with this id")
//!         .with_operation("snapshot::resolve_dependencies")
//!         .with_context("target", "app")
//!         .with_context("dependency_id", "libfoo::@6890427a1f51a3e7e1df"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible functions return `Result<T, cmgraph_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using cmgraph Error
pub type Result<T> = std::result::Result<T, Error>;
