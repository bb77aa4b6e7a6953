//! Data model over CMake's file-API codemodel.
//!
//! One [`snapshot::Snapshot`] is an immutable description of a build tree's
//! projects, directories, and targets for a single configuration, together
//! with the derived dependency records the graph reduction works on.
//!
//! Loading is two-phase: [`snapshot::RawSnapshot::load`] performs every file
//! read eagerly (a missing detail document fails the run before any entity
//! exists), then [`snapshot::Snapshot::assemble`] builds entities and resolves
//! dependency ids without touching the filesystem again.

pub mod api;
pub mod entity;
pub mod schema;
pub mod snapshot;

pub use cmgraph_error::{Error, ErrorKind, Result};
pub use entity::{
    CompileGroup, DefinitionSite, Dependency, Directory, Marker, Project, Target, TargetType,
};
pub use snapshot::{RawSnapshot, Snapshot, SnapshotOptions, load_snapshots};
