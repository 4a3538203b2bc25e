//! Source-tree collaborator surface.
//!
//! The docs site reads a point-in-time snapshot of a remote repository
//! subset through a reflection layer. This crate defines the trait surface
//! the index pipeline consumes ([`SourceDirectory`], [`SourceFile`],
//! [`SourceExport`]) and an in-memory implementation ([`MemoryDirectory`])
//! used as a fixture by every downstream crate.
//!
//! Every piece of metadata is optional. The reflection layer can and does
//! omit titles, descriptions and commit dates, and consumers degrade to
//! partial data instead of failing.

mod error;
mod memory;
mod tree;

pub use error::{Result, TreeError};
pub use memory::{MemoryDirectory, MemoryExport, MemoryFile};
pub use tree::{SourceDirectory, SourceEntry, SourceExport, SourceFile};
