//! The cross-linked class graph and its query surface.
//!
//! Parsed [`crate::metadata::UnlinkedClass`] records are fed to a
//! [`ClassGraphBuilder`], which cross-links them into [`ClassInfo`] nodes connected by
//! [`Relation`] edges. Linking runs on a single thread; the finished [`ClassGraph`] is
//! immutable and supports direct-edge, transitive-reachability and category-filtered
//! queries, plus name-keyed conveniences such as
//! [`ClassGraph::subclasses_of`].
//!
//! Nodes exist for every dotted name ever observed — scanned classfiles and bare
//! references alike — with [`ClassInfo::classfile_scanned`] distinguishing the two.
//! Scala auxiliary classfiles (`Name$`, `Name$class`) merge into their base name's
//! node.

pub mod builder;
pub mod classinfo;

pub use builder::{ClassGraph, ClassGraphBuilder};
pub use classinfo::{scala_base_name, ClassCategory, ClassId, ClassInfo, Relation};
