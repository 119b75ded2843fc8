//! # jvmscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the jvmscope library. Import this module to get quick access to the essential
//! types for classfile scanning.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all jvmscope operations
pub use crate::Error;

/// The result type used throughout jvmscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Parallel and sequential scan drivers
pub use crate::scan::{scan_classfiles, scan_classfiles_sequential};

/// The classfile header parser and its configuration
pub use crate::metadata::{ClassfileParser, ScanOptions, StaticFieldMatches};

// ================================================================================================
// File Layer
// ================================================================================================

/// Low-level buffered classfile reading
pub use crate::file::ClassfileReader;

// ================================================================================================
// Metadata Layer
// ================================================================================================

/// Scan filtering
pub use crate::metadata::{AcceptAll, PrefixBlacklist, ScanFilter};

/// Shared name interning
pub use crate::metadata::InternTable;

/// Parse output records and captured constants
pub use crate::metadata::{FieldConstant, UnlinkedClass};

/// Deferred per-parser logging
pub use crate::metadata::DeferredLog;

// ================================================================================================
// Class Graph
// ================================================================================================

/// Graph construction and querying
pub use crate::graph::{ClassGraph, ClassGraphBuilder};

/// Graph node types and query vocabulary
pub use crate::graph::{ClassCategory, ClassId, ClassInfo, Relation};
