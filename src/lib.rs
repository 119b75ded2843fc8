// Copyright 2025-2026 the jvmscope contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]

//! # jvmscope
//!
//! A fast JVM classfile header parser and class graph builder, in pure Rust.
//! `jvmscope` reads only the structural prefix of each classfile — constant pool,
//! access flags, super-type and interface references, field descriptors, class
//! annotations — and cross-links the results into a queryable type graph, without ever
//! touching method bodies or requiring a JVM.
//!
//! # Architecture
//!
//! The library is organized in dependency order, leaves first:
//!
//! - **File layer** ([`crate::file`]) - Growable buffered reading over classfile byte
//!   streams, with absolute-offset access into the buffered prefix
//! - **Metadata layer** ([`crate::metadata`]) - Constant pool indexing, modified UTF-8
//!   decoding, descriptor/signature extraction, and the classfile header parser
//!   producing one [`crate::metadata::UnlinkedClass`] record per accepted file
//! - **Graph layer** ([`crate::graph`]) - Single-threaded cross-linking of records into
//!   [`crate::graph::ClassInfo`] nodes, plus direct, transitive and category-filtered
//!   queries over the finished [`crate::graph::ClassGraph`]
//! - **Scan driver** ([`crate::scan`]) - Parallel parse / sequential link orchestration
//!
//! Classpath discovery and archive walking are deliberately out of scope: the caller
//! supplies `(relative_path, byte_stream)` pairs (with duplicate paths already masked)
//! and receives the graph.
//!
//! # Usage Examples
//!
//! ## Scanning a set of classfiles
//!
//! ```rust,no_run
//! use jvmscope::metadata::{PrefixBlacklist, ScanOptions, StaticFieldMatches};
//! use jvmscope::scan::scan_classfiles;
//! use std::sync::Arc;
//!
//! let entries = vec![
//!     ("com/example/App.class".to_string(), std::fs::File::open("classes/com/example/App.class")?),
//!     ("com/example/Widget.class".to_string(), std::fs::File::open("classes/com/example/Widget.class")?),
//! ];
//! let graph = scan_classfiles(
//!     entries,
//!     Arc::new(PrefixBlacklist::system_default()),
//!     Arc::new(StaticFieldMatches::default()),
//!     ScanOptions::default(),
//! )?;
//!
//! for name in graph.subclasses_of("com.example.Widget") {
//!     println!("widget subclass: {name}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Driving the parser and linker directly
//!
//! ```rust,no_run
//! use jvmscope::prelude::*;
//! use std::sync::Arc;
//!
//! let intern = Arc::new(InternTable::new());
//! let mut parser = ClassfileParser::new(
//!     Arc::new(AcceptAll),
//!     Arc::new(StaticFieldMatches::default()),
//!     intern.clone(),
//!     ScanOptions::default(),
//! );
//! let mut builder = ClassGraphBuilder::new(intern);
//! let mut input = std::fs::File::open("classes/com/example/App.class")?;
//! if let Some(record) = parser.parse(&mut input, "com/example/App.class") {
//!     builder.link(&record)?;
//! }
//! let graph = builder.build();
//! println!("{} classes known", graph.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error Handling
//!
//! Per-classfile problems (bad magic, malformed constant pool, truncated streams) are
//! contained inside the parser entry point: the file is discarded, a deferred log entry
//! records why, and the scan continues. Only protocol violations — the same class
//! delivered twice to the linker — surface as [`Error`] from a scan. See [`Error`] for
//! the full taxonomy.
//!
//! # Thread Safety
//!
//! Parser instances are single-threaded but independent; any number may run in parallel
//! over distinct classfiles, sharing only the concurrent
//! [`crate::metadata::InternTable`]. Linking is single-threaded by design, and the
//! finished graph is immutable.

#[macro_use]
pub(crate) mod error;

pub mod file;
pub mod graph;
pub mod metadata;
pub mod prelude;
pub mod scan;

pub use error::Error;

/// The result type used throughout jvmscope.
pub type Result<T> = std::result::Result<T, Error>;
