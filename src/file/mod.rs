//! Classfile byte-stream access.
//!
//! This module contains the low-level reading infrastructure shared by the metadata
//! layer:
//!
//! - [`crate::file::reader::ClassfileReader`] - Growable buffered reader over one
//!   classfile stream, with sequential and absolute-offset access
//! - [`crate::file::io`] - Big-endian primitive decoding used by the reader
//!
//! Input streams are owned by the caller; the reader only borrows them for the duration
//! of a single classfile parse. The backing buffer is likewise borrowed so that a parser
//! instance can reuse one allocation across many classfiles.

pub mod io;
pub mod reader;

pub use reader::{ClassfileReader, INITIAL_BUFFER_CHUNK_SIZE, SUBSEQUENT_BUFFER_CHUNK_SIZE};
