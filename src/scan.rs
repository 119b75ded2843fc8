//! Parallel scan driver: parse classfiles on a thread pool, then link on one thread.
//!
//! The parser carries thread-confined scratch state (byte buffer, constant-pool index,
//! deferred log), so the natural parallel shape is one parser per batch of input. The
//! entry sequence is split into fixed contiguous chunks, each chunk is parsed by its own
//! [`ClassfileParser`] on the rayon pool, and the single-threaded linker then flushes
//! each chunk's deferred log and links its records in input order, keeping both the log
//! and the resulting graph deterministic for a given input sequence.

use std::io::Read;
use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    graph::{ClassGraph, ClassGraphBuilder},
    metadata::{
        filter::ScanFilter,
        intern::InternTable,
        parser::{ClassfileParser, ScanOptions, StaticFieldMatches},
        unlinked::UnlinkedClass,
    },
    Result,
};

/// Parse a sequence of `(relative_path, byte_stream)` classfile entries in parallel and
/// link them into a [`ClassGraph`].
///
/// The classpath walker supplying `entries` is required to have masked duplicate
/// relative paths; a duplicate that leaks through surfaces as
/// [`crate::Error::DuplicateClass`]. Individual malformed classfiles are discarded and
/// logged without failing the scan.
///
/// # Errors
/// Returns [`crate::Error::DuplicateClass`] when the same class (or the same Scala
/// auxiliary form of it) is delivered twice.
///
/// # Examples
///
/// ```rust
/// use jvmscope::metadata::{AcceptAll, ScanOptions, StaticFieldMatches};
/// use jvmscope::scan::scan_classfiles;
/// use std::sync::Arc;
///
/// let entries: Vec<(String, Vec<u8>)> = Vec::new();
/// let graph = scan_classfiles(
///     entries.into_iter().map(|(path, bytes)| (path, std::io::Cursor::new(bytes))),
///     Arc::new(AcceptAll),
///     Arc::new(StaticFieldMatches::default()),
///     ScanOptions::default(),
/// )?;
/// assert!(graph.is_empty());
/// # Ok::<(), jvmscope::Error>(())
/// ```
pub fn scan_classfiles<I, R>(
    entries: I,
    filter: Arc<dyn ScanFilter>,
    matches: Arc<StaticFieldMatches>,
    options: ScanOptions,
) -> Result<ClassGraph>
where
    I: IntoIterator<Item = (String, R)>,
    R: Read + Send,
{
    let entries: Vec<(String, R)> = entries.into_iter().collect();
    let chunk_size = (entries.len() / rayon::current_num_threads()).max(1);
    let intern = Arc::new(InternTable::new());
    let batches: Vec<ParsedBatch> = entries
        .into_par_iter()
        .chunks(chunk_size)
        .map(|chunk| {
            let mut parser =
                ClassfileParser::new(filter.clone(), matches.clone(), intern.clone(), options);
            let mut records = Vec::new();
            for (relative_path, mut input) in chunk {
                if let Some(record) = parser.parse(&mut input, &relative_path) {
                    records.push(record);
                }
            }
            ParsedBatch {
                records,
                log: parser.take_log(),
            }
        })
        .collect();

    link_batches(batches, intern)
}

/// Sequential variant of [`scan_classfiles`], for callers that already sit on a worker
/// thread or scan a handful of files.
///
/// # Errors
/// Returns [`crate::Error::DuplicateClass`] when the same class is delivered twice.
pub fn scan_classfiles_sequential<I, R>(
    entries: I,
    filter: Arc<dyn ScanFilter>,
    matches: Arc<StaticFieldMatches>,
    options: ScanOptions,
) -> Result<ClassGraph>
where
    I: IntoIterator<Item = (String, R)>,
    R: Read,
{
    let intern = Arc::new(InternTable::new());
    let mut parser = ClassfileParser::new(filter, matches, intern.clone(), options);
    let mut records = Vec::new();
    for (relative_path, mut input) in entries {
        if let Some(record) = parser.parse(&mut input, &relative_path) {
            records.push(record);
        }
    }
    let batch = ParsedBatch {
        records,
        log: parser.take_log(),
    };
    link_batches(vec![batch], intern)
}

/// One worker's output: its records in input order plus its deferred log.
struct ParsedBatch {
    records: Vec<UnlinkedClass>,
    log: crate::metadata::log::DeferredLog,
}

fn link_batches(batches: Vec<ParsedBatch>, intern: Arc<InternTable>) -> Result<ClassGraph> {
    let mut builder = ClassGraphBuilder::new(intern);
    for mut batch in batches {
        batch.log.flush();
        builder.link_all(&batch.records)?;
    }
    Ok(builder.build())
}
