//! Concurrent string interning for class and field names.
//!
//! A scan touches the same package and class names thousands of times (every subclass
//! repeats its superclass name, every field its type names). Interning collapses those
//! repetitions to one shared allocation, so that records and graph nodes compare names
//! by pointer-equal `Arc<str>` handles and the peak memory of a large scan stays flat.

use std::sync::Arc;

use dashmap::DashMap;

/// A concurrent deduplicating table of strings.
///
/// Safe to share between parser threads and the linker; insertion uses put-if-absent
/// semantics so concurrent interns of the same string converge on a single allocation.
///
/// # Examples
///
/// ```rust
/// use jvmscope::metadata::InternTable;
/// use std::sync::Arc;
///
/// let table = InternTable::new();
/// let a = table.intern("com.example.Widget");
/// let b = table.intern("com.example.Widget");
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Default)]
pub struct InternTable {
    strings: DashMap<Arc<str>, ()>,
}

impl InternTable {
    /// Create an empty intern table.
    #[must_use]
    pub fn new() -> Self {
        InternTable {
            strings: DashMap::new(),
        }
    }

    /// Return the canonical shared handle for `s`, inserting it if absent.
    ///
    /// Two calls with equal input return pointer-identical handles, regardless of which
    /// thread made them.
    pub fn intern(&self, s: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(s) {
            return existing.key().clone();
        }
        let candidate: Arc<str> = Arc::from(s);
        // put-if-absent: if another thread raced us here, the entry keeps their key and
        // our candidate is dropped
        let entry = self.strings.entry(candidate).or_insert(());
        entry.key().clone()
    }

    /// Number of distinct strings interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True when nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
