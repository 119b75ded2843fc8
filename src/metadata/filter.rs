//! Scan filtering: deciding which referenced type names are in scope.

/// Predicate deciding whether a referenced type name is in scope for the scan.
///
/// The parser consults the filter before recording any superclass, interface,
/// annotation or field-type name, so rejected names never reach the class graph.
/// Implementations must be cheap: the filter runs on every name of every classfile.
pub trait ScanFilter: Send + Sync {
    /// True when `class_name` (dotted form) should be recorded.
    fn is_allowed(&self, class_name: &str) -> bool;
}

impl<F> ScanFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_allowed(&self, class_name: &str) -> bool {
        self(class_name)
    }
}

/// A filter that accepts every name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ScanFilter for AcceptAll {
    fn is_allowed(&self, _class_name: &str) -> bool {
        true
    }
}

/// A filter that rejects names under a fixed set of package prefixes.
///
/// # Examples
///
/// ```rust
/// use jvmscope::metadata::{PrefixBlacklist, ScanFilter};
///
/// let filter = PrefixBlacklist::system_default();
/// assert!(!filter.is_allowed("java.lang.Object"));
/// assert!(filter.is_allowed("com.example.Widget"));
/// ```
#[derive(Debug, Clone)]
pub struct PrefixBlacklist {
    prefixes: Vec<String>,
}

impl PrefixBlacklist {
    /// Create a blacklist from dotted package prefixes, e.g. `"com.example."`.
    #[must_use]
    pub fn new(prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        PrefixBlacklist {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// The conventional system-package blacklist (`java.*` and `sun.*`), which keeps
    /// JRE-internal supertypes and the `java.lang.annotation` meta-annotations out of
    /// scan results.
    #[must_use]
    pub fn system_default() -> Self {
        PrefixBlacklist::new(["java.", "sun."])
    }
}

impl ScanFilter for PrefixBlacklist {
    fn is_allowed(&self, class_name: &str) -> bool {
        !self
            .prefixes
            .iter()
            .any(|prefix| class_name.starts_with(prefix))
    }
}
