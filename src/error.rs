use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Per-classfile parse errors
/// - [`Error::Malformed`] - Corrupted or structurally invalid classfile
/// - [`Error::UnexpectedEof`] - Classfile stream ended before a required byte
/// - [`Error::Empty`] - Empty input provided where a classfile was expected
/// - [`Error::Io`] - I/O failure on the underlying byte stream
///
/// These are caught inside the parser entry point: a malformed classfile is
/// discarded and logged, and the scan continues with the next file.
///
/// ## Protocol errors
/// - [`Error::DuplicateClass`] - The same class was delivered to the linker
///   twice; duplicate masking is the responsibility of the classpath walker,
///   so this escapes as a fatal scan error.
///
/// # Examples
///
/// ```rust
/// use jvmscope::Error;
///
/// fn report(err: &Error) {
///     match err {
///         Error::Malformed { message, file, line } => {
///             eprintln!("malformed classfile: {} ({}:{})", message, file, line);
///         }
///         Error::DuplicateClass(name) => {
///             eprintln!("class {} encountered twice on the classpath", name);
///         }
///         other => eprintln!("{}", other),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The classfile is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was
    /// detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The classfile stream ended while required bytes were still unread.
    #[error("Premature end of input while reading classfile")]
    UnexpectedEof,

    /// Provided input was empty.
    #[error("Provided classfile stream was empty")]
    Empty,

    /// I/O error on the underlying byte stream.
    ///
    /// Wraps standard I/O errors from the classfile source (filesystem,
    /// archive entry, or any other `Read` implementation).
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The same class was delivered to the linker more than once.
    ///
    /// Classpath masking is required to happen before classfiles reach the
    /// parser, so a duplicate scanned class is an invariant violation rather
    /// than a recoverable per-file condition. The associated value is the
    /// dotted class name that was seen twice.
    #[error("Class {0} was scanned twice; classpath masking should prevent this")]
    DuplicateClass(String),
}
