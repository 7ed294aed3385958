use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # Why a custom error type and not use anyhow/eyre/thiserror etc?

- Better control over error handling
- No dependencies to compile and integrate
- More transparency into error handling logic

The variants mirror the failure classes of documentation discovery: configuration
problems refuse start-up, format and parse problems are scoped to one source location,
and NotFound is what the HTTP layer turns into a 404.
 */

/// Error variants that can occur in swagdoc operations.
/// Each variant represents a specific error category with its associated context.
#[derive(Debug)]
pub enum ErrorKind {
    /// File system operation failed
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A required configuration option is missing or invalid
    Configuration { message: String },

    /// A source location has a suffix no extraction strategy handles
    UnsupportedFormat { path: String, extension: String },

    /// A source file or annotation body could not be parsed
    Parse { path: String, message: String },

    /// The secondary source dialect could not be converted to the primary one
    Transpile { path: String, message: String },

    /// A requested resource does not exist
    NotFound { resource: String },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/* 📖 # Why separate ErrorKind and SwagdocError?
This two-layer design provides a clear separation of concerns:
- ErrorKind: structural variants with specific contexts (file paths, suffixes, etc.)
- SwagdocError: wraps ErrorKind with context strings, an optional cause and a span trace

Callers match on ErrorKind (the HTTP layer maps NotFound to 404) while propagation
sites attach context without nesting formatted strings.
*/

/// Comprehensive error type wrapping ErrorKind with optional context.
pub struct SwagdocError {
    kind: ErrorKind,
    context: Vec<String>,
    cause: Option<Box<SwagdocError>>,
    span_trace: SpanTrace,
}

impl SwagdocError {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            cause: None,
            span_trace: SpanTrace::capture(),
        }
    }

    /// Creates a catch-all error with the given message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration {
            message: message.into(),
        })
    }

    /// Creates a parse error for the given source path.
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Creates a not-found error for the given resource name.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound {
            resource: resource.into(),
        })
    }

    /// Attaches context to an error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    /// Useful to avoid expensive string construction for successful paths.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Records the error that caused this one.
    pub fn caused_by(mut self, cause: SwagdocError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Returns a reference to the underlying ErrorKind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the attached context strings, oldest first.
    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    /// Returns the span trace captured when the error was created.
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// Returns true if this error signals a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    /// Returns the innermost error in the chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    fn fmt_kind(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
            ErrorKind::UnsupportedFormat { path, extension } => {
                write!(f, "Unsupported extension '{}' for {}", extension, path)
            }
            ErrorKind::Parse { path, message } => {
                write!(f, "Failed to parse {}: {}", path, message)
            }
            ErrorKind::Transpile { path, message } => {
                write!(f, "Failed to transpile {}: {}", path, message)
            }
            ErrorKind::NotFound { resource } => write!(f, "Resource not found: {}", resource),
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        self.fmt_kind(f)?;
        writeln!(f)?;
        let branches = self.context.len() + usize::from(self.cause.is_some());
        for (i, ctx) in self.context.iter().enumerate() {
            let marker = if i + 1 == branches { "└─" } else { "├─" };
            writeln!(f, "{}{} {}", indent, marker, ctx)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "{}└─ cause: ", indent)?;
            cause.fmt_tree(f, &format!("{}   ", indent))?;
        }
        Ok(())
    }
}

impl From<ErrorKind> for SwagdocError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for SwagdocError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(cause) = &self.cause {
            return Some(cause.as_ref());
        }
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for SwagdocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in &self.context {
            write!(f, "{}: ", ctx)?;
        }
        self.fmt_kind(f)
    }
}

/* 📖 # Why a tree-shaped Debug output?

Errors surface in logs and in `main`. Printing the message first, then the context chain
and causes as a tree, then the span trace keeps the most relevant line on top while
still showing where in the discovery pipeline the error happened.
*/
impl fmt::Debug for SwagdocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, "")?;
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            write!(f, "Trace: {}", self.span_trace)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/* 📖 # Why use Box<SwagdocError> in the result type?

Boxing the error reduces the size of the result type, making it more efficient to return in the common case.
*/

/// Standard result type for swagdoc operations.
pub type SwagdocResult<T> = std::result::Result<T, Box<SwagdocError>>;

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    fn context(self, context: impl Into<String>) -> SwagdocResult<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    fn with_context<F>(self, f: F) -> SwagdocResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for SwagdocResult<T> {
    fn context(self, context: impl Into<String>) -> SwagdocResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> SwagdocResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}

/// Creates a boxed message error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::SwagdocError::message(format!($($arg)*)))
    };
}

/// Returns early with a boxed message error from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}
