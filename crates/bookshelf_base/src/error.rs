use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use tracing_error::SpanTrace;

/// The error categories bookshelf operations can raise.
#[derive(Debug)]
pub enum ErrorKind {
    /// A file system operation failed; carries the path it failed on.
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catch-all for everything that is only a message.
    Message { message: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::FileError { path, source } => {
                write!(f, "file error at {}: {}", path.display(), source)
            }
            ErrorKind::Message { message } => f.write_str(message),
        }
    }
}

/// The repository-wide error type.
///
/// Wraps an [`ErrorKind`] with context strings collected while the error
/// propagates, an optional causing error, and the span trace captured where
/// the error was constructed. Context reads outermost-first in `Display`,
/// so `load config: read file: permission denied` tells the whole story.
pub struct BookshelfError {
    kind: ErrorKind,
    context: Vec<String>,
    cause: Option<Box<BookshelfError>>,
    span_trace: SpanTrace,
}

impl BookshelfError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            cause: None,
            span_trace: SpanTrace::capture(),
        }
    }

    /// Shorthand for a [`ErrorKind::Message`] error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Attach a context line. Earlier attachments display first.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attach a context line built by a closure.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Record another error as the cause of this one.
    pub fn caused_by(mut self, cause: BookshelfError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// The category this error belongs to, for pattern matching.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The attached context lines, oldest first.
    pub fn context_lines(&self) -> &[String] {
        &self.context
    }

    /// The span trace captured when the error was constructed.
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// Walk the source chain down to the innermost error.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    fn write_branches(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = " ".repeat(indent);
        let branches = self.context.len() + usize::from(self.cause.is_some());
        for (i, context) in self.context.iter().enumerate() {
            let connector = if i + 1 == branches { "└─" } else { "├─" };
            writeln!(f, "{pad}{connector} {context}")?;
        }
        if let Some(cause) = &self.cause {
            writeln!(f, "{pad}└─ cause: {}", cause.kind)?;
            cause.write_branches(f, indent + 3)?;
        }
        Ok(())
    }
}

impl From<ErrorKind> for BookshelfError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for BookshelfError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            ErrorKind::Message { .. } => self
                .cause
                .as_ref()
                .map(|cause| cause.as_ref() as &(dyn StdError + 'static)),
        }
    }
}

/// One line: context outermost-first, then the kind.
impl fmt::Display for BookshelfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for context in &self.context {
            write!(f, "{context}: ")?;
        }
        write!(f, "{}", self.kind)
    }
}

/// Diagnostic format: the message, the context and cause tree, then the
/// captured span trace.
impl fmt::Debug for BookshelfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        self.write_branches(f, 0)?;
        writeln!(f, "Trace: {}", self.span_trace)
    }
}

/// Result alias used throughout the repository.
///
/// The error is boxed so the `Ok` path stays small to return.
pub type BookshelfResult<T> = std::result::Result<T, Box<BookshelfError>>;

/// Creates a boxed catch-all error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::error::BookshelfError::message(format!($($arg)*)))
    };
}

/// Context attachment for results on their way up the call stack.
pub trait ResultExt<T> {
    /// Attach context to the error, if any. The string is built eagerly.
    fn context(self, context: impl Into<String>) -> BookshelfResult<T>;

    /// Attach context to the error, if any. The closure only runs on the
    /// error path, so the success path pays no formatting cost.
    fn with_context<F>(self, f: F) -> BookshelfResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for BookshelfResult<T> {
    fn context(self, context: impl Into<String>) -> BookshelfResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> BookshelfResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}
