pub mod error;
mod error_tests;
pub mod http;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{BookshelfError, BookshelfResult, ResultExt};
