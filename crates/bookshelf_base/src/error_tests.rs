// Span traces contain file names and line numbers, so the tests asserting on
// them live in their own file where the error module's line churn cannot
// reach, and only check stable substrings.

#[cfg(test)]
mod tests {
    use crate::{BookshelfError, BookshelfResult, ResultExt};
    use tracing::{span, warn_span};
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    /// Set up tracing with ErrorLayer for tests.
    /// Uses `try_init()` to handle multiple tests running concurrently.
    fn setup_tracing_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(ErrorLayer::default())
            .try_init();
    }

    #[test]
    fn test_span_trace_records_active_span() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::DEBUG, "registering_book", book_id = 42);
        let _guard = operation_span.enter();

        let error = BookshelfError::message("test error message");
        let trace = format!("{}", error.span_trace());

        assert!(
            trace.contains("registering_book"),
            "span trace was: {trace}"
        );
        assert!(trace.contains("book_id=42"), "span trace was: {trace}");
    }

    #[test]
    fn test_span_trace_survives_context_attachment() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::INFO, "updating_book");
        let _guard = operation_span.enter();

        let result: BookshelfResult<()> = Err(Box::new(BookshelfError::message("base error")));
        let error = result
            .context("operation failed")
            .with_context(|| "additional context".to_string())
            .unwrap_err();

        assert_eq!(
            error.context_lines(),
            ["operation failed", "additional context"]
        );

        let trace = format!("{}", error.span_trace());
        assert!(trace.contains("updating_book"), "span trace was: {trace}");
    }

    #[test]
    fn test_debug_format_lists_context_branches() {
        setup_tracing_subscriber();

        let operation_span = span!(tracing::Level::DEBUG, "listing_books");
        let _guard = operation_span.enter();

        let error = BookshelfError::message("something went wrong")
            .context("during request handling")
            .context("in accept loop");
        let debug = format!("{:?}", error);

        assert!(debug.starts_with("something went wrong\n"), "debug was: {debug}");
        assert!(debug.contains("├─ during request handling"), "debug was: {debug}");
        assert!(debug.contains("└─ in accept loop"), "debug was: {debug}");
        assert!(debug.contains("Trace:"), "debug was: {debug}");
        assert!(debug.contains("listing_books"), "debug was: {debug}");
    }

    #[test]
    fn test_debug_format_nests_cause_chain() {
        setup_tracing_subscriber();

        let operation_span = warn_span!("outer_operation");
        let _guard = operation_span.enter();

        let inner = BookshelfError::message("inner error").context("inner context");
        let outer = BookshelfError::message("outer error")
            .context("outer context")
            .caused_by(inner);
        let debug = format!("{:?}", outer);

        assert!(debug.starts_with("outer error\n"), "debug was: {debug}");
        assert!(debug.contains("├─ outer context"), "debug was: {debug}");
        assert!(debug.contains("└─ cause: inner error"), "debug was: {debug}");
        assert!(debug.contains("   └─ inner context"), "debug was: {debug}");
    }
}
