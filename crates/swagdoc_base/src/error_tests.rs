/* 📖 # Why use a separate file for these error tests?

The test cases verify span traces which refer to the spans entered in this file.

Keeping them apart from the main error module keeps that module readable and lets the
tests install their own tracing subscriber.
*/

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::{ResultExt, SwagdocError, SwagdocResult};
    use expect_test::expect;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;
    use tracing::span;
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // 📖 # Why set up a subscriber in the test?
    // SpanTrace::capture() requires an active tracing subscriber to record span information.
    // We use the `try_init()` variant to handle multiple tests running concurrently.
    fn setup_tracing_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(ErrorLayer::default())
            .try_init();
    }

    #[test]
    fn test_error_from_file_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let path = PathBuf::from("api.yml");
        let error = SwagdocError::new(ErrorKind::FileError {
            path: path.clone(),
            source: io_err,
        });

        match error.kind() {
            ErrorKind::FileError { path: p, .. } => assert_eq!(p, &path),
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn test_error_context_attachment() {
        let error = SwagdocError::message("original error")
            .context("first context")
            .with_context(|| "second context".to_string());

        assert_eq!(error.get_context().len(), 2);
        assert_eq!(error.get_context()[0], "first context");
        assert_eq!(error.get_context()[1], "second context");
    }

    #[test]
    fn test_error_display_with_multiple_contexts() {
        let error = SwagdocError::message("root error")
            .context("first")
            .context("second");
        assert_eq!(error.to_string(), "first: second: root error");
    }

    #[test]
    fn test_error_display_variants() {
        assert_eq!(
            SwagdocError::configuration("'basePath' is required.").to_string(),
            "Configuration error: 'basePath' is required."
        );
        assert_eq!(
            SwagdocError::new(ErrorKind::UnsupportedFormat {
                path: "api.txt".to_string(),
                extension: ".txt".to_string(),
            })
            .to_string(),
            "Unsupported extension '.txt' for api.txt"
        );
        assert_eq!(
            SwagdocError::parse("api.js", "bad yaml").to_string(),
            "Failed to parse api.js: bad yaml"
        );
        assert_eq!(
            SwagdocError::not_found("/unknown").to_string(),
            "Resource not found: /unknown"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(SwagdocError::not_found("x").is_not_found());
        assert!(!SwagdocError::message("x").is_not_found());
    }

    #[test]
    fn test_error_source_and_root_cause() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let file_error = SwagdocError::new(ErrorKind::FileError {
            path: PathBuf::from("api.js"),
            source: io_err,
        });
        assert!(file_error.source().is_some());
        assert_eq!(file_error.root_cause().to_string(), "access denied");

        let message = SwagdocError::message("test");
        assert!(message.source().is_none());
        assert_eq!(message.root_cause().to_string(), "test");
    }

    #[test]
    fn test_caused_by_is_the_source() {
        let error = SwagdocError::message("outer").caused_by(SwagdocError::message("inner"));
        assert_eq!(error.source().map(|e| e.to_string()), Some("inner".to_string()));
        assert_eq!(error.root_cause().to_string(), "inner");
    }

    #[test]
    fn test_result_ext_chaining() {
        let result: SwagdocResult<i32> = Err(Box::new(SwagdocError::message("root")));
        let err = result
            .context("step 1")
            .with_context(|| "step 2".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "step 1: step 2: root");
    }

    #[test]
    fn test_result_ext_success_untouched() {
        let result: SwagdocResult<i32> = Ok(42);
        assert_eq!(result.context("unused").unwrap(), 42);
    }

    #[test]
    fn test_err_and_bail_macros() {
        fn fails(name: &str) -> SwagdocResult<()> {
            crate::bail!("no resource named {}", name);
        }
        let err = fails("login").unwrap_err();
        assert_eq!(err.to_string(), "no resource named login");

        let boxed: Box<SwagdocError> = crate::err!("code {}", 7);
        assert_eq!(boxed.to_string(), "code 7");
    }

    #[test]
    fn test_debug_tree_without_spans() {
        let inner = SwagdocError::message("inner error").context("reading api.yml");
        let error = SwagdocError::message("outer error")
            .context("discovering sources")
            .caused_by(inner);

        expect![[r#"
            outer error
            ├─ discovering sources
            └─ cause: inner error
               └─ reading api.yml

        "#]]
        .assert_debug_eq(&error);
    }

    #[test]
    fn test_span_trace_captures_entered_span() {
        setup_tracing_subscriber();

        let discovery_span = span!(tracing::Level::DEBUG, "discovery");
        let _guard = discovery_span.enter();

        let error = SwagdocError::message("something went wrong");
        let trace = error.span_trace().to_string();
        assert!(trace.contains("discovery"), "unexpected trace: {}", trace);
        assert!(format!("{:?}", error).contains("Trace:"));
    }
}
