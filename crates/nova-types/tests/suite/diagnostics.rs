use nova_types::{Diagnostic, Severity, Span};

use pretty_assertions::assert_eq;

#[test]
fn diagnostics_serialize_with_lowercase_severity() {
    let diagnostic = Diagnostic::error("LAMBDA_RETURN", "Missing return value", Some(Span::new(4, 9)));

    let json = serde_json::to_value(&diagnostic).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "severity": "error",
            "code": "LAMBDA_RETURN",
            "message": "Missing return value",
            "span": { "start": 4, "end": 9 },
        })
    );
}

#[test]
fn span_len_saturates() {
    let span = Span::new(10, 4);
    assert_eq!(span.len(), 0);
    assert!(span.is_empty());
    assert_eq!(Diagnostic::warning("W", "w", None).severity, Severity::Warning);
}
