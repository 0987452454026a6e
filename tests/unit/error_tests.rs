//! Unit tests for `AppError` display format and kind labels.

use approval_relay::AppError;

#[test]
fn display_prefixes_kind() {
    assert_eq!(AppError::Slack("boom".into()).to_string(), "slack: boom");
    assert_eq!(AppError::Codec("bad".into()).to_string(), "codec: bad");
    assert_eq!(
        AppError::Signature("mismatch".into()).to_string(),
        "signature: mismatch"
    );
    assert_eq!(AppError::Payload("x".into()).to_string(), "payload: x");
}

#[test]
fn kind_matches_display_prefix() {
    let errors = [
        AppError::Config("a".into()),
        AppError::Slack("a".into()),
        AppError::Signature("a".into()),
        AppError::Payload("a".into()),
        AppError::Codec("a".into()),
        AppError::Io("a".into()),
    ];
    for err in &errors {
        assert!(
            err.to_string().starts_with(&format!("{}:", err.kind())),
            "display of {err:?} must start with its kind"
        );
    }
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
    let err: AppError = io.into();
    assert!(matches!(err, AppError::Io(_)));
    assert!(err.to_string().contains("port taken"));
}

#[test]
fn implements_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&AppError::Io("x".into()));
}
