use tracing::Level;

// Installs the global subscriber, so it lives in its own test binary.
#[test]
fn test_rust_log_level_is_honoured() {
    std::env::set_var("RUST_LOG", "debug");
    gcodepath::init_logging(false).unwrap();

    assert!(tracing::enabled!(Level::DEBUG));
    assert!(!tracing::enabled!(Level::TRACE));
    assert!(gcodepath::init_logging(false).is_err());
}
