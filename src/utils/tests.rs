use std::time::Duration;

use super::BrokerError;
use super::logging;

#[test]
fn logging_init_accepts_levels() {
    // Should not panic
    logging::init("info");
    logging::init("debug");
    logging::init("warn");
}

#[test]
fn test_parse_level_falls_back_to_info() {
    assert_eq!(logging::parse_level("WARNING"), tracing::Level::WARN);
    assert_eq!(logging::parse_level("trace"), tracing::Level::TRACE);
    assert_eq!(logging::parse_level("loud"), tracing::Level::INFO);
}

#[test]
fn test_rejected_displays_reason_verbatim() {
    let err = BrokerError::Rejected {
        reason: "no such topic".to_string(),
    };
    assert_eq!(err.to_string(), "no such topic");
}

#[test]
fn test_transport_classification() {
    assert!(BrokerError::connection("closed").is_transport());
    assert!(BrokerError::Timeout(Duration::from_millis(5)).is_transport());
    assert!(
        BrokerError::Io(std::io::Error::from(std::io::ErrorKind::BrokenPipe)).is_transport()
    );
    assert!(
        !BrokerError::Protocol {
            message: "status 3".to_string()
        }
        .is_transport()
    );
    assert!(!BrokerError::NotConnected { operation: "publish" }.is_transport());
}
