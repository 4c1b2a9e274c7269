use std::error::Error;

use doctor_sync_core::errors::{DecodeError, FetchError, SyncError, SyncResult, TransportError};

fn decode_error() -> DecodeError {
    DecodeError(serde_json::from_str::<Vec<i32>>("").unwrap_err())
}

#[test]
fn test_transport_error_display() {
    let request = TransportError::Request {
        url: "http://remote/api/doctors".to_string(),
        message: "connection refused".to_string(),
    };
    let status = TransportError::Status {
        url: "http://remote/api/doctors".to_string(),
        status: 503,
    };
    let empty = TransportError::EmptyBody {
        url: "http://remote/api/doctors/1/slots".to_string(),
    };

    assert_eq!(
        request.to_string(),
        "Request to http://remote/api/doctors failed: connection refused"
    );
    assert_eq!(
        status.to_string(),
        "Request to http://remote/api/doctors returned status 503"
    );
    assert_eq!(
        empty.to_string(),
        "Request to http://remote/api/doctors/1/slots returned an empty body"
    );
    assert_eq!(empty.url(), "http://remote/api/doctors/1/slots");
}

#[test]
fn test_decode_error_keeps_source() {
    let err = decode_error();

    assert!(err.to_string().starts_with("Malformed payload:"));
    assert!(err.source().is_some());
}

#[test]
fn test_fetch_error_is_transparent() {
    let transport: FetchError = TransportError::EmptyBody {
        url: "http://remote".to_string(),
    }
    .into();
    let decode: FetchError = decode_error().into();

    assert_eq!(
        transport.to_string(),
        "Request to http://remote returned an empty body"
    );
    assert!(decode.to_string().starts_with("Malformed payload:"));
}

#[test]
fn test_sync_error_conversions() {
    let from_transport: SyncError = TransportError::Status {
        url: "http://remote".to_string(),
        status: 500,
    }
    .into();
    assert!(matches!(
        from_transport,
        SyncError::Fetch(FetchError::Transport(_))
    ));

    let from_decode: SyncError = decode_error().into();
    assert!(matches!(from_decode, SyncError::Fetch(FetchError::Decode(_))));

    let persistence: SyncError = eyre::eyre!("connection reset").into();
    assert!(persistence.to_string().contains("Persistence error:"));
}

#[test]
fn test_sync_result() {
    let result: SyncResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: SyncResult<i32> = Err(SyncError::Persistence(eyre::eyre!("down")));
    assert!(result.is_err());
}
