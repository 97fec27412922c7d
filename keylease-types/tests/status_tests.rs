use keylease_types::{describe, Status, UnknownStatus, UNRECOGNIZED_STATUS};
use proptest::prelude::*;

// ── Table ─────────────────────────────────────────────────────────

#[test]
fn codes_match_table() {
    let expected = [
        (Status::Success, 0),
        (Status::Generic, -1),
        (Status::FileNotFound, -2),
        (Status::BadPassword, -3),
        (Status::InvalidSecretFile, -4),
        (Status::NetworkError, -5),
        (Status::SignatureVerification, -7),
        (Status::NotAuthenticated, -8),
        (Status::LicensesInUse, -9),
        (Status::JsonParse, -10),
        (Status::JsonStructure, -11),
        (Status::KeyParse, -12),
        (Status::Forbidden, -13),
        (Status::RateLimited, -14),
        (Status::InternalServerError, -15),
        (Status::ServiceUnavailable, -16),
        (Status::UnhandledResponse, -17),
    ];
    assert_eq!(expected.len(), Status::ALL.len());
    for (status, code) in expected {
        assert_eq!(status.code(), code);
        assert_eq!(Status::from_code(code), Some(status));
    }
}

#[test]
fn code_six_is_unassigned() {
    assert_eq!(Status::from_code(-6), None);
    assert_eq!(describe(-6), UNRECOGNIZED_STATUS);
}

#[test]
fn every_status_has_a_distinct_description() {
    let mut seen = std::collections::HashSet::new();
    for status in Status::ALL {
        let desc = describe(status.code());
        assert!(!desc.is_empty());
        assert_eq!(desc, status.description());
        assert!(seen.insert(desc), "duplicate description for {status:?}");
    }
}

#[test]
fn only_success_is_success() {
    for status in Status::ALL {
        assert_eq!(status.is_success(), status == Status::Success);
    }
}

#[test]
fn display_includes_code() {
    let shown = Status::RateLimited.to_string();
    assert!(shown.contains("rate limited"));
    assert!(shown.contains("-14"));
}

// ── Conversions ───────────────────────────────────────────────────

#[test]
fn try_from_known_and_unknown() {
    assert_eq!(Status::try_from(-8), Ok(Status::NotAuthenticated));
    assert_eq!(Status::try_from(42), Err(UnknownStatus(42)));
    assert!(UnknownStatus(42).to_string().contains("42"));
    let code: i32 = Status::KeyParse.into();
    assert_eq!(code, -12);
}

#[test]
fn serde_uses_integer_code() {
    let json = serde_json::to_string(&Status::Forbidden).unwrap();
    assert_eq!(json, "-13");
    let parsed: Status = serde_json::from_str("-16").unwrap();
    assert_eq!(parsed, Status::ServiceUnavailable);
    assert!(serde_json::from_str::<Status>("-6").is_err());
}

#[test]
fn http_mapping() {
    assert_eq!(Status::from_http(200), Status::Success);
    assert_eq!(Status::from_http(204), Status::Success);
    assert_eq!(Status::from_http(401), Status::Forbidden);
    assert_eq!(Status::from_http(403), Status::Forbidden);
    assert_eq!(Status::from_http(409), Status::LicensesInUse);
    assert_eq!(Status::from_http(429), Status::RateLimited);
    assert_eq!(Status::from_http(500), Status::InternalServerError);
    assert_eq!(Status::from_http(502), Status::ServiceUnavailable);
    assert_eq!(Status::from_http(503), Status::ServiceUnavailable);
    assert_eq!(Status::from_http(504), Status::ServiceUnavailable);
    assert_eq!(Status::from_http(404), Status::UnhandledResponse);
    assert_eq!(Status::from_http(301), Status::UnhandledResponse);
}

// ── describe is total ─────────────────────────────────────────────

proptest! {
    #[test]
    fn describe_is_total_and_stable(code in any::<i32>()) {
        let first = describe(code);
        prop_assert!(!first.is_empty());
        prop_assert_eq!(first, describe(code));
        match Status::from_code(code) {
            Some(status) => prop_assert_eq!(first, status.description()),
            None => prop_assert_eq!(first, UNRECOGNIZED_STATUS),
        }
    }
}
