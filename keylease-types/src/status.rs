//! Outcome codes shared by every licensing operation.
//!
//! The table is closed: an engine that discovers a new failure mode must map
//! it onto one of these codes. Code `-6` is intentionally unassigned.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Description returned by [`describe`] for codes outside the table.
pub const UNRECOGNIZED_STATUS: &str = "unrecognized status code";

/// An integer outcome code with a fixed description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum Status {
    /// The operation completed.
    Success = 0,
    /// Unspecified failure.
    Generic = -1,
    /// The secret file could not be opened.
    FileNotFound = -2,
    /// Wrong or missing password for an encrypted secret.
    BadPassword = -3,
    /// The secret file is structurally invalid.
    InvalidSecretFile = -4,
    /// The license server could not be reached.
    NetworkError = -5,
    /// A signature did not verify.
    SignatureVerification = -7,
    /// The operation needs an authenticated handle.
    NotAuthenticated = -8,
    /// All licenses are in use.
    LicensesInUse = -9,
    /// A payload was not valid JSON.
    JsonParse = -10,
    /// A payload was JSON but had the wrong shape.
    JsonStructure = -11,
    /// Key material could not be decoded.
    KeyParse = -12,
    /// The server refused the request.
    Forbidden = -13,
    /// The server is rate limiting this client.
    RateLimited = -14,
    /// The server failed internally.
    InternalServerError = -15,
    /// The server is temporarily unavailable.
    ServiceUnavailable = -16,
    /// The server answered with something this client does not understand.
    UnhandledResponse = -17,
}

impl Status {
    /// Every status, in table order.
    pub const ALL: [Status; 17] = [
        Status::Success,
        Status::Generic,
        Status::FileNotFound,
        Status::BadPassword,
        Status::InvalidSecretFile,
        Status::NetworkError,
        Status::SignatureVerification,
        Status::NotAuthenticated,
        Status::LicensesInUse,
        Status::JsonParse,
        Status::JsonStructure,
        Status::KeyParse,
        Status::Forbidden,
        Status::RateLimited,
        Status::InternalServerError,
        Status::ServiceUnavailable,
        Status::UnhandledResponse,
    ];

    /// Returns the integer code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a status by its integer code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    /// Returns the fixed human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Generic => "unspecified failure",
            Self::FileNotFound => "secret file not found",
            Self::BadPassword => "bad password for encrypted secret file",
            Self::InvalidSecretFile => "secret file is structurally invalid",
            Self::NetworkError => "network failure",
            Self::SignatureVerification => "signature verification failed",
            Self::NotAuthenticated => "handle is not authenticated",
            Self::LicensesInUse => "license already in use",
            Self::JsonParse => "malformed response payload",
            Self::JsonStructure => "response payload has unexpected structure",
            Self::KeyParse => "key material could not be parsed",
            Self::Forbidden => "request rejected by server",
            Self::RateLimited => "rate limited by server",
            Self::InternalServerError => "license server internal error",
            Self::ServiceUnavailable => "license server unavailable",
            Self::UnhandledResponse => "response not recognized by this client version",
        }
    }

    /// Returns true for [`Status::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Maps an HTTP status code onto the taxonomy.
    ///
    /// 2xx codes map to [`Status::Success`].
    #[must_use]
    pub fn from_http(code: u16) -> Self {
        match code {
            200..=299 => Self::Success,
            401 | 403 => Self::Forbidden,
            409 => Self::LicensesInUse,
            429 => Self::RateLimited,
            500 => Self::InternalServerError,
            502..=504 => Self::ServiceUnavailable,
            _ => Self::UnhandledResponse,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

/// Returned when converting an integer that is not in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown status code {0}")]
pub struct UnknownStatus(pub i32);

impl TryFrom<i32> for Status {
    type Error = UnknownStatus;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownStatus(code))
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

/// Describes any integer status code.
///
/// Total over `i32`: codes outside the table yield [`UNRECOGNIZED_STATUS`].
#[must_use]
pub fn describe(code: i32) -> &'static str {
    Status::from_code(code).map_or(UNRECOGNIZED_STATUS, Status::description)
}
