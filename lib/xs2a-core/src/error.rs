use strum::Display;

/// Coarse error taxonomy exposed to callers, enough to pick the next UI action
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Expired,
    InvalidState,
    InvalidArgument,
    AdapterFailure,
    Internal,
}

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum ErrorCode {
    BR_0000,
    BR_0001,
    BR_0002,
    BR_0003,
    BR_0010,
    BR_0011,
    BR_0012,
    BR_0020,
    BR_0021,
    BR_0022,
    BR_0023,
    BR_0024,
    BR_0025,
    BR_0026,
    BR_0027,
    BR_0028,
    BR_0030,
    BR_0031,
    BR_0032,
    BR_0033,
    BR_0034,
    BR_0035,
    BR_0036,
    BR_0040,
    BR_0050,
    BR_0054,
    BR_0055,
}

impl ErrorCode {
    pub const fn msg(&self) -> &'static str {
        match self {
            Self::BR_0000 => "Unmapped error code",
            Self::BR_0001 => "Consent not found",
            Self::BR_0002 => "Payment not found",
            Self::BR_0003 => "Authorisation not found",
            Self::BR_0010 => "Authorisation expired",
            Self::BR_0011 => "Redirect URL expired",
            Self::BR_0012 => "Consent expired",
            Self::BR_0020 => "Authorisation already finalised",
            Self::BR_0021 => "Wrong SCA stage",
            Self::BR_0022 => "Authorisation modified concurrently",
            Self::BR_0023 => "Consent in wrong state",
            Self::BR_0024 => "Payment in wrong state",
            Self::BR_0025 => "Access exceeded",
            Self::BR_0026 => "PSU already authorised",
            Self::BR_0027 => "Consent modified concurrently",
            Self::BR_0028 => "Payment modified concurrently",
            Self::BR_0030 => "Missing PSU identity",
            Self::BR_0031 => "PSU identity mismatch",
            Self::BR_0032 => "Incomplete TPP identity",
            Self::BR_0033 => "Unknown SCA method",
            Self::BR_0034 => "Invalid authorisation kind",
            Self::BR_0035 => "SCA approach not supported",
            Self::BR_0036 => "Invalid consent request",
            Self::BR_0040 => "SCA failed",
            Self::BR_0050 => "Config validation error",
            Self::BR_0054 => "Database error",
            Self::BR_0055 => "Mapping error",
        }
    }
}

pub trait ErrorCodeMixin {
    fn error_code(&self) -> ErrorCode;
}
