//! Codec errors.

use thiserror::Error;

/// Errors returned by the uplink decoder and the downlink encoder.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The uplink is too short, or a numeric field does not fit its wire width.
    #[error("`{field}` value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
    /// The function code is not one of the known downlink commands.
    #[error("unsupported function code {0}")]
    UnsupportedFunction(i64),
    /// A field required by the selected function code is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}
