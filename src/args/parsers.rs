use super::types::PositiveUsize;
use crate::error::{AppError, AppResult, ValidationError};

/// Splits a `Key: Value` header on its first colon.
pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) => Ok((key.trim().to_owned(), value.trim().to_owned())),
        None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

/// Splits a `name=value` cookie on its first `=`. Only a missing `=` is
/// malformed; an empty name or value is passed through as written.
pub(crate) fn parse_cookie(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once('=') {
        Some((name, value)) => Ok((name.trim().to_owned(), value.trim().to_owned())),
        None => Err(ValidationError::InvalidCookieFormat {
            value: s.to_owned(),
        }),
    }
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}
