//! Conversion between `MM:SS.s` timestamps and seconds.

use thiserror::Error;

/// A timestamp that does not match the `MM:SS[.s]` grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bad timestamp: {0:?}")]
pub struct TimeFormatError(pub String);

/// Formats seconds as `MM:SS.s`.
///
/// Minutes are zero-padded to at least two digits and have no upper bound;
/// seconds are zero-padded to width 4 with one decimal digit.
///
/// ```
/// assert_eq!(rc_core::format_seconds(62.5), "01:02.5");
/// assert_eq!(rc_core::format_seconds(3600.0), "60:00.0");
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn format_seconds(t: f64) -> String {
    let minutes = (t / 60.0).floor() as i64;
    let seconds = t - (minutes as f64) * 60.0;
    format!("{minutes:02}:{seconds:04.1}")
}

/// Parses a `MM:SS[.s]` timestamp into seconds.
///
/// The minutes part must be a non-negative integer and the seconds part a
/// finite non-negative float. Anything else is a [`TimeFormatError`].
pub fn parse_timestamp(text: &str) -> Result<f64, TimeFormatError> {
    let bad = || TimeFormatError(text.to_string());

    let (minutes, seconds) = text.split_once(':').ok_or_else(bad)?;
    if seconds.contains(':') {
        return Err(bad());
    }

    let minutes: u64 = minutes.parse().map_err(|_| bad())?;
    let seconds: f64 = seconds.parse().map_err(|_| bad())?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(bad());
    }

    #[allow(clippy::cast_precision_loss)]
    let total = (minutes * 60) as f64 + seconds;
    Ok(total)
}
