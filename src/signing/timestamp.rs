//! Millisecond epoch timestamps carried in the timestamp header.

// self
use crate::_prelude::*;

/// Milliseconds since the Unix epoch, as signed and sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);
impl Timestamp {
	/// Wraps a raw millisecond value.
	pub const fn from_millis(millis: i64) -> Self {
		Self(millis)
	}

	/// Captures the current wall-clock time.
	pub fn now() -> Self {
		Self::from_datetime(OffsetDateTime::now_utc())
	}

	/// Converts a calendar instant, saturating outside the `i64` millisecond range.
	pub fn from_datetime(instant: OffsetDateTime) -> Self {
		let millis = instant.unix_timestamp_nanos() / 1_000_000;

		Self(i64::try_from(millis).unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX }))
	}

	/// Returns the raw millisecond value.
	pub const fn as_millis(self) -> i64 {
		self.0
	}

	/// Absolute distance to `other` in milliseconds.
	pub fn skew_from(self, other: Self) -> u64 {
		self.0.abs_diff(other.0)
	}

	/// Shifts the timestamp by `offset`, saturating at the representable bounds.
	pub fn saturating_add(self, offset: Duration) -> Self {
		let delta = i64::try_from(offset.whole_milliseconds()).unwrap_or(if offset.is_negative() {
			i64::MIN
		} else {
			i64::MAX
		});

		Self(self.0.saturating_add(delta))
	}
}
impl Display for Timestamp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}
impl FromStr for Timestamp {
	type Err = TimestampError;

	/// Accepts only the canonical decimal form produced by [`Display`], so the value that gets
	/// verified is byte-for-byte the header that was received.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let millis = s.parse::<i64>().map_err(|_| TimestampError::NotDecimal)?;

		if millis.to_string() != s {
			return Err(TimestampError::NonCanonical);
		}

		Ok(Self(millis))
	}
}

/// Error returned when a timestamp header cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TimestampError {
	/// The value is not a decimal integer in the `i64` range.
	#[error("Timestamp must be decimal milliseconds.")]
	NotDecimal,
	/// The value carries a sign prefix or leading zeros.
	#[error("Timestamp must not carry a sign prefix or leading zeros.")]
	NonCanonical,
}
impl From<OffsetDateTime> for Timestamp {
	fn from(value: OffsetDateTime) -> Self {
		Self::from_datetime(value)
	}
}
