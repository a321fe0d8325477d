use thiserror::Error;

/// Errors surfaced by the explorer client and address validation.
///
/// `Clone` so a failure can be stashed in a reactive signal and rendered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
	#[error("Invalid address: {0}")]
	InvalidAddress(String),

	#[error("Network error: {0}")]
	Network(String),

	#[error("Rate limit exceeded, try again shortly")]
	RateLimited,

	#[error("Explorer error: {0}")]
	Upstream(String),

	#[error("No transactions found for this address")]
	NoTransactions,

	#[error("Malformed explorer response: {0}")]
	Decode(String),
}

impl Error {
	/// Check if the operation can be retried as-is.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Error::Network(_) | Error::RateLimited)
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			Error::Decode(err.to_string())
		} else {
			Error::Network(err.to_string())
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn retryable_classification() {
		assert!(Error::RateLimited.is_retryable());
		assert!(Error::Network("timeout".into()).is_retryable());
		assert!(!Error::NoTransactions.is_retryable());
		assert!(!Error::InvalidAddress("0x0".into()).is_retryable());
	}
}
