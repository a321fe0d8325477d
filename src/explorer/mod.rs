//! Thin client for an Etherscan-compatible account API.
//!
//! The rest of the app sees a single query function, [`transactions`],
//! returning the focal address's transfers newest-first.

mod types;

pub use types::{Transaction, TxListResponse};

use crate::config::EXPLORER;
use crate::error::{Error, Result};

/// Check the `0x`-prefixed 40-hex-digit address form. Callers validate
/// before fetching or building; the graph builder assumes this has passed.
pub fn is_valid_address(address: &str) -> bool {
	let Some(hex) = address.strip_prefix("0x") else {
		return false;
	};
	hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Fetch the most recent transactions for `address`, newest first.
///
/// Zero results surface as [`Error::NoTransactions`] so callers can show an
/// explicit empty state; rate limiting and other upstream failures map to
/// their own variants.
pub async fn transactions(address: &str) -> Result<Vec<Transaction>> {
	if !is_valid_address(address) {
		return Err(Error::InvalidAddress(address.to_string()));
	}

	let url = format!(
		"{}?module=account&action=txlist&address={}&startblock=0&endblock=99999999&sort=desc&apikey={}",
		EXPLORER.api_base, address, EXPLORER.api_key
	);

	log::debug!("fetching transactions for {address}");
	let response = reqwest::get(&url).await?;
	if !response.status().is_success() {
		return Err(Error::Upstream(format!(
			"explorer returned status {}",
			response.status()
		)));
	}

	let envelope: TxListResponse = response.json().await?;
	decode_response(envelope)
}

fn decode_response(envelope: TxListResponse) -> Result<Vec<Transaction>> {
	if envelope.status == "1" {
		return serde_json::from_value(envelope.result).map_err(|e| Error::Decode(e.to_string()));
	}

	// On failure the explorer reports detail either in `message` or as a
	// bare string in `result`.
	let detail = envelope
		.result
		.as_str()
		.map(str::to_owned)
		.unwrap_or_else(|| envelope.message.clone());

	if envelope.message.contains("No transactions found") {
		Err(Error::NoTransactions)
	} else if detail.to_ascii_lowercase().contains("rate limit") {
		Err(Error::RateLimited)
	} else {
		Err(Error::Upstream(detail))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_checksummed_and_lowercase_addresses() {
		assert!(is_valid_address(
			"0x742d35Cc6634C0532925a3b844Bc454e4438f44e"
		));
		assert!(is_valid_address(
			"0x742d35cc6634c0532925a3b844bc454e4438f44e"
		));
	}

	#[test]
	fn rejects_malformed_addresses() {
		assert!(!is_valid_address(""));
		assert!(!is_valid_address("742d35cc6634c0532925a3b844bc454e4438f44e"));
		assert!(!is_valid_address("0x742d35cc6634c0532925a3b844bc454e4438f4"));
		assert!(!is_valid_address(
			"0x742d35cc6634c0532925a3b844bc454e4438f44g"
		));
	}

	fn envelope(status: &str, message: &str, result: serde_json::Value) -> TxListResponse {
		TxListResponse {
			status: status.into(),
			message: message.into(),
			result,
		}
	}

	#[test]
	fn decodes_transaction_list() {
		let result = serde_json::json!([{
			"blockNumber": "19000000",
			"timeStamp": "1700000000",
			"hash": "0xdead",
			"from": "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA0001",
			"to": "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB0002",
			"value": "2000000000000000000"
		}]);
		let txs = decode_response(envelope("1", "OK", result)).unwrap();
		assert_eq!(txs.len(), 1);
		assert_eq!(txs[0].value, "2000000000000000000");
		assert_eq!(txs[0].time_stamp, "1700000000");
		assert_eq!(
			txs[0].to.as_deref(),
			Some("0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB0002")
		);
	}

	#[test]
	fn decodes_missing_to_as_none() {
		let result = serde_json::json!([{
			"timeStamp": "1700000000",
			"from": "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA0001",
			"value": "1"
		}]);
		let txs = decode_response(envelope("1", "OK", result)).unwrap();
		assert_eq!(txs[0].to, None);
	}

	#[test]
	fn zero_results_is_its_own_variant() {
		let err = decode_response(envelope(
			"0",
			"No transactions found",
			serde_json::json!([]),
		))
		.unwrap_err();
		assert_eq!(err, Error::NoTransactions);
	}

	#[test]
	fn rate_limit_is_detected_from_result_payload() {
		let err = decode_response(envelope(
			"0",
			"NOTOK",
			serde_json::json!("Max rate limit reached"),
		))
		.unwrap_err();
		assert_eq!(err, Error::RateLimited);
	}

	#[test]
	fn other_failures_carry_the_upstream_message() {
		let err = decode_response(envelope(
			"0",
			"NOTOK",
			serde_json::json!("Invalid API Key"),
		))
		.unwrap_err();
		assert_eq!(err, Error::Upstream("Invalid API Key".into()));
	}
}
