use serde::Deserialize;

/// A raw transfer record as returned by the explorer's `txlist` action.
///
/// `to` is absent or empty for contract-creation transactions; `value` is a
/// decimal string in the smallest on-chain unit (wei).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
	pub from: String,
	#[serde(default)]
	pub to: Option<String>,
	pub value: String,
	#[serde(rename = "timeStamp")]
	pub time_stamp: String,
}

/// Response envelope shared by all explorer account actions. `result` holds
/// the transaction array on success and an error string otherwise, so it is
/// decoded in a second step.
#[derive(Debug, Deserialize)]
pub struct TxListResponse {
	pub status: String,
	pub message: String,
	pub result: serde_json::Value,
}
