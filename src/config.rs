//! Explorer endpoint configuration, captured at compile time.

use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
	pub api_base: &'static str,
	pub api_key: &'static str,
}

/// Endpoint and key are baked in at build time; the key defaults to the
/// explorer's keyless (throttled) tier when unset.
pub static EXPLORER: Lazy<ExplorerConfig> = Lazy::new(|| ExplorerConfig {
	api_base: option_env!("ETHERSCAN_API_BASE").unwrap_or("https://api.etherscan.io/api"),
	api_key: option_env!("ETHERSCAN_API_KEY").unwrap_or(""),
});
