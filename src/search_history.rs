//! Recent-search persistence, backed by localStorage.
//!
//! Recording is fire-and-forget: storage failures are logged and swallowed,
//! and must never block or fail graph construction or rendering.

const STORAGE_KEY: &str = "chainswitch.recent-searches";
const MAX_RECENT: usize = 5;

fn storage() -> Option<web_sys::Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

/// Most recently searched addresses, newest first.
pub fn recent() -> Vec<String> {
	let Some(storage) = storage() else {
		return Vec::new();
	};
	match storage.get_item(STORAGE_KEY) {
		Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
		_ => Vec::new(),
	}
}

/// Push `address` to the front of the MRU list.
pub fn record(address: &str) {
	let Some(storage) = storage() else {
		return;
	};

	let mut list = recent();
	list.retain(|a| a != address);
	list.insert(0, address.to_string());
	list.truncate(MAX_RECENT);

	let Ok(raw) = serde_json::to_string(&list) else {
		return;
	};
	if let Err(err) = storage.set_item(STORAGE_KEY, &raw) {
		log::warn!("failed to persist recent searches: {err:?}");
	}
}
