use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};
use wasm_bindgen_futures::spawn_local;

use crate::components::force_graph::{GraphData, TransactionGraph, build_graph};
use crate::components::search_bar::SearchBar;
use crate::error::Error;
use crate::explorer;
use crate::search_history;

/// Visualizer page: owns the fetch -> build -> render cycle for the address
/// in the query string.
#[component]
pub fn Visualizer() -> impl IntoView {
	let query = use_query_map();
	let address = Memo::new(move |_| query.get().get("address"));

	let (graph, set_graph) = signal(None::<GraphData>);
	let (error, set_error) = signal(None::<Error>);
	let (loading, set_loading) = signal(false);
	// Monotone request counter: a response only lands if no newer request
	// has started since (last-write-wins by initiation order).
	let generation = StoredValue::new(0u64);

	Effect::new(move |_| {
		let Some(addr) = address.get() else {
			set_graph.set(None);
			set_error.set(None);
			return;
		};
		if !explorer::is_valid_address(&addr) {
			set_error.set(Some(Error::InvalidAddress(addr)));
			set_graph.set(None);
			return;
		}

		let my_generation = generation.get_value() + 1;
		generation.set_value(my_generation);
		set_loading.set(true);
		set_error.set(None);

		spawn_local(async move {
			let result = explorer::transactions(&addr).await;
			if generation.get_value() != my_generation {
				log::debug!("discarding stale response for {addr}");
				return;
			}
			set_loading.set(false);

			match result {
				Ok(txs) => {
					search_history::record(&addr);
					set_graph.set(Some(build_graph(&addr, &txs)));
				}
				// A valid address with no qualifying transfers is an empty
				// graph (center only), not a failure.
				Err(Error::NoTransactions) => {
					search_history::record(&addr);
					set_graph.set(Some(build_graph(&addr, &[])));
				}
				Err(err) => {
					log::warn!("fetch failed for {addr}: {err}");
					set_error.set(Some(err));
				}
			}
		});
	});

	let navigate = use_navigate();
	let on_node_select = UnsyncCallback::new(move |id: String| {
		navigate(&format!("/visualizer?address={id}"), Default::default());
	});

	let graph_for_canvas = Signal::derive(move || graph.get().unwrap_or_default());
	let query_address = Signal::derive(move || address.get());
	let initial_input = Signal::derive(move || address.get().unwrap_or_default());

	view! {
		<main class="page-shell visualizer">
			<h1>"Wallet Transaction Visualizer"</h1>
			<SearchBar initial=initial_input />

			{move || {
				address
					.get()
					.map(|addr| {
						view! {
							<div class="wallet-banner">
								<div>
									<p class="muted">"Current Wallet"</p>
									<p class="mono">{addr}</p>
								</div>
								<div class="legend">
									<span class="legend-entry">
										<span class="dot outgoing"></span>
										"Outgoing"
									</span>
									<span class="legend-entry">
										<span class="dot incoming"></span>
										"Incoming"
									</span>
								</div>
							</div>
						}
					})
			}}

			{move || {
				error
					.get()
					.map(|err| view! { <div class="error-banner">{err.to_string()}</div> })
			}}

			<div class="graph-panel">
				{move || {
					if loading.get() {
						view! { <p class="panel-status">"Loading transaction data..."</p> }
							.into_any()
					} else if let Some(data) = graph.get() {
						if data.has_activity() {
							view! {
								<TransactionGraph
									data=graph_for_canvas
									query_address=query_address
									on_node_select=on_node_select
								/>
							}
								.into_any()
						} else {
							view! {
								<p class="panel-status">
									"No transaction data found for this address."
								</p>
							}
								.into_any()
						}
					} else {
						view! {
							<p class="panel-status">
								"Enter a wallet address to see transaction data."
							</p>
						}
							.into_any()
					}
				}}
			</div>
		</main>
	}
}
