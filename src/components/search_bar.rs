use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::explorer;
use crate::search_history;

/// Address search form shared by the search and visualizer pages.
///
/// Validates client-side, records the search, then hands the address to the
/// router; the visualizer page owns the actual fetch.
#[component]
pub fn SearchBar(#[prop(into, optional)] initial: Signal<String>) -> impl IntoView {
	let (address, set_address) = signal(String::new());
	let (error, set_error) = signal(None::<String>);
	let navigate = use_navigate();

	Effect::new(move |_| {
		set_address.set(initial.get());
	});

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let addr = address.get().trim().to_string();
		if !explorer::is_valid_address(&addr) {
			set_error.set(Some("Please enter a valid wallet address (0x...)".into()));
			return;
		}
		set_error.set(None);
		search_history::record(&addr);
		navigate(
			&format!("/visualizer?address={addr}"),
			Default::default(),
		);
	};

	view! {
		<form class="search-bar" on:submit=on_submit>
			{move || {
				error
					.get()
					.map(|msg| view! { <p class="form-error">{msg}</p> })
			}}
			<div class="search-bar-row">
				<input
					type="text"
					placeholder="Enter wallet address (0x...)"
					prop:value=address
					on:input=move |ev| set_address.set(event_target_value(&ev))
				/>
				<button type="submit">"Visualize"</button>
			</div>
		</form>
	}
}
