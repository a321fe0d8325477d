use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::search_bar::SearchBar;
use crate::search_history;

/// Wallet search page with the recent-searches list.
#[component]
pub fn SearchPage() -> impl IntoView {
	let recent = search_history::recent();

	view! {
		<main class="page-shell">
			<h1>"Search a wallet"</h1>
			<p class="subtitle">
				"Enter a wallet address to visualize its transaction network."
			</p>
			<SearchBar />

			<section class="recent-searches">
				<h2>"Recent searches"</h2>
				{if recent.is_empty() {
					view! { <p class="muted">"No searches yet."</p> }.into_any()
				} else {
					view! {
						<ul>
							{recent
								.into_iter()
								.map(|addr| {
									let href = format!("/visualizer?address={addr}");
									view! {
										<li>
											<A href=href>
												<span class="mono">{addr}</span>
											</A>
										</li>
									}
								})
								.collect_view()}
						</ul>
					}
						.into_any()
				}}
			</section>
		</main>
	}
}
