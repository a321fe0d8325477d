use leptos::prelude::*;
use leptos_router::components::A;

/// Landing page: a thin shell pointing at the search flow.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<main class="page-shell hero">
			<h1>"Explore " <span class="accent">"Blockchain"</span> " Data"</h1>
			<p class="subtitle">
				"Enter any wallet address to visualize its transactions and connections."
			</p>
			<A href="/search" attr:class="cta">
				"Launch App"
			</A>
		</main>
	}
}
