use leptos::prelude::*;
use leptos_router::components::A;

/// 404 fallback.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="page-shell">
			<h1>"Page not found"</h1>
			<p>
				"Nothing lives at this address. "
				<A href="/">"Back to ChainSwitch"</A>
			</p>
		</main>
	}
}
