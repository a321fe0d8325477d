//! CSR entry point.

use chainswitch::App;
use leptos::prelude::*;

fn main() {
	chainswitch::init_logging();
	leptos::mount::mount_to_body(|| view! { <App /> })
}
