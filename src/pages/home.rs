use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::network::{NetworkConfig, NetworkViewer};

/// Network page. `?seed=<u64>` pins the random edge set.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let seed = query.with_untracked(|q| q.get("seed").and_then(|s| s.parse::<u64>().ok()));
	let config = NetworkConfig {
		seed,
		..NetworkConfig::default()
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="network-page">
				<header class="network-header">
					<h1>"Ontology Network"</h1>
					<p class="subtitle">"Hover a node for details. Drag to orbit. Scroll to zoom."</p>
				</header>
				<NetworkViewer config=config />
			</div>
		</ErrorBoundary>
	}
}
