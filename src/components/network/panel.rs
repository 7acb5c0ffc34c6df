use leptos::prelude::*;

use super::types::{NodeRecord, Stats};

/// Details of the selected node, or a hint when nothing is selected.
#[component]
pub fn NodeDetails(#[prop(into)] record: Signal<Option<NodeRecord>>) -> impl IntoView {
	view! {
		<div id="node-details" class="node-details">
			{move || match record.get() {
				Some(r) => view! {
					<h4>{r.label}</h4>
					<p><strong>"Category: "</strong>{r.category}</p>
					<p><strong>"Type: "</strong>{r.kind}</p>
					<p><strong>"Description: "</strong>{r.description}</p>
				}
				.into_any(),
				None => view! { <p>"Click on a node to see details"</p> }.into_any(),
			}}
		</div>
	}
}

#[component]
pub fn StatsPanel(#[prop(into)] stats: Signal<Stats>) -> impl IntoView {
	view! {
		<div class="stats">
			<p>"Nodes: " <span id="node-count">{move || stats.get().nodes}</span></p>
			<p>"Edges: " <span id="edge-count">{move || stats.get().edges}</span></p>
		</div>
	}
}
