use std::collections::BTreeMap;

use leptos::prelude::*;
use web_sys::MouseEvent;

use crate::components::family_tree::{FamilyGraph, FamilyTreeCanvas, Person, TreeConfig, TreeError};

const FAMILY_JSON: &str = include_str!("family.json");
const TREE_CONFIG_JSON: &str = include_str!("tree.json");

/// People grouped by generation, oldest first.
fn generations(graph: &FamilyGraph) -> Vec<Vec<Person>> {
	let mut rows: BTreeMap<u32, Vec<Person>> = BTreeMap::new();
	for person in graph.people() {
		rows.entry(person.generation).or_default().push(person.clone());
	}
	rows.into_values().collect()
}

#[component]
fn MemberCard(person: Person, focus: RwSignal<Option<String>>) -> impl IntoView {
	let id = person.id.clone();
	let on_click = move |ev: MouseEvent| {
		ev.stop_propagation();
		focus.set(Some(id.clone()));
	};
	let portrait = match person.photo.clone() {
		Some(src) => view! { <img src=src alt=person.name.clone() /> }.into_any(),
		None => view! { <span>{person.initials()}</span> }.into_any(),
	};

	view! {
		<article class="member-card dimmed" id=person.id.clone() on:click=on_click>
			<div class="portrait">{portrait}</div>
			<h3>{person.display_name()}</h3>
			<p class="dates">{person.life_span()}</p>
		</article>
	}
}

fn family_tree() -> Result<impl IntoView, TreeError> {
	let graph = FamilyGraph::from_json(FAMILY_JSON)?;
	let config = TreeConfig::from_json(TREE_CONFIG_JSON)?;
	let rows = generations(&graph);
	let focus = RwSignal::new(config.default_focus.clone());

	Ok(view! {
		<FamilyTreeCanvas graph=graph focus=focus config=config>
			{rows
				.into_iter()
				.map(|row| {
					view! {
						<section class="generation">
							{row
								.into_iter()
								.map(|person| view! { <MemberCard person=person focus=focus /> })
								.collect_view()}
						</section>
					}
				})
				.collect_view()}
		</FamilyTreeCanvas>
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
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

			<div class="family-page">
				<header class="tree-header">
					<h1>"Stammbaum"</h1>
					<p class="subtitle">"Click a person to highlight partners, parents, children and siblings."</p>
				</header>
				{family_tree()}
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_family_loads() {
		let graph = FamilyGraph::from_json(FAMILY_JSON).unwrap();
		let config = TreeConfig::from_json(TREE_CONFIG_JSON).unwrap();
		let focus = config.default_focus.as_deref().unwrap();
		assert!(graph.contains(focus));
		assert!(!graph.excluded_by(config.name_filter.as_deref()).contains(focus));
		let rows = generations(&graph);
		assert_eq!(rows.len(), 4);
		assert!(rows[0].iter().all(|p| p.generation == 0));
		assert_eq!(rows.iter().map(Vec::len).sum::<usize>(), graph.len());
	}
}
