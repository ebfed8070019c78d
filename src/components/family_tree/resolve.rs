use std::collections::HashMap;

use super::graph::FamilyGraph;
use super::types::{Relationships, Role};

/// Partners, parents, children and siblings of `focus_id`.
///
/// Unknown ids resolve to empty sets. Parent ids missing from the graph are
/// dropped; partner ids are returned as stored.
pub fn resolve(graph: &FamilyGraph, focus_id: &str) -> Relationships {
	let Some(focus) = graph.get(focus_id) else {
		return Relationships::default();
	};

	let parents: Vec<String> = focus
		.parents
		.iter()
		.filter(|id| graph.contains(id))
		.cloned()
		.collect();

	let children = graph
		.people()
		.filter(|p| p.parents.iter().any(|id| id == focus_id))
		.map(|p| p.id.clone())
		.collect();

	let siblings = if parents.is_empty() {
		Vec::new()
	} else {
		graph
			.people()
			.filter(|p| p.id != focus_id && p.parents.iter().any(|id| parents.contains(id)))
			.map(|p| p.id.clone())
			.collect()
	};

	Relationships {
		partners: focus.partners.clone(),
		parents,
		children,
		siblings,
	}
}

/// One role per person for the current focus.
#[derive(Clone, Debug, PartialEq)]
pub struct Highlight {
	focus_id: String,
	roles: HashMap<String, Role>,
}

impl Highlight {
	/// `None` when `focus_id` is not in the graph.
	pub fn for_focus(graph: &FamilyGraph, focus_id: &str) -> Option<Self> {
		if !graph.contains(focus_id) {
			return None;
		}
		let relationships = resolve(graph, focus_id);
		let mut roles = HashMap::new();
		roles.insert(focus_id.to_string(), Role::Focused);

		// First role claimed wins: focused, partner, lineage, sibling.
		let ranked = [
			(Role::Partner, relationships.partners.iter()),
			(Role::Lineage, relationships.parents.iter()),
			(Role::Lineage, relationships.children.iter()),
			(Role::Sibling, relationships.siblings.iter()),
		];
		for (role, ids) in ranked {
			for id in ids {
				roles.entry(id.clone()).or_insert(role);
			}
		}

		Some(Self {
			focus_id: focus_id.to_string(),
			roles,
		})
	}

	pub fn focus_id(&self) -> &str {
		&self.focus_id
	}

	pub fn role(&self, id: &str) -> Role {
		self.roles.get(id).copied().unwrap_or(Role::Dimmed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::family_tree::types::{Person, Relationships};

	fn person(id: &str, parents: &[&str], partners: &[&str]) -> Person {
		Person {
			id: id.into(),
			name: id.to_uppercase(),
			parents: parents.iter().map(|s| s.to_string()).collect(),
			partners: partners.iter().map(|s| s.to_string()).collect(),
			..Default::default()
		}
	}

	fn family() -> FamilyGraph {
		FamilyGraph::new(vec![
			person("grandpa", &[], &[]),
			person("p1", &["grandpa"], &["p2"]),
			person("p2", &[], &[]),
			person("c1", &["p1", "p2"], &[]),
			person("c2", &["p1", "p2"], &[]),
			person("half", &["p2"], &[]),
			person("loner", &[], &[]),
		])
	}

	#[test]
	fn stored_partner_is_returned() {
		let graph = family();
		assert_eq!(resolve(&graph, "p1").partners, vec!["p2"]);
	}

	#[test]
	fn unstored_partner_direction_stays_empty() {
		let graph = family();
		assert!(resolve(&graph, "p2").partners.is_empty());
	}

	#[test]
	fn no_parents_means_no_siblings() {
		let graph = family();
		for id in ["grandpa", "p2", "loner"] {
			assert!(resolve(&graph, id).siblings.is_empty(), "{id}");
		}
	}

	#[test]
	fn child_listed_for_both_parents() {
		let graph = family();
		for parent in ["p1", "p2"] {
			let children = resolve(&graph, parent).children;
			assert!(children.contains(&"c1".to_string()), "{parent}");
			assert!(children.contains(&"c2".to_string()), "{parent}");
		}
	}

	#[test]
	fn siblings_share_any_parent() {
		let graph = family();
		let rel = resolve(&graph, "c1");
		assert_eq!(rel.parents, vec!["p1", "p2"]);
		assert_eq!(rel.siblings, vec!["c2", "half"]);
	}

	#[test]
	fn unknown_focus_is_empty() {
		let graph = family();
		assert_eq!(resolve(&graph, "nobody"), Relationships::default());
		assert!(Highlight::for_focus(&graph, "nobody").is_none());
	}

	#[test]
	fn dangling_parent_ids_are_ignored() {
		let graph = FamilyGraph::new(vec![
			person("a", &["ghost"], &[]),
			person("b", &["ghost"], &[]),
		]);
		let rel = resolve(&graph, "a");
		assert!(rel.parents.is_empty());
		assert!(rel.siblings.is_empty());
	}

	#[test]
	fn focus_on_partner_pair() {
		let graph = FamilyGraph::new(vec![
			person("a", &[], &["b"]),
			person("b", &[], &["a"]),
			person("x", &[], &[]),
		]);
		let h = Highlight::for_focus(&graph, "a").unwrap();
		assert_eq!(h.role("a"), Role::Focused);
		assert_eq!(h.role("b"), Role::Partner);
		assert_eq!(h.role("x"), Role::Dimmed);
	}

	#[test]
	fn focus_on_child_marks_parents_lineage() {
		let graph = FamilyGraph::new(vec![
			person("p1", &[], &[]),
			person("p2", &[], &[]),
			person("c", &["p1", "p2"], &[]),
		]);
		let h = Highlight::for_focus(&graph, "c").unwrap();
		assert_eq!(h.role("p1"), Role::Lineage);
		assert_eq!(h.role("p2"), Role::Lineage);
	}

	#[test]
	fn focus_on_child_marks_sibling() {
		let graph = FamilyGraph::new(vec![
			person("p1", &[], &[]),
			person("c1", &["p1"], &[]),
			person("c2", &["p1"], &[]),
		]);
		let h = Highlight::for_focus(&graph, "c1").unwrap();
		assert_eq!(h.role("c1"), Role::Focused);
		assert_eq!(h.role("c2"), Role::Sibling);
		assert_eq!(h.role("p1"), Role::Lineage);
	}

	#[test]
	fn overlapping_relations_get_one_role() {
		// A partner who is also a child of the focus keeps the partner role.
		let graph = FamilyGraph::new(vec![
			person("a", &[], &["b"]),
			person("b", &["a"], &[]),
		]);
		let h = Highlight::for_focus(&graph, "a").unwrap();
		assert_eq!(h.role("b"), Role::Partner);
		assert_eq!(h.focus_id(), "a");
	}
}
