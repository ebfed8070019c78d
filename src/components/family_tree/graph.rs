use std::collections::{HashMap, HashSet};

use log::warn;

use super::error::TreeError;
use super::types::Person;

/// Read-only collection of people, keyed by id, iterated in load order.
#[derive(Clone, Debug, Default)]
pub struct FamilyGraph {
	people: Vec<Person>,
	index: HashMap<String, usize>,
}

impl FamilyGraph {
	pub fn new(people: Vec<Person>) -> Self {
		let mut graph = Self::default();
		for person in people {
			if graph.index.contains_key(&person.id) {
				warn!("Duplicate person id {}, keeping the first entry", person.id);
				continue;
			}
			graph.index.insert(person.id.clone(), graph.people.len());
			graph.people.push(person);
		}
		graph.warn_dangling();
		graph
	}

	pub fn from_json(json: &str) -> Result<Self, TreeError> {
		let people: Vec<Person> = serde_json::from_str(json)?;
		Ok(Self::new(people))
	}

	// Reported once here so the frame loop can skip these quietly.
	fn warn_dangling(&self) {
		for person in &self.people {
			for id in person.parents.iter().chain(&person.partners) {
				if !self.contains(id) {
					warn!("{} ({}) references unknown person {id}", person.name, person.id);
				}
			}
		}
	}

	pub fn get(&self, id: &str) -> Option<&Person> {
		self.index.get(id).map(|&i| &self.people[i])
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn people(&self) -> impl Iterator<Item = &Person> {
		self.people.iter()
	}

	pub fn len(&self) -> usize {
		self.people.len()
	}

	/// People for whom `has_card` finds nothing rendered.
	pub fn missing_cards(&self, has_card: impl Fn(&str) -> bool) -> Vec<&Person> {
		self.people.iter().filter(|p| !has_card(&p.id)).collect()
	}

	/// Ids hidden by a load-time name filter. `None` keeps everyone.
	pub fn excluded_by(&self, name_filter: Option<&str>) -> HashSet<String> {
		let Some(filter) = name_filter else {
			return HashSet::new();
		};
		self.people
			.iter()
			.filter(|p| !p.name.contains(filter))
			.map(|p| p.id.clone())
			.collect()
	}
}
