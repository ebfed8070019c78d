use serde::Deserialize;

/// A single person in the family graph, as delivered by the data loader.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub birth_date: Option<String>,
	#[serde(default)]
	pub death_date: Option<String>,
	#[serde(default)]
	pub ledigname: Option<String>,
	#[serde(default)]
	pub generation: u32,
	#[serde(default)]
	pub photo: Option<String>,
	#[serde(default)]
	pub parents: Vec<String>,
	#[serde(default)]
	pub partners: Vec<String>,
}

impl Person {
	/// Card title: name, a cross for the deceased, maiden name in parentheses.
	pub fn display_name(&self) -> String {
		let mut name = self.name.clone();
		if self.death_date.is_some() {
			name.push_str(" †");
		}
		if let Some(ledig) = &self.ledigname {
			name.push_str(&format!(" ({ledig})"));
		}
		name
	}

	/// "1901 - 1975", "1950" or "" depending on which dates are known.
	pub fn life_span(&self) -> String {
		let birth = self.birth_date.as_deref().map(year_of).unwrap_or_default();
		let death = self.death_date.as_deref().map(year_of).unwrap_or_default();
		match (birth.is_empty(), death.is_empty()) {
			(_, true) => birth,
			(true, false) => format!(" - {death}"),
			(false, false) => format!("{birth} - {death}"),
		}
	}

	/// Up to two initials, shown in place of a missing photo.
	pub fn initials(&self) -> String {
		self.name
			.split_whitespace()
			.filter_map(|word| word.chars().next())
			.take(2)
			.collect()
	}
}

/// First run of four ASCII digits, or the whole string when there is none.
fn year_of(date: &str) -> String {
	let bytes = date.as_bytes();
	bytes
		.windows(4)
		.position(|w| w.iter().all(u8::is_ascii_digit))
		.map(|start| date[start..start + 4].to_string())
		.unwrap_or_else(|| date.to_string())
}

/// What a focus change resolves to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relationships {
	pub partners: Vec<String>,
	pub parents: Vec<String>,
	pub children: Vec<String>,
	pub siblings: Vec<String>,
}

/// Visual role of a card relative to the focused person.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
	Focused,
	Partner,
	Lineage,
	Sibling,
	Dimmed,
}

impl Role {
	pub const ALL: [Role; 5] = [
		Role::Focused,
		Role::Partner,
		Role::Lineage,
		Role::Sibling,
		Role::Dimmed,
	];

	pub fn class_name(self) -> &'static str {
		match self {
			Role::Focused => "focused",
			Role::Partner => "partner",
			Role::Lineage => "lineage",
			Role::Sibling => "sibling",
			Role::Dimmed => "dimmed",
		}
	}
}
