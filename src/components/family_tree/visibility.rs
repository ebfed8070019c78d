use std::collections::HashSet;

use super::geometry::LayoutProvider;

/// Decides, per frame, whether a card may be connected.
pub struct Visibility<'a, L: ?Sized> {
	layout: &'a L,
	excluded: &'a HashSet<String>,
}

impl<'a, L: LayoutProvider + ?Sized> Visibility<'a, L> {
	pub fn new(layout: &'a L, excluded: &'a HashSet<String>) -> Self {
		Self { layout, excluded }
	}

	pub fn is_renderable(&self, id: &str) -> bool {
		if self.excluded.contains(id) || !self.layout.is_attached(id) {
			return false;
		}
		self.layout
			.card_rect(id)
			.is_some_and(|rect| !rect.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::family_tree::geometry::Rect;
	use crate::components::family_tree::geometry::tests::FakeLayout;

	fn layout() -> FakeLayout {
		let mut layout = FakeLayout::default()
			.card("shown", Rect::new(0.0, 0.0, 100.0, 80.0))
			.card("collapsed", Rect::new(10.0, 10.0, 0.0, 0.0))
			.card("thin", Rect::new(10.0, 10.0, 0.0, 80.0))
			.card("filtered", Rect::new(0.0, 0.0, 100.0, 80.0))
			.card("detached", Rect::new(0.0, 0.0, 100.0, 80.0));
		layout.detached.push("detached".into());
		layout
	}

	#[test]
	fn only_attached_sized_unfiltered_cards_render() {
		let layout = layout();
		let excluded = HashSet::from(["filtered".to_string()]);
		let visibility = Visibility::new(&layout, &excluded);

		assert!(visibility.is_renderable("shown"));
		assert!(visibility.is_renderable("thin"));
		assert!(!visibility.is_renderable("collapsed"));
		assert!(!visibility.is_renderable("filtered"));
		assert!(!visibility.is_renderable("detached"));
		assert!(!visibility.is_renderable("unknown"));
	}
}
