use std::collections::{HashMap, HashSet};

use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, Window};

use super::error::TreeError;
use super::geometry::{LayoutProvider, Rect, Viewport};
use super::resolve::Highlight;
use super::types::Role;

pub const CARD_SELECTOR: &str = ".member-card";
pub const PORTRAIT_SELECTOR: &str = ".portrait";
pub const REVEALED_CLASS: &str = "visible";

struct Card {
	element: HtmlElement,
	portrait: Option<Element>,
}

fn rect_of(element: &Element) -> Rect {
	let r = element.get_bounding_client_rect();
	Rect::new(r.left(), r.top(), r.width(), r.height())
}

/// Person id to rendered card, collected once after the cards mount.
#[derive(Default)]
pub struct DomCards {
	cards: HashMap<String, Card>,
}

impl DomCards {
	pub fn collect(root: &Element) -> Result<Self, TreeError> {
		let nodes = root
			.query_selector_all(CARD_SELECTOR)
			.map_err(TreeError::js)?;
		let mut cards = HashMap::new();
		for i in 0..nodes.length() {
			let Some(element) = nodes
				.item(i)
				.and_then(|node| node.dyn_into::<HtmlElement>().ok())
			else {
				continue;
			};
			let id = element.id();
			if id.is_empty() {
				continue;
			}
			let portrait = element.query_selector(PORTRAIT_SELECTOR).ok().flatten();
			cards.insert(id, Card { element, portrait });
		}
		debug!("Collected {} member cards", cards.len());
		Ok(Self { cards })
	}

	pub fn contains(&self, id: &str) -> bool {
		self.cards.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.cards.len()
	}

	/// Takes filtered-out people out of the layout flow.
	pub fn hide(&self, excluded: &HashSet<String>) {
		for id in excluded {
			if let Some(card) = self.cards.get(id) {
				let _ = card.element.style().set_property("display", "none");
			}
		}
	}

	/// Puts exactly one role class on every card.
	pub fn apply_roles(&self, highlight: &Highlight) {
		for (id, card) in &self.cards {
			let classes = card.element.class_list();
			for role in Role::ALL {
				let _ = classes.remove_1(role.class_name());
			}
			let _ = classes.add_1(highlight.role(id).class_name());
		}
	}

	pub fn mark_revealed(&self, id: &str) {
		if let Some(card) = self.cards.get(id) {
			let _ = card.element.class_list().add_1(REVEALED_CLASS);
		}
	}
}

impl LayoutProvider for DomCards {
	fn card_rect(&self, id: &str) -> Option<Rect> {
		self.cards.get(id).map(|card| rect_of(&card.element))
	}

	fn anchor_rect(&self, id: &str) -> Option<Rect> {
		let card = self.cards.get(id)?;
		Some(match &card.portrait {
			Some(portrait) => rect_of(portrait),
			None => rect_of(&card.element),
		})
	}

	fn is_attached(&self, id: &str) -> bool {
		self.cards
			.get(id)
			.is_some_and(|card| card.element.offset_parent().is_some())
	}
}

fn px(value: Result<JsValue, JsValue>) -> f64 {
	value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

pub fn read_viewport(window: &Window) -> Viewport {
	let document_height = window
		.document()
		.and_then(|doc| doc.body())
		.map(|body| body.scroll_height() as f64)
		.unwrap_or(0.0);
	Viewport {
		width: px(window.inner_width()),
		height: px(window.inner_height()),
		scroll_x: window.scroll_x().unwrap_or(0.0),
		scroll_y: window.scroll_y().unwrap_or(0.0),
		document_height,
	}
}
