use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, trace, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use super::animation::{AnimationLoop, BrowserFrames};
use super::config::{SurfaceMode, TreeConfig};
use super::dom::{DomCards, read_viewport};
use super::error::TreeError;
use super::graph::FamilyGraph;
use super::render::CanvasSurface;
use super::state::ConnectorRenderer;

/// Everything the browser callbacks share once the canvas is mounted.
struct Session {
	renderer: ConnectorRenderer,
	cards: DomCards,
	surface: CanvasSurface,
	canvas: HtmlCanvasElement,
}

impl Session {
	fn focus(&mut self, id: &str) {
		if let Some(highlight) = self.renderer.set_focus(id) {
			self.cards.apply_roles(highlight);
		}
	}

	fn resize(&mut self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = self.renderer.resize(&self.cards, read_viewport(&window));
		self.canvas.set_width(w as u32);
		self.canvas.set_height(h as u32);
		self.paint();
	}

	fn scroll(&mut self) {
		if let Some(window) = web_sys::window() {
			self.renderer.scroll_to(read_viewport(&window));
		}
		self.paint();
	}

	fn paint(&mut self) {
		let report = self.renderer.paint(&self.cards, &mut self.surface);
		trace!(
			"Painted {} branches and {} partner lines",
			report.branches,
			report.partner_lines
		);
		for id in &report.revealed {
			self.cards.mark_revealed(id);
		}
	}
}

type SharedSession = Rc<RefCell<Option<Session>>>;

/// State kept alive for as long as the component is mounted.
#[derive(Clone, Default)]
struct Shared {
	session: SharedSession,
	animate: Rc<RefCell<Option<AnimationLoop<BrowserFrames>>>>,
	listeners: Rc<RefCell<Vec<(&'static str, Closure<dyn FnMut()>)>>>,
}

impl Shared {
	/// Detaches window listeners and stops the frame loop.
	fn teardown(&self) {
		if let Some(anim) = self.animate.borrow_mut().take() {
			anim.stop();
		}
		let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
		if let Some(window) = web_sys::window() {
			for (event, cb) in &listeners {
				let _ = window.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
			}
		}
		self.session.borrow_mut().take();
	}
}

fn session_callback(session: &SharedSession, f: fn(&mut Session)) -> Closure<dyn FnMut()> {
	let session = session.clone();
	Closure::new(move || {
		if let Some(ref mut s) = *session.borrow_mut() {
			f(s);
		}
	})
}

fn mount(
	container: &Element,
	canvas: HtmlCanvasElement,
	graph: FamilyGraph,
	config: TreeConfig,
	focus: Option<String>,
	shared: &Shared,
) -> Result<(), TreeError> {
	let window = web_sys::window().ok_or(TreeError::NoWindow)?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(TreeError::js)?
		.ok_or(TreeError::ContextUnavailable)?
		.dyn_into()
		.map_err(|_| TreeError::ContextUnavailable)?;
	let cards = DomCards::collect(container)?;

	let seed = (js_sys::Math::random() * 2f64.powi(53)) as u64;
	let settle_delay = config.settle_delay_ms;
	let mut renderer = ConnectorRenderer::new(Rc::new(graph), config, seed);
	for person in renderer.graph().missing_cards(|id| cards.contains(id)) {
		warn!("Card for {} ({}) not found in the page", person.name, person.id);
	}
	cards.hide(renderer.excluded());
	if let Some(id) = focus {
		renderer.set_focus(&id);
	}
	if let Some(highlight) = renderer.highlight() {
		cards.apply_roles(highlight);
	}
	info!(
		"Family tree mounted with {} people and {} cards",
		renderer.graph().len(),
		cards.len()
	);
	*shared.session.borrow_mut() = Some(Session {
		renderer,
		cards,
		surface: CanvasSurface::new(ctx),
		canvas,
	});

	let handlers: [(&'static str, fn(&mut Session)); 2] =
		[("resize", Session::resize), ("scroll", Session::scroll)];
	for (event, callback) in handlers {
		let cb = session_callback(&shared.session, callback);
		window
			.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
			.map_err(TreeError::js)?;
		shared.listeners.borrow_mut().push((event, cb));
	}

	// First measurement waits for fonts and layout, then the loop takes over.
	let (session_settle, animate_settle) = (shared.session.clone(), shared.animate.clone());
	let settle = Closure::once_into_js(move || {
		match *session_settle.borrow_mut() {
			Some(ref mut s) => s.resize(),
			// Unmounted before the layout settled.
			None => return,
		}
		if animate_settle.borrow().as_ref().is_some_and(AnimationLoop::is_running) {
			return;
		}
		let session_frame = session_settle.clone();
		let anim = AnimationLoop::new(BrowserFrames::default(), move || {
			if let Some(ref mut s) = *session_frame.borrow_mut() {
				s.paint();
			}
		});
		anim.start();
		*animate_settle.borrow_mut() = Some(anim);
	});
	window
		.set_timeout_with_callback_and_timeout_and_arguments_0(settle.unchecked_ref(), settle_delay)
		.map_err(TreeError::js)?;
	Ok(())
}

/// Draws partner lines and parent branches behind the member cards passed as
/// children, and highlights the relatives of `focus`.
#[component]
pub fn FamilyTreeCanvas(
	graph: FamilyGraph,
	#[prop(into)] focus: Signal<Option<String>>,
	#[prop(optional)] config: TreeConfig,
	children: Children,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let shared = Shared::default();
	let canvas_style = match config.surface_mode {
		SurfaceMode::Document => "position: absolute; top: 0; left: 0; pointer-events: none;",
		SurfaceMode::Viewport => "position: fixed; top: 0; left: 0; pointer-events: none;",
	};

	let shared_init = shared.clone();
	Effect::new(move |_| {
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};
		if shared_init.session.borrow().is_some() {
			return;
		}
		let container: Element = container.into();
		let canvas: HtmlCanvasElement = canvas.into();
		if let Err(err) = mount(
			&container,
			canvas,
			graph.clone(),
			config.clone(),
			focus.get_untracked(),
			&shared_init,
		) {
			error!("Family tree cannot render: {err}");
		}
	});

	let stored = StoredValue::new_local(shared.clone());
	on_cleanup(move || {
		stored.try_with_value(Shared::teardown);
	});

	let session_focus = shared.session.clone();
	Effect::new(move |_| {
		let Some(id) = focus.get() else {
			return;
		};
		if let Some(ref mut s) = *session_focus.borrow_mut() {
			s.focus(&id);
		}
	});

	view! {
		<div node_ref=container_ref class="family-tree">
			<canvas node_ref=canvas_ref class="tree-canvas" style=canvas_style />
			{children()}
		</div>
	}
}
