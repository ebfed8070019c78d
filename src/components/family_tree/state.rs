use std::collections::HashSet;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::{SurfaceMode, TreeConfig};
use super::curve::{OrganicCurve, reveal_threshold};
use super::geometry::{LayoutProvider, Point, Sampler, Segment, Viewport};
use super::graph::FamilyGraph;
use super::render::Surface;
use super::resolve::Highlight;
use super::visibility::Visibility;

/// Unordered pair of partner ids, smaller id first.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PairKey(String, String);

impl PairKey {
	pub fn new(a: &str, b: &str) -> Self {
		if a <= b {
			Self(a.into(), b.into())
		} else {
			Self(b.into(), a.into())
		}
	}

	pub fn touches(&self, id: &str) -> bool {
		self.0 == id || self.1 == id
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartnerLine {
	pub pair: PairKey,
	pub segment: Segment,
	pub active: bool,
}

/// What one painted frame produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
	pub branches: usize,
	pub partner_lines: usize,
	/// Cards whose branch finished drawing during this frame.
	pub revealed: Vec<String>,
}

/// Owns everything the tree canvas draws: focus, branch shapes and the
/// current viewport.
pub struct ConnectorRenderer {
	graph: Rc<FamilyGraph>,
	config: TreeConfig,
	excluded: HashSet<String>,
	highlight: Option<Highlight>,
	curves: Vec<OrganicCurve>,
	revealed: HashSet<String>,
	viewport: Viewport,
	rng: StdRng,
}

impl ConnectorRenderer {
	pub fn new(graph: Rc<FamilyGraph>, config: TreeConfig, seed: u64) -> Self {
		let excluded = graph.excluded_by(config.name_filter.as_deref());
		let mut renderer = Self {
			graph,
			excluded,
			highlight: None,
			curves: Vec::new(),
			revealed: HashSet::new(),
			viewport: Viewport::default(),
			rng: StdRng::seed_from_u64(config.seed.unwrap_or(seed)),
			config,
		};
		if let Some(id) = renderer.initial_focus() {
			renderer.set_focus(&id);
		}
		renderer
	}

	fn initial_focus(&self) -> Option<String> {
		self.config.default_focus.clone().or_else(|| {
			self.graph
				.people()
				.find(|p| !self.excluded.contains(&p.id))
				.map(|p| p.id.clone())
		})
	}

	pub fn graph(&self) -> &FamilyGraph {
		&self.graph
	}

	pub fn excluded(&self) -> &HashSet<String> {
		&self.excluded
	}

	pub fn highlight(&self) -> Option<&Highlight> {
		self.highlight.as_ref()
	}

	pub fn focus_id(&self) -> Option<&str> {
		self.highlight.as_ref().map(Highlight::focus_id)
	}

	/// Replaces the highlight. Unknown ids leave the current one in place.
	pub fn set_focus(&mut self, id: &str) -> Option<&Highlight> {
		match Highlight::for_focus(&self.graph, id) {
			Some(highlight) => {
				info!("Focus set to {id}");
				self.highlight = Some(highlight);
				self.highlight.as_ref()
			}
			None => {
				warn!("Ignoring focus on unknown person {id}");
				None
			}
		}
	}

	/// Canvas pixel size for the current viewport.
	pub fn surface_size(&self) -> (f64, f64) {
		let v = &self.viewport;
		match self.config.surface_mode {
			SurfaceMode::Document => (v.width, v.document_height.max(v.height)),
			SurfaceMode::Viewport => (v.width, v.height),
		}
	}

	/// Tracks scrolling without touching branch shapes. Size changes wait
	/// for `resize`.
	pub fn scroll_to(&mut self, viewport: Viewport) {
		self.viewport.scroll_x = viewport.scroll_x;
		self.viewport.scroll_y = viewport.scroll_y;
	}

	/// Adopts new window metrics and rebuilds every branch from scratch.
	pub fn resize<L: LayoutProvider + ?Sized>(&mut self, layout: &L, viewport: Viewport) -> (f64, f64) {
		self.viewport = viewport;
		self.regenerate(layout);
		let size = self.surface_size();
		debug!(
			"Resized tree surface to {}x{} with {} branches",
			size.0,
			size.1,
			self.curves.len()
		);
		size
	}

	fn regenerate<L: LayoutProvider + ?Sized>(&mut self, layout: &L) {
		let visibility = Visibility::new(layout, &self.excluded);
		let sampler = self.sampler(layout);
		let mut curves = Vec::new();

		for person in self.graph.people() {
			if person.parents.is_empty() || !visibility.is_renderable(&person.id) {
				continue;
			}
			let parents: Vec<&str> = person
				.parents
				.iter()
				.map(String::as_str)
				.filter(|id| self.graph.contains(id) && visibility.is_renderable(id))
				.collect();
			let Some(segment) = sampler.trunk(&parents, &person.id) else {
				continue;
			};
			curves.push(OrganicCurve::generate(
				segment,
				self.config.curve_steps,
				self.config.jitter_amplitude,
				parents.iter().map(|s| s.to_string()).collect(),
				person.id.clone(),
				&mut self.rng,
			));
		}
		self.curves = curves;
	}

	fn sampler<'a, L: LayoutProvider + ?Sized>(&self, layout: &'a L) -> Sampler<'a, L> {
		Sampler::new(
			layout,
			self.viewport.scroll(),
			self.config.snap_threshold,
			self.config.radius_inset,
		)
	}

	/// Partner lines for this frame, one per unordered pair.
	pub fn partner_lines<L: LayoutProvider + ?Sized>(&self, layout: &L) -> Vec<PartnerLine> {
		let visibility = Visibility::new(layout, &self.excluded);
		let sampler = self.sampler(layout);
		let mut seen = HashSet::new();
		let mut lines = Vec::new();

		for person in self.graph.people() {
			if person.partners.is_empty() || !visibility.is_renderable(&person.id) {
				continue;
			}
			for partner in &person.partners {
				let partner = partner.trim();
				if partner == person.id || !visibility.is_renderable(partner) {
					continue;
				}
				let pair = PairKey::new(&person.id, partner);
				if seen.contains(&pair) {
					continue;
				}
				let Some(segment) = sampler.portrait_segment(&person.id, partner) else {
					continue;
				};
				let active = self.focus_id().is_some_and(|f| pair.touches(f));
				seen.insert(pair.clone());
				lines.push(PartnerLine {
					pair,
					segment,
					active,
				});
			}
		}
		lines
	}

	/// Clears the surface and paints every branch and partner line.
	pub fn paint<L, S>(&mut self, layout: &L, surface: &mut S) -> FrameReport
	where
		L: LayoutProvider + ?Sized,
		S: Surface + ?Sized,
	{
		let (width, height) = self.surface_size();
		surface.clear(width, height);

		let origin = match self.config.surface_mode {
			SurfaceMode::Document => Point::default(),
			SurfaceMode::Viewport => Point::new(-self.viewport.scroll_x, -self.viewport.scroll_y),
		};
		let threshold = if self.config.progressive_reveal {
			reveal_threshold(
				self.viewport.scroll_y,
				self.viewport.height,
				self.config.reveal_buffer,
			)
		} else {
			f64::INFINITY
		};
		let theme = &self.config.theme;
		let focus = self.focus_id();
		let visibility = Visibility::new(layout, &self.excluded);
		let mut report = FrameReport::default();

		for curve in &self.curves {
			if !visibility.is_renderable(curve.child())
				|| !curve.parents().all(|p| visibility.is_renderable(p))
			{
				continue;
			}
			let (drawn, reached) = curve.visible_prefix(threshold);
			if drawn.len() > 1 {
				let style = if focus.is_some_and(|f| curve.touches(f)) {
					&theme.branch_active
				} else {
					&theme.branch_inactive
				};
				let points: Vec<Point> = drawn.iter().map(|p| p.offset(origin)).collect();
				surface.stroke_path(&points, style);
				report.branches += 1;
			}
			if reached && self.config.progressive_reveal && !self.revealed.contains(curve.child()) {
				report.revealed.push(curve.child().to_string());
			}
		}

		for line in self.partner_lines(layout) {
			let style = if line.active {
				&theme.partner_active
			} else {
				&theme.partner_inactive
			};
			let points = [line.segment.start.offset(origin), line.segment.end.offset(origin)];
			surface.stroke_path(&points, style);
			report.partner_lines += 1;
		}

		self.revealed.extend(report.revealed.iter().cloned());
		report
	}
}
