#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn offset(self, by: Point) -> Self {
		Self::new(self.x + by.x, self.y + by.y)
	}
}

/// Axis-aligned box in viewport (or, once offset, document) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
		Self {
			left,
			top,
			width,
			height,
		}
	}

	pub fn center(&self) -> Point {
		Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
	}

	pub fn bottom(&self) -> f64 {
		self.top + self.height
	}

	pub fn is_empty(&self) -> bool {
		self.width == 0.0 && self.height == 0.0
	}

	pub fn offset(self, by: Point) -> Self {
		Self::new(self.left + by.x, self.top + by.y, self.width, self.height)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
	pub start: Point,
	pub end: Point,
}

/// Browser window metrics the renderer needs each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub scroll_x: f64,
	pub scroll_y: f64,
	pub document_height: f64,
}

impl Viewport {
	pub fn scroll(&self) -> Point {
		Point::new(self.scroll_x, self.scroll_y)
	}
}

/// Where the cards currently are on screen. Rects are viewport-relative.
pub trait LayoutProvider {
	fn card_rect(&self, id: &str) -> Option<Rect>;
	/// The circular portrait inside the card, or the card itself.
	fn anchor_rect(&self, id: &str) -> Option<Rect>;
	fn is_attached(&self, id: &str) -> bool;
}

/// Turns card rectangles into connector endpoints in document coordinates.
pub struct Sampler<'a, L: ?Sized> {
	layout: &'a L,
	scroll: Point,
	snap_threshold: f64,
	radius_inset: f64,
}

impl<'a, L: LayoutProvider + ?Sized> Sampler<'a, L> {
	pub fn new(layout: &'a L, scroll: Point, snap_threshold: f64, radius_inset: f64) -> Self {
		Self {
			layout,
			scroll,
			snap_threshold,
			radius_inset,
		}
	}

	/// Straight portrait-to-portrait line, clipped at both portrait edges.
	pub fn portrait_segment(&self, a: &str, b: &str) -> Option<Segment> {
		let first = self.layout.anchor_rect(a)?.offset(self.scroll);
		let second = self.layout.anchor_rect(b)?.offset(self.scroll);
		clip_between(first, second, self.snap_threshold, self.radius_inset)
	}

	/// Trunk from below the parents to the top of the child card.
	pub fn trunk(&self, parents: &[&str], child: &str) -> Option<Segment> {
		let mut rects = parents
			.iter()
			.filter_map(|id| self.layout.card_rect(id))
			.map(|r| r.offset(self.scroll));
		let first = rects.next()?;
		let start = match rects.next() {
			Some(second) => Point::new(
				(first.center().x + second.center().x) / 2.0,
				first.bottom(),
			),
			None => Point::new(first.center().x, first.bottom()),
		};

		let child = self.layout.card_rect(child)?.offset(self.scroll);
		let end = Point::new(child.center().x, child.top);
		if start == end {
			return None;
		}
		Some(Segment { start, end })
	}
}

/// Center-to-center segment pulled in by each circle's radius.
///
/// Centers closer than `snap_threshold` vertically share their average Y.
/// Returns `None` for coincident centers.
pub fn clip_between(a: Rect, b: Rect, snap_threshold: f64, radius_inset: f64) -> Option<Segment> {
	let (mut p1, mut p2) = (a.center(), b.center());
	if (p1.y - p2.y).abs() < snap_threshold {
		let avg = (p1.y + p2.y) / 2.0;
		p1.y = avg;
		p2.y = avg;
	}

	let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist == 0.0 {
		return None;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (r1, r2) = (
		(a.width / 2.0 - radius_inset).max(0.0),
		(b.width / 2.0 - radius_inset).max(0.0),
	);

	Some(Segment {
		start: Point::new(p1.x + ux * r1, p1.y + uy * r1),
		end: Point::new(p2.x - ux * r2, p2.y - uy * r2),
	})
}
