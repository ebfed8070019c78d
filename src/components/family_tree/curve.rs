use std::f64::consts::PI;

use rand::Rng;

use super::geometry::{Point, Segment};

fn cubic(a: f64, b: f64, c: f64, d: f64, t: f64) -> f64 {
	let u = 1.0 - t;
	u.powi(3) * a + 3.0 * u.powi(2) * t * b + 3.0 * u * t.powi(2) * c + t.powi(3) * d
}

/// A hand-drawn looking parent-to-child branch.
///
/// The shape is sampled once and kept until the layout changes, so the
/// jitter stays put between frames.
#[derive(Clone, Debug, PartialEq)]
pub struct OrganicCurve {
	points: Vec<Point>,
	parents: Vec<String>,
	child: String,
}

impl OrganicCurve {
	/// Samples `steps` points after the start along a cubic that drops
	/// vertically from `start`, crosses over at mid height, then drops into
	/// `end`. Interior points wander horizontally, most at mid curve.
	pub fn generate<R: Rng + ?Sized>(
		segment: Segment,
		steps: usize,
		jitter_amplitude: f64,
		parents: Vec<String>,
		child: String,
		rng: &mut R,
	) -> Self {
		let Segment { start, end } = segment;
		let mid_y = (start.y + end.y) / 2.0;
		let steps = steps.max(1);

		let mut points = Vec::with_capacity(steps + 1);
		points.push(start);
		for i in 1..=steps {
			let t = i as f64 / steps as f64;
			let x = cubic(start.x, start.x, end.x, end.x, t);
			let y = cubic(start.y, mid_y, mid_y, end.y, t);
			let jitter = if i == steps {
				0.0
			} else {
				(rng.r#gen::<f64>() - 0.5) * jitter_amplitude * (t * PI).sin()
			};
			points.push(Point::new(x + jitter, y));
		}

		Self {
			points,
			parents,
			child,
		}
	}

	#[cfg(test)]
	pub fn points(&self) -> &[Point] {
		&self.points
	}

	pub fn child(&self) -> &str {
		&self.child
	}

	pub fn parents(&self) -> impl Iterator<Item = &str> {
		self.parents.iter().map(String::as_str)
	}

	pub fn touches(&self, id: &str) -> bool {
		self.child == id || self.parents.iter().any(|p| p == id)
	}

	/// The drawable part of the curve: every point up to the first one at or
	/// below `threshold`. The flag is set once the end point is included.
	pub fn visible_prefix(&self, threshold: f64) -> (&[Point], bool) {
		let cut = self
			.points
			.iter()
			.skip(1)
			.position(|p| p.y >= threshold)
			.map_or(self.points.len(), |i| i + 1);
		let reached = cut == self.points.len() && cut > 1;
		(&self.points[..cut], reached)
	}
}

/// Lowest document Y a branch may be drawn to right now.
pub fn reveal_threshold(scroll_y: f64, viewport_height: f64, buffer: f64) -> f64 {
	scroll_y + viewport_height + buffer
}
