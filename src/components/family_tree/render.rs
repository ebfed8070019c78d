use web_sys::CanvasRenderingContext2d;

use super::config::StrokeStyle;
use super::geometry::Point;

/// An immediate-mode drawing target, cleared and repainted every frame.
pub trait Surface {
	fn clear(&mut self, width: f64, height: f64);
	fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle);
}

/// The tree canvas' 2D context.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle) {
		let Some((first, rest)) = points.split_first() else {
			return;
		};
		if rest.is_empty() {
			return;
		}

		let ctx = &self.ctx;
		ctx.begin_path();
		ctx.move_to(first.x, first.y);
		for p in rest {
			ctx.line_to(p.x, p.y);
		}

		// Resizing the canvas resets context state, so set caps on every stroke.
		ctx.set_line_cap("round");
		ctx.set_line_join("round");
		ctx.set_line_width(style.width);
		ctx.set_stroke_style_str(&style.color);
		match &style.glow {
			Some(glow) => {
				ctx.set_shadow_color(&glow.color);
				ctx.set_shadow_blur(glow.blur);
			}
			None => ctx.set_shadow_blur(0.0),
		}
		ctx.stroke();
		ctx.set_shadow_blur(0.0);
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	/// Records strokes instead of drawing them.
	#[derive(Default)]
	pub(crate) struct RecordingSurface {
		pub clears: usize,
		pub size: (f64, f64),
		pub strokes: Vec<(Vec<Point>, StrokeStyle)>,
	}

	impl Surface for RecordingSurface {
		fn clear(&mut self, width: f64, height: f64) {
			self.clears += 1;
			self.size = (width, height);
			self.strokes.clear();
		}

		fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle) {
			self.strokes.push((points.to_vec(), style.clone()));
		}
	}
}
