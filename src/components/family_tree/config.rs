use serde::Deserialize;

use super::error::TreeError;

/// Which area the drawing surface covers.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceMode {
	/// Canvas spans the whole scrollable document and scrolls with the cards.
	#[default]
	Document,
	/// Canvas is a fixed overlay the size of the viewport.
	Viewport,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Glow {
	pub color: String,
	pub blur: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
	pub color: String,
	pub width: f64,
	#[serde(default)]
	pub glow: Option<Glow>,
}

impl StrokeStyle {
	fn new(color: &str, width: f64, glow: Option<(&str, f64)>) -> Self {
		Self {
			color: color.into(),
			width,
			glow: glow.map(|(color, blur)| Glow {
				color: color.into(),
				blur,
			}),
		}
	}
}

/// Stroke styles for every connector kind, active and inactive.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConnectorTheme {
	pub partner_active: StrokeStyle,
	pub partner_inactive: StrokeStyle,
	pub branch_active: StrokeStyle,
	pub branch_inactive: StrokeStyle,
}

impl Default for ConnectorTheme {
	fn default() -> Self {
		Self {
			partner_active: StrokeStyle::new("#FFD700", 3.0, Some(("#FFD700", 10.0))),
			partner_inactive: StrokeStyle::new("rgba(255, 255, 255, 0.2)", 2.0, None),
			branch_active: StrokeStyle::new("#FFD700", 3.0, Some(("#FFD700", 10.0))),
			branch_inactive: StrokeStyle::new("#8b7355", 2.5, Some(("#8b7355", 5.0))),
		}
	}
}

/// Tunables for the tree canvas.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
	pub surface_mode: SurfaceMode,
	/// Portrait centers closer than this vertically are drawn on one row.
	pub snap_threshold: f64,
	/// Pulled off the portrait radius when clipping partner lines.
	pub radius_inset: f64,
	pub curve_steps: usize,
	pub jitter_amplitude: f64,
	pub progressive_reveal: bool,
	pub reveal_buffer: f64,
	/// Keep only people whose name contains this text.
	pub name_filter: Option<String>,
	pub default_focus: Option<String>,
	/// Wait before the first measurement so fonts and layout can settle.
	pub settle_delay_ms: i32,
	/// Fixed jitter seed; a fresh one is drawn per session when unset.
	pub seed: Option<u64>,
	pub theme: ConnectorTheme,
}

impl Default for TreeConfig {
	fn default() -> Self {
		Self {
			surface_mode: SurfaceMode::Document,
			snap_threshold: 20.0,
			radius_inset: 2.0,
			curve_steps: 40,
			jitter_amplitude: 20.0,
			progressive_reveal: true,
			reveal_buffer: 100.0,
			name_filter: None,
			default_focus: None,
			settle_delay_ms: 100,
			seed: None,
			theme: ConnectorTheme::default(),
		}
	}
}

impl TreeConfig {
	pub fn from_json(json: &str) -> Result<Self, TreeError> {
		Ok(serde_json::from_str(json)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config = TreeConfig::from_json(
			r#"{"surfaceMode":"viewport","nameFilter":"Schüpbach","seed":7}"#,
		)
		.unwrap();
		assert_eq!(config.surface_mode, SurfaceMode::Viewport);
		assert_eq!(config.name_filter.as_deref(), Some("Schüpbach"));
		assert_eq!(config.seed, Some(7));
		assert_eq!(config.curve_steps, 40);
		assert_eq!(config.snap_threshold, 20.0);
		assert_eq!(config.theme, ConnectorTheme::default());
	}

	#[test]
	fn invalid_json_is_a_data_error() {
		let err = TreeConfig::from_json("{\"curveSteps\": \"many\"}").unwrap_err();
		assert!(matches!(err, TreeError::Data(_)));
	}
}
