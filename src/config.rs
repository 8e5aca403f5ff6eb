//! Static configuration for the pipeline, the canvas and the renderer.

use rand::Rng;

/// Local storage entry holding the OpenAI API key.
pub const API_KEY_STORAGE_KEY: &str = "openai_api_key";

/// Total border inset subtracted from the container (4px each side).
pub const BORDER_INSET: f64 = 8.0;

/// Length of the directional arrow drawn on every link.
pub const ARROW_LENGTH: f64 = 4.0;
/// Relative arrow position along the link; 1.0 places it at the target end.
pub const ARROW_REL_POS: f64 = 1.0;
/// Radius used to offset arrows from the target node.
pub const NODE_REL_SIZE: f64 = 4.0;

pub const CLICK_ZOOM: f64 = 8.0;
pub const CLICK_ZOOM_MS: f64 = 2000.0;
pub const CLICK_CENTER_MS: f64 = 1000.0;
pub const FIT_MS: f64 = 500.0;
pub const FIT_PADDING: f64 = 10.0;

pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 1000.0;

/// Chat model settings.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
	pub model: String,
	pub temperature: f64,
	pub base_url: String,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			model: "gpt-3.5-turbo".into(),
			temperature: 0.0,
			base_url: "https://api.openai.com/v1".into(),
		}
	}
}

/// Canvas pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphConfig {
	pub width: f64,
	pub height: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			width: 450.0,
			height: 450.0,
		}
	}
}

impl GraphConfig {
	/// Size the canvas from the measured container, leaving room for the border.
	pub fn from_container(offset_width: f64, offset_height: f64) -> Self {
		Self {
			width: (offset_width - BORDER_INSET).max(0.0),
			height: (offset_height - BORDER_INSET).max(0.0),
		}
	}
}

/// How link curvature is derived when shaping graph data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurvaturePolicy {
	/// Every link is straight.
	#[default]
	Straight,
	/// Uniform jitter in `[-1, 1]` at two-decimal resolution.
	Jitter,
}

impl CurvaturePolicy {
	pub fn curvature<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
		match self {
			Self::Straight => 0.0,
			Self::Jitter => {
				let r: f64 = rng.r#gen();
				(100.0 * (2.0 * r - 1.0)).round() / 100.0
			}
		}
	}
}
