//! View camera: pan/zoom state plus timed transitions.
//!
//! The camera keeps the graph-space point shown at the canvas centre and the
//! zoom factor. `transform()` turns that into the screen transform the
//! renderer applies (`screen = graph * k + (x, y)`).

use crate::config::{MAX_ZOOM, MIN_ZOOM};

/// Screen transform: translate by `(x, y)` then scale by `k`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

/// Axis-aligned bounds in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
		points.into_iter().fold(None, |acc, (x, y)| {
			Some(match acc {
				None => Self {
					min_x: x,
					min_y: y,
					max_x: x,
					max_y: y,
				},
				Some(b) => Self {
					min_x: b.min_x.min(x),
					min_y: b.min_y.min(y),
					max_x: b.max_x.max(x),
					max_y: b.max_y.max(y),
				},
			})
		})
	}

	pub fn center(&self) -> (f64, f64) {
		((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

pub fn ease_out_quad(t: f64) -> f64 {
	t * (2.0 - t)
}

#[derive(Clone, Copy, Debug)]
struct Tween<T> {
	from: T,
	to: T,
	elapsed_ms: f64,
	duration_ms: f64,
}

impl<T: Copy> Tween<T> {
	fn progress(&self) -> f64 {
		if self.duration_ms <= 0.0 {
			1.0
		} else {
			ease_out_quad((self.elapsed_ms / self.duration_ms).min(1.0))
		}
	}

	fn done(&self) -> bool {
		self.elapsed_ms >= self.duration_ms
	}
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

#[derive(Clone, Debug)]
pub struct Camera {
	center: (f64, f64),
	k: f64,
	center_tween: Option<Tween<(f64, f64)>>,
	zoom_tween: Option<Tween<f64>>,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			center: (0.0, 0.0),
			k: 1.0,
			center_tween: None,
			zoom_tween: None,
		}
	}
}

impl Camera {
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	pub fn zoom_level(&self) -> f64 {
		self.k
	}

	pub fn is_animating(&self) -> bool {
		self.center_tween.is_some() || self.zoom_tween.is_some()
	}

	/// Move the view centre to `(x, y)` over `duration_ms`.
	pub fn center_at(&mut self, x: f64, y: f64, duration_ms: f64) {
		self.center_tween = Some(Tween {
			from: self.center,
			to: (x, y),
			elapsed_ms: 0.0,
			duration_ms,
		});
		self.tick(0.0);
	}

	/// Zoom to `k` over `duration_ms`, keeping the view centre.
	pub fn zoom(&mut self, k: f64, duration_ms: f64) {
		self.zoom_tween = Some(Tween {
			from: self.k,
			to: k.clamp(MIN_ZOOM, MAX_ZOOM),
			elapsed_ms: 0.0,
			duration_ms,
		});
		self.tick(0.0);
	}

	/// Frame `bounds` inside the canvas, leaving `padding` pixels on each side.
	pub fn zoom_to_fit(&mut self, bounds: Bounds, width: f64, height: f64, padding: f64, duration_ms: f64) {
		let (cx, cy) = bounds.center();
		self.center_at(cx, cy, duration_ms);
		if bounds.width() < 1.0 && bounds.height() < 1.0 {
			return;
		}
		let zoom_x = (width - 2.0 * padding) / bounds.width().max(1.0);
		let zoom_y = (height - 2.0 * padding) / bounds.height().max(1.0);
		self.zoom(zoom_x.min(zoom_y), duration_ms);
	}

	/// Advance running transitions by `dt_ms`.
	pub fn tick(&mut self, dt_ms: f64) {
		if let Some(tw) = self.center_tween.as_mut() {
			tw.elapsed_ms += dt_ms;
			let t = tw.progress();
			self.center = (lerp(tw.from.0, tw.to.0, t), lerp(tw.from.1, tw.to.1, t));
			if tw.done() {
				self.center_tween = None;
			}
		}
		if let Some(tw) = self.zoom_tween.as_mut() {
			tw.elapsed_ms += dt_ms;
			self.k = lerp(tw.from, tw.to, tw.progress());
			if tw.done() {
				self.zoom_tween = None;
			}
		}
	}

	/// Drag the view by a screen-space delta. Cancels transitions.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.stop();
		self.center = (self.center.0 - dx / self.k, self.center.1 - dy / self.k);
	}

	/// Zoom by `factor` keeping the graph point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, width: f64, height: f64) {
		self.stop();
		let (gx, gy) = self.screen_to_graph(sx, sy, width, height);
		self.k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		self.center = (gx - (sx - width / 2.0) / self.k, gy - (sy - height / 2.0) / self.k);
	}

	pub fn stop(&mut self) {
		self.center_tween = None;
		self.zoom_tween = None;
	}

	pub fn transform(&self, width: f64, height: f64) -> ViewTransform {
		ViewTransform {
			x: width / 2.0 - self.center.0 * self.k,
			y: height / 2.0 - self.center.1 * self.k,
			k: self.k,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64, width: f64, height: f64) -> (f64, f64) {
		let t = self.transform(width, height);
		((sx - t.x) / t.k, (sy - t.y) / t.k)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn click_transition_reaches_targets_at_their_own_pace() {
		let mut cam = Camera::default();
		cam.center_at(100.0, -50.0, 1000.0);
		cam.zoom(8.0, 2000.0);

		cam.tick(1000.0);
		assert_eq!(cam.center(), (100.0, -50.0));
		assert!(cam.zoom_level() > 1.0 && cam.zoom_level() < 8.0);
		assert!(cam.is_animating());

		cam.tick(1000.0);
		assert!(close(cam.zoom_level(), 8.0));
		assert!(!cam.is_animating());
	}

	#[test]
	fn zero_duration_applies_immediately() {
		let mut cam = Camera::default();
		cam.zoom(3.0, 0.0);
		assert_eq!(cam.zoom_level(), 3.0);
		assert!(!cam.is_animating());
	}

	#[test]
	fn transform_places_center_in_middle_of_canvas() {
		let mut cam = Camera::default();
		cam.center_at(10.0, 20.0, 0.0);
		cam.zoom(2.0, 0.0);
		let t = cam.transform(400.0, 300.0);
		assert!(close(10.0 * t.k + t.x, 200.0));
		assert!(close(20.0 * t.k + t.y, 150.0));
	}

	#[test]
	fn wheel_zoom_keeps_cursor_point_fixed() {
		let mut cam = Camera::default();
		let before = cam.screen_to_graph(120.0, 80.0, 400.0, 300.0);
		cam.zoom_at(120.0, 80.0, 1.1, 400.0, 300.0);
		let after = cam.screen_to_graph(120.0, 80.0, 400.0, 300.0);
		assert!(close(before.0, after.0) && close(before.1, after.1));
	}

	#[test]
	fn pan_cancels_transitions() {
		let mut cam = Camera::default();
		cam.center_at(500.0, 500.0, 1000.0);
		cam.pan_by(10.0, 0.0);
		assert!(!cam.is_animating());
	}

	#[test]
	fn fit_frames_bounds_with_padding() {
		let bounds = Bounds::from_points([(-50.0, -10.0), (50.0, 10.0)]).unwrap();
		let mut cam = Camera::default();
		cam.zoom_to_fit(bounds, 220.0, 220.0, 10.0, 500.0);
		cam.tick(500.0);
		assert_eq!(cam.center(), (0.0, 0.0));
		assert!(close(cam.zoom_level(), 2.0));
	}

	#[test]
	fn fit_on_single_point_only_recenters() {
		let bounds = Bounds::from_points([(5.0, 5.0)]).unwrap();
		let mut cam = Camera::default();
		cam.zoom_to_fit(bounds, 200.0, 200.0, 10.0, 0.0);
		assert_eq!(cam.center(), (5.0, 5.0));
		assert_eq!(cam.zoom_level(), 1.0);
	}

	#[test]
	fn no_points_no_bounds() {
		assert_eq!(Bounds::from_points(std::iter::empty()), None);
	}
}
