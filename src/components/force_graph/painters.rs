//! Per-frame paint callbacks for node labels, node hit regions and link labels.

use std::f64::consts::PI;

use super::surface::DrawingSurface;
use super::types::{LinkObject, NodeObject};

const NODE_FONT_PX: f64 = 16.0;
const MAX_LINK_FONT_SIZE: f64 = 4.0;
const LABEL_NODE_MARGIN: f64 = 8.0 * 1.5;
const LINK_LABEL_COLOR: &str = "darkgrey";
const LABEL_BACKGROUND: &str = "#ffffff";

fn padded_box(text_width: f64, font_size: f64) -> [f64; 2] {
	[text_width, font_size].map(|n| n + font_size * 0.2)
}

/// Paint the node as a white label box with the label in the node colour.
///
/// Caches the box on the node for [`node_pointer_area_paint`]. Nodes the
/// simulation has not positioned yet are skipped.
pub fn node_canvas_object<S: DrawingSurface + ?Sized>(
	node: &mut NodeObject,
	ctx: &S,
	global_scale: f64,
) {
	let (Some(x), Some(y)) = (node.x, node.y) else {
		return;
	};
	let font_size = NODE_FONT_PX / global_scale;
	ctx.set_font(&format!("{font_size}px Sans-Serif"));
	let text_width = ctx.measure_text_width(&node.label);
	let [w, h] = padded_box(text_width, font_size);

	ctx.set_fill_style(LABEL_BACKGROUND);
	ctx.fill_rect(x - w / 2.0, y - h / 2.0, w, h);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style(&node.color);
	ctx.fill_text(&node.label, x, y);

	node.bckg_dimensions = Some([w, h]);
}

/// Paint the node's hit region in `color`, matching the visible label box.
pub fn node_pointer_area_paint<S: DrawingSurface + ?Sized>(node: &NodeObject, color: &str, ctx: &S) {
	let (Some([w, h]), Some(x), Some(y)) = (node.bckg_dimensions, node.x, node.y) else {
		return;
	};
	ctx.set_fill_style(color);
	ctx.fill_rect(x - w / 2.0, y - h / 2.0, w, h);
}

/// Keep text upright: angles beyond ±90° are flipped by 180°.
pub fn readable_angle(dx: f64, dy: f64) -> f64 {
	let angle = dy.atan2(dx);
	if angle > PI / 2.0 {
		-(PI - angle)
	} else if angle < -PI / 2.0 {
		-(-PI - angle)
	} else {
		angle
	}
}

/// Largest font size up to 4px whose label fits in `max_text_length`.
///
/// `unit_width` is the label width at a 1px font. Never negative.
pub fn link_font_size(max_text_length: f64, unit_width: f64) -> f64 {
	MAX_LINK_FONT_SIZE.min(max_text_length / unit_width).max(0.0)
}

/// Paint the link type at the link midpoint, rotated along the link.
pub fn link_canvas_object<S: DrawingSurface + ?Sized>(link: &LinkObject, ctx: &S) {
	let (Some((sx, sy)), Some((ex, ey))) = (link.source.position(), link.target.position()) else {
		return;
	};

	let (mid_x, mid_y) = (sx + (ex - sx) / 2.0, sy + (ey - sy) / 2.0);
	let (dx, dy) = (ex - sx, ey - sy);
	let max_text_length = (dx * dx + dy * dy).sqrt() - LABEL_NODE_MARGIN * 2.0;
	let angle = readable_angle(dx, dy);
	let label = link.kind.as_deref().unwrap_or_default();

	ctx.set_font("1px Sans-Serif");
	let font_size = link_font_size(max_text_length, ctx.measure_text_width(label));
	ctx.set_font(&format!("{font_size}px Sans-Serif"));
	let text_width = ctx.measure_text_width(label);
	let [w, h] = padded_box(text_width, font_size);

	ctx.save();
	ctx.translate(mid_x, mid_y);
	ctx.rotate(angle);

	ctx.set_fill_style(LABEL_BACKGROUND);
	ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style(LINK_LABEL_COLOR);
	ctx.fill_text(label, 0.0, 0.0);
	ctx.restore();
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::surface::recording::{Call, GLYPH_RATIO, RecordingSurface};
	use crate::components::force_graph::types::LinkEndpoint;

	fn node(label: &str, x: f64, y: f64) -> NodeObject {
		NodeObject {
			id: 1,
			label: label.into(),
			kind: Some("Person".into()),
			x: Some(x),
			y: Some(y),
			color: "#1f77b4".into(),
			bckg_dimensions: None,
		}
	}

	fn link(from: (f64, f64), to: (f64, f64), kind: Option<&str>) -> LinkObject {
		LinkObject {
			source: LinkEndpoint::Positioned { x: from.0, y: from.1 },
			target: LinkEndpoint::Positioned { x: to.0, y: to.1 },
			kind: kind.map(Into::into),
			curvature: 0.0,
			color: "#999".into(),
		}
	}

	fn label_font_px(surface: &RecordingSurface) -> f64 {
		surface
			.calls
			.borrow()
			.iter()
			.find_map(|c| match c {
				Call::FillText { font_px, .. } => Some(*font_px),
				_ => None,
			})
			.unwrap()
	}

	#[test]
	fn node_box_is_centered_and_scale_invariant() {
		let surface = RecordingSurface::default();
		let mut n = node("Alice", 10.0, 20.0);
		node_canvas_object(&mut n, &surface, 2.0);

		let font = 8.0;
		let w = 5.0 * font * GLYPH_RATIO + font * 0.2;
		let h = font + font * 0.2;
		let rects = surface.rects();
		assert_eq!(rects.len(), 1);
		let (x, y, rw, rh, style) = &rects[0];
		assert!((rw - w).abs() < 1e-9);
		assert!((rh - h).abs() < 1e-9);
		assert!((x + rw / 2.0 - 10.0).abs() < 1e-9);
		assert!((y + rh / 2.0 - 20.0).abs() < 1e-9);
		assert_eq!(style, "#ffffff");

		let calls = surface.calls.borrow();
		assert!(calls.contains(&Call::FillText {
			text: "Alice".into(),
			x: 10.0,
			y: 20.0,
			style: "#1f77b4".into(),
			font_px: font,
		}));
		assert_eq!(n.bckg_dimensions, Some([w, h]));
	}

	#[test]
	fn hit_region_matches_visible_box() {
		for (label, scale) in [("Acme Corp", 1.0), ("x", 0.25), ("a much longer label", 7.5)] {
			let visible = RecordingSurface::default();
			let pick = RecordingSurface::default();
			let mut n = node(label, -3.0, 42.0);

			node_canvas_object(&mut n, &visible, scale);
			node_pointer_area_paint(&n, "#000001", &pick);

			let (vx, vy, vw, vh, _) = visible.rects()[0].clone();
			let (px, py, pw, ph, style) = pick.rects()[0].clone();
			assert_eq!((vx, vy, vw, vh), (px, py, pw, ph));
			assert_eq!(style, "#000001");
		}
	}

	#[test]
	fn hit_region_without_cached_box_is_noop() {
		let surface = RecordingSurface::default();
		node_pointer_area_paint(&node("Alice", 0.0, 0.0), "#000001", &surface);
		assert!(surface.is_empty());
	}

	#[test]
	fn unpositioned_node_is_not_painted() {
		let surface = RecordingSurface::default();
		let mut n = node("Alice", 0.0, 0.0);
		n.x = None;
		node_canvas_object(&mut n, &surface, 1.0);
		assert!(surface.is_empty());
		assert_eq!(n.bckg_dimensions, None);
	}

	#[test]
	fn unresolved_link_draws_nothing() {
		let surface = RecordingSurface::default();
		let mut l = link((0.0, 0.0), (100.0, 0.0), Some("works at"));
		l.source = LinkEndpoint::Unresolved(1);
		link_canvas_object(&l, &surface);
		l.source = LinkEndpoint::Positioned { x: 0.0, y: 0.0 };
		l.target = LinkEndpoint::Unresolved(2);
		link_canvas_object(&l, &surface);
		assert!(surface.is_empty());
	}

	#[test]
	fn link_label_is_scoped_to_midpoint_transform() {
		let surface = RecordingSurface::default();
		link_canvas_object(&link((0.0, 0.0), (100.0, 50.0), Some("works at")), &surface);

		let calls = surface.calls.borrow();
		assert_eq!(calls.first(), Some(&Call::Save));
		assert_eq!(calls.get(1), Some(&Call::Translate(50.0, 25.0)));
		assert_eq!(calls.last(), Some(&Call::Restore));
		let saves = calls.iter().filter(|c| **c == Call::Save).count();
		let restores = calls.iter().filter(|c| **c == Call::Restore).count();
		assert_eq!(saves, restores);
	}

	#[test]
	fn link_label_never_upside_down() {
		for (dx, dy) in [(-10.0, 1.0), (-10.0, -1.0), (10.0, 5.0), (0.0, -3.0), (-1.0, 0.0)] {
			let a = readable_angle(dx, dy);
			assert!(a.abs() <= PI / 2.0 + 1e-12, "angle {a} for ({dx}, {dy})");
		}
		assert!((readable_angle(-1.0, 1.0) - (-PI / 4.0)).abs() < 1e-12);
		assert!((readable_angle(-1.0, -1.0) - (PI / 4.0)).abs() < 1e-12);
	}

	#[test]
	fn link_font_fits_within_margin() {
		for dist in [25.0, 30.0, 60.0, 200.0, 1000.0] {
			let surface = RecordingSurface::default();
			link_canvas_object(&link((0.0, 0.0), (dist, 0.0), Some("employed by")), &surface);

			let font = label_font_px(&surface);
			let width = "employed by".len() as f64 * font * GLYPH_RATIO;
			assert!(font <= MAX_LINK_FONT_SIZE);
			assert!(width <= dist - 24.0 + 1e-9, "width {width} for distance {dist}");
		}
	}

	#[test]
	fn short_links_clamp_font_to_zero() {
		for dist in [0.0, 10.0, 24.0] {
			let surface = RecordingSurface::default();
			link_canvas_object(&link((0.0, 0.0), (dist, 0.0), Some("knows")), &surface);
			assert_eq!(label_font_px(&surface), 0.0);
		}
	}

	#[test]
	fn missing_link_type_paints_degenerate_box() {
		let surface = RecordingSurface::default();
		link_canvas_object(&link((0.0, 0.0), (100.0, 0.0), None), &surface);
		let rects = surface.rects();
		assert_eq!(rects.len(), 1);
		let (_, _, w, h, _) = rects[0];
		assert!((w - 0.8).abs() < 1e-9);
		assert!((h - 4.8).abs() < 1e-9);
	}

	#[test]
	fn font_size_helper_handles_zero_width() {
		assert_eq!(link_font_size(50.0, 0.0), MAX_LINK_FONT_SIZE);
		assert_eq!(link_font_size(0.0, 0.0), MAX_LINK_FONT_SIZE);
		assert_eq!(link_font_size(-5.0, 0.0), 0.0);
	}
}
