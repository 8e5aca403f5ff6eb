use web_sys::CanvasRenderingContext2d;

use super::painters::{link_canvas_object, node_canvas_object, node_pointer_area_paint};
use super::pick::slot_color;
use super::state::ForceGraphState;
use super::types::LinkObject;
use crate::config::{ARROW_LENGTH, ARROW_REL_POS, NODE_REL_SIZE};

const BACKGROUND: &str = "#ffffff";
const ARROW_WH_RATIO: f64 = 1.6;

pub fn render(state: &mut ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let t = state.transform();
	let _ = ctx.reset_transform();
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_links(state, ctx, t.k);
	state
		.graph
		.visit_nodes_mut(|node| node_canvas_object(&mut node.data.user_data, ctx, t.k));
	ctx.restore();
}

/// Paint every node's hit region in its pick colour onto the shadow canvas.
pub fn render_pick(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let t = state.transform();
	let _ = ctx.reset_transform();
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	state.graph.visit_nodes(|node| {
		if let Some(slot) = state.slot(node.index()) {
			node_pointer_area_paint(&node.data.user_data, &slot_color(slot), ctx);
		}
	});
	ctx.restore();
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, k: f64) {
	for slot in &state.links {
		let link = &slot.object;
		draw_link_line(link, ctx, k);
		link_canvas_object(link, ctx);
	}
}

/// Quadratic control point for a curved link; `None` when straight.
pub fn control_point(start: (f64, f64), end: (f64, f64), curvature: f64) -> Option<(f64, f64)> {
	if curvature == 0.0 {
		return None;
	}
	let (dx, dy) = (end.0 - start.0, end.1 - start.1);
	let l = (dx * dx + dy * dy).sqrt();
	let a = dy.atan2(dx) - std::f64::consts::FRAC_PI_2;
	let d = l * curvature;
	Some((
		(start.0 + end.0) / 2.0 + d * a.cos(),
		(start.1 + end.1) / 2.0 + d * a.sin(),
	))
}

/// Arrow triangle `[tip, left, right]` ending at the target node's rim.
pub fn arrow_head(start: (f64, f64), end: (f64, f64), control: Option<(f64, f64)>) -> Option<[(f64, f64); 3]> {
	let from = control.unwrap_or(start);
	let (dx, dy) = (end.0 - from.0, end.1 - from.1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return None;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let travel = (dist - 2.0 * NODE_REL_SIZE - ARROW_LENGTH).max(0.0);
	let along = NODE_REL_SIZE + ARROW_LENGTH + travel * ARROW_REL_POS;
	let tip = (from.0 + ux * along, from.1 + uy * along);
	let back = (tip.0 - ux * ARROW_LENGTH, tip.1 - uy * ARROW_LENGTH);
	let half = ARROW_LENGTH / ARROW_WH_RATIO / 2.0;
	let (px, py) = (-uy * half, ux * half);
	Some([tip, (back.0 + px, back.1 + py), (back.0 - px, back.1 - py)])
}

fn draw_link_line(link: &LinkObject, ctx: &CanvasRenderingContext2d, k: f64) {
	let (Some(start), Some(end)) = (link.source.position(), link.target.position()) else {
		return;
	};
	let control = control_point(start, end, link.curvature);

	ctx.set_stroke_style_str(&link.color);
	ctx.set_line_width(1.0 / k);
	ctx.begin_path();
	ctx.move_to(start.0, start.1);
	match control {
		Some((cx, cy)) => ctx.quadratic_curve_to(cx, cy, end.0, end.1),
		None => ctx.line_to(end.0, end.1),
	}
	ctx.stroke();

	if let Some([tip, left, right]) = arrow_head(start, end, control) {
		ctx.set_fill_style_str(&link.color);
		ctx.begin_path();
		ctx.move_to(tip.0, tip.1);
		ctx.line_to(left.0, left.1);
		ctx.line_to(right.0, right.1);
		ctx.close_path();
		ctx.fill();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn straight_links_have_no_control_point() {
		assert_eq!(control_point((0.0, 0.0), (10.0, 0.0), 0.0), None);
	}

	#[test]
	fn curvature_offsets_control_point_perpendicular() {
		let (cx, cy) = control_point((0.0, 0.0), (10.0, 0.0), 0.5).unwrap();
		assert!((cx - 5.0).abs() < 1e-9);
		assert!((cy + 5.0).abs() < 1e-9);
	}

	#[test]
	fn arrow_tip_touches_target_rim() {
		let [tip, left, right] = arrow_head((0.0, 0.0), (100.0, 0.0), None).unwrap();
		assert!((tip.0 - (100.0 - NODE_REL_SIZE)).abs() < 1e-9);
		assert!(tip.1.abs() < 1e-9);
		assert!((left.0 - (tip.0 - ARROW_LENGTH)).abs() < 1e-9);
		assert!((left.1 + right.1).abs() < 1e-9);
	}

	#[test]
	fn coincident_endpoints_have_no_arrow() {
		assert!(arrow_head((3.0, 3.0), (3.0, 3.0), None).is_none());
	}
}
