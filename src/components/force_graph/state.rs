use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::camera::{Bounds, Camera, ViewTransform};
use super::palette::ColorScale;
use super::types::{GraphData, LinkEndpoint, LinkObject, NodeObject};
use crate::config::{CLICK_CENTER_MS, CLICK_ZOOM, CLICK_ZOOM_MS};

/// Key used to colour links whose source node is unknown.
const OTHER_LINK_KEY: &str = "other";
/// Pointer travel (px) past which a press on a node becomes a drag.
const CLICK_TOLERANCE: f64 = 3.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<DefaultNodeIdx>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
}

/// A link plus the simulation nodes its endpoints resolved to.
#[derive(Clone, Debug)]
pub struct LinkSlot {
	pub source: Option<DefaultNodeIdx>,
	pub target: Option<DefaultNodeIdx>,
	pub object: LinkObject,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeObject, ()>,
	pub links: Vec<LinkSlot>,
	pub camera: Camera,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	/// Pick slot -> simulation node.
	slots: Vec<DefaultNodeIdx>,
	slot_of: HashMap<DefaultNodeIdx, usize>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		// Nodes and links draw from one scale so a link matches its source node.
		let mut colors = ColorScale::default();
		let mut id_to_idx = HashMap::new();
		let mut kind_of = HashMap::new();
		let mut slots = Vec::with_capacity(data.nodes.len());
		let mut slot_of = HashMap::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let color = colors.color(node.kind.as_deref().unwrap_or_default());
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = ((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeObject::new(node, color),
			});
			if id_to_idx.insert(node.id, idx).is_none() {
				slot_of.insert(idx, slots.len());
				slots.push(idx);
			}
			kind_of.insert(node.id, node.kind.clone());
		}

		let links = data
			.links
			.iter()
			.map(|link| {
				let (source, target) = (id_to_idx.get(&link.source).copied(), id_to_idx.get(&link.target).copied());
				if let (Some(src), Some(tgt)) = (source, target) {
					graph.add_edge(src, tgt, EdgeData::default());
				}
				let color_key = match kind_of.get(&link.source) {
					Some(kind) => kind.as_deref().unwrap_or_default(),
					None => OTHER_LINK_KEY,
				};
				LinkSlot {
					source,
					target,
					object: LinkObject {
						source: LinkEndpoint::Unresolved(link.source),
						target: LinkEndpoint::Unresolved(link.target),
						kind: link.kind.clone(),
						curvature: link.curvature,
						color: colors.color(color_key).into(),
					},
				}
			})
			.collect();

		let mut state = Self {
			graph,
			links,
			camera: Camera::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			slots,
			slot_of,
		};
		state.sync_positions();
		state
	}

	pub fn transform(&self) -> ViewTransform {
		self.camera.transform(self.width, self.height)
	}

	pub fn slot(&self, idx: DefaultNodeIdx) -> Option<usize> {
		self.slot_of.get(&idx).copied()
	}

	pub fn node_in_slot(&self, slot: usize) -> Option<DefaultNodeIdx> {
		self.slots.get(slot).copied()
	}

	pub fn node(&self, idx: DefaultNodeIdx) -> Option<NodeObject> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.clone());
			}
		});
		found
	}

	/// Copy simulated positions onto the node objects and resolve link endpoints.
	pub fn sync_positions(&mut self) {
		let mut positions = HashMap::new();
		self.graph.visit_nodes_mut(|node| {
			let (x, y) = (node.data.x as f64, node.data.y as f64);
			node.data.user_data.x = Some(x);
			node.data.user_data.y = Some(y);
			positions.insert(node.index(), (x, y));
		});

		let resolve = |idx: Option<DefaultNodeIdx>, current: LinkEndpoint| match idx.and_then(|i| positions.get(&i)) {
			Some(&(x, y)) => LinkEndpoint::Positioned { x, y },
			None => current,
		};
		for link in &mut self.links {
			link.object.source = resolve(link.source, link.object.source);
			link.object.target = resolve(link.target, link.object.target);
		}
	}

	pub fn bounds(&self) -> Option<Bounds> {
		let mut points = Vec::new();
		self.graph
			.visit_nodes(|node| points.push((node.x() as f64, node.y() as f64)));
		Bounds::from_points(points)
	}

	pub fn zoom_to_fit(&mut self, duration_ms: f64, padding: f64) {
		if let Some(bounds) = self.bounds() {
			self.camera
				.zoom_to_fit(bounds, self.width, self.height, padding, duration_ms);
		}
	}

	/// Centre on the clicked node and zoom in.
	pub fn focus_node(&mut self, idx: DefaultNodeIdx) {
		let Some(NodeObject {
			x: Some(x),
			y: Some(y),
			..
		}) = self.node(idx)
		else {
			return;
		};
		self.camera.center_at(x, y, CLICK_CENTER_MS);
		self.camera.zoom(CLICK_ZOOM, CLICK_ZOOM_MS);
	}

	pub fn begin_drag(&mut self, idx: DefaultNodeIdx, x: f64, y: f64) {
		self.drag = DragState {
			node_idx: Some(idx),
			moved: false,
			start_x: x,
			start_y: y,
			..DragState::default()
		};
		let drag = &mut self.drag;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				drag.node_start_x = node.x();
				drag.node_start_y = node.y();
			}
		});
	}

	pub fn drag_to(&mut self, x: f64, y: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let (sdx, sdy) = (x - self.drag.start_x, y - self.drag.start_y);
		if !self.drag.moved && (sdx * sdx + sdy * sdy).sqrt() < CLICK_TOLERANCE {
			return;
		}
		self.drag.moved = true;
		let k = self.camera.zoom_level();
		let (nx, ny) = (
			self.drag.node_start_x + (sdx / k) as f32,
			self.drag.node_start_y + (sdy / k) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = nx;
				node.data.y = ny;
				node.data.is_anchor = true;
			}
		});
	}

	/// Finish a press on a node; a press without movement counts as a click.
	pub fn end_drag(&mut self) -> Option<DefaultNodeIdx> {
		let drag = std::mem::take(&mut self.drag);
		match drag.node_idx {
			Some(idx) if !drag.moved => {
				self.focus_node(idx);
				Some(idx)
			}
			_ => None,
		}
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			last_x: x,
			last_y: y,
		};
	}

	pub fn pan_to(&mut self, x: f64, y: f64) {
		if !self.pan.active {
			return;
		}
		self.camera.pan_by(x - self.pan.last_x, y - self.pan.last_y);
		self.pan.last_x = x;
		self.pan.last_y = y;
	}

	pub fn release_pointer(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		self.camera.zoom_at(x, y, factor, self.width, self.height);
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.camera.tick(dt as f64 * 1000.0);
		self.sync_positions();
	}
}
