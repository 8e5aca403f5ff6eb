use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use force_graph::DefaultNodeIdx;
use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::pick::slot_at;
use super::render;
use super::state::ForceGraphState;
use super::types::GraphData;
use crate::config::GraphConfig;

/// Shared access to a mounted graph canvas, used by the page for camera
/// commands and screenshots.
#[derive(Clone, Default)]
pub struct ForceGraphHandle {
	state: Rc<RefCell<Option<ForceGraphState>>>,
	canvas: Rc<RefCell<Option<HtmlCanvasElement>>>,
}

impl ForceGraphHandle {
	/// Replace the displayed graph wholesale.
	fn load(&self, data: &GraphData, config: GraphConfig) {
		*self.state.borrow_mut() = Some(ForceGraphState::new(data, config.width, config.height));
		info!(
			"Graph loaded: {} nodes, {} links",
			data.nodes.len(),
			data.links.len()
		);
	}

	/// Frame the whole graph, animated over `duration_ms`.
	pub fn zoom_to_fit(&self, duration_ms: f64, padding: f64) {
		if let Some(ref mut s) = *self.state.borrow_mut() {
			s.zoom_to_fit(duration_ms, padding);
		}
	}

	/// The canvas element the graph is drawn on, once mounted.
	pub fn canvas(&self) -> Option<HtmlCanvasElement> {
		self.canvas.borrow().clone()
	}
}

/// Id of the animation frame currently queued; 0 when none.
#[derive(Clone, Default)]
struct PendingFrame(Arc<AtomicI32>);

impl PendingFrame {
	fn set(&self, id: i32) {
		self.0.store(id, Ordering::Relaxed);
	}

	fn take(&self) -> Option<i32> {
		match self.0.swap(0, Ordering::Relaxed) {
			0 => None,
			id => Some(id),
		}
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn pick_node(
	state: &ForceGraphState,
	pick: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
) -> Option<DefaultNodeIdx> {
	render::render_pick(state, pick);
	let pixel = pick.get_image_data(x, y, 1.0, 1.0).ok()?.data();
	slot_at(&pixel.0).and_then(|slot| state.node_in_slot(slot))
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	/// Canvas size; nothing is drawn until the host has measured it.
	#[prop(into)]
	config: Signal<Option<GraphConfig>>,
	handle: ForceGraphHandle,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let pick_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
	// The frame callback lives in the component's arena, so it is released on unmount.
	let animate = StoredValue::new_local(None::<Closure<dyn FnMut()>>);
	let pending = PendingFrame::default();
	let (tooltip, set_tooltip) = signal(None::<(String, f64, f64)>);
	let (handle_init, pick_init, pending_init) = (handle.clone(), pick_ctx.clone(), pending.clone());

	on_cleanup(move || {
		if let (Some(id), Some(win)) = (pending.take(), web_sys::window()) {
			let _ = win.cancel_animation_frame(id);
		}
	});

	Effect::new(move |_| {
		let (Some(canvas), Some(config)) = (canvas_ref.get(), config.get()) else {
			return;
		};
		if animate.with_value(Option::is_some) {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(config.width as u32);
		canvas.set_height(config.height as u32);

		let Some(ctx) = context_2d(&canvas) else {
			error!("Canvas 2D context unavailable");
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let pick_canvas = window
			.document()
			.and_then(|doc| doc.create_element("canvas").ok())
			.and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
		if let Some(pick_canvas) = pick_canvas {
			pick_canvas.set_width(config.width as u32);
			pick_canvas.set_height(config.height as u32);
			*pick_init.borrow_mut() = context_2d(&pick_canvas);
		}
		*handle_init.canvas.borrow_mut() = Some(canvas);

		let (state_anim, pending_anim) = (handle_init.state.clone(), pending_init.clone());
		animate.set_value(Some(Closure::new(move || {
			pending_anim.take();
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			let Some(win) = web_sys::window() else {
				return;
			};
			let frame = animate
				.try_with_value(|cb| cb.as_ref().map(|cb| win.request_animation_frame(cb.as_ref().unchecked_ref())))
				.flatten();
			if let Some(Ok(id)) = frame {
				pending_anim.set(id);
			}
		})));
		let frame = animate.with_value(|cb| {
			cb.as_ref()
				.map(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()))
		});
		if let Some(Ok(id)) = frame {
			pending_init.set(id);
		}
	});

	let handle_data = handle.clone();
	Effect::new(move |_| {
		let graph = data.get();
		if let Some(config) = config.get() {
			handle_data.load(&graph, config);
		}
	});

	let (state_md, pick_md) = (handle.state.clone(), pick_ctx.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			let hit = pick_md.borrow().as_ref().and_then(|p| pick_node(s, p, x, y));
			match hit {
				Some(idx) => s.begin_drag(idx, x, y),
				None => s.begin_pan(x, y),
			}
		}
	};

	let (state_mm, pick_mm) = (handle.state.clone(), pick_ctx.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.node_idx.is_some() {
				s.drag_to(x, y);
			} else if s.pan.active {
				s.pan_to(x, y);
			} else {
				let hovered = pick_mm.borrow().as_ref().and_then(|p| pick_node(s, p, x, y));
				set_tooltip.set(
					hovered
						.and_then(|idx| s.node(idx))
						.map(|node| (node.label, x, y)),
				);
			}
		}
	};

	let state_mu = handle.state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_drag();
			s.release_pointer();
		}
	};

	let state_ml = handle.state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.release_pointer();
		}
		set_tooltip.set(None);
	};

	let state_wh = handle.state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<div class="force-graph-container" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			{move || {
				tooltip
					.get()
					.map(|(label, x, y)| {
						view! {
							<div
								class="graph-tooltip"
								style=format!(
									"position: absolute; left: {}px; top: {}px; pointer-events: none;",
									x + 12.0,
									y + 12.0,
								)
							>
								{label}
							</div>
						}
					})
			}}
		</div>
	}
}
