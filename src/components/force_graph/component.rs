use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::GraphState;
use super::types::GraphData;

/// Mouse travel (screen px) below which a press-release on a node counts as
/// a click rather than a drag.
const CLICK_TOLERANCE: f64 = 3.0;

fn canvas_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let window: Window = web_sys::window().unwrap();
		(
			window.inner_width().unwrap().as_f64().unwrap(),
			window.inner_height().unwrap().as_f64().unwrap(),
		)
	} else {
		(
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	}
}

fn event_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> (f64, f64) {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked().unwrap().into();
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Interactive force-directed canvas for one transaction graph.
///
/// The graph data is replaced wholesale whenever `data` changes; positions
/// belong to the embedded layout engine for the lifetime of one graph
/// instance. Clicking a node reports its address through `on_node_select`;
/// the caller owns navigation and the fetch/rebuild cycle that follows.
#[component]
pub fn TransactionGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] query_address: Signal<Option<String>>,
	#[prop(into)] on_node_select: UnsyncCallback<String>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// Center of the previous graph instance, kept across rebuilds so the
	// recenter/zoom animation fires exactly once per center change.
	let prev_center: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
	let last_frame: Rc<Cell<f64>> = Rc::new(Cell::new(js_sys::Date::now()));

	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	let last_frame_init = last_frame.clone();

	// The layout engine handle is scoped to this component: stopping the
	// frame loop and dropping the state releases it on unmount.
	// `on_cleanup` requires `Send + Sync`; the handles are `Rc<RefCell<..>>`,
	// so wrap them in `SendWrapper` (vacuous on the single-threaded wasm
	// target) to satisfy the bound without changing the cleanup behavior.
	let cleanup_handles = leptos::__reexports::send_wrapper::SendWrapper::new((
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
	));
	on_cleanup(move || {
		let (state_cleanup, animate_cleanup, resize_cleanup) = &*cleanup_handles;
		if let Some(cb) = resize_cleanup.borrow_mut().take() {
			if let Some(win) = web_sys::window() {
				let _ =
					win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		animate_cleanup.borrow_mut().take();
		state_cleanup.borrow_mut().take();
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = canvas_size(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		// Window resizes only update the viewport and re-warm the layout;
		// they never rebuild the graph data.
		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let last = last_frame_init.clone();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = (((now - last.get()) / 1000.0) as f32).min(0.05);
			last.set(now);
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(dt);
				}
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Swap in a fresh layout whenever the graph data (or the address in the
	// URL) changes. The old engine instance is dropped with its positions.
	let state_data = state.clone();
	let prev_center_data = prev_center.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let graph_data = data.get();
		let query = query_address.get();
		let (w, h) = canvas_size(&canvas, fullscreen, width, height);

		let new_center = graph_data.center().map(|n| n.id.clone());
		let animate_recenter = {
			let mut prev = prev_center_data.borrow_mut();
			let changed = new_center.is_some() && *prev != new_center;
			if changed {
				prev.clone_from(&new_center);
			}
			changed
		};

		*state_data.borrow_mut() = Some(GraphState::new(
			&graph_data,
			query,
			w,
			h,
			animate_recenter,
		));
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = event_position(canvas_ref, &ev);

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.cancel_recenter();
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = event_position(canvas_ref, &ev);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active && !s.pan.active {
				s.hovered_node = s.node_at_position(x, y);
				s.hovered_edge = if s.hovered_node.is_none() {
					s.edge_at_position(x, y)
				} else {
					None
				};
				let cursor = if s.hovered_node.is_some() {
					"pointer"
				} else {
					"grab"
				};
				let canvas: HtmlCanvasElement = canvas_ref.get_untracked().unwrap().into();
				let _ = web_sys::HtmlElement::style(canvas.as_ref()).set_property("cursor", cursor);
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (
						(x - s.drag.start_x) / s.transform.k,
						(y - s.drag.start_y) / s.transform.k,
					);
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
					s.reheat();
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y) = event_position(canvas_ref, &ev);

		let mut selected = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				let travel = ((x - s.drag.start_x).powi(2) + (y - s.drag.start_y).powi(2)).sqrt();
				if let Some(idx) = s.drag.node_idx {
					if travel < CLICK_TOLERANCE {
						selected = s.node_id(idx);
					} else {
						s.graph.visit_nodes_mut(|node| {
							if node.index() == idx {
								node.data.is_anchor = true;
							}
						});
					}
				}
			}
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}

		// Selection is the only mutation path for "center": it propagates
		// the address to the navigation layer, which drives a new fetch.
		if let Some(id) = selected {
			on_node_select.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.hovered_node = None;
			s.hovered_edge = None;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = event_position(canvas_ref, &ev);

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.cancel_recenter();
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="transaction-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
