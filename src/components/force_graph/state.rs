use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, short_address};

// Paint constants for the transaction graph.
pub const SENDING_COLOR: &str = "rgba(255, 0, 0, 0.8)";
pub const RECEIVING_COLOR: &str = "rgba(0, 255, 0, 0.8)";
pub const DEFAULT_LINK_COLOR: &str = "rgba(204, 204, 204, 0.5)";
pub const NODE_FILL_COLOR: &str = "rgba(211,211,211, 0.3)";
pub const NODE_TEXT_COLOR: &str = "white";
pub const NODE_HIGHLIGHT_COLOR: &str = "rgba(176, 38, 255, 0.8)";
pub const BACKGROUND_COLOR: &str = "black";
pub const VALUE_LABEL_BG: &str = "rgba(0, 0, 0, 0.7)";

pub const NODE_RADIUS: f64 = 10.0;
pub const HIT_RADIUS: f64 = 12.0;
pub const EDGE_HIT_DISTANCE: f64 = 4.0;
pub const LINK_WIDTH: f64 = 0.5;
pub const LABEL_FONT_SIZE: f64 = 12.0;
pub const VALUE_FONT_SIZE: f64 = 4.0;
pub const ARROW_LENGTH: f64 = 4.0;
pub const ARROW_SPREAD: f64 = PI / 7.0;

/// Zoom applied when the graph recenters on a (new) focal node.
pub const RECENTER_ZOOM: f64 = 4.0;
/// Recenter/zoom animation length in seconds.
pub const RECENTER_DURATION: f64 = 1.0;

/// Simulation ticks before the layout settles; interactions re-arm it.
const COOLDOWN_TICKS: u32 = 100;

/// Edge value labels render unconditionally; flip to show them only for the
/// hovered edge.
pub const ALWAYS_SHOW_EDGE_VALUES: bool = true;

/// Per-node payload handed to the layout engine.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub is_center: bool,
}

/// Per-edge payload handed to the layout engine. Endpoint ids are kept here
/// so painting never depends on the engine's internal edge orientation.
#[derive(Clone, Debug, Default)]
pub struct EdgeInfo {
	pub source: String,
	pub target: String,
	pub value: f64,
	pub count: u32,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// One-shot animated transition of the view transform.
#[derive(Clone, Debug)]
struct RecenterAnimation {
	t: f64,
	from: ViewTransform,
	to: ViewTransform,
}

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub struct GraphState {
	pub graph: ForceGraph<NodeInfo, EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	/// Hovered edge, keyed by its ordered `(source, target)` ids.
	pub hovered_edge: Option<(String, String)>,
	pub hovered_node: Option<DefaultNodeIdx>,
	/// Id of the node the graph is centered on (the queried address).
	pub center_id: String,
	/// Address currently reflected in the page's query parameter. Checked in
	/// addition to `is_center` when painting the highlight ring, since the
	/// two can transiently diverge during navigation.
	pub query_address: Option<String>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	recenter: Option<RecenterAnimation>,
	cooldown: u32,
}

impl GraphState {
	/// Hand a freshly built graph to the layout engine.
	///
	/// Node positions are seeded on a circle around the origin (the center
	/// node at the origin itself) unless the node carries explicit hints;
	/// from then on the engine owns them. When `animate_recenter` is set the
	/// view glides to the origin at [`RECENTER_ZOOM`] — requested exactly
	/// once per center change by the caller, never per frame.
	pub fn new(
		data: &GraphData,
		query_address: Option<String>,
		width: f64,
		height: f64,
		animate_recenter: bool,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let center_id = data
			.center()
			.map(|n| n.id.clone())
			.unwrap_or_default();

		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / data.nodes.len().max(1) as f64;
			let (seed_x, seed_y) = if node.is_center {
				(0.0, 0.0)
			} else {
				(100.0 * angle.cos(), 100.0 * angle.sin())
			};

			let idx = graph.add_node(NodeData {
				x: node.x.unwrap_or(seed_x) as f32,
				y: node.y.unwrap_or(seed_y) as f32,
				mass: (node.value * 5.0) as f32,
				is_anchor: node.is_center,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: short_address(&node.id),
					is_center: node.is_center,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			{
				graph.add_edge(
					src,
					tgt,
					EdgeData {
						user_data: EdgeInfo {
							source: link.source.clone(),
							target: link.target.clone(),
							value: link.value,
							count: link.count,
						},
						..Default::default()
					},
				);
			}
		}

		let transform = ViewTransform {
			x: width / 2.0,
			y: height / 2.0,
			k: 1.0,
		};
		let recenter = animate_recenter.then(|| RecenterAnimation {
			t: 0.0,
			from: transform,
			to: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: RECENTER_ZOOM,
			},
		});

		Self {
			graph,
			transform,
			drag: DragState::default(),
			pan: PanState::default(),
			hovered_edge: None,
			hovered_node: None,
			center_id,
			query_address,
			width,
			height,
			animation_running: true,
			recenter,
			cooldown: COOLDOWN_TICKS,
		}
	}

	/// Directional edge color relative to the current center: red when the
	/// center is paying out, green when it is receiving, neutral otherwise.
	pub fn edge_color(&self, source: &str, target: &str) -> &'static str {
		if source == self.center_id {
			SENDING_COLOR
		} else if target == self.center_id {
			RECEIVING_COLOR
		} else {
			DEFAULT_LINK_COLOR
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	/// Closest edge within [`EDGE_HIT_DISTANCE`] of the cursor, in graph
	/// space, keyed by its endpoint ids.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<(String, String)> {
		let p = self.screen_to_graph(sx, sy);
		let mut best: Option<((String, String), f64)> = None;
		self.graph.visit_edges(|n1, n2, edge| {
			let dist = super::geometry::segment_distance(
				p,
				(n1.x() as f64, n1.y() as f64),
				(n2.x() as f64, n2.y() as f64),
			);
			if dist < EDGE_HIT_DISTANCE && best.as_ref().is_none_or(|(_, d)| dist < *d) {
				best = Some((
					(
						edge.user_data.source.clone(),
						edge.user_data.target.clone(),
					),
					dist,
				));
			}
		});
		best.map(|(key, _)| key)
	}

	/// Advance the simulation and any in-flight recenter animation.
	pub fn tick(&mut self, dt: f32) {
		if self.cooldown > 0 {
			self.graph.update(dt);
			self.cooldown -= 1;
		}

		if let Some(anim) = &mut self.recenter {
			anim.t = (anim.t + dt as f64 / RECENTER_DURATION).min(1.0);
			let s = ease_out_cubic(anim.t);
			self.transform.x = anim.from.x + (anim.to.x - anim.from.x) * s;
			self.transform.y = anim.from.y + (anim.to.y - anim.from.y) * s;
			self.transform.k = anim.from.k + (anim.to.k - anim.from.k) * s;
			if anim.t >= 1.0 {
				self.recenter = None;
			}
		}
	}

	/// Manual pan/zoom takes over from an in-flight recenter.
	pub fn cancel_recenter(&mut self) {
		self.recenter = None;
	}

	/// Keep the layout warm while the user is rearranging nodes.
	pub fn reheat(&mut self) {
		self.cooldown = COOLDOWN_TICKS;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.reheat();
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::{CENTER_NODE_VALUE, GraphLink, GraphNode, NORMAL_NODE_VALUE};
	use super::*;

	fn sample() -> GraphData {
		let center = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa0001";
		let peer_b = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb0002";
		let peer_c = "0xcccccccccccccccccccccccccccccccccccc0003";
		GraphData {
			nodes: vec![
				GraphNode::new(center.into(), CENTER_NODE_VALUE, true),
				GraphNode::new(peer_b.into(), NORMAL_NODE_VALUE, false),
				GraphNode::new(peer_c.into(), NORMAL_NODE_VALUE, false),
			],
			links: vec![
				GraphLink {
					source: center.into(),
					target: peer_b.into(),
					value: 3.0,
					count: 2,
				},
				GraphLink {
					source: peer_c.into(),
					target: center.into(),
					value: 0.5,
					count: 1,
				},
			],
		}
	}

	#[test]
	fn edges_color_by_direction_relative_to_center() {
		let state = GraphState::new(&sample(), None, 800.0, 600.0, false);
		let center = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa0001";
		let peer_b = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb0002";
		let peer_c = "0xcccccccccccccccccccccccccccccccccccc0003";

		assert_eq!(state.edge_color(center, peer_b), SENDING_COLOR);
		assert_eq!(state.edge_color(peer_c, center), RECEIVING_COLOR);
		assert_eq!(state.edge_color(peer_b, peer_c), DEFAULT_LINK_COLOR);
	}

	#[test]
	fn center_id_comes_from_the_center_node() {
		let state = GraphState::new(&sample(), None, 800.0, 600.0, false);
		assert_eq!(
			state.center_id,
			"0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa0001"
		);
	}

	#[test]
	fn recenter_animation_converges_on_the_target_zoom() {
		let mut state = GraphState::new(&sample(), None, 800.0, 600.0, true);
		for _ in 0..200 {
			state.tick(0.016);
		}
		assert!((state.transform.k - RECENTER_ZOOM).abs() < 1e-6);
		assert!((state.transform.x - 400.0).abs() < 1e-6);
	}

	#[test]
	fn screen_graph_round_trip() {
		let mut state = GraphState::new(&sample(), None, 800.0, 600.0, false);
		state.transform = ViewTransform {
			x: 400.0,
			y: 300.0,
			k: 4.0,
		};
		assert_eq!(state.screen_to_graph(400.0, 300.0), (0.0, 0.0));
		assert_eq!(state.screen_to_graph(440.0, 260.0), (10.0, -10.0));
	}
}
