use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::geometry;
use super::state::{
	ALWAYS_SHOW_EDGE_VALUES, ARROW_LENGTH, ARROW_SPREAD, BACKGROUND_COLOR, GraphState,
	LABEL_FONT_SIZE, LINK_WIDTH, NODE_FILL_COLOR, NODE_HIGHLIGHT_COLOR, NODE_RADIUS,
	NODE_TEXT_COLOR, VALUE_FONT_SIZE, VALUE_LABEL_BG,
};

pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND_COLOR);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	state.graph.visit_edges(|n1, n2, edge| {
		let info = &edge.user_data;

		// The engine reports endpoints in its own storage order; orient the
		// pair by the edge's recorded source id, and skip the edge entirely
		// if neither endpoint matches (possible transiently mid-swap).
		let (src, tgt) = if n1.data.user_data.id == info.source {
			(n1, n2)
		} else if n2.data.user_data.id == info.source {
			(n2, n1)
		} else {
			return;
		};

		let (x1, y1) = (src.x() as f64, src.y() as f64);
		let (x2, y2) = (tgt.x() as f64, tgt.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		if (dx * dx + dy * dy).sqrt() < 0.001 {
			return;
		}

		// Trim both ends to the node boundary so the segment never runs
		// under the circles.
		let (start_x, start_y) = geometry::circle_intersection((x1, y1), (x2, y2), NODE_RADIUS);
		let (end_x, end_y) = geometry::circle_intersection((x2, y2), (x1, y1), NODE_RADIUS);

		let color = state.edge_color(&info.source, &info.target);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(LINK_WIDTH);
		ctx.begin_path();
		ctx.move_to(start_x, start_y);
		ctx.line_to(end_x, end_y);
		ctx.stroke();

		let angle = (end_y - start_y).atan2(end_x - start_x);
		let [base1, base2] =
			geometry::arrowhead_base((end_x, end_y), angle, ARROW_LENGTH, ARROW_SPREAD);
		ctx.begin_path();
		ctx.move_to(end_x, end_y);
		ctx.line_to(base1.0, base1.1);
		ctx.line_to(base2.0, base2.1);
		ctx.close_path();
		ctx.set_fill_style_str(color);
		ctx.fill();

		let hovered = state
			.hovered_edge
			.as_ref()
			.is_some_and(|(s, t)| *s == info.source && *t == info.target);
		if ALWAYS_SHOW_EDGE_VALUES || hovered {
			draw_edge_value(
				ctx,
				info.value,
				geometry::midpoint((start_x, start_y), (end_x, end_y)),
			);
		}
	});
}

fn draw_edge_value(ctx: &CanvasRenderingContext2d, value: f64, (mid_x, mid_y): (f64, f64)) {
	let text = format!("{value:.4}");
	ctx.set_font(&format!("{VALUE_FONT_SIZE}px Sans-Serif"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	// Dark backing rectangle sized to the text so the amount stays legible
	// over crossing edges.
	let padding = 1.0;
	if let Ok(metrics) = ctx.measure_text(&text) {
		let width = metrics.width();
		ctx.set_fill_style_str(VALUE_LABEL_BG);
		ctx.fill_rect(
			mid_x - width / 2.0 - padding,
			mid_y - VALUE_FONT_SIZE / 2.0 - padding,
			width + padding * 2.0,
			VALUE_FONT_SIZE + padding * 2.0,
		);
	}

	ctx.set_fill_style_str(NODE_TEXT_COLOR);
	let _ = ctx.fill_text(&text, mid_x, mid_y);
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);

		ctx.begin_path();
		let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(NODE_FILL_COLOR);
		ctx.fill();

		// The center flag and the address in the URL can diverge for a frame
		// while navigation settles; highlight on either.
		let is_queried = state.query_address.as_deref() == Some(info.id.as_str());
		if info.is_center || is_queried {
			ctx.set_stroke_style_str(NODE_HIGHLIGHT_COLOR);
			ctx.set_line_width(1.0);
			ctx.stroke();
		}

		ctx.set_font(&format!("{}px Sans-Serif", LABEL_FONT_SIZE / k.max(0.5)));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_fill_style_str(NODE_TEXT_COLOR);
		let _ = ctx.fill_text(&info.label, x, y);
	});
}
