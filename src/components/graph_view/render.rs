use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::geometry::Point;
use super::state::GraphViewState;

const LABEL_MAX_CHARS: usize = 15;
const LABEL_KEEP_CHARS: usize = 12;

/// Display label for a node: titles longer than 15 characters are cut to 12
/// followed by an ellipsis.
pub fn node_label(title: &str) -> String {
	if title.chars().count() > LABEL_MAX_CHARS {
		let head: String = title.chars().take(LABEL_KEEP_CHARS).collect();
		format!("{head}...")
	} else {
		title.to_string()
	}
}

pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let transform = state.controller.transform();
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	// screen = (scene - origin) * scale + origin
	let _ = ctx.translate(transform.origin.x, transform.origin.y);
	let _ = ctx.scale(transform.scale, transform.scale);
	let _ = ctx.translate(-transform.origin.x, -transform.origin.y);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let positions: HashMap<&str, Point> = state
		.nodes()
		.iter()
		.map(|n| (n.id.as_str(), n.position))
		.collect();
	let hovered = state.controller.hovered_connection();

	for conn in state.connections() {
		let (Some(a), Some(b)) = (
			positions.get(conn.source_id.as_str()),
			positions.get(conn.target_id.as_str()),
		) else {
			continue;
		};

		if hovered == Some(conn.id.as_str()) {
			ctx.set_stroke_style_str("rgba(220, 50, 50, 0.8)");
			ctx.set_line_width(3.0);
		} else {
			ctx.set_stroke_style_str("rgba(150, 150, 150, 0.6)");
			ctx.set_line_width(2.0);
		}
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let active = state.active_note_id();
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for node in state.nodes() {
		let Point { x, y } = node.position;
		let (fill, stroke) = if active == Some(node.id.as_str()) {
			("rgba(147, 51, 234, 0.9)", "rgba(147, 51, 234, 1)")
		} else {
			("rgba(59, 130, 246, 0.7)", "rgba(59, 130, 246, 0.9)")
		};

		ctx.begin_path();
		let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.set_stroke_style_str(stroke);
		ctx.fill();
		ctx.set_line_width(2.0);
		ctx.stroke();

		ctx.set_fill_style_str("#fff");
		let _ = ctx.fill_text(&node_label(&node.title), x, y);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn short_titles_are_untouched() {
		assert_eq!(node_label("Ownership"), "Ownership");
		assert_eq!(node_label("exactly 15 char"), "exactly 15 char");
	}

	#[test]
	fn long_titles_are_truncated() {
		assert_eq!(node_label("sixteen chars!!!"), "sixteen char...");
		assert_eq!(node_label("Ünïcödé títlé hérè"), "Ünïcödé títl...");
	}
}
