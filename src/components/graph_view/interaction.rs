//! Pointer state machine for the graph view: hover detection on connections,
//! node dragging, click-versus-drag classification and zoom.

use log::debug;
use serde::{Deserialize, Serialize};

use super::geometry::{Point, circle_contains, point_segment_distance};
use super::layout::NodeState;
use super::types::Connection;

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 2.0;
pub const SCALE_STEP: f64 = 0.1;

/// Zoom about a fixed origin (the viewport center). Rendering applies
/// [`ViewTransform::to_screen`]; hit-testing applies its inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub scale: f64,
	pub origin: Point,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			scale: 1.0,
			origin: Point::ZERO,
		}
	}
}

impl ViewTransform {
	pub fn to_screen(&self, scene: Point) -> Point {
		(scene - self.origin) * self.scale + self.origin
	}

	pub fn to_scene(&self, screen: Point) -> Point {
		(screen - self.origin) / self.scale + self.origin
	}

	pub fn zoom_in(&mut self) {
		self.scale = snap_scale(self.scale + SCALE_STEP);
	}

	pub fn zoom_out(&mut self) {
		self.scale = snap_scale(self.scale - SCALE_STEP);
	}

	pub fn reset_zoom(&mut self) {
		self.scale = 1.0;
	}
}

/// Rounds to the step grid so repeated steps don't accumulate float error.
fn snap_scale(scale: f64) -> f64 {
	((scale / SCALE_STEP).round() / SCALE_STEP.recip()).clamp(MIN_SCALE, MAX_SCALE)
}

/// How a press-and-release on a node is told apart from a drag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClickClassifier {
	/// The node's velocity is below the threshold on both axes at release.
	Velocity { threshold: f64 },
	/// The pointer moved at most `max_distance` scene units since the press.
	Displacement { max_distance: f64 },
}

impl Default for ClickClassifier {
	fn default() -> Self {
		Self::Velocity { threshold: 0.1 }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionParams {
	/// Maximum pointer-to-segment distance for a connection to count as hovered.
	pub hover_threshold: f64,
	pub click: ClickClassifier,
}

impl Default for InteractionParams {
	fn default() -> Self {
		Self {
			hover_threshold: 5.0,
			click: ClickClassifier::default(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
	#[default]
	Idle,
	Dragging {
		node_id: String,
		pressed_at: Point,
	},
}

/// Requests the graph view sends back to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphIntent {
	SelectNote(String),
	DeleteConnection(String),
}

#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	pub drag: DragState,
	pub hovered_connection: Option<String>,
	/// Last pointer position, in scene coordinates.
	pub pointer: Point,
	pub transform: ViewTransform,
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	pub state: InteractionState,
	pub params: InteractionParams,
}

impl InteractionController {
	pub fn new(params: InteractionParams) -> Self {
		Self {
			state: InteractionState::default(),
			params,
		}
	}

	pub fn dragged_node(&self) -> Option<&str> {
		match &self.state.drag {
			DragState::Dragging { node_id, .. } => Some(node_id),
			DragState::Idle => None,
		}
	}

	pub fn is_dragging(&self) -> bool {
		self.dragged_node().is_some()
	}

	pub fn hovered_connection(&self) -> Option<&str> {
		self.state.hovered_connection.as_deref()
	}

	pub fn transform(&self) -> &ViewTransform {
		&self.state.transform
	}

	pub fn transform_mut(&mut self) -> &mut ViewTransform {
		&mut self.state.transform
	}

	pub fn pointer_move(&mut self, screen: Point, nodes: &mut [NodeState], connections: &[Connection]) {
		let scene = self.state.transform.to_scene(screen);
		self.state.pointer = scene;

		if let Some(node_id) = self.dragged_node().map(str::to_owned) {
			match nodes.iter_mut().find(|n| n.id == node_id) {
				Some(node) => {
					node.position = scene;
					node.velocity = Point::ZERO;
				}
				None => {
					debug!("dragged node {node_id} disappeared");
					self.state.drag = DragState::Idle;
				}
			}
			return;
		}

		self.state.hovered_connection =
			hovered_connection(scene, nodes, connections, self.params.hover_threshold)
				.map(|c| c.id.clone());
	}

	pub fn pointer_down(
		&mut self,
		screen: Point,
		nodes: &[NodeState],
		connections: &[Connection],
	) -> Option<GraphIntent> {
		if self.is_dragging() {
			return None;
		}
		let scene = self.state.transform.to_scene(screen);
		self.state.pointer = scene;

		if let Some(node) = node_at(scene, nodes) {
			debug!("drag start on {}", node.id);
			self.state.drag = DragState::Dragging {
				node_id: node.id.clone(),
				pressed_at: scene,
			};
			return None;
		}

		let hovered = self.state.hovered_connection.as_deref()?;
		connections
			.iter()
			.any(|c| c.id == hovered && endpoints_present(c, nodes))
			.then(|| GraphIntent::DeleteConnection(hovered.to_string()))
	}

	/// Ends any drag. Returns a selection when the gesture counts as a click.
	pub fn pointer_up(&mut self, nodes: &[NodeState]) -> Option<GraphIntent> {
		let DragState::Dragging { node_id, pressed_at } = std::mem::take(&mut self.state.drag)
		else {
			return None;
		};
		let node = nodes.iter().find(|n| n.id == node_id)?;

		let is_click = match self.params.click {
			ClickClassifier::Velocity { threshold } => {
				node.velocity.x.abs() < threshold && node.velocity.y.abs() < threshold
			}
			ClickClassifier::Displacement { max_distance } => {
				self.state.pointer.distance(pressed_at) <= max_distance
			}
		};
		debug!("released {node_id} as {}", if is_click { "click" } else { "drag" });
		is_click.then_some(GraphIntent::SelectNote(node_id))
	}

	pub fn pointer_leave(&mut self, nodes: &[NodeState]) -> Option<GraphIntent> {
		self.pointer_up(nodes)
	}

	/// Drops drag and hover references that no longer resolve.
	pub fn retain_valid(&mut self, nodes: &[NodeState], connections: &[Connection]) {
		let drag_lost = self
			.dragged_node()
			.is_some_and(|id| !nodes.iter().any(|n| n.id == id));
		if drag_lost {
			self.state.drag = DragState::Idle;
		}
		let hover_lost = self
			.hovered_connection()
			.is_some_and(|id| {
				!connections
					.iter()
					.any(|c| c.id == id && endpoints_present(c, nodes))
			});
		if hover_lost {
			self.state.hovered_connection = None;
		}
	}
}

fn endpoints_present(conn: &Connection, nodes: &[NodeState]) -> bool {
	[&conn.source_id, &conn.target_id]
		.into_iter()
		.all(|id| nodes.iter().any(|n| n.id == *id))
}

/// First node (in collection order) whose circle contains `scene`.
pub fn node_at(scene: Point, nodes: &[NodeState]) -> Option<&NodeState> {
	nodes
		.iter()
		.find(|n| circle_contains(n.position, n.radius, scene))
}

/// First connection (in collection order) within `threshold` of `scene`.
/// Connections with a missing endpoint are skipped.
pub fn hovered_connection<'a>(
	scene: Point,
	nodes: &[NodeState],
	connections: &'a [Connection],
	threshold: f64,
) -> Option<&'a Connection> {
	let position = |id: &str| nodes.iter().find(|n| n.id == id).map(|n| n.position);
	connections.iter().find(|c| {
		match (position(&c.source_id), position(&c.target_id)) {
			(Some(a), Some(b)) => point_segment_distance(scene, a, b) < threshold,
			_ => false,
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, x: f64, y: f64) -> NodeState {
		NodeState {
			id: id.into(),
			title: id.into(),
			position: Point::new(x, y),
			velocity: Point::ZERO,
			radius: 15.0,
		}
	}

	fn scene() -> (Vec<NodeState>, Vec<Connection>) {
		(
			vec![node("a", 0.0, 0.0), node("b", 100.0, 0.0), node("c", 100.0, 100.0)],
			vec![Connection::new("a", "b"), Connection::new("b", "c")],
		)
	}

	#[test]
	fn hover_boundary_at_five_units() {
		let (mut nodes, conns) = scene();
		let mut ctl = InteractionController::default();

		ctl.pointer_move(Point::new(50.0, 4.999), &mut nodes, &conns);
		assert_eq!(ctl.hovered_connection(), Some("a-b"));

		ctl.pointer_move(Point::new(50.0, 5.001), &mut nodes, &conns);
		assert_eq!(ctl.hovered_connection(), None);
	}

	#[test]
	fn hover_skips_connections_with_missing_endpoints() {
		let (mut nodes, _) = scene();
		let conns = vec![Connection::new("a", "ghost"), Connection::new("a", "b")];
		let mut ctl = InteractionController::default();
		ctl.pointer_move(Point::new(50.0, 1.0), &mut nodes, &conns);
		assert_eq!(ctl.hovered_connection(), Some("a-b"));
	}

	#[test]
	fn overlapping_nodes_resolve_to_first() {
		let nodes = vec![node("x", 0.0, 0.0), node("y", 5.0, 0.0)];
		assert_eq!(node_at(Point::new(3.0, 0.0), &nodes).map(|n| n.id.as_str()), Some("x"));
		assert!(node_at(Point::new(40.0, 0.0), &nodes).is_none());
	}

	#[test]
	fn drag_overrides_position_and_velocity() {
		let (mut nodes, conns) = scene();
		nodes[1].velocity = Point::new(3.0, -2.0);
		let mut ctl = InteractionController::default();

		assert_eq!(ctl.pointer_down(Point::new(102.0, 3.0), &nodes, &conns), None);
		assert_eq!(ctl.dragged_node(), Some("b"));

		ctl.pointer_move(Point::new(240.5, -17.25), &mut nodes, &conns);
		assert_eq!(nodes[1].position, Point::new(240.5, -17.25));
		assert_eq!(nodes[1].velocity, Point::ZERO);
		// hover is frozen while dragging
		assert_eq!(ctl.hovered_connection(), None);
	}

	#[test]
	fn press_and_release_selects() {
		let (nodes, conns) = scene();
		let mut ctl = InteractionController::default();
		ctl.pointer_down(Point::new(1.0, 1.0), &nodes, &conns);
		assert_eq!(ctl.pointer_up(&nodes), Some(GraphIntent::SelectNote("a".into())));
		assert!(!ctl.is_dragging());
		assert_eq!(nodes[0].position, Point::ZERO);
	}

	#[test]
	fn release_of_moving_node_is_a_drag() {
		let (mut nodes, conns) = scene();
		nodes[0].velocity = Point::new(0.0, 0.25);
		let mut ctl = InteractionController::default();
		ctl.pointer_down(Point::new(1.0, 1.0), &nodes, &conns);
		assert_eq!(ctl.pointer_up(&nodes), None);
		assert!(!ctl.is_dragging());
	}

	#[test]
	fn displacement_classifier_uses_pointer_travel() {
		let (mut nodes, conns) = scene();
		let mut ctl = InteractionController::new(InteractionParams {
			click: ClickClassifier::Displacement { max_distance: 3.0 },
			..Default::default()
		});

		ctl.pointer_down(Point::new(0.0, 0.0), &nodes, &conns);
		ctl.pointer_move(Point::new(2.0, 0.0), &mut nodes, &conns);
		assert_eq!(ctl.pointer_up(&nodes), Some(GraphIntent::SelectNote("a".into())));

		ctl.pointer_down(Point::new(2.0, 0.0), &nodes, &conns);
		ctl.pointer_move(Point::new(60.0, 40.0), &mut nodes, &conns);
		assert_eq!(ctl.pointer_up(&nodes), None);
	}

	#[test]
	fn pointer_leave_ends_drag() {
		let (nodes, conns) = scene();
		let mut ctl = InteractionController::default();
		ctl.pointer_down(Point::new(100.0, 100.0), &nodes, &conns);
		assert_eq!(ctl.dragged_node(), Some("c"));
		assert_eq!(ctl.pointer_leave(&nodes), Some(GraphIntent::SelectNote("c".into())));
		assert_eq!(ctl.state.drag, DragState::Idle);
	}

	#[test]
	fn press_on_hovered_connection_requests_delete() {
		let (mut nodes, conns) = scene();
		let mut ctl = InteractionController::default();
		ctl.pointer_move(Point::new(100.0, 50.0), &mut nodes, &conns);
		assert_eq!(
			ctl.pointer_down(Point::new(100.0, 50.0), &nodes, &conns),
			Some(GraphIntent::DeleteConnection("b-c".into()))
		);
		assert!(!ctl.is_dragging());
	}

	#[test]
	fn press_on_node_wins_over_hovered_connection() {
		let (mut nodes, conns) = scene();
		let mut ctl = InteractionController::default();
		ctl.pointer_move(Point::new(10.0, 2.0), &mut nodes, &conns);
		assert_eq!(ctl.hovered_connection(), Some("a-b"));
		assert_eq!(ctl.pointer_down(Point::new(10.0, 2.0), &nodes, &conns), None);
		assert_eq!(ctl.dragged_node(), Some("a"));
	}

	#[test]
	fn vanished_drag_target_reverts_to_idle() {
		let (mut nodes, conns) = scene();
		let mut ctl = InteractionController::default();
		ctl.pointer_down(Point::new(0.0, 0.0), &nodes, &conns);
		nodes.remove(0);
		assert_eq!(ctl.pointer_up(&nodes), None);

		ctl.pointer_down(Point::new(100.0, 0.0), &nodes, &conns);
		nodes.retain(|n| n.id != "b");
		ctl.pointer_move(Point::new(5.0, 5.0), &mut nodes, &conns);
		assert!(!ctl.is_dragging());
	}

	#[test]
	fn retain_valid_clears_stale_references() {
		let (mut nodes, conns) = scene();
		let mut ctl = InteractionController::default();
		ctl.pointer_move(Point::new(50.0, 0.0), &mut nodes, &conns);
		ctl.retain_valid(&nodes, &conns[1..]);
		assert_eq!(ctl.hovered_connection(), None);
	}

	#[test]
	fn press_ignores_hover_on_edge_with_missing_endpoint() {
		let (mut nodes, conns) = scene();
		let mut ctl = InteractionController::default();
		ctl.pointer_move(Point::new(50.0, 0.0), &mut nodes, &conns);
		assert_eq!(ctl.hovered_connection(), Some("a-b"));
		nodes.retain(|n| n.id != "b");
		assert_eq!(ctl.pointer_down(Point::new(-500.0, -500.0), &nodes, &conns), None);
	}

	#[test]
	fn zoom_is_clamped_and_resettable() {
		let mut t = ViewTransform::default();
		for _ in 0..25 {
			t.zoom_in();
		}
		assert_eq!(t.scale, MAX_SCALE);
		for _ in 0..25 {
			t.zoom_out();
		}
		assert_eq!(t.scale, MIN_SCALE);
		t.zoom_in();
		assert_eq!(t.scale, 0.6);
		t.reset_zoom();
		assert_eq!(t.scale, 1.0);
	}

	#[test]
	fn hit_testing_inverts_the_render_transform() {
		let (nodes, conns) = scene();
		let mut ctl = InteractionController::default();
		ctl.state.transform = ViewTransform {
			scale: 2.0,
			origin: Point::new(50.0, 50.0),
		};
		// node c at (100, 100) renders at (150, 150)
		let screen = ctl.transform().to_screen(nodes[2].position);
		assert_eq!(screen, Point::new(150.0, 150.0));
		ctl.pointer_down(screen, &nodes, &conns);
		assert_eq!(ctl.dragged_node(), Some("c"));
		// 20 screen px is 10 scene units at 2x, inside the radius
		ctl.pointer_up(&nodes);
		ctl.pointer_down(Point::new(170.0, 150.0), &nodes, &conns);
		assert_eq!(ctl.dragged_node(), Some("c"));
	}
}
