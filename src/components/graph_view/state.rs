use std::rc::Rc;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::clock::SimulationClock;
use super::geometry::Point;
use super::interaction::{GraphIntent, InteractionController, InteractionParams};
use super::layout::{self, ForceParams, NodeRadii, NodeState, Placement};
use super::types::{Connection, Note};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphViewConfig {
	pub forces: ForceParams,
	pub interaction: InteractionParams,
	pub radii: NodeRadii,
	pub placement: Placement,
	pub tick_period_ms: f64,
}

impl Default for GraphViewConfig {
	fn default() -> Self {
		Self {
			forces: ForceParams::default(),
			interaction: InteractionParams::default(),
			radii: NodeRadii::default(),
			placement: Placement::default(),
			tick_period_ms: 30.0,
		}
	}
}

/// Everything the graph view owns: the published node snapshot, the pointer
/// controller and the simulation clock.
///
/// `nodes` is replaced wholesale on every tick, so a snapshot handed out by
/// [`GraphViewState::snapshot`] never changes underneath its holder.
pub struct GraphViewState {
	nodes: Rc<Vec<NodeState>>,
	connections: Vec<Connection>,
	active_note_id: Option<String>,
	pub controller: InteractionController,
	clock: SimulationClock,
	config: GraphViewConfig,
	rng: StdRng,
	settled: bool,
	pub width: f64,
	pub height: f64,
}

impl GraphViewState {
	pub fn new(config: GraphViewConfig, width: f64, height: f64, seed: u64) -> Self {
		let mut controller = InteractionController::new(config.interaction);
		controller.transform_mut().origin = Point::new(width / 2.0, height / 2.0);
		Self {
			nodes: Rc::new(Vec::new()),
			connections: Vec::new(),
			active_note_id: None,
			controller,
			clock: SimulationClock::new(config.tick_period_ms),
			config,
			rng: StdRng::seed_from_u64(seed),
			settled: false,
			width,
			height,
		}
	}

	pub fn snapshot(&self) -> Rc<Vec<NodeState>> {
		Rc::clone(&self.nodes)
	}

	pub fn nodes(&self) -> &[NodeState] {
		&self.nodes
	}

	pub fn connections(&self) -> &[Connection] {
		&self.connections
	}

	pub fn active_note_id(&self) -> Option<&str> {
		self.active_note_id.as_deref()
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	pub fn is_running(&self) -> bool {
		self.clock.is_running()
	}

	pub fn is_settled(&self) -> bool {
		self.settled
	}

	/// Brings node state in line with `notes`. A change in the set of note ids
	/// rebuilds positions according to the configured [`Placement`]; otherwise
	/// only titles and radii are refreshed.
	pub fn sync_notes(&mut self, notes: &[Note], active: Option<&str>) {
		self.active_note_id = active.map(str::to_owned);
		let same_ids = notes.len() == self.nodes.len()
			&& notes.iter().zip(self.nodes.iter()).all(|(note, node)| note.id == node.id);

		if same_ids {
			let radii = self.config.radii;
			let nodes = Rc::make_mut(&mut self.nodes);
			for (node, note) in nodes.iter_mut().zip(notes) {
				node.title.clone_from(&note.title);
				node.radius = radii.for_node(&node.id, active);
			}
			return;
		}

		debug!("rebuilding layout for {} notes", notes.len());
		self.nodes = Rc::new(layout::seed_nodes(
			notes,
			&self.nodes,
			active,
			self.config.radii,
			self.config.placement,
			(self.width, self.height),
			&mut self.rng,
		));
		self.settled = false;
		self.controller.retain_valid(&self.nodes, &self.connections);
	}

	pub fn set_connections(&mut self, connections: &[Connection]) {
		self.connections = connections.to_vec();
		self.settled = false;
		self.controller.retain_valid(&self.nodes, &self.connections);
	}

	/// One simulation step. Skipped entirely while a node is being dragged,
	/// once the layout has settled, or after teardown.
	pub fn tick(&mut self) {
		if !self.clock.is_running() || self.controller.is_dragging() || self.settled {
			return;
		}
		let next = layout::step(&self.nodes, &self.connections, self.center(), &self.config.forces);
		if let Some(threshold) = self.config.forces.settle_threshold {
			self.settled = layout::is_settled(&next, threshold);
		}
		self.nodes = Rc::new(next);
	}

	/// Runs every tick that fell due by `now_ms`. Returns how many ran.
	pub fn advance(&mut self, now_ms: f64) -> u32 {
		let due = self.clock.advance(now_ms);
		for _ in 0..due {
			self.tick();
		}
		due
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.controller.transform_mut().origin = self.center();
		self.settled = false;
	}

	pub fn pointer_move(&mut self, screen: Point) {
		let nodes = Rc::make_mut(&mut self.nodes);
		self.controller.pointer_move(screen, nodes, &self.connections);
		if self.controller.is_dragging() {
			self.settled = false;
		}
	}

	pub fn pointer_down(&mut self, screen: Point) -> Option<GraphIntent> {
		self.controller.pointer_down(screen, &self.nodes, &self.connections)
	}

	pub fn pointer_up(&mut self) -> Option<GraphIntent> {
		self.controller.pointer_up(&self.nodes)
	}

	pub fn pointer_leave(&mut self) -> Option<GraphIntent> {
		let intent = self.controller.pointer_leave(&self.nodes);
		self.controller.state.hovered_connection = None;
		intent
	}

	pub fn zoom_in(&mut self) {
		self.controller.transform_mut().zoom_in();
	}

	pub fn zoom_out(&mut self) {
		self.controller.transform_mut().zoom_out();
	}

	pub fn reset_zoom(&mut self) {
		self.controller.transform_mut().reset_zoom();
	}

	/// One zoom step per wheel event, toward the wheel's direction.
	pub fn wheel(&mut self, delta_y: f64) {
		if delta_y > 0.0 {
			self.zoom_out();
		} else if delta_y < 0.0 {
			self.zoom_in();
		}
	}

	/// Stops the simulation for good. Later ticks and clock advances are no-ops.
	pub fn teardown(&mut self) {
		info!("graph view torn down");
		self.clock.stop();
		self.controller.state.drag = Default::default();
		self.controller.state.hovered_connection = None;
	}
}
