//! Force-directed layout: repulsion between every pair of nodes, spring
//! attraction along connections and a weak pull toward the viewport center,
//! integrated with heavy damping.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Point;
use super::types::{Connection, Note};

/// Simulation constants. The defaults give a stable, overdamped layout for a
/// personal-sized graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceParams {
	/// Numerator of the `k / (distance + 1)` repulsion.
	pub repulsion: f64,
	/// Divisor of the `distance / k` spring attraction.
	pub attraction: f64,
	pub gravity: f64,
	pub damping: f64,
	/// When set, ticking stops once every velocity component is below this.
	pub settle_threshold: Option<f64>,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			repulsion: 200.0,
			attraction: 10.0,
			gravity: 0.01,
			damping: 0.3,
			settle_threshold: None,
		}
	}
}

/// How node positions are rebuilt when the set of notes changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
	/// Every node gets a fresh random position.
	#[default]
	ResetAll,
	/// Nodes that survive the change keep position and velocity; only new
	/// nodes are placed randomly.
	PreserveExisting,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRadii {
	pub base: f64,
	pub active: f64,
}

impl Default for NodeRadii {
	fn default() -> Self {
		Self {
			base: 15.0,
			active: 20.0,
		}
	}
}

impl NodeRadii {
	pub fn for_node(&self, id: &str, active: Option<&str>) -> f64 {
		if active == Some(id) { self.active } else { self.base }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeState {
	pub id: String,
	pub title: String,
	pub position: Point,
	pub velocity: Point,
	pub radius: f64,
}

/// Force exerted on a node at `on` by a node at `from`. Coincident nodes exert
/// no force.
pub fn repulsion(on: Point, from: Point, k: f64) -> Point {
	let delta = on - from;
	delta.normalized() * (k / (delta.length() + 1.0))
}

/// Spring force pulling a node at `on` toward a connected node at `toward`.
pub fn attraction(on: Point, toward: Point, k: f64) -> Point {
	let delta = toward - on;
	delta.normalized() * (delta.length() / k)
}

pub fn gravity(on: Point, center: Point, k: f64) -> Point {
	(center - on) * k
}

/// Net force on `nodes[idx]`.
fn net_force(
	idx: usize,
	nodes: &[NodeState],
	index: &HashMap<&str, usize>,
	connections: &[Connection],
	center: Point,
	params: &ForceParams,
) -> Point {
	let node = &nodes[idx];
	let mut force = Point::ZERO;

	for (j, other) in nodes.iter().enumerate() {
		if j != idx {
			force += repulsion(node.position, other.position, params.repulsion);
		}
	}

	for other in connections.iter().filter_map(|c| c.other_end(&node.id)) {
		if let Some(&j) = index.get(other) {
			force += attraction(node.position, nodes[j].position, params.attraction);
		}
	}

	force + gravity(node.position, center, params.gravity)
}

/// Advances the simulation by one tick. Pure: the input is left untouched and
/// a fresh node array is returned.
pub fn step(
	nodes: &[NodeState],
	connections: &[Connection],
	center: Point,
	params: &ForceParams,
) -> Vec<NodeState> {
	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();

	nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let force = net_force(i, nodes, &index, connections, center, params);
			let velocity = (node.velocity + force) * params.damping;
			NodeState {
				position: node.position + velocity,
				velocity,
				..node.clone()
			}
		})
		.collect()
}

pub fn is_settled(nodes: &[NodeState], threshold: f64) -> bool {
	nodes
		.iter()
		.all(|n| n.velocity.x.abs() < threshold && n.velocity.y.abs() < threshold)
}

/// Random point in the central 80% of a `width` x `height` viewport.
pub fn random_position(width: f64, height: f64, rng: &mut impl Rng) -> Point {
	Point::new(
		rng.r#gen::<f64>() * width * 0.8 + width * 0.1,
		rng.r#gen::<f64>() * height * 0.8 + height * 0.1,
	)
}

/// Builds node state for `notes`, in note order.
pub fn seed_nodes(
	notes: &[Note],
	previous: &[NodeState],
	active: Option<&str>,
	radii: NodeRadii,
	placement: Placement,
	(width, height): (f64, f64),
	rng: &mut impl Rng,
) -> Vec<NodeState> {
	notes
		.iter()
		.map(|note| {
			let kept = match placement {
				Placement::ResetAll => None,
				Placement::PreserveExisting => previous.iter().find(|n| n.id == note.id),
			};
			let (position, velocity) = match kept {
				Some(n) => (n.position, n.velocity),
				None => (random_position(width, height, rng), Point::ZERO),
			};
			NodeState {
				id: note.id.clone(),
				title: note.title.clone(),
				position,
				velocity,
				radius: radii.for_node(&note.id, active),
			}
		})
		.collect()
}
