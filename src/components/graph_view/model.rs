//! Note/connection collection with the connection invariants the graph view
//! relies on: no self-links and at most one connection per unordered pair.

use log::debug;
use thiserror::Error;

use super::types::{Connection, ConnectionRequest, Note};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConnectionRejected {
	#[error("note {0} cannot be connected to itself")]
	SelfLink(String),
	#[error("notes {0} and {1} are already connected")]
	Duplicate(String, String),
	#[error("no note with id {0}")]
	UnknownNote(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	notes: Vec<Note>,
	connections: Vec<Connection>,
}

impl GraphModel {
	pub fn new(notes: Vec<Note>) -> Self {
		let mut model = Self::default();
		for note in notes {
			model.add_note(note);
		}
		model
	}

	pub fn notes(&self) -> &[Note] {
		&self.notes
	}

	pub fn connections(&self) -> &[Connection] {
		&self.connections
	}

	pub fn note(&self, id: &str) -> Option<&Note> {
		self.notes.iter().find(|n| n.id == id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.note(id).is_some()
	}

	/// Adds a note, ignoring it if the id is already taken.
	pub fn add_note(&mut self, note: Note) -> bool {
		if self.contains(&note.id) {
			debug!("ignoring note with duplicate id {}", note.id);
			return false;
		}
		self.notes.push(note);
		true
	}

	/// Removes a note together with every connection touching it.
	pub fn remove_note(&mut self, id: &str) -> Option<Note> {
		let idx = self.notes.iter().position(|n| n.id == id)?;
		self.connections.retain(|c| !c.touches(id));
		Some(self.notes.remove(idx))
	}

	pub fn create_connection(
		&mut self,
		source_id: &str,
		target_id: &str,
	) -> Result<String, ConnectionRejected> {
		if source_id == target_id {
			return Err(ConnectionRejected::SelfLink(source_id.into()));
		}
		for id in [source_id, target_id] {
			if !self.contains(id) {
				return Err(ConnectionRejected::UnknownNote(id.into()));
			}
		}
		if self.are_connected(source_id, target_id) {
			return Err(ConnectionRejected::Duplicate(source_id.into(), target_id.into()));
		}

		let conn = Connection::new(source_id, target_id);
		let id = conn.id.clone();
		self.connections.push(conn);
		Ok(id)
	}

	/// Applies extracted link requests, returning the ids of the connections
	/// that were actually created. Rejected requests are no-ops.
	pub fn apply_requests(&mut self, requests: &[ConnectionRequest]) -> Vec<String> {
		requests
			.iter()
			.filter_map(|req| match self.create_connection(&req.source_id, &req.target_id) {
				Ok(id) => Some(id),
				Err(err) => {
					debug!("skipping link request: {err}");
					None
				}
			})
			.collect()
	}

	pub fn delete_connection(&mut self, id: &str) -> Option<Connection> {
		let idx = self.connections.iter().position(|c| c.id == id)?;
		Some(self.connections.remove(idx))
	}

	pub fn are_connected(&self, a: &str, b: &str) -> bool {
		self.connections.iter().any(|c| c.joins(a, b))
	}

	pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.connections.iter().filter_map(move |c| c.other_end(id))
	}

	pub fn degree(&self, id: &str) -> usize {
		self.neighbors(id).count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn model(ids: &[&str]) -> GraphModel {
		GraphModel::new(ids.iter().map(|id| Note::new(*id, format!("Note {id}"), "")).collect())
	}

	#[test]
	fn rejects_self_connection() {
		let mut m = model(&["a", "b"]);
		assert_eq!(
			m.create_connection("a", "a"),
			Err(ConnectionRejected::SelfLink("a".into()))
		);
		assert!(m.connections().is_empty());
	}

	#[test]
	fn rejects_duplicate_in_either_direction() {
		let mut m = model(&["a", "b"]);
		assert_eq!(m.create_connection("a", "b"), Ok("a-b".to_string()));
		assert!(matches!(
			m.create_connection("b", "a"),
			Err(ConnectionRejected::Duplicate(..))
		));
		assert!(matches!(
			m.create_connection("a", "b"),
			Err(ConnectionRejected::Duplicate(..))
		));
		assert_eq!(m.connections().len(), 1);
		assert_eq!(m.connections()[0].source_id, "a");
	}

	#[test]
	fn rejects_unknown_endpoints() {
		let mut m = model(&["a"]);
		assert_eq!(
			m.create_connection("a", "zz"),
			Err(ConnectionRejected::UnknownNote("zz".into()))
		);
	}

	#[test]
	fn duplicate_note_ids_are_ignored() {
		let mut m = model(&["a"]);
		assert!(!m.add_note(Note::new("a", "Other", "")));
		assert_eq!(m.notes().len(), 1);
		assert_eq!(m.notes()[0].title, "Note a");
	}

	#[test]
	fn removing_note_cascades_to_connections() {
		let mut m = model(&["a", "b", "c"]);
		m.create_connection("a", "b").unwrap();
		m.create_connection("b", "c").unwrap();
		m.create_connection("c", "a").unwrap();

		assert_eq!(m.degree("b"), 2);
		m.remove_note("b").unwrap();
		assert_eq!(m.connections().len(), 1);
		assert!(m.are_connected("a", "c"));
		assert!(m.remove_note("b").is_none());
	}

	#[test]
	fn apply_requests_skips_rejections() {
		let mut m = model(&["a", "b", "c"]);
		let reqs = [("a", "b"), ("b", "a"), ("a", "a"), ("a", "c")].map(|(s, t)| ConnectionRequest {
			source_id: s.into(),
			target_id: t.into(),
		});
		assert_eq!(m.apply_requests(&reqs), vec!["a-b", "a-c"]);
		let mut neighbors: Vec<_> = m.neighbors("a").collect();
		neighbors.sort();
		assert_eq!(neighbors, ["b", "c"]);
	}

	#[test]
	fn delete_connection_by_id() {
		let mut m = model(&["a", "b"]);
		let id = m.create_connection("a", "b").unwrap();
		assert!(m.delete_connection(&id).is_some());
		assert!(m.delete_connection(&id).is_none());
		assert!(m.create_connection("b", "a").is_ok());
	}
}
