use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
	pub id: String,
	pub title: String,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Note {
	pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: id.into(),
			title: title.into(),
			content: content.into(),
			created_at: now,
			updated_at: now,
		}
	}
}

/// An edge between two notes. Carries a source/target order but is treated as
/// undirected by the layout and hit-testing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
	pub id: String,
	pub source_id: String,
	pub target_id: String,
}

impl Connection {
	pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
		let (source_id, target_id) = (source_id.into(), target_id.into());
		Self {
			id: Self::id_for(&source_id, &target_id),
			source_id,
			target_id,
		}
	}

	pub fn id_for(source_id: &str, target_id: &str) -> String {
		format!("{source_id}-{target_id}")
	}

	pub fn touches(&self, note_id: &str) -> bool {
		self.source_id == note_id || self.target_id == note_id
	}

	/// The endpoint opposite `note_id`, if this connection touches it.
	pub fn other_end(&self, note_id: &str) -> Option<&str> {
		if self.source_id == note_id {
			Some(&self.target_id)
		} else if self.target_id == note_id {
			Some(&self.source_id)
		} else {
			None
		}
	}

	/// Whether this connection joins `a` and `b` in either direction.
	pub fn joins(&self, a: &str, b: &str) -> bool {
		(self.source_id == a && self.target_id == b) || (self.source_id == b && self.target_id == a)
	}
}

/// A request to connect two notes, as produced by link extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionRequest {
	pub source_id: String,
	pub target_id: String,
}
