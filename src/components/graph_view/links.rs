//! Wiki-style `[[Title]]` link extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{ConnectionRequest, Note};

static WIKI_LINK: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("wiki link pattern is valid"));

/// Names inside `[[...]]` references, in order of appearance.
pub fn linked_names(content: &str) -> impl Iterator<Item = &str> {
	WIKI_LINK
		.captures_iter(content)
		.filter_map(|cap| cap.get(1))
		.map(|m| m.as_str())
}

/// Resolves a referenced name to a note by case-insensitive title match,
/// never resolving to `exclude_id`.
pub fn resolve<'a>(name: &str, notes: &'a [Note], exclude_id: &str) -> Option<&'a Note> {
	let wanted = name.to_lowercase();
	notes
		.iter()
		.find(|n| n.id != exclude_id && n.title.to_lowercase() == wanted)
}

/// Connection requests for every resolvable link in `note`'s content.
/// Unresolved names are left alone; repeated links to the same target yield a
/// single request.
pub fn extract_links(note: &Note, notes: &[Note]) -> Vec<ConnectionRequest> {
	let mut requests: Vec<ConnectionRequest> = Vec::new();
	for name in linked_names(&note.content) {
		let Some(target) = resolve(name, notes, &note.id) else {
			continue;
		};
		if requests.iter().any(|r| r.target_id == target.id) {
			continue;
		}
		requests.push(ConnectionRequest {
			source_id: note.id.clone(),
			target_id: target.id.clone(),
		});
	}
	requests
}

#[cfg(test)]
mod tests {
	use super::*;

	fn notes() -> Vec<Note> {
		vec![
			Note::new("1", "Rust", "See [[ownership]] and [[Borrowing]], also [[rust]]."),
			Note::new("2", "Ownership", "Back to [[RUST]] and [[Missing Page]]."),
			Note::new("3", "Borrowing", "[[Ownership]] [[ownership]]"),
		]
	}

	#[test]
	fn finds_bracketed_names_in_order() {
		let names: Vec<_> = linked_names("a [[One]] b [[Two words]] [not] [[]]").collect();
		assert_eq!(names, ["One", "Two words", ""]);
	}

	#[test]
	fn resolves_case_insensitively_without_self_matches() {
		let all = notes();
		let reqs = extract_links(&all[0], &all);
		let targets: Vec<_> = reqs.iter().map(|r| r.target_id.as_str()).collect();
		assert_eq!(targets, ["2", "3"]);
		assert!(reqs.iter().all(|r| r.source_id == "1"));
	}

	#[test]
	fn unresolved_names_produce_nothing() {
		let all = notes();
		let reqs = extract_links(&all[1], &all);
		assert_eq!(reqs.len(), 1);
		assert_eq!(reqs[0].target_id, "1");
	}

	#[test]
	fn repeated_links_collapse() {
		let all = notes();
		assert_eq!(extract_links(&all[2], &all).len(), 1);
	}
}
