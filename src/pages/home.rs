use leptos::prelude::*;
use log::debug;

use crate::components::graph_view::{GraphModel, GraphView, Note, links};

fn sample_notes() -> Vec<Note> {
	[
		("1", "Rust", "Systems language. See [[Ownership]] and [[Traits]]."),
		("2", "Ownership", "Every value has one owner. Related: [[Borrowing]]."),
		("3", "Borrowing", "References without taking [[ownership]]."),
		("4", "Traits", "Shared behaviour, see [[Generics]]."),
		("5", "Generics", "Monomorphised at compile time."),
		("6", "Reading list", "[[Rust]], [[Missing book]]"),
	]
	.into_iter()
	.map(|(id, title, content)| Note::new(id, title, content))
	.collect()
}

/// Sample notes wired together by the `[[...]]` links in their content.
fn sample_model() -> GraphModel {
	let mut model = GraphModel::new(sample_notes());
	let requests: Vec<_> = model
		.notes()
		.iter()
		.flat_map(|note| links::extract_links(note, model.notes()))
		.collect();
	let created = model.apply_requests(&requests);
	debug!("sample graph has {} connections", created.len());
	model
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let model = RwSignal::new(sample_model());
	let active = RwSignal::new(model.with_untracked(|m| m.notes().first().map(|n| n.id.clone())));
	let notes = Signal::derive(move || model.with(|m| m.notes().to_vec()));
	let connections = Signal::derive(move || model.with(|m| m.connections().to_vec()));

	let select_note = Callback::new(move |id: String| active.set(Some(id)));
	let delete_connection = Callback::new(move |id: String| {
		model.update(|m| {
			m.delete_connection(&id);
		});
	});
	let delete_note = move |id: String| {
		model.update(|m| {
			m.remove_note(&id);
		});
		if active.with_untracked(|a| a.as_deref() == Some(id.as_str())) {
			active.set(model.with_untracked(|m| m.notes().first().map(|n| n.id.clone())));
		}
	};
	let create_note = move |_: web_sys::MouseEvent| {
		let id = js_sys::Date::now().to_string();
		model.update(|m| {
			m.add_note(Note::new(id.clone(), "Untitled Note", ""));
		});
		active.set(Some(id));
	};

	view! {
		<div class="notes-app">
			<aside class="note-list">
				<div class="note-list-header">
					<h1>"Notes"</h1>
					<button on:click=create_note>"New"</button>
				</div>
				<ul>
					<For
						each=move || notes.get()
						key=|note| note.id.clone()
						children=move |note: Note| {
							let (id, select_id, delete_id) = (
								note.id.clone(),
								note.id.clone(),
								note.id.clone(),
							);
							let (title, degree_id) = (note.title.clone(), note.id.clone());
							let label = move || {
								model.with(|m| format!("{title} ({})", m.degree(&degree_id)))
							};
							view! {
								<li class:active=move || {
									active.with(|a| a.as_deref() == Some(id.as_str()))
								}>
									<span on:click=move |_| select_note.run(select_id.clone())>
										{label}
									</span>
									<button
										title="Delete note"
										on:click=move |_| delete_note(delete_id.clone())
									>
										"x"
									</button>
								</li>
							}
						}
					/>
				</ul>
			</aside>
			<main class="graph-pane">
				<GraphView
					notes=notes
					connections=connections
					active_note_id=active
					on_select_note=select_note
					on_delete_connection=delete_connection
				/>
			</main>
		</div>
	}
}
