//! Personal notes with wiki-style links, explored as a force-directed graph.
//!
//! The graph view lives in `components::graph_view`; the home page plays the
//! host application that owns the notes and reacts to the view's callbacks.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Debug builds log at `Debug`, release builds at `Info`.
fn log_level() -> Level {
	if cfg!(debug_assertions) {
		Level::Debug
	} else {
		Level::Info
	}
}

/// Route `log` output to the browser console and install the panic hook.
pub fn init_logging() {
	let level = log_level();
	let _ = console_log::init_with_level(level);
	console_error_panic_hook::set_once();
	info!("logging initialized at {level}");
}

/// Root component: the notes graph at `/`, a 404 page elsewhere.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Note Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
