use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlDivElement, MouseEvent, WheelEvent, Window};

use super::error::GraphViewError;
use super::geometry::Point;
use super::interaction::GraphIntent;
use super::render;
use super::state::{GraphViewConfig, GraphViewState};
use super::types::{Connection, Note};

type Shared<T> = Rc<RefCell<Option<T>>>;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

fn browser_window() -> Result<Window, GraphViewError> {
	web_sys::window().ok_or(GraphViewError::NoWindow)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphViewError> {
	canvas
		.get_context("2d")?
		.ok_or(GraphViewError::NoContext)?
		.dyn_into()
		.map_err(|_| GraphViewError::NoContext)
}

fn container_size(container: &HtmlDivElement) -> (f64, f64) {
	let (w, h) = (container.client_width() as f64, container.client_height() as f64);
	if w > 0.0 && h > 0.0 {
		(w, h)
	} else {
		warn!("graph container has no size, using {FALLBACK_SIZE:?}");
		FALLBACK_SIZE
	}
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn dispatch(
	intent: Option<GraphIntent>,
	on_select_note: Option<Callback<String>>,
	on_delete_connection: Option<Callback<String>>,
) {
	match intent {
		Some(GraphIntent::SelectNote(id)) => {
			debug!("select note {id}");
			if let Some(cb) = on_select_note {
				cb.run(id);
			}
		}
		Some(GraphIntent::DeleteConnection(id)) => {
			debug!("delete connection {id}");
			if let Some(cb) = on_delete_connection {
				cb.run(id);
			}
		}
		None => {}
	}
}

/// Browser resources held by a mounted graph view.
struct Mounted {
	window: Window,
	alive: Rc<Cell<bool>>,
	frame: Rc<Cell<i32>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	resize: Closure<dyn FnMut()>,
	state: Shared<GraphViewState>,
}

impl Mounted {
	fn teardown(self) {
		self.alive.set(false);
		let _ = self.window.cancel_animation_frame(self.frame.get());
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.resize.as_ref().unchecked_ref());
		self.animate.borrow_mut().take();
		if let Some(mut s) = self.state.borrow_mut().take() {
			s.teardown();
		}
	}
}

fn mount(
	canvas: HtmlCanvasElement,
	container: HtmlDivElement,
	state: Shared<GraphViewState>,
	config: GraphViewConfig,
	(notes, connections, active): (&[Note], &[Connection], Option<&str>),
) -> Result<Mounted, GraphViewError> {
	let window = browser_window()?;
	let ctx = context_2d(&canvas)?;
	let (w, h) = container_size(&container);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let mut initial = GraphViewState::new(config, w, h, js_sys::Date::now() as u64);
	initial.set_connections(connections);
	initial.sync_notes(notes, active);
	*state.borrow_mut() = Some(initial);
	info!("graph view mounted at {w}x{h} with {} notes", notes.len());

	let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
	let resize = Closure::<dyn FnMut()>::new(move || {
		let (nw, nh) = container_size(&container);
		canvas_resize.set_width(nw as u32);
		canvas_resize.set_height(nh as u32);
		if let Some(s) = state_resize.borrow_mut().as_mut() {
			s.resize(nw, nh);
		}
	});
	if let Err(err) =
		window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
	{
		state.borrow_mut().take();
		return Err(err.into());
	}

	let (alive, frame) = (Rc::new(Cell::new(true)), Rc::new(Cell::new(0)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let (state_anim, animate_inner, alive_anim, frame_anim, window_anim) = (
		state.clone(),
		animate.clone(),
		alive.clone(),
		frame.clone(),
		window.clone(),
	);
	*animate.borrow_mut() = Some(Closure::new(move |now: f64| {
		if !alive_anim.get() {
			return;
		}
		if let Some(s) = state_anim.borrow_mut().as_mut() {
			s.advance(now);
			render::render(s, &ctx);
		}
		if let Some(cb) = animate_inner.borrow().as_ref() {
			if let Ok(handle) = window_anim.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_anim.set(handle);
			}
		}
	}));
	let first_frame = animate
		.borrow()
		.as_ref()
		.map(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()));

	let mounted = Mounted {
		window,
		alive,
		frame,
		animate,
		resize,
		state,
	};
	match first_frame {
		Some(Err(err)) => {
			mounted.teardown();
			Err(err.into())
		}
		Some(Ok(handle)) => {
			mounted.frame.set(handle);
			Ok(mounted)
		}
		None => Ok(mounted),
	}
}

/// Interactive force-directed view of notes and their connections.
///
/// Reports clicks on nodes through `on_select_note` and clicks on a hovered
/// connection through `on_delete_connection`; it never edits the notes itself.
#[component]
pub fn GraphView(
	#[prop(into)] notes: Signal<Vec<Note>>,
	#[prop(into)] connections: Signal<Vec<Connection>>,
	#[prop(into)] active_note_id: Signal<Option<String>>,
	#[prop(optional, into)] on_select_note: Option<Callback<String>>,
	#[prop(optional, into)] on_delete_connection: Option<Callback<String>>,
	#[prop(optional)] config: GraphViewConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let state: Shared<GraphViewState> = Rc::new(RefCell::new(None));
	// connection id under the pointer, and where to show the delete hint
	let hover_hint = RwSignal::new(None::<(String, f64, f64)>);

	let state_init = state.clone();
	Effect::new(move |_| {
		let (Some(canvas), Some(container)) = (canvas_ref.get(), container_ref.get()) else {
			return;
		};
		let (current_notes, current_conns, active) = (
			notes.get_untracked(),
			connections.get_untracked(),
			active_note_id.get_untracked(),
		);
		match mount(
			canvas,
			container,
			state_init.clone(),
			config.clone(),
			(&current_notes, &current_conns, active.as_deref()),
		) {
			Ok(mounted) => {
				let mounted = SendWrapper::new(mounted);
				on_cleanup(move || mounted.take().teardown());
			}
			Err(err) => error!("graph view failed to mount: {err}"),
		}
	});

	let state_notes = state.clone();
	Effect::new(move |_| {
		let (current, active) = (notes.get(), active_note_id.get());
		if let Some(s) = state_notes.borrow_mut().as_mut() {
			s.sync_notes(&current, active.as_deref());
		}
	});

	let state_conns = state.clone();
	Effect::new(move |_| {
		connections.with(|conns| {
			if let Some(s) = state_conns.borrow_mut().as_mut() {
				s.set_connections(conns);
			}
		});
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let at = pointer_position(&canvas, &ev);
		let intent = state_md.borrow_mut().as_mut().and_then(|s| s.pointer_down(at));
		dispatch(intent, on_select_note, on_delete_connection);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let at = pointer_position(&canvas, &ev);
		let hovered = state_mm.borrow_mut().as_mut().and_then(|s| {
			s.pointer_move(at);
			s.controller.hovered_connection().map(str::to_owned)
		});
		let hint = hovered.map(|id| (id, at.x, at.y));
		if hover_hint.with_untracked(|current| *current != hint) {
			hover_hint.set(hint);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let intent = state_mu.borrow_mut().as_mut().and_then(|s| s.pointer_up());
		dispatch(intent, on_select_note, on_delete_connection);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let intent = state_ml.borrow_mut().as_mut().and_then(|s| s.pointer_leave());
		hover_hint.set(None);
		dispatch(intent, on_select_note, on_delete_connection);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(s) = state_wh.borrow_mut().as_mut() {
			s.wheel(ev.delta_y());
		}
	};

	let (state_zi, state_zo, state_zr) = (state.clone(), state.clone(), state.clone());
	let zoom_in = move |_: MouseEvent| {
		if let Some(s) = state_zi.borrow_mut().as_mut() {
			s.zoom_in();
		}
	};
	let zoom_out = move |_: MouseEvent| {
		if let Some(s) = state_zo.borrow_mut().as_mut() {
			s.zoom_out();
		}
	};
	let reset_zoom = move |_: MouseEvent| {
		if let Some(s) = state_zr.borrow_mut().as_mut() {
			s.reset_zoom();
		}
	};

	view! {
		<div
			node_ref=container_ref
			class="graph-view"
			style="position: relative; width: 100%; height: 100%; overflow: hidden;"
		>
			<canvas
				node_ref=canvas_ref
				class="graph-view-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-view-controls">
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Zoom out" on:click=zoom_out>"-"</button>
				<button title="Reset zoom" on:click=reset_zoom>"1:1"</button>
			</div>
			{move || {
				hover_hint
					.get()
					.map(|(_, x, y)| {
						view! {
							<span
								class="graph-view-delete-hint"
								style=format!("left: {x}px; top: {y}px;")
							>
								"click to delete"
							</span>
						}
					})
			}}
			{move || {
				notes
					.with(|n| n.is_empty())
					.then(|| {
						view! {
							<div class="graph-view-empty">
								"Create some notes to see them in the graph view"
							</div>
						}
					})
			}}
		</div>
	}
}
