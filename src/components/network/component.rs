use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::config::NetworkConfig;
use super::csv::parse_records;
use super::loader::{LOAD_ERROR_MESSAGE, fetch_csv};
use super::palette;
use super::panel::{NodeDetails, StatsPanel};
use super::render::{self, CanvasScene};
use super::state::NetworkState;
use super::types::{FilterField, NodeRecord, Stats};

type SharedState = Rc<RefCell<Option<NetworkState<CanvasScene>>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadStatus {
	Loading,
	Ready,
	Failed,
}

fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

/// Push the selection into the details signal when it changed.
fn publish_selection(state: &NetworkState<CanvasScene>, details: RwSignal<Option<NodeRecord>>) {
	let record = state.selected_record();
	if details.with_untracked(|d| d.as_ref() != record) {
		details.set(record.cloned());
	}
}

#[component]
pub fn NetworkViewer(#[prop(optional)] config: NetworkConfig) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	let status = RwSignal::new(LoadStatus::Loading);
	let details = RwSignal::new(None::<NodeRecord>);
	let stats = RwSignal::new(Stats::default());
	let cursor = RwSignal::new("grab");
	let speed = RwSignal::new(1.0f32);
	let paused = RwSignal::new(false);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("canvas 2d context unavailable");
				return;
			}
		};

		let (state_load, canvas_load, config_load) =
			(state_init.clone(), canvas.clone(), config.clone());
		spawn_local(async move {
			let text = match fetch_csv(&config_load.csv_url).await {
				Ok(text) => text,
				Err(err) => {
					error!("Error loading CSV data: {}", err);
					status.set(LoadStatus::Failed);
					return;
				}
			};
			let records = parse_records(&text, config_load.spread);
			let seed = config_load.seed.unwrap_or_else(random_seed);
			let mut rng = StdRng::seed_from_u64(seed);
			let (cw, ch) = (canvas_load.width() as f64, canvas_load.height() as f64);

			let mut s =
				NetworkState::new(records, config_load, CanvasScene::default(), &mut rng, cw, ch);
			s.set_speed(speed.get_untracked());
			s.animation.paused = paused.get_untracked();
			stats.set(s.stats());
			*state_load.borrow_mut() = Some(s);
			status.set(LoadStatus::Ready);
		});

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = container_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(js_sys::Date::now() * 0.001);
				let (w, h) = (s.width, s.height);
				render::render(&mut s.scene, &s.camera, &ctx, w, h);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if let Some(c) = s.pointer_move(x, y) {
				cursor.set(c.css());
			}
			publish_selection(s, details);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y());
		}
	};

	let state_cat = state.clone();
	let on_category = move |ev: web_sys::Event| {
		let value = event_target_value(&ev);
		if let Some(ref mut s) = *state_cat.borrow_mut() {
			stats.set(s.filter_nodes(FilterField::Category, &value));
		}
	};

	let state_type = state.clone();
	let on_type = move |ev: web_sys::Event| {
		let value = event_target_value(&ev);
		if let Some(ref mut s) = *state_type.borrow_mut() {
			stats.set(s.filter_nodes(FilterField::Type, &value));
		}
	};

	let state_speed = state.clone();
	let on_speed = move |ev: web_sys::Event| {
		let Ok(value) = event_target_value(&ev).parse::<f32>() else {
			return;
		};
		speed.set(value);
		if let Some(ref mut s) = *state_speed.borrow_mut() {
			s.set_speed(value);
		}
	};

	let state_pause = state.clone();
	let on_pause = move |_: MouseEvent| {
		let now_paused = match *state_pause.borrow_mut() {
			Some(ref mut s) => s.toggle_pause(),
			None => !paused.get_untracked(),
		};
		paused.set(now_paused);
	};

	let state_reset = state.clone();
	let on_reset = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_reset.borrow_mut() {
			stats.set(s.reset_view());
			publish_selection(s, details);
		}
	};

	view! {
		<div class="network-layout">
			<div id="visualization-container" class="visualization-container">
				<canvas
					id="three-canvas"
					node_ref=canvas_ref
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style:cursor=move || cursor.get()
				/>
				<Show when=move || status.get() != LoadStatus::Ready>
					<div id="loading" class="loading">
						{move || match status.get() {
							LoadStatus::Failed => LOAD_ERROR_MESSAGE,
							_ => "Loading network data...",
						}}
					</div>
				</Show>
			</div>

			<aside class="controls-panel">
				<div class="control-group">
					<label for="categoryFilter">"Category"</label>
					<select id="categoryFilter" on:change=on_category>
						<option value="all">"All Categories"</option>
						{palette::categories()
							.map(|c| view! { <option value=c>{c}</option> })
							.collect_view()}
					</select>
				</div>
				<div class="control-group">
					<label for="typeFilter">"Type"</label>
					<select id="typeFilter" on:change=on_type>
						<option value="all">"All Types"</option>
						{palette::types()
							.map(|t| view! { <option value=t>{t}</option> })
							.collect_view()}
					</select>
				</div>
				<div class="control-group">
					<label for="speedSlider">
						"Rotation speed: " <span id="speedValue">{move || format!("{:.1}", speed.get())}</span>
					</label>
					<input
						type="range"
						id="speedSlider"
						min="0"
						max="2"
						step="0.1"
						prop:value=move || speed.get().to_string()
						on:input=on_speed
					/>
				</div>
				<div class="control-group buttons">
					<button id="pauseBtn" on:click=on_pause>
						{move || if paused.get() { "Resume Rotation" } else { "Pause Rotation" }}
					</button>
					<button id="resetBtn" on:click=on_reset>"Reset View"</button>
				</div>
				<StatsPanel stats=stats />
				<NodeDetails record=details />
			</aside>
		</div>
	}
}
