use glam::Vec3;
use log::{debug, info, warn};
use rand::Rng;

use super::camera::{OrbitCamera, to_ndc};
use super::config::NetworkConfig;
use super::edges::{AdjacencyIndex, EdgeSet, generate_edges};
use super::registry::NodeRegistry;
use super::scene::{SceneHandle, build_scene};
use super::types::{FilterField, FilterState, FilterValue, LineStyle, NodeHighlight, NodeRecord, Stats};

pub const MIN_SPEED: f32 = 0.0;
pub const MAX_SPEED: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	Idle,
	Dragging,
	NodeSelected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
	Pointer,
	Grab,
}

impl Cursor {
	pub fn css(self) -> &'static str {
		match self {
			Cursor::Pointer => "pointer",
			Cursor::Grab => "grab",
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub last_x: f64,
	pub last_y: f64,
}

#[derive(Clone, Debug)]
pub struct AnimationState {
	pub speed: f32,
	pub paused: bool,
}

impl Default for AnimationState {
	fn default() -> Self {
		Self {
			speed: 1.0,
			paused: false,
		}
	}
}

/// Everything the viewer mutates, owned in one place. The scene backend is
/// only told about changes; the registry and edge set stay the source of
/// truth for counts and selection.
pub struct NetworkState<S: SceneHandle> {
	pub config: NetworkConfig,
	pub scene: S,
	pub registry: NodeRegistry,
	pub edges: EdgeSet,
	adjacency: AdjacencyIndex,
	selected: Option<String>,
	pub filter: FilterState,
	pub camera: OrbitCamera,
	pub drag: DragState,
	pub animation: AnimationState,
	pub width: f64,
	pub height: f64,
}

impl<S: SceneHandle> NetworkState<S> {
	pub fn new<R: Rng + ?Sized>(
		records: Vec<NodeRecord>,
		config: NetworkConfig,
		mut scene: S,
		rng: &mut R,
		width: f64,
		height: f64,
	) -> Self {
		let mut registry = NodeRegistry::default();
		for record in records {
			let id = record.id.clone();
			if !registry.insert(record) {
				warn!("duplicate node id {:?}, keeping the later row", id);
			}
		}

		let ids: Vec<&str> = registry.ids().collect();
		let (edges, adjacency) = generate_edges(&ids, config.edge_probability, rng);
		build_scene(&mut scene, &registry, &edges);
		info!("network built: {} nodes, {} edges", registry.len(), edges.len());

		let camera = OrbitCamera::new(config.camera_start, aspect(width, height));
		Self {
			config,
			scene,
			registry,
			edges,
			adjacency,
			selected: None,
			filter: FilterState::default(),
			camera,
			drag: DragState::default(),
			animation: AnimationState::default(),
			width,
			height,
		}
	}

	pub fn mode(&self) -> Mode {
		if self.drag.active {
			Mode::Dragging
		} else if self.selected.is_some() {
			Mode::NodeSelected
		} else {
			Mode::Idle
		}
	}

	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	pub fn selected_record(&self) -> Option<&NodeRecord> {
		self.selected
			.as_deref()
			.and_then(|id| self.registry.get(id))
			.map(|n| &n.record)
	}

	pub fn stats(&self) -> Stats {
		Stats {
			nodes: self.registry.visible_count(),
			edges: self.edges.visible_count(),
		}
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.drag = DragState {
			active: true,
			last_x: x,
			last_y: y,
		};
	}

	pub fn pointer_up(&mut self) {
		self.drag.active = false;
	}

	/// Orbit while dragging, otherwise hover-select whatever is under the
	/// pointer. Returns the cursor to show, or `None` to leave it alone.
	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Cursor> {
		if self.drag.active {
			let (dx, dy) = (x - self.drag.last_x, y - self.drag.last_y);
			let k = self.config.drag_sensitivity;
			self.camera.rotate_by(dx as f32 * k, dy as f32 * k);
			self.drag.last_x = x;
			self.drag.last_y = y;
			return None;
		}

		let ray = self.camera.ray(to_ndc(x, y, self.width, self.height));
		match self.scene.pick(&ray) {
			Some(hit) => {
				self.select_node(&hit.node_id);
				Some(Cursor::Pointer)
			}
			None => {
				self.deselect();
				Some(Cursor::Grab)
			}
		}
	}

	/// Positive `delta_y` (scrolling down) zooms out.
	pub fn wheel(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			self.config.zoom_out
		} else {
			self.config.zoom_in
		};
		self.camera.zoom(factor);
	}

	/// Highlight `id` and its incident edges, clearing any previous
	/// selection first. Unknown ids are ignored.
	pub fn select_node(&mut self, id: &str) {
		if self.selected.as_deref() == Some(id) || self.registry.get(id).is_none() {
			return;
		}
		self.deselect();
		debug!("select {:?}", id);

		if let Some(node) = self.registry.get_mut(id) {
			node.highlighted = true;
		}
		self.scene.set_node_highlight(id, NodeHighlight::SELECTED);

		for &edge_id in self.adjacency.incident(id) {
			let Some(edge) = self.edges.get_mut(edge_id) else {
				continue;
			};
			edge.highlighted = true;
			self.scene.set_edge_style(edge_id, LineStyle::HIGHLIGHT);
			if !edge.overlay {
				edge.overlay = true;
				self.scene.add_overlay(edge_id, LineStyle::OVERLAY);
			}
		}
		self.selected = Some(id.to_string());
	}

	/// Undo every effect of the current selection.
	pub fn deselect(&mut self) {
		let Some(id) = self.selected.take() else {
			return;
		};
		debug!("deselect {:?}", id);

		if let Some(node) = self.registry.get_mut(&id) {
			node.highlighted = false;
		}
		self.scene.set_node_highlight(&id, NodeHighlight::NONE);

		for &edge_id in self.adjacency.incident(&id) {
			let Some(edge) = self.edges.get_mut(edge_id) else {
				continue;
			};
			edge.highlighted = false;
			self.scene.set_edge_style(edge_id, edge.original);
			if edge.overlay {
				edge.overlay = false;
				self.scene.remove_overlay(edge_id);
			}
		}
	}

	/// Show only nodes whose `field` equals `value` (`"all"` shows every
	/// node). Edges are left visible whatever their endpoints do.
	pub fn filter_nodes(&mut self, field: FilterField, value: &str) -> Stats {
		let value = FilterValue::parse(value);
		self.registry.apply_filter(field, &value);
		for node in self.registry.iter() {
			self.scene.set_node_visible(&node.record.id, node.visible);
		}
		for edge in self.edges.iter_mut() {
			edge.visible = true;
			self.scene.set_edge_visible(edge.id, true);
		}
		self.filter.set(field, value);

		let stats = self.stats();
		debug!("filter {:?}: {} nodes, {} edges", field, stats.nodes, stats.edges);
		stats
	}

	/// Put the camera back at its start position and drop the selection.
	/// Orbit angles are kept.
	pub fn reset_view(&mut self) -> Stats {
		self.camera.position = self.config.camera_start;
		self.deselect();
		self.stats()
	}

	pub fn set_speed(&mut self, speed: f32) {
		self.animation.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
	}

	pub fn toggle_pause(&mut self) -> bool {
		self.animation.paused = !self.animation.paused;
		self.animation.paused
	}

	/// One animation frame at wall-clock time `now` (seconds).
	pub fn tick(&mut self, now: f64) {
		let speed = self.animation.speed;
		if !self.animation.paused {
			self.camera.target_rotation.y += self.config.auto_rotate * speed;
		}
		self.camera.step(self.config.damping);

		if !self.animation.paused {
			let time = now * speed as f64;
			for node in self.registry.iter() {
				let phase = leading_int(&node.record.id) as f64 * 0.1;
				let offset = (time + phase).sin() as f32 * self.config.float_amplitude;
				self.scene
					.set_node_position(&node.record.id, node.record.position() + Vec3::Y * offset);
			}
		}
		self.scene.face_labels(self.camera.position);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.camera.aspect = aspect(width, height);
	}
}

fn aspect(width: f64, height: f64) -> f32 {
	if height > 0.0 {
		(width / height) as f32
	} else {
		1.0
	}
}

/// Integer prefix of an id (`"12b"` is 12); 0 when there is none.
fn leading_int(id: &str) -> i64 {
	let s = id.trim_start();
	let (sign, digits) = match s.as_bytes().first() {
		Some(b'-') => (-1, &s[1..]),
		Some(b'+') => (1, &s[1..]),
		_ => (1, s),
	};
	let end = digits
		.find(|c: char| !c.is_ascii_digit())
		.unwrap_or(digits.len());
	digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use std::collections::{HashMap, HashSet};

	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::network::camera::Ray;
	use crate::components::network::csv::parse_records;
	use crate::components::network::scene::{NodeVisual, PickResult};
	use crate::components::network::types::EdgeId;

	#[derive(Default)]
	struct RecordingScene {
		nodes: Vec<NodeVisual>,
		highlights: HashMap<String, NodeHighlight>,
		hidden: HashSet<String>,
		positions: HashMap<String, Vec3>,
		edge_styles: HashMap<EdgeId, LineStyle>,
		overlays: HashMap<EdgeId, usize>,
		hidden_edges: HashSet<EdgeId>,
		eye: Option<Vec3>,
		next_pick: Option<String>,
	}

	impl SceneHandle for RecordingScene {
		fn add_node(&mut self, visual: NodeVisual) {
			self.nodes.push(visual);
		}

		fn add_edge(&mut self, id: EdgeId, _from: Vec3, _to: Vec3, style: LineStyle) {
			self.edge_styles.insert(id, style);
		}

		fn set_node_highlight(&mut self, id: &str, highlight: NodeHighlight) {
			self.highlights.insert(id.to_string(), highlight);
		}

		fn set_node_visible(&mut self, id: &str, visible: bool) {
			if visible {
				self.hidden.remove(id);
			} else {
				self.hidden.insert(id.to_string());
			}
		}

		fn set_node_position(&mut self, id: &str, center: Vec3) {
			self.positions.insert(id.to_string(), center);
		}

		fn set_edge_style(&mut self, id: EdgeId, style: LineStyle) {
			self.edge_styles.insert(id, style);
		}

		fn set_edge_visible(&mut self, id: EdgeId, visible: bool) {
			if visible {
				self.hidden_edges.remove(&id);
			} else {
				self.hidden_edges.insert(id);
			}
		}

		fn add_overlay(&mut self, id: EdgeId, _style: LineStyle) {
			*self.overlays.entry(id).or_default() += 1;
		}

		fn remove_overlay(&mut self, id: EdgeId) {
			if let Some(n) = self.overlays.get_mut(&id) {
				*n -= 1;
				if *n == 0 {
					self.overlays.remove(&id);
				}
			}
		}

		fn face_labels(&mut self, eye: Vec3) {
			self.eye = Some(eye);
		}

		fn pick(&self, _ray: &Ray) -> Option<PickResult> {
			self.next_pick.clone().map(|node_id| PickResult {
				node_id,
				distance: 1.0,
			})
		}
	}

	const CSV: &str = "id,label,category,type,description,size,x,y,z\n\
		1,One,Human Actors,entity,first,5,0,0,0\n\
		2,Two,Tensions,tension,second,8,10,0,0\n\
		3,Three,Human Actors,concept,third,4,0,10,0\n\
		4,Four,Gamification,entity,fourth,6,0,0,10\n";

	fn state_with(probability: f64) -> NetworkState<RecordingScene> {
		let config = NetworkConfig {
			edge_probability: probability,
			..NetworkConfig::default()
		};
		NetworkState::new(
			parse_records(CSV, config.spread),
			config,
			RecordingScene::default(),
			&mut StdRng::seed_from_u64(9),
			800.0,
			600.0,
		)
	}

	fn incident(state: &NetworkState<RecordingScene>, id: &str) -> Vec<EdgeId> {
		state.adjacency.incident(id).to_vec()
	}

	#[test]
	fn test_load_builds_scene() {
		let state = state_with(1.0);
		assert_eq!(state.scene.nodes.len(), 4);
		assert_eq!(state.edges.len(), 6);
		assert_eq!(state.stats(), Stats { nodes: 4, edges: 6 });
		assert_eq!(state.mode(), Mode::Idle);
	}

	#[test]
	fn test_example_two_nodes() {
		let text = "id,label,category,type,description,size,x,y,z\n\
			A,Alpha,Human Actors,entity,desc,5,0,0,0\n\
			B,Beta,Tensions,tension,desc,8,10,0,0";
		let state = NetworkState::new(
			parse_records(text, 1.0),
			NetworkConfig::default(),
			RecordingScene::default(),
			&mut StdRng::seed_from_u64(5),
			800.0,
			600.0,
		);
		assert_eq!(state.stats().nodes, 2);
		assert!(state.stats().edges <= 1);
	}

	#[test]
	fn test_select_highlights_node_and_edges() {
		let mut state = state_with(1.0);
		state.select_node("1");

		assert_eq!(state.selected(), Some("1"));
		assert_eq!(state.mode(), Mode::NodeSelected);
		assert_eq!(state.scene.highlights["1"], NodeHighlight::SELECTED);
		assert!(state.registry.get("1").unwrap().highlighted);
		for id in incident(&state, "1") {
			assert_eq!(state.scene.edge_styles[&id], LineStyle::HIGHLIGHT);
			assert_eq!(state.scene.overlays[&id], 1);
		}
		assert_eq!(state.scene.overlays.len(), 3);
		assert_eq!(state.selected_record().unwrap().label, "One");
	}

	#[test]
	fn test_second_selection_clears_first() {
		let mut state = state_with(1.0);
		state.select_node("1");
		state.select_node("2");

		assert_eq!(state.selected(), Some("2"));
		assert_eq!(state.scene.highlights["1"], NodeHighlight::NONE);
		assert!(!state.registry.get("1").unwrap().highlighted);

		let current: HashSet<EdgeId> = incident(&state, "2").into_iter().collect();
		for edge in state.edges.iter() {
			let expected = if current.contains(&edge.id) {
				LineStyle::HIGHLIGHT
			} else {
				LineStyle::BASE
			};
			assert_eq!(state.scene.edge_styles[&edge.id], expected);
			assert_eq!(edge.highlighted, current.contains(&edge.id));
			assert_eq!(state.scene.overlays.get(&edge.id).copied(), current.contains(&edge.id).then_some(1));
		}
	}

	#[test]
	fn test_reselect_same_node_is_noop() {
		let mut state = state_with(1.0);
		state.select_node("3");
		state.select_node("3");
		for id in incident(&state, "3") {
			assert_eq!(state.scene.overlays[&id], 1);
		}
	}

	#[test]
	fn test_deselect_restores_everything() {
		let mut state = state_with(1.0);
		state.select_node("4");
		state.deselect();

		assert_eq!(state.selected(), None);
		assert_eq!(state.mode(), Mode::Idle);
		assert_eq!(state.scene.highlights["4"], NodeHighlight::NONE);
		assert!(state.scene.overlays.is_empty());
		for edge in state.edges.iter() {
			assert_eq!(state.scene.edge_styles[&edge.id], edge.original);
			assert!(!edge.overlay);
		}
	}

	#[test]
	fn test_select_unknown_keeps_selection() {
		let mut state = state_with(1.0);
		state.select_node("1");
		state.select_node("missing");
		assert_eq!(state.selected(), Some("1"));
	}

	#[test]
	fn test_hover_selects_and_empty_space_deselects() {
		let mut state = state_with(1.0);
		state.scene.next_pick = Some("2".into());
		assert_eq!(state.pointer_move(400.0, 300.0), Some(Cursor::Pointer));
		assert_eq!(state.selected(), Some("2"));

		state.scene.next_pick = None;
		assert_eq!(state.pointer_move(10.0, 10.0), Some(Cursor::Grab));
		assert_eq!(state.selected(), None);
		assert!(state.scene.overlays.is_empty());
	}

	#[test]
	fn test_drag_orbits_without_picking() {
		let mut state = state_with(0.0);
		state.scene.next_pick = Some("1".into());
		state.pointer_down(100.0, 100.0);
		assert_eq!(state.mode(), Mode::Dragging);
		assert_eq!(state.pointer_move(150.0, 80.0), None);
		assert_eq!(state.selected(), None);
		assert!((state.camera.target_rotation.y - 0.5).abs() < 1e-5);
		assert!((state.camera.target_rotation.x + 0.2).abs() < 1e-5);

		state.pointer_move(160.0, 80.0);
		assert!((state.camera.target_rotation.y - 0.6).abs() < 1e-5);

		state.pointer_up();
		assert_eq!(state.mode(), Mode::Idle);
	}

	#[test]
	fn test_wheel_scales_distance() {
		let mut state = state_with(0.0);
		let start = state.camera.distance();
		state.wheel(120.0);
		assert!((state.camera.distance() - start * 1.1).abs() < 1e-3);
		state.wheel(-120.0);
		assert!((state.camera.distance() - start * 1.1 * 0.9).abs() < 1e-3);
	}

	#[test]
	fn test_filter_hides_nodes_keeps_edges() {
		let mut state = state_with(1.0);
		let stats = state.filter_nodes(FilterField::Category, "Human Actors");
		assert_eq!(stats, Stats { nodes: 2, edges: 6 });
		assert_eq!(
			state.scene.hidden,
			HashSet::from(["2".to_string(), "4".to_string()])
		);
		assert!(state.scene.hidden_edges.is_empty());
		assert_eq!(state.filter.category, FilterValue::Only("Human Actors".into()));

		let stats = state.filter_nodes(FilterField::Category, "all");
		assert_eq!(stats, Stats { nodes: 4, edges: 6 });
		assert!(state.scene.hidden.is_empty());
	}

	#[test]
	fn test_latest_filter_decides_visibility() {
		let mut state = state_with(0.0);
		state.filter_nodes(FilterField::Category, "Human Actors");
		let stats = state.filter_nodes(FilterField::Type, "entity");
		// node 4 is Gamification but an entity, so it shows again
		assert_eq!(stats.nodes, 2);
		assert!(state.registry.get("4").unwrap().visible);
		assert!(!state.registry.get("3").unwrap().visible);
		assert_eq!(state.filter.category, FilterValue::Only("Human Actors".into()));
		assert_eq!(state.filter.kind, FilterValue::Only("entity".into()));
	}

	#[test]
	fn test_reset_view() {
		let mut state = state_with(1.0);
		state.wheel(1.0);
		state.select_node("1");
		state.camera.rotate_by(1.0, 0.5);
		let target = state.camera.target_rotation;

		let stats = state.reset_view();
		assert_eq!(state.camera.position, Vec3::splat(100.0));
		assert_eq!(state.camera.target_rotation, target);
		assert_eq!(state.selected(), None);
		assert!(state.scene.overlays.is_empty());
		assert_eq!(stats, Stats { nodes: 4, edges: 6 });
	}

	#[test]
	fn test_tick_rotates_floats_and_faces_labels() {
		let mut state = state_with(0.0);
		state.tick(0.0);
		assert!((state.camera.target_rotation.y - 0.005).abs() < 1e-6);
		assert_eq!(state.scene.eye, Some(state.camera.position));
		// id "2" has phase 0.2 at t = 0
		let y = state.scene.positions["2"].y;
		assert!((y - (0.2f32).sin() * 2.0).abs() < 1e-5);
	}

	#[test]
	fn test_paused_tick_only_eases() {
		let mut state = state_with(0.0);
		state.toggle_pause();
		state.camera.rotate_by(1.0, 0.0);
		state.tick(10.0);
		assert!((state.camera.target_rotation.y - 1.0).abs() < 1e-6);
		assert!((state.camera.rotation.y - 0.05).abs() < 1e-6);
		assert!(state.scene.positions.is_empty());
		assert!(state.scene.eye.is_some());
	}

	#[test]
	fn test_speed_scales_auto_rotation() {
		let mut state = state_with(0.0);
		state.set_speed(5.0);
		assert_eq!(state.animation.speed, MAX_SPEED);
		state.tick(0.0);
		assert!((state.camera.target_rotation.y - 0.01).abs() < 1e-6);
	}

	#[test]
	fn test_leading_int() {
		assert_eq!(leading_int("12"), 12);
		assert_eq!(leading_int("7abc"), 7);
		assert_eq!(leading_int("-3"), -3);
		assert_eq!(leading_int("node"), 0);
		assert_eq!(leading_int(""), 0);
	}
}
