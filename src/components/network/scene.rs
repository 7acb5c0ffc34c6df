//! Capability interface between the controller and whatever draws the scene.

use glam::Vec3;

use super::camera::Ray;
use super::edges::EdgeSet;
use super::palette;
use super::registry::NodeRegistry;
use super::types::{EdgeId, LineStyle, NodeHighlight, NodeRecord};

pub const NODE_OPACITY: f32 = 0.8;
pub const LABEL_OPACITY: f32 = 0.8;
/// Label plane size in world units.
pub const LABEL_WIDTH: f32 = 20.0;
pub const LABEL_HEIGHT: f32 = 4.0;
/// Offscreen raster size in pixels.
pub const LABEL_RASTER: (u32, u32) = (512, 128);
pub const LABEL_GAP: f32 = 5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	pub id: String,
	pub center: Vec3,
	pub radius: f32,
	pub color: u32,
	pub opacity: f32,
	pub label: String,
	pub label_anchor: Vec3,
}

impl NodeVisual {
	pub fn from_record(record: &NodeRecord) -> Self {
		let center = record.position();
		Self {
			id: record.id.clone(),
			center,
			radius: record.size / 2.0,
			color: palette::node_color(record),
			opacity: NODE_OPACITY,
			label: record.label.clone(),
			label_anchor: center + Vec3::Y * (record.size + LABEL_GAP),
		}
	}
}

/// Nearest node under a picking ray.
#[derive(Clone, Debug, PartialEq)]
pub struct PickResult {
	pub node_id: String,
	pub distance: f32,
}

pub trait SceneHandle {
	fn add_node(&mut self, visual: NodeVisual);
	fn add_edge(&mut self, id: EdgeId, from: Vec3, to: Vec3, style: LineStyle);

	fn set_node_highlight(&mut self, id: &str, highlight: NodeHighlight);
	fn set_node_visible(&mut self, id: &str, visible: bool);
	fn set_node_position(&mut self, id: &str, center: Vec3);

	fn set_edge_style(&mut self, id: EdgeId, style: LineStyle);
	fn set_edge_visible(&mut self, id: EdgeId, visible: bool);
	/// Draw a second, thicker line over the edge.
	fn add_overlay(&mut self, id: EdgeId, style: LineStyle);
	fn remove_overlay(&mut self, id: EdgeId);

	/// Turn every label plane toward `eye`.
	fn face_labels(&mut self, eye: Vec3);

	fn pick(&self, ray: &Ray) -> Option<PickResult>;
}

/// Emit one node per registry entry, then one line per edge between the
/// endpoints' initial positions.
pub fn build_scene<S: SceneHandle>(scene: &mut S, registry: &NodeRegistry, edges: &EdgeSet) {
	for node in registry.iter() {
		scene.add_node(NodeVisual::from_record(&node.record));
	}
	for edge in edges.iter() {
		let (Some(a), Some(b)) = (registry.get(&edge.a), registry.get(&edge.b)) else {
			continue;
		};
		scene.add_edge(
			edge.id,
			a.record.position(),
			b.record.position(),
			edge.original,
		);
	}
}

/// Nearest visible sphere along `ray`; shared by backends that keep their
/// own sphere list.
pub fn nearest_hit<'a, I>(ray: &Ray, spheres: I) -> Option<PickResult>
where
	I: IntoIterator<Item = (&'a str, Vec3, f32)>,
{
	spheres
		.into_iter()
		.filter_map(|(id, center, radius)| {
			ray.intersect_sphere(center, radius).map(|t| (id, t))
		})
		.min_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(id, distance)| PickResult {
			node_id: id.to_string(),
			distance,
		})
}
