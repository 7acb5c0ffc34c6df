use glam::Vec3;

use super::edges::EDGE_PROBABILITY;

/// Tunables for the viewer. `Default` matches the shipped page.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
	pub csv_url: String,
	/// Multiplier applied to CSV positions.
	pub spread: f32,
	pub edge_probability: f64,
	/// Fixed seed for edge sampling; random per load when `None`.
	pub seed: Option<u64>,
	pub camera_start: Vec3,
	/// Fraction of the remaining angle covered per frame.
	pub damping: f32,
	/// Radians per pixel of drag.
	pub drag_sensitivity: f32,
	/// Radians of yaw per frame at speed 1.
	pub auto_rotate: f32,
	pub zoom_out: f32,
	pub zoom_in: f32,
	/// Vertical amplitude of the idle float, in world units.
	pub float_amplitude: f32,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			csv_url: "ontology-data.csv".into(),
			spread: 1.0,
			edge_probability: EDGE_PROBABILITY,
			seed: None,
			camera_start: Vec3::splat(100.0),
			damping: 0.05,
			drag_sensitivity: 0.01,
			auto_rotate: 0.005,
			zoom_out: 1.1,
			zoom_in: 0.9,
			float_amplitude: 2.0,
		}
	}
}
