//! Orbit camera, picking rays and perspective projection.

use glam::{Vec2, Vec3};

pub const FOV_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 2000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
	pub origin: Vec3,
	/// Unit length.
	pub direction: Vec3,
}

impl Ray {
	/// Distance along the ray to the first sphere surface hit, if any.
	pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
		let oc = self.origin - center;
		let b = oc.dot(self.direction);
		let c = oc.length_squared() - radius * radius;
		let disc = b * b - c;
		if disc < 0.0 {
			return None;
		}
		let root = disc.sqrt();
		let near = -b - root;
		if near >= 0.0 {
			return Some(near);
		}
		let far = -b + root;
		(far >= 0.0).then_some(far)
	}
}

/// A world point mapped to canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Distance along the view axis.
	pub depth: f32,
	/// Pixels per world unit at this depth.
	pub scale: f64,
}

/// Camera orbiting the origin. `rotation.x` is pitch, `rotation.y` yaw.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
	pub position: Vec3,
	pub rotation: Vec2,
	pub target_rotation: Vec2,
	pub aspect: f32,
}

impl OrbitCamera {
	pub fn new(position: Vec3, aspect: f32) -> Self {
		Self {
			position,
			rotation: Vec2::ZERO,
			target_rotation: Vec2::ZERO,
			aspect,
		}
	}

	pub fn rotate_by(&mut self, yaw: f32, pitch: f32) {
		self.target_rotation.y += yaw;
		self.target_rotation.x += pitch;
	}

	/// One frame of easing. The damping is applied per call, not per second.
	pub fn step(&mut self, damping: f32) {
		self.rotation += (self.target_rotation - self.rotation) * damping;
		let radius = self.position.length();
		let (pitch, yaw) = (self.rotation.x, self.rotation.y);
		self.position = Vec3::new(
			radius * yaw.sin() * pitch.cos(),
			radius * pitch.sin(),
			radius * yaw.cos() * pitch.cos(),
		);
	}

	/// Scale the distance from the origin; no bounds.
	pub fn zoom(&mut self, factor: f32) {
		self.position *= factor;
	}

	pub fn distance(&self) -> f32 {
		self.position.length()
	}

	/// Forward, right and up unit vectors for a camera looking at the origin.
	pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
		let forward = (-self.position).normalize_or(Vec3::NEG_Z);
		let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
		let up = right.cross(forward);
		(forward, right, up)
	}

	fn half_extent(&self) -> (f32, f32) {
		let tan = (FOV_DEGREES.to_radians() / 2.0).tan();
		(tan * self.aspect, tan)
	}

	/// Ray through a point in normalized device coordinates (`-1..=1`, y up).
	pub fn ray(&self, ndc: Vec2) -> Ray {
		let (forward, right, up) = self.basis();
		let (hx, hy) = self.half_extent();
		let direction = (forward + right * (ndc.x * hx) + up * (ndc.y * hy)).normalize();
		Ray {
			origin: self.position,
			direction,
		}
	}

	/// Map a world point onto a `width` × `height` canvas. `None` when it lies
	/// outside the near/far range.
	pub fn project(&self, point: Vec3, width: f64, height: f64) -> Option<Projected> {
		let (forward, right, up) = self.basis();
		let d = point - self.position;
		let depth = d.dot(forward);
		if !(NEAR..=FAR).contains(&depth) {
			return None;
		}
		let (hx, hy) = self.half_extent();
		let sx = (d.dot(right) / (depth * hx)) as f64;
		let sy = (d.dot(up) / (depth * hy)) as f64;
		Some(Projected {
			x: (sx + 1.0) / 2.0 * width,
			y: (1.0 - sy) / 2.0 * height,
			depth,
			scale: height / 2.0 / (depth * hy) as f64,
		})
	}
}

/// Canvas pixel to normalized device coordinates.
pub fn to_ndc(x: f64, y: f64, width: f64, height: f64) -> Vec2 {
	Vec2::new(
		(x / width * 2.0 - 1.0) as f32,
		(1.0 - y / height * 2.0) as f32,
	)
}
