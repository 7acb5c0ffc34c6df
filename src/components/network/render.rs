use std::collections::HashMap;
use std::f64::consts::PI;

use glam::Vec3;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::camera::{OrbitCamera, Projected, Ray};
use super::palette::{self, css_rgba};
use super::scene::{
	LABEL_HEIGHT, LABEL_OPACITY, LABEL_RASTER, LABEL_WIDTH, NodeVisual, PickResult, SceneHandle,
	nearest_hit,
};
use super::types::{EdgeId, LineStyle, NodeHighlight};

const BACKGROUND: &str = "#05070d";
const FOG_NEAR: f32 = 100.0;
const FOG_FAR: f32 = 1000.0;

struct Sphere {
	visual: NodeVisual,
	center: Vec3,
	highlight: NodeHighlight,
	visible: bool,
	/// Direction the label plane faces.
	facing: Vec3,
	raster: Option<HtmlCanvasElement>,
}

struct Line {
	from: Vec3,
	to: Vec3,
	style: LineStyle,
	visible: bool,
	overlay: Option<LineStyle>,
}

/// Retained primitives drawn onto a 2D canvas with a perspective camera.
#[derive(Default)]
pub struct CanvasScene {
	spheres: Vec<Sphere>,
	id_to_idx: HashMap<String, usize>,
	lines: HashMap<EdgeId, Line>,
}

impl CanvasScene {
	fn sphere_mut(&mut self, id: &str) -> Option<&mut Sphere> {
		self.id_to_idx.get(id).map(|&i| &mut self.spheres[i])
	}
}

impl SceneHandle for CanvasScene {
	fn add_node(&mut self, visual: NodeVisual) {
		let sphere = Sphere {
			center: visual.center,
			visual,
			highlight: NodeHighlight::NONE,
			visible: true,
			facing: Vec3::Z,
			raster: None,
		};
		match self.id_to_idx.get(&sphere.visual.id) {
			Some(&i) => self.spheres[i] = sphere,
			None => {
				self.id_to_idx
					.insert(sphere.visual.id.clone(), self.spheres.len());
				self.spheres.push(sphere);
			}
		}
	}

	fn add_edge(&mut self, id: EdgeId, from: Vec3, to: Vec3, style: LineStyle) {
		self.lines.insert(
			id,
			Line {
				from,
				to,
				style,
				visible: true,
				overlay: None,
			},
		);
	}

	fn set_node_highlight(&mut self, id: &str, highlight: NodeHighlight) {
		if let Some(s) = self.sphere_mut(id) {
			s.highlight = highlight;
		}
	}

	fn set_node_visible(&mut self, id: &str, visible: bool) {
		if let Some(s) = self.sphere_mut(id) {
			s.visible = visible;
		}
	}

	fn set_node_position(&mut self, id: &str, center: Vec3) {
		if let Some(s) = self.sphere_mut(id) {
			s.center = center;
		}
	}

	fn set_edge_style(&mut self, id: EdgeId, style: LineStyle) {
		if let Some(l) = self.lines.get_mut(&id) {
			l.style = style;
		}
	}

	fn set_edge_visible(&mut self, id: EdgeId, visible: bool) {
		if let Some(l) = self.lines.get_mut(&id) {
			l.visible = visible;
		}
	}

	fn add_overlay(&mut self, id: EdgeId, style: LineStyle) {
		if let Some(l) = self.lines.get_mut(&id) {
			l.overlay = Some(style);
		}
	}

	fn remove_overlay(&mut self, id: EdgeId) {
		if let Some(l) = self.lines.get_mut(&id) {
			l.overlay = None;
		}
	}

	fn face_labels(&mut self, eye: Vec3) {
		for s in &mut self.spheres {
			s.facing = (eye - s.visual.label_anchor).normalize_or(Vec3::Z);
		}
	}

	fn pick(&self, ray: &Ray) -> Option<PickResult> {
		nearest_hit(
			ray,
			self.spheres
				.iter()
				.filter(|s| s.visible)
				.map(|s| {
					(
						s.visual.id.as_str(),
						s.center,
						s.visual.radius * s.highlight.scale,
					)
				}),
		)
	}
}

/// Linear fade to the background between the fog distances.
fn fog(depth: f32) -> f64 {
	(1.0 - ((depth - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0)) as f64
}

enum Drawable {
	Sphere(usize),
	Label(usize),
}

pub fn render(
	scene: &mut CanvasScene,
	camera: &OrbitCamera,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	draw_lines(scene, camera, ctx, width, height);

	let mut queue: Vec<(f32, Drawable)> = Vec::new();
	for (i, s) in scene.spheres.iter().enumerate() {
		if !s.visible {
			continue;
		}
		if let Some(p) = camera.project(s.center, width, height) {
			queue.push((p.depth, Drawable::Sphere(i)));
		}
		if let Some(p) = camera.project(s.visual.label_anchor, width, height) {
			queue.push((p.depth, Drawable::Label(i)));
		}
	}
	// far to near
	queue.sort_by(|a, b| b.0.total_cmp(&a.0));

	for (_, item) in queue {
		match item {
			Drawable::Sphere(i) => draw_sphere(&scene.spheres[i], camera, ctx, width, height),
			Drawable::Label(i) => draw_label(&mut scene.spheres[i], camera, ctx, width, height),
		}
	}
}

fn draw_lines(
	scene: &CanvasScene,
	camera: &OrbitCamera,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	ctx.set_line_cap("round");
	for line in scene.lines.values().filter(|l| l.visible) {
		let (Some(a), Some(b)) = (
			camera.project(line.from, width, height),
			camera.project(line.to, width, height),
		) else {
			continue;
		};
		let depth_fog = fog((a.depth + b.depth) / 2.0);
		stroke(ctx, &a, &b, &line.style, depth_fog);
		if let Some(overlay) = &line.overlay {
			stroke(ctx, &a, &b, overlay, depth_fog);
		}
	}
}

fn stroke(ctx: &CanvasRenderingContext2d, a: &Projected, b: &Projected, style: &LineStyle, fog: f64) {
	ctx.set_stroke_style_str(&css_rgba(style.color, style.opacity as f64 * fog));
	ctx.set_line_width(style.width as f64);
	ctx.begin_path();
	ctx.move_to(a.x, a.y);
	ctx.line_to(b.x, b.y);
	ctx.stroke();
}

fn draw_sphere(
	sphere: &Sphere,
	camera: &OrbitCamera,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	let Some(p) = camera.project(sphere.center, width, height) else {
		return;
	};
	let radius = (sphere.visual.radius * sphere.highlight.scale) as f64 * p.scale;
	if radius < 0.25 {
		return;
	}
	let alpha = sphere.visual.opacity as f64 * fog(p.depth);
	let base = palette::add(sphere.visual.color, sphere.highlight.emissive);

	// key light from the upper left
	let (hx, hy) = (p.x - radius * 0.35, p.y - radius * 0.35);
	match ctx.create_radial_gradient(hx, hy, radius * 0.1, p.x, p.y, radius) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &css_rgba(palette::add(base, 0x505050), alpha));
			let _ = gradient.add_color_stop(0.7, &css_rgba(base, alpha));
			let _ = gradient.add_color_stop(1.0, &css_rgba(palette::scale(base, 0.45), alpha));
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&css_rgba(base, alpha)),
	}
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.fill();
}

fn draw_label(
	sphere: &mut Sphere,
	camera: &OrbitCamera,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	let anchor = sphere.visual.label_anchor;
	let right = Vec3::Y.cross(sphere.facing).normalize_or(Vec3::X);
	let up = sphere.facing.cross(right);
	let (hw, hh) = (LABEL_WIDTH / 2.0, LABEL_HEIGHT / 2.0);

	let corners = (
		camera.project(anchor - right * hw + up * hh, width, height),
		camera.project(anchor + right * hw + up * hh, width, height),
		camera.project(anchor - right * hw - up * hh, width, height),
	);
	let (Some(tl), Some(tr), Some(bl)) = corners else {
		return;
	};

	if sphere.raster.is_none() {
		sphere.raster = rasterize_label(&sphere.visual.label);
	}
	let Some(raster) = &sphere.raster else {
		return;
	};

	let (rw, rh) = (LABEL_RASTER.0 as f64, LABEL_RASTER.1 as f64);
	ctx.save();
	ctx.set_global_alpha(LABEL_OPACITY as f64 * fog(tl.depth));
	let _ = ctx.set_transform(
		(tr.x - tl.x) / rw,
		(tr.y - tl.y) / rw,
		(bl.x - tl.x) / rh,
		(bl.y - tl.y) / rh,
		tl.x,
		tl.y,
	);
	let _ = ctx.draw_image_with_html_canvas_element(raster, 0.0, 0.0);
	ctx.restore();
}

/// Offscreen canvas holding the label text; drawn as a textured plane.
fn rasterize_label(text: &str) -> Option<HtmlCanvasElement> {
	let document = web_sys::window()?.document()?;
	let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
	let (w, h) = LABEL_RASTER;
	canvas.set_width(w);
	canvas.set_height(h);

	let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
	ctx.set_fill_style_str("#333");
	ctx.set_font("24px Arial");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(text, w as f64 / 2.0, h as f64 / 2.0 + 8.0);
	Some(canvas)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn visual(id: &str, center: Vec3, radius: f32) -> NodeVisual {
		NodeVisual {
			id: id.into(),
			center,
			radius,
			color: 0x888888,
			opacity: 0.8,
			label: id.into(),
			label_anchor: center + Vec3::Y * 10.0,
		}
	}

	fn ray_down_z() -> Ray {
		Ray {
			origin: Vec3::new(0.0, 0.0, 100.0),
			direction: Vec3::NEG_Z,
		}
	}

	#[test]
	fn test_pick_skips_hidden() {
		let mut scene = CanvasScene::default();
		scene.add_node(visual("front", Vec3::new(0.0, 0.0, 20.0), 2.0));
		scene.add_node(visual("back", Vec3::ZERO, 2.0));
		assert_eq!(scene.pick(&ray_down_z()).unwrap().node_id, "front");

		scene.set_node_visible("front", false);
		assert_eq!(scene.pick(&ray_down_z()).unwrap().node_id, "back");
	}

	#[test]
	fn test_pick_uses_current_position_and_scale() {
		let mut scene = CanvasScene::default();
		scene.add_node(visual("a", Vec3::new(2.5, 0.0, 0.0), 2.0));
		assert!(scene.pick(&ray_down_z()).is_none());

		scene.set_node_highlight("a", NodeHighlight::SELECTED);
		assert!(scene.pick(&ray_down_z()).is_some());

		scene.set_node_highlight("a", NodeHighlight::NONE);
		scene.set_node_position("a", Vec3::ZERO);
		assert!(scene.pick(&ray_down_z()).is_some());
	}

	#[test]
	fn test_face_labels() {
		let mut scene = CanvasScene::default();
		scene.add_node(visual("a", Vec3::ZERO, 1.0));
		scene.face_labels(Vec3::new(0.0, 10.0, 50.0));
		assert!((scene.spheres[0].facing - Vec3::Z).length() < 1e-5);
	}

	#[test]
	fn test_overlay_toggle() {
		let mut scene = CanvasScene::default();
		scene.add_edge(EdgeId(0), Vec3::ZERO, Vec3::X, LineStyle::BASE);
		scene.add_overlay(EdgeId(0), LineStyle::OVERLAY);
		assert_eq!(scene.lines[&EdgeId(0)].overlay, Some(LineStyle::OVERLAY));
		scene.remove_overlay(EdgeId(0));
		assert_eq!(scene.lines[&EdgeId(0)].overlay, None);
	}

	#[test]
	fn test_fog() {
		assert_eq!(fog(50.0), 1.0);
		assert_eq!(fog(1000.0), 0.0);
		assert!((fog(550.0) - 0.5).abs() < 1e-6);
	}
}
