use super::types::NodeRecord;

pub const FALLBACK_COLOR: u32 = 0x888888;

pub const CATEGORY_COLORS: &[(&str, u32)] = &[
	("Human Actors", 0xFF6B6B),
	("Non-Human Entities", 0x4ECDC4),
	("Ethics of Care", 0xFF9FF3),
	("Gamification", 0xA9DFBF),
	("Environmental Impact", 0xFAD7A0),
	("Relational Dynamics", 0xF9E79F),
	("Tensions", 0xFADBD8),
	("Emergent Properties", 0xE74C3C),
];

pub const TYPE_COLORS: &[(&str, u32)] = &[
	("entity", 0x5DADE2),
	("actor", 0xF1948A),
	("concept", 0xBB8FCE),
	("practice", 0x82E0AA),
	("tension", 0xF5B041),
	("property", 0xEC7063),
];

fn lookup(table: &[(&str, u32)], key: &str) -> Option<u32> {
	table.iter().find(|(k, _)| *k == key).map(|&(_, c)| c)
}

/// Type wins over category; unknown on both is gray.
pub fn node_color(record: &NodeRecord) -> u32 {
	lookup(TYPE_COLORS, &record.kind)
		.or_else(|| lookup(CATEGORY_COLORS, &record.category))
		.unwrap_or(FALLBACK_COLOR)
}

pub fn categories() -> impl Iterator<Item = &'static str> {
	CATEGORY_COLORS.iter().map(|&(k, _)| k)
}

pub fn types() -> impl Iterator<Item = &'static str> {
	TYPE_COLORS.iter().map(|&(k, _)| k)
}

/// `#rrggbb` channels as floats in `0..=255`.
pub fn channels(color: u32) -> [f64; 3] {
	[
		((color >> 16) & 0xff) as f64,
		((color >> 8) & 0xff) as f64,
		(color & 0xff) as f64,
	]
}

/// Additive blend, saturating per channel.
pub fn add(color: u32, emissive: u32) -> u32 {
	let mut out = 0;
	for shift in [16, 8, 0] {
		let c = ((color >> shift) & 0xff) + ((emissive >> shift) & 0xff);
		out |= c.min(0xff) << shift;
	}
	out
}

pub fn scale(color: u32, factor: f64) -> u32 {
	let [r, g, b] = channels(color);
	let f = |c: f64| (c * factor).round().clamp(0.0, 255.0) as u32;
	(f(r) << 16) | (f(g) << 8) | f(b)
}

pub fn css_rgba(color: u32, alpha: f64) -> String {
	let [r, g, b] = channels(color);
	format!("rgba({}, {}, {}, {})", r, g, b, alpha.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(category: &str, kind: &str) -> NodeRecord {
		NodeRecord {
			id: "n".into(),
			label: "n".into(),
			category: category.into(),
			kind: kind.into(),
			description: String::new(),
			size: 5.0,
			x: 0.0,
			y: 0.0,
			z: 0.0,
			extra: Vec::new(),
		}
	}

	#[test]
	fn test_type_takes_precedence() {
		assert_eq!(node_color(&record("Human Actors", "tension")), 0xF5B041);
	}

	#[test]
	fn test_category_then_fallback() {
		assert_eq!(node_color(&record("Human Actors", "unknown")), 0xFF6B6B);
		assert_eq!(node_color(&record("Nope", "unknown")), FALLBACK_COLOR);
	}

	#[test]
	fn test_add_saturates() {
		assert_eq!(add(0xFF6B6B, 0x444444), 0xFFAFAF);
		assert_eq!(add(0x123456, 0x000000), 0x123456);
	}

	#[test]
	fn test_css_rgba() {
		assert_eq!(css_rgba(0x666666, 0.3), "rgba(102, 102, 102, 0.3)");
	}
}
