use glam::Vec3;

/// One row of the input CSV.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
	pub id: String,
	pub label: String,
	pub category: String,
	pub kind: String,
	pub description: String,
	pub size: f32,
	pub x: f32,
	pub y: f32,
	pub z: f32,
	/// Unknown columns, in header order.
	pub extra: Vec<(String, String)>,
}

impl NodeRecord {
	pub fn position(&self) -> Vec3 {
		Vec3::new(self.x, self.y, self.z)
	}

	pub fn field(&self, field: FilterField) -> &str {
		match field {
			FilterField::Category => &self.category,
			FilterField::Type => &self.kind,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterField {
	Category,
	Type,
}

/// Either everything passes, or only records whose field equals the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FilterValue {
	#[default]
	All,
	Only(String),
}

impl FilterValue {
	/// `"all"` is the dropdown's catch-all entry.
	pub fn parse(value: &str) -> Self {
		if value == "all" {
			Self::All
		} else {
			Self::Only(value.to_string())
		}
	}

	pub fn accepts(&self, value: &str) -> bool {
		match self {
			Self::All => true,
			Self::Only(v) => v == value,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
	pub category: FilterValue,
	pub kind: FilterValue,
}

impl FilterState {
	pub fn set(&mut self, field: FilterField, value: FilterValue) {
		match field {
			FilterField::Category => self.category = value,
			FilterField::Type => self.kind = value,
		}
	}
}

/// Visible node and edge counters shown next to the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
	pub nodes: usize,
	pub edges: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
	pub color: u32,
	pub opacity: f32,
	pub width: f32,
}

impl LineStyle {
	pub const BASE: Self = Self {
		color: 0x666666,
		opacity: 0.3,
		width: 1.0,
	};
	pub const HIGHLIGHT: Self = Self {
		color: 0xffd166,
		opacity: 0.9,
		width: 1.0,
	};
	pub const OVERLAY: Self = Self {
		color: 0xffd166,
		opacity: 0.6,
		width: 4.0,
	};
}

/// Emissive tint and uniform scale applied to a node sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeHighlight {
	pub emissive: u32,
	pub scale: f32,
}

impl NodeHighlight {
	pub const NONE: Self = Self {
		emissive: 0x000000,
		scale: 1.0,
	};
	pub const SELECTED: Self = Self {
		emissive: 0x444444,
		scale: 1.5,
	};
}
