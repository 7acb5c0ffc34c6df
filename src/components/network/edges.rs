use std::collections::HashMap;

use rand::Rng;

use super::types::{EdgeId, LineStyle};

pub const EDGE_PROBABILITY: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: EdgeId,
	/// Registered before `b`.
	pub a: String,
	pub b: String,
	pub original: LineStyle,
	pub highlighted: bool,
	pub overlay: bool,
	pub visible: bool,
}

impl Edge {
	pub fn touches(&self, node: &str) -> bool {
		self.a == node || self.b == node
	}
}

/// Node id to incident edges, in generation order.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	incident: HashMap<String, Vec<EdgeId>>,
}

impl AdjacencyIndex {
	fn link(&mut self, node: &str, edge: EdgeId) {
		self.incident.entry(node.to_string()).or_default().push(edge);
	}

	pub fn incident(&self, node: &str) -> &[EdgeId] {
		self.incident.get(node).map(Vec::as_slice).unwrap_or(&[])
	}
}

#[derive(Clone, Debug, Default)]
pub struct EdgeSet {
	edges: Vec<Edge>,
}

impl EdgeSet {
	pub fn get_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
		self.edges.get_mut(id.0)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Edge> {
		self.edges.iter()
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
		self.edges.iter_mut()
	}

	pub fn len(&self) -> usize {
		self.edges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.edges.is_empty()
	}

	pub fn visible_count(&self) -> usize {
		self.edges.iter().filter(|e| e.visible).count()
	}
}

/// Sample each unordered pair of `ids` independently with `probability`.
///
/// Pairs are visited as `(i, j)` with `i < j` in the given order, one draw
/// per pair, so a fixed seed reproduces the same set.
pub fn generate_edges<R: Rng + ?Sized>(
	ids: &[&str],
	probability: f64,
	rng: &mut R,
) -> (EdgeSet, AdjacencyIndex) {
	let mut set = EdgeSet::default();
	let mut adjacency = AdjacencyIndex::default();

	for (i, a) in ids.iter().enumerate() {
		for b in &ids[i + 1..] {
			if rng.random::<f64>() >= probability {
				continue;
			}
			let id = EdgeId(set.edges.len());
			set.edges.push(Edge {
				id,
				a: a.to_string(),
				b: b.to_string(),
				original: LineStyle::BASE,
				highlighted: false,
				overlay: false,
				visible: true,
			});
			adjacency.link(a, id);
			adjacency.link(b, id);
		}
	}
	(set, adjacency)
}
