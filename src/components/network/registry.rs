use std::collections::HashMap;

use super::types::{FilterField, FilterValue, NodeRecord};

/// A registered node: its source record plus the visual flags the
/// controller toggles.
#[derive(Clone, Debug)]
pub struct Node {
	pub record: NodeRecord,
	pub visible: bool,
	pub highlighted: bool,
}

/// Node id to node, iterated in CSV row order.
#[derive(Clone, Debug, Default)]
pub struct NodeRegistry {
	nodes: Vec<Node>,
	id_to_idx: HashMap<String, usize>,
}

impl NodeRegistry {
	/// Register a record. A repeated id replaces the earlier node in its
	/// original slot and returns `false`.
	pub fn insert(&mut self, record: NodeRecord) -> bool {
		let node = Node {
			record,
			visible: true,
			highlighted: false,
		};
		match self.id_to_idx.get(&node.record.id) {
			Some(&idx) => {
				self.nodes[idx] = node;
				false
			}
			None => {
				self.id_to_idx.insert(node.record.id.clone(), self.nodes.len());
				self.nodes.push(node);
				true
			}
		}
	}

	pub fn get(&self, id: &str) -> Option<&Node> {
		self.id_to_idx.get(id).map(|&idx| &self.nodes[idx])
	}

	pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.id_to_idx.get(id).map(|&idx| &mut self.nodes[idx])
	}

	pub fn iter(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.nodes.iter().map(|n| n.record.id.as_str())
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn visible_count(&self) -> usize {
		self.nodes.iter().filter(|n| n.visible).count()
	}

	/// Recompute visibility from a single field predicate.
	pub fn apply_filter(&mut self, field: FilterField, value: &FilterValue) {
		for node in &mut self.nodes {
			node.visible = value.accepts(node.record.field(field));
		}
	}
}
