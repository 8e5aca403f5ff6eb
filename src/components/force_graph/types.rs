use serde::{Deserialize, Deserializer, Serialize};

/// Node identifier as emitted by the model.
pub type NodeId = i64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	#[serde(deserialize_with = "numeric_id")]
	pub id: NodeId,
	pub label: String,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
}

/// A link as parsed from the model, before shaping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawLink {
	#[serde(deserialize_with = "numeric_id")]
	pub source: NodeId,
	#[serde(deserialize_with = "numeric_id")]
	pub target: NodeId,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphLink {
	pub source: NodeId,
	pub target: NodeId,
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	pub curvature: f64,
}

/// Parsed model output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<RawLink>,
}

/// Renderable graph: nodes plus shaped links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

/// A node as seen by the painters, extended with engine-injected state.
#[derive(Clone, Debug, Default)]
pub struct NodeObject {
	pub id: NodeId,
	pub label: String,
	pub kind: Option<String>,
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub color: String,
	/// Background box `[width, height]` from the last node paint, reused for hit regions.
	pub bckg_dimensions: Option<[f64; 2]>,
}

impl NodeObject {
	pub fn new(node: &GraphNode, color: impl Into<String>) -> Self {
		Self {
			id: node.id,
			label: node.label.clone(),
			kind: node.kind.clone(),
			x: None,
			y: None,
			color: color.into(),
			bckg_dimensions: None,
		}
	}
}

/// A link endpoint: an id until the simulation resolves it to a position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkEndpoint {
	Unresolved(NodeId),
	Positioned { x: f64, y: f64 },
}

impl LinkEndpoint {
	pub fn position(&self) -> Option<(f64, f64)> {
		match *self {
			Self::Positioned { x, y } => Some((x, y)),
			Self::Unresolved(_) => None,
		}
	}
}

#[derive(Clone, Debug)]
pub struct LinkObject {
	pub source: LinkEndpoint,
	pub target: LinkEndpoint,
	pub kind: Option<String>,
	pub curvature: f64,
	pub color: String,
}

/// Accept `3` as well as `"3"`; models are not always strict about the schema.
fn numeric_id<'de, D>(deserializer: D) -> Result<NodeId, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Id {
		Int(i64),
		Float(f64),
		Text(String),
	}

	match Id::deserialize(deserializer)? {
		Id::Int(n) => Ok(n),
		Id::Float(f) if f.fract() == 0.0 => Ok(f as i64),
		Id::Float(f) => Err(serde::de::Error::custom(format!("non-integer id {f}"))),
		Id::Text(s) => s
			.trim()
			.parse()
			.map_err(|_| serde::de::Error::custom(format!("non-numeric id {s:?}"))),
	}
}
