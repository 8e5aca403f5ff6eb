use rand::Rng;

use super::types::{GraphData, GraphLink, RawGraphData};
use crate::config::CurvaturePolicy;

/// Turn parsed model output into renderable graph data.
///
/// Nodes pass through untouched; every link gains a `curvature` from `policy`.
/// No validation happens here, dangling link endpoints are left for the
/// renderer to ignore.
pub fn shape<R: Rng + ?Sized>(raw: RawGraphData, policy: CurvaturePolicy, rng: &mut R) -> GraphData {
	let links = raw
		.links
		.into_iter()
		.map(|link| GraphLink {
			source: link.source,
			target: link.target,
			kind: link.kind,
			curvature: policy.curvature(rng),
		})
		.collect();

	GraphData {
		nodes: raw.nodes,
		links,
	}
}
