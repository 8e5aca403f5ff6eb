//! Text to knowledge graph through the OpenAI chat completions API.

use log::debug;
use serde_json::json;

use super::prompt::system_message;
use crate::components::force_graph::shaper::shape;
use crate::components::force_graph::{GraphData, RawGraphData};
use crate::config::{CurvaturePolicy, PipelineConfig};
use crate::error::{Error, Result};

/// Chat model bound to the knowledge-graph prompt and output schema.
#[derive(Clone, Debug)]
pub struct KnowledgeGraphPipeline {
	api_key: String,
	config: PipelineConfig,
	curvature: CurvaturePolicy,
	client: reqwest::Client,
}

impl KnowledgeGraphPipeline {
	/// Configure the pipeline; fails only when no key is given.
	pub fn initialize(api_key: &str, config: PipelineConfig, curvature: CurvaturePolicy) -> Result<Self> {
		let api_key = api_key.trim();
		if api_key.is_empty() {
			return Err(Error::MissingApiKey);
		}
		Ok(Self {
			api_key: api_key.to_owned(),
			config,
			curvature,
			client: reqwest::Client::new(),
		})
	}

	pub fn request_body(&self, query: &str) -> serde_json::Value {
		json!({
			"model": self.config.model,
			"temperature": self.config.temperature,
			"messages": [
				{ "role": "system", "content": system_message() },
				{ "role": "user", "content": query },
			],
		})
	}

	/// Ask the model for a graph and parse its reply.
	pub async fn invoke(&self, query: &str) -> Result<RawGraphData> {
		debug!("Generating graph for {} chars of input", query.len());
		let response = self
			.client
			.post(format!("{}/chat/completions", self.config.base_url))
			.header("Authorization", format!("Bearer {}", self.api_key))
			.header("Content-Type", "application/json")
			.json(&self.request_body(query))
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await?;
			return Err(Error::Api {
				status: status.as_u16(),
				body,
			});
		}

		let reply: serde_json::Value = response.json().await?;
		let content = reply["choices"][0]["message"]["content"]
			.as_str()
			.ok_or_else(|| Error::InvalidResponse("missing message content".into()))?;
		parse_graph_output(content)
	}

	/// Invoke the model and shape its output for rendering.
	pub async fn generate_graph(&self, query: &str) -> Result<GraphData> {
		let raw = self.invoke(query).await?;
		Ok(shape(raw, self.curvature, &mut rand::thread_rng()))
	}
}

/// Parse the model's JSON reply, tolerating a Markdown code fence around it.
pub fn parse_graph_output(content: &str) -> Result<RawGraphData> {
	Ok(serde_json::from_str(strip_code_fence(content))?)
}

fn strip_code_fence(content: &str) -> &str {
	let trimmed = content.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	// Drop the info string (`json`) up to the end of the opening fence line.
	let body = rest.split_once('\n').map_or("", |(_, body)| body);
	body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::services::prompt::{FORMAT_INSTRUCTIONS, SYSTEM_PROMPT};

	const ALICE_REPLY: &str = r#"```json
{
  "nodes": [
    {"id": 1, "label": "Alice", "type": "Person"},
    {"id": 2, "label": "Acme Corp", "type": "Organization"}
  ],
  "links": [
    {"source": 1, "target": 2, "type": "works at"}
  ]
}
```"#;

	fn pipeline() -> KnowledgeGraphPipeline {
		KnowledgeGraphPipeline::initialize("sk-test", PipelineConfig::default(), CurvaturePolicy::Straight)
			.unwrap()
	}

	#[test]
	fn empty_key_is_rejected() {
		let err = KnowledgeGraphPipeline::initialize("  ", PipelineConfig::default(), CurvaturePolicy::Straight)
			.unwrap_err();
		assert!(matches!(err, Error::MissingApiKey));
	}

	#[test]
	fn request_carries_prompt_schema_and_query() {
		let body = pipeline().request_body("Alice works at Acme Corp");
		assert_eq!(body["model"], "gpt-3.5-turbo");
		assert_eq!(body["temperature"], 0.0);

		let system = body["messages"][0]["content"].as_str().unwrap();
		assert!(system.starts_with(SYSTEM_PROMPT));
		assert!(system.ends_with(FORMAT_INSTRUCTIONS));
		assert_eq!(body["messages"][0]["role"], "system");
		assert_eq!(body["messages"][1]["role"], "user");
		assert_eq!(body["messages"][1]["content"], "Alice works at Acme Corp");
	}

	#[test]
	fn employment_reply_becomes_linked_graph() {
		let raw = parse_graph_output(ALICE_REPLY).unwrap();
		let graph = shape(raw, CurvaturePolicy::Straight, &mut rand::thread_rng());

		let id_of = |label: &str| graph.nodes.iter().find(|n| n.label == label).map(|n| n.id);
		let (alice, acme) = (id_of("Alice").unwrap(), id_of("Acme Corp").unwrap());
		let link = graph
			.links
			.iter()
			.find(|l| l.source == alice && l.target == acme)
			.unwrap();
		assert!(link.kind.as_deref().is_some_and(|k| k.contains("work")));
		assert_eq!(link.curvature, 0.0);
	}

	#[test]
	fn bare_json_parses() {
		let raw = parse_graph_output(r#"{"nodes":[{"id":1,"label":"A"}],"links":[]}"#).unwrap();
		assert_eq!(raw.nodes.len(), 1);
		assert!(raw.links.is_empty());
	}

	#[test]
	fn fence_without_language_tag_parses() {
		let raw = parse_graph_output("```\n{\"nodes\":[],\"links\":[]}\n```").unwrap();
		assert_eq!(raw, RawGraphData::default());
	}

	#[test]
	fn prose_reply_is_a_json_error() {
		let err = parse_graph_output("Sorry, I cannot help with that.").unwrap_err();
		assert!(matches!(err, Error::Json(_)));
	}
}
