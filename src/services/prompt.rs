//! Fixed prompt text sent with every generation request.

pub const SYSTEM_PROMPT: &str = "Generate a knowledge graph based on the given information.\n\n\
The output should be in valid JSON format and match the specified schema.\n\n\
Each node must have at least one relation with another node, and the relationships should capture both direct and indirect connections.";

pub const FORMAT_INSTRUCTIONS: &str = "Respond only in valid JSON. The JSON object you return should match the following schema:\n\
{nodes:[{id: \"number\", label: \"string\", type: \"string\"}],links:[{source: \"number\", target: \"number\", type: \"string\"}]}";

/// System message: the prompt followed by the format instructions.
pub fn system_message() -> String {
	format!("{SYSTEM_PROMPT}\n\n{FORMAT_INSTRUCTIONS}")
}
