use std::collections::HashMap;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Ordinal colour scale: keys get palette colours in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct ColorScale {
	assigned: HashMap<String, usize>,
}

impl ColorScale {
	pub fn color(&mut self, key: &str) -> &'static str {
		let next = self.assigned.len();
		let slot = *self.assigned.entry(key.to_owned()).or_insert(next);
		COLORS[slot % COLORS.len()]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_key_same_color() {
		let mut scale = ColorScale::default();
		let person = scale.color("Person");
		let org = scale.color("Organization");
		assert_ne!(person, org);
		assert_eq!(scale.color("Person"), person);
		assert_eq!(person, COLORS[0]);
		assert_eq!(org, COLORS[1]);
	}

	#[test]
	fn palette_wraps_around() {
		let mut scale = ColorScale::default();
		for i in 0..COLORS.len() {
			scale.color(&format!("t{i}"));
		}
		assert_eq!(scale.color("overflow"), COLORS[0]);
	}
}
