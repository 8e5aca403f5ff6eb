//! Sequencing for overlapping graph generations.

use std::cell::Cell;
use std::rc::Rc;

/// Tags each generation request; only the most recently issued one may
/// publish its result.
#[derive(Clone, Debug, Default)]
pub struct GenerationTracker {
	latest: Rc<Cell<u64>>,
}

impl GenerationTracker {
	/// Start a new request, superseding any in flight.
	pub fn begin(&self) -> u64 {
		let seq = self.latest.get() + 1;
		self.latest.set(seq);
		seq
	}

	pub fn is_current(&self, seq: u64) -> bool {
		self.latest.get() == seq
	}

	/// Invalidate everything in flight without starting a new request.
	pub fn cancel_all(&self) {
		self.begin();
	}
}
