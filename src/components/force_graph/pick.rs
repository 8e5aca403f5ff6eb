//! Pick-buffer colour encoding: every node gets a unique opaque colour.
//!
//! The low [`CHECKSUM_BITS`] of each colour are a hash of the slot number, so
//! anti-aliased edge pixels (a blend of two slot colours) are rejected instead
//! of decoding to an unrelated node.

const CHECKSUM_BITS: u32 = 6;
const CHECKSUM_MASK: u32 = (1 << CHECKSUM_BITS) - 1;

fn checksum(n: u32) -> u32 {
	let mut h = n.wrapping_mul(0x9e37_79b1);
	h ^= h >> 15;
	h = h.wrapping_mul(0x85eb_ca77);
	h ^= h >> 13;
	h & CHECKSUM_MASK
}

/// Colour for pick slot `index`; black is reserved for "nothing".
pub fn slot_color(index: usize) -> String {
	let n = (index + 1) as u32;
	format!("#{:06x}", ((n << CHECKSUM_BITS) | checksum(n)) & 0x00ff_ffff)
}

/// Slot under a sampled RGBA pixel, if any. Translucent pixels and colours
/// whose checksum does not match miss.
pub fn slot_at(rgba: &[u8]) -> Option<usize> {
	let &[r, g, b, a] = rgba else {
		return None;
	};
	if a != 255 {
		return None;
	}
	let color = (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
	let n = color >> CHECKSUM_BITS;
	if color & CHECKSUM_MASK != checksum(n) {
		return None;
	}
	(n as usize).checked_sub(1)
}
