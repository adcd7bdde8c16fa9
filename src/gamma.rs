//! Perceptual gamma correction for 8-bit color values.
//!
//! The table is built lazily on first use and shared for the lifetime of the
//! process.

use std::sync::OnceLock;

/// Exponent used by the WS281x gamma curve, `out = in ^ (1 / GAMMA)`.
pub const GAMMA: f64 = 0.45;

static TABLE: OnceLock<GammaTable> = OnceLock::new();

/// 256 entry lookup from linear intensity to corrected intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GammaTable {
	table: [u8; 256],
}

impl GammaTable {
	fn build() -> Self {
		let mut table = [0u8; 256];
		for (i, item) in table.iter_mut().enumerate() {
			let x = i as f64 / 255.0;
			*item = (255.0 * x.powf(1.0 / GAMMA)).round() as u8;
		}

		Self { table }
	}

	/// The process-wide table.
	pub fn get() -> &'static GammaTable {
		TABLE.get_or_init(Self::build)
	}

	#[inline]
	pub fn correct(&self, value: u8) -> u8 {
		self.table[value as usize]
	}

	/// Correct every byte of a `0xWWRRGGBB` pixel, white included.
	#[inline]
	pub fn correct_pixel(&self, pixel: u32) -> u32 {
		u32::from_be_bytes(pixel.to_be_bytes().map(|byte| self.correct(byte)))
	}

	pub fn as_slice(&self) -> &[u8; 256] {
		&self.table
	}
}

/// Shorthand for `GammaTable::get().correct(value)`.
#[inline]
pub fn correct(value: u8) -> u8 {
	GammaTable::get().correct(value)
}

#[inline]
pub fn correct_pixel(pixel: u32) -> u32 {
	GammaTable::get().correct_pixel(pixel)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoints() {
		assert_eq!(correct(0), 0);
		assert_eq!(correct(255), 255);
	}

	#[test]
	fn monotonic() {
		let table = GammaTable::get().as_slice();
		for pair in table.windows(2) {
			assert!(pair[0] <= pair[1], "{:?}", pair);
		}
	}

	#[test]
	fn midpoint_is_darkened() {
		// 255 * (128/255)^(1/0.45) = 55.1
		assert_eq!(correct(128), 55);
		assert_eq!(correct(1), 0);
	}

	#[test]
	fn pixel_bytes_are_corrected_in_place() {
		assert_eq!(correct_pixel(0x00ff_0000), 0x00ff_0000);
		assert_eq!(correct_pixel(0x8000_ff80), 0x3700_ff37);
		assert_eq!(correct_pixel(0), 0);
	}
}
