use std::fmt;

use rpi_ws281x_shared::{STRIP_TYPE_NAMES, WS2812_STRIP};

use crate::{Error, Result};

/// Strip type as given in a configuration: either one of the names in
/// [`STRIP_TYPE_NAMES`] or a raw driver code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripType {
	Name(String),
	Code(u32),
}

impl Default for StripType {
	fn default() -> Self {
		StripType::Code(WS2812_STRIP)
	}
}

impl From<&str> for StripType {
	fn from(name: &str) -> Self {
		StripType::Name(name.to_string())
	}
}

impl From<String> for StripType {
	fn from(name: String) -> Self {
		StripType::Name(name)
	}
}

impl From<u32> for StripType {
	fn from(code: u32) -> Self {
		StripType::Code(code)
	}
}

impl fmt::Display for StripType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StripType::Name(name) => f.write_str(name),
			StripType::Code(code) => write!(f, "{:#010x}", code),
		}
	}
}

/// Where each color of a logical pixel lands inside one packed output word.
///
/// The driver code stores, per output byte, the bit shift that selects the
/// source color from a `0xWWRRGGBB` pixel: bits 16..24 for output byte 0,
/// 8..16 for byte 1, 0..8 for byte 2 and 24..32 for the optional white byte 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOrdering {
	code:  u32,
	red:   usize,
	green: usize,
	blue:  usize,
	white: Option<usize>,
}

const SHIFT_WHITE: u32 = 24;
const SHIFT_RED: u32 = 16;
const SHIFT_GREEN: u32 = 8;
const SHIFT_BLUE: u32 = 0;

impl ColorOrdering {
	/// Look up a strip type, resolving names case-insensitively.
	pub fn resolve(strip_type: &StripType) -> Result<Self> {
		match strip_type {
			StripType::Name(name) => {
				let wanted = name.trim().to_ascii_lowercase();
				let code = STRIP_TYPE_NAMES
					.iter()
					.find(|(known, _)| *known == wanted)
					.map(|(_, code)| *code)
					.ok_or_else(|| Error::UnknownStripType(name.clone()))?;

				Self::from_code(code)
			}
			StripType::Code(code) => Self::from_code(*code),
		}
	}

	/// Decode a raw driver code, rejecting codes that do not place every
	/// color at a distinct output byte.
	pub fn from_code(code: u32) -> Result<Self> {
		let unknown = || Error::UnknownStripType(format!("{:#010x}", code));

		let mut slots = [None; 4];
		let shifts = [(code >> 16) & 0xff, (code >> 8) & 0xff, code & 0xff, (code >> 24) & 0xff];
		let has_white = shifts[3] != 0;
		let bytes = if has_white { 4 } else { 3 };

		for (position, shift) in shifts.into_iter().enumerate().take(bytes) {
			let color = match shift {
				SHIFT_RED => 0,
				SHIFT_GREEN => 1,
				SHIFT_BLUE => 2,
				SHIFT_WHITE => 3,
				_ => return Err(unknown()),
			};

			if slots[color].replace(position).is_some() {
				return Err(unknown());
			}
		}

		let [Some(red), Some(green), Some(blue), white] = slots else {
			return Err(unknown());
		};
		if has_white != white.is_some() {
			return Err(unknown());
		}

		Ok(Self {
			code,
			red,
			green,
			blue,
			white,
		})
	}

	/// The code pushed to the transport as the strip type parameter.
	pub fn code(&self) -> u32 {
		self.code
	}

	pub fn has_white(&self) -> bool {
		self.white.is_some()
	}

	pub fn bytes_per_pixel(&self) -> usize {
		if self.has_white() {
			4
		} else {
			3
		}
	}

	pub fn red_offset(&self) -> usize {
		self.red
	}

	pub fn green_offset(&self) -> usize {
		self.green
	}

	pub fn blue_offset(&self) -> usize {
		self.blue
	}

	pub fn white_offset(&self) -> Option<usize> {
		self.white
	}

	/// Write the color bytes of a logical pixel into `out` in wire order.
	///
	/// `out` must be exactly [`Self::bytes_per_pixel`] long.
	pub fn write(&self, pixel: u32, out: &mut [u8]) {
		let [w, r, g, b] = pixel.to_be_bytes();

		out[self.red] = r;
		out[self.green] = g;
		out[self.blue] = b;
		if let Some(white) = self.white {
			out[white] = w;
		}
	}
}

impl Default for ColorOrdering {
	fn default() -> Self {
		Self {
			code:  WS2812_STRIP,
			red:   1,
			green: 0,
			blue:  2,
			white: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use rpi_ws281x_shared::{SK6812W_STRIP, SK6812_STRIP_GBRW, WS2811_STRIP_BGR, WS2811_STRIP_RGB};

	use super::*;

	#[test]
	fn ws2812_is_grb() {
		let ordering = ColorOrdering::resolve(&"ws2812".into()).unwrap();
		assert_eq!(ordering, ColorOrdering::default());
		assert_eq!(ordering.green_offset(), 0);
		assert_eq!(ordering.red_offset(), 1);
		assert_eq!(ordering.blue_offset(), 2);
		assert_eq!(ordering.bytes_per_pixel(), 3);
	}

	#[test]
	fn names_are_case_insensitive() {
		let lower = ColorOrdering::resolve(&"sk6812-gbrw".into()).unwrap();
		let upper = ColorOrdering::resolve(&"SK6812-GBRW".into()).unwrap();
		assert_eq!(lower, upper);
		assert_eq!(lower.code(), SK6812_STRIP_GBRW);
		assert_eq!(lower.green_offset(), 0);
		assert_eq!(lower.blue_offset(), 1);
		assert_eq!(lower.red_offset(), 2);
		assert_eq!(lower.white_offset(), Some(3));
	}

	#[test]
	fn every_name_resolves_to_its_code() {
		for (name, code) in STRIP_TYPE_NAMES {
			let ordering = ColorOrdering::resolve(&name.into()).unwrap();
			assert_eq!(ordering.code(), code, "{name}");
		}
	}

	#[test]
	fn codes_pass_through() {
		let ordering = ColorOrdering::resolve(&StripType::Code(WS2811_STRIP_BGR)).unwrap();
		assert_eq!(ordering.code(), WS2811_STRIP_BGR);
		assert_eq!(ordering.blue_offset(), 0);
		assert_eq!(ordering.green_offset(), 1);
		assert_eq!(ordering.red_offset(), 2);
	}

	#[test]
	fn sk6812w_has_white() {
		let ordering = ColorOrdering::from_code(SK6812W_STRIP).unwrap();
		assert_eq!(ordering.bytes_per_pixel(), 4);
		assert_eq!(ordering.white_offset(), Some(3));
	}

	#[test]
	fn sk6812w_name_is_grbw() {
		let named = ColorOrdering::resolve(&"sk6812w".into()).unwrap();
		assert_eq!(named.code(), 0x18081000);
		assert_eq!(named, ColorOrdering::resolve(&"sk6812-grbw".into()).unwrap());

		let gbrw = ColorOrdering::resolve(&"sk6812-gbrw".into()).unwrap();
		assert_eq!(gbrw.code(), 0x18080010);
	}

	#[test]
	fn unknown_strip_types_are_rejected() {
		assert!(matches!(
			ColorOrdering::resolve(&"apa102".into()),
			Err(Error::UnknownStripType(name)) if name == "apa102"
		));
		// red twice
		assert!(matches!(ColorOrdering::from_code(0x00101000), Err(Error::UnknownStripType(_))));
		// shift that selects no color
		assert!(matches!(ColorOrdering::from_code(0x00081004), Err(Error::UnknownStripType(_))));
	}

	#[test]
	fn write_places_colors() {
		let mut out = [0u8; 3];
		ColorOrdering::from_code(WS2811_STRIP_RGB).unwrap().write(0x00112233, &mut out);
		assert_eq!(out, [0x11, 0x22, 0x33]);

		ColorOrdering::default().write(0x00112233, &mut out);
		assert_eq!(out, [0x22, 0x11, 0x33]);

		let mut out = [0u8; 4];
		ColorOrdering::from_code(SK6812W_STRIP).unwrap().write(0x44112233, &mut out);
		assert_eq!(out, [0x22, 0x11, 0x33, 0x44]);
	}
}
