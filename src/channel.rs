use tracing::trace;

use crate::{config::EffectiveChannel, gamma::GammaTable, ColorOrdering, Error, IndexMap, Result};

/// One strip: its parameters, the caller-writable pixel buffer and the packed
/// frame handed to the transport.
///
/// A channel configured with zero leds has empty buffers and every operation
/// on it does nothing. Channels are created by the
/// [`Controller`](crate::Controller) and keep their id, led count and ordering
/// until it is finalized.
#[derive(Debug)]
pub struct Channel {
	id:         usize,
	gpio:       u32,
	invert:     bool,
	ordering:   ColorOrdering,
	brightness: u8,

	pixels:  Vec<u32>,
	packed:  Vec<u8>,
	scratch: Vec<u32>,
}

impl Channel {
	pub(crate) fn configure(id: usize, params: &EffectiveChannel) -> Self {
		Self {
			id,
			gpio: params.gpio,
			invert: params.invert,
			ordering: params.ordering,
			brightness: params.brightness,

			pixels: vec![0; params.count],
			packed: vec![0; params.count * params.ordering.bytes_per_pixel()],
			scratch: Vec::new(),
		}
	}

	pub fn id(&self) -> usize {
		self.id
	}

	pub fn gpio(&self) -> u32 {
		self.gpio
	}

	pub fn invert(&self) -> bool {
		self.invert
	}

	pub fn ordering(&self) -> ColorOrdering {
		self.ordering
	}

	pub fn brightness(&self) -> u8 {
		self.brightness
	}

	/// Number of leds on this channel.
	pub fn count(&self) -> usize {
		self.pixels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pixels.is_empty()
	}

	/// Logical `0xWWRRGGBB` pixels.
	pub fn pixels(&self) -> &[u32] {
		&self.pixels
	}

	pub fn pixels_mut(&mut self) -> &mut [u32] {
		&mut self.pixels
	}

	pub fn fill(&mut self, pixel: u32) {
		self.pixels.fill(pixel);
	}

	/// The frame produced by the last [`Self::pack`].
	pub fn packed(&self) -> &[u8] {
		&self.packed
	}

	/// Takes effect on the next [`Self::pack`].
	///
	/// The value is validated even on a channel without leds, where it
	/// otherwise has no effect.
	pub fn set_brightness(&mut self, value: u32) -> Result<()> {
		self.brightness = u8::try_from(value).map_err(|_| Error::InvalidBrightness(value))?;
		Ok(())
	}

	/// Gamma correct, scale and serialize the pixel buffer.
	pub fn pack(&mut self) -> &[u8] {
		encode(&self.pixels, self.ordering, self.brightness, &mut self.packed);
		&self.packed
	}

	/// Same as [`Self::pack`], but the pixels are remapped through `map`
	/// first. The pixel buffer itself is left untouched.
	pub fn pack_remapped(&mut self, map: &IndexMap) -> Result<&[u8]> {
		map.apply_into(&self.pixels, &mut self.scratch)?;
		encode(&self.scratch, self.ordering, self.brightness, &mut self.packed);
		Ok(&self.packed)
	}

	pub(crate) fn clear(&mut self) {
		self.pixels.fill(0);
	}
}

fn encode(frame: &[u32], ordering: ColorOrdering, brightness: u8, out: &mut [u8]) {
	let gamma = GammaTable::get();
	let bytes_per_pixel = ordering.bytes_per_pixel();

	trace!(leds = frame.len(), brightness, "packing frame");

	for (pixel, out) in frame.iter().zip(out.chunks_exact_mut(bytes_per_pixel)) {
		let [w, r, g, b] = gamma.correct_pixel(*pixel).to_be_bytes();
		let scaled = u32::from_be_bytes([
			scale(w, brightness),
			scale(r, brightness),
			scale(g, brightness),
			scale(b, brightness),
		]);

		ordering.write(scaled, out);
	}
}

/// `value * brightness / 255`, truncated.
#[inline]
fn scale(value: u8, brightness: u8) -> u8 {
	(value as u16 * brightness as u16 / 255) as u8
}
