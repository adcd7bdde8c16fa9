use crate::{Error, Result};

/// Reorders logical pixel positions to match how a strip is physically wired.
///
/// Output position `i` takes the pixel at `source[map[i]]`. Entries may repeat
/// or skip positions, but must stay inside the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap {
	map: Vec<usize>,
}

impl IndexMap {
	pub fn new(map: Vec<usize>) -> Result<Self> {
		let len = map.len();
		if let Some(position) = map.iter().position(|&index| index >= len) {
			return Err(Error::IndexOutOfRange {
				position,
				index: map[position],
				len,
			});
		}

		Ok(Self { map })
	}

	/// Serpentine matrix: even rows run left to right, odd rows right to left.
	pub fn alternating_matrix(width: usize, height: usize) -> Self {
		let map = (0..width * height)
			.map(|i| {
				let (row, col) = (i / width, i % width);
				if row % 2 == 0 {
					i
				} else {
					(row + 1) * width - (col + 1)
				}
			})
			.collect();

		Self { map }
	}

	/// Every row of a `rows` x `cols` matrix mirrored horizontally.
	pub fn mirror_matrix_x(rows: usize, cols: usize) -> Self {
		let mut map = vec![0; rows * cols];
		for y in 0..rows {
			for x in 0..cols {
				map[cols * y + x] = cols * y + cols - x - 1;
			}
		}

		Self { map }
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	pub fn as_slice(&self) -> &[usize] {
		&self.map
	}

	/// Remap `source` into a new buffer.
	pub fn apply<T: Copy>(&self, source: &[T]) -> Result<Vec<T>> {
		let mut out = Vec::with_capacity(self.map.len());
		self.apply_into(source, &mut out)?;
		Ok(out)
	}

	/// Remap `source` into `out`, replacing its contents.
	///
	/// `out` is fully written before this returns, so later stages never see
	/// a half remapped frame.
	pub fn apply_into<T: Copy>(&self, source: &[T], out: &mut Vec<T>) -> Result<()> {
		if source.len() != self.map.len() {
			return Err(Error::IndexMapLengthMismatch {
				map:  self.map.len(),
				leds: source.len(),
			});
		}

		out.clear();
		out.extend(self.map.iter().map(|&index| source[index]));

		Ok(())
	}
}

impl TryFrom<Vec<usize>> for IndexMap {
	type Error = Error;

	fn try_from(map: Vec<usize>) -> Result<Self> {
		Self::new(map)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn apply_reorders() {
		let map = IndexMap::new(vec![2, 0, 1]).unwrap();
		assert_eq!(map.apply(&[10u32, 20, 30]).unwrap(), vec![30, 10, 20]);
	}

	#[test]
	fn apply_does_not_touch_the_source() {
		let map = IndexMap::new(vec![1, 1, 0]).unwrap();
		let source = [1u32, 2, 3];
		assert_eq!(map.apply(&source).unwrap(), vec![2, 2, 1]);
		assert_eq!(source, [1, 2, 3]);
	}

	#[test]
	fn length_mismatch() {
		let map = IndexMap::new(vec![0, 1]).unwrap();
		assert!(matches!(
			map.apply(&[1u32, 2, 3]),
			Err(Error::IndexMapLengthMismatch { map: 2, leds: 3 })
		));
	}

	#[test]
	fn out_of_range_entries_are_rejected() {
		assert!(matches!(
			IndexMap::new(vec![0, 3, 1]),
			Err(Error::IndexOutOfRange {
				position: 1,
				index: 3,
				len: 3
			})
		));
	}

	#[test]
	fn apply_into_replaces_scratch() {
		let map = IndexMap::new(vec![1, 0]).unwrap();
		let mut scratch = vec![9u32; 5];
		map.apply_into(&[4, 5], &mut scratch).unwrap();
		assert_eq!(scratch, vec![5, 4]);
	}

	#[test]
	fn alternating_matrix() {
		let map = IndexMap::alternating_matrix(3, 3);
		assert_eq!(map.as_slice(), &[0, 1, 2, 5, 4, 3, 6, 7, 8]);
	}

	#[test]
	fn mirror_matrix_x() {
		let map = IndexMap::mirror_matrix_x(2, 3);
		assert_eq!(map.as_slice(), &[2, 1, 0, 5, 4, 3]);
	}

	#[test]
	fn empty_map() {
		let map = IndexMap::new(Vec::new()).unwrap();
		assert!(map.is_empty());
		assert_eq!(map.apply::<u32>(&[]).unwrap(), Vec::<u32>::new());
	}
}
