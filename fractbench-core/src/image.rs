/// Row-major grid of grayscale bytes, `height` rows of `width` columns.
///
/// Backed by a single flat buffer; height is implied by the buffer length.
/// Every render call produces a fresh `Image` owned by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    data: Vec<u8>,
}

impl Image {
    /// Assemble an image from row-band buffers laid out top to bottom.
    /// Each band must be a whole number of `width`-byte rows.
    pub fn from_bands<I>(width: u32, bands: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut data = Vec::new();
        for band in bands {
            debug_assert_eq!(band.len() % width as usize, 0);
            data.extend_from_slice(&band);
        }
        Self { width, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        (self.data.len() / self.width as usize) as u32
    }

    /// Rows from top to bottom, each exactly `width` bytes.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.width as usize)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Byte at column `x`, row `y`. Panics if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        assert!(x < self.width);
        self.data[y as usize * self.width as usize + x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bands_concatenates_in_order() {
        let img = Image::from_bands(2, vec![vec![1, 2, 3, 4], vec![5, 6]]);
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 3);
        assert_eq!(img.as_bytes(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn rows_iterate_top_to_bottom() {
        let img = Image::from_bands(3, vec![vec![0, 1, 2, 10, 11, 12]]);
        let rows: Vec<&[u8]> = img.rows().collect();
        assert_eq!(rows, vec![&[0, 1, 2][..], &[10, 11, 12][..]]);
    }

    #[test]
    fn get_addresses_row_major() {
        let img = Image::from_bands(2, vec![vec![9, 8, 7, 6]]);
        assert_eq!(img.get(0, 0), 9);
        assert_eq!(img.get(1, 0), 8);
        assert_eq!(img.get(0, 1), 7);
        assert_eq!(img.get(1, 1), 6);
    }
}
