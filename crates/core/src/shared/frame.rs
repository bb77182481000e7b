use ndarray::ArrayView3;

/// A captured camera frame: contiguous RGB bytes in row-major order.
///
/// Pixel format conversion happens inside the camera backend; everything
/// downstream sees packed RGB24.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * Self::CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sequence number assigned by the camera since it was opened.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, Self::CHANNELS),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// Largest centered square inside the frame as `(x, y, side)`.
    pub fn center_square(&self) -> (u32, u32, u32) {
        let side = self.width.min(self.height);
        ((self.width - side) / 2, (self.height - side) / 2, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![7u8; 2 * 3 * 3];
        let frame = Frame::new(data.clone(), 2, 3, 4);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.index(), 4);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 5], 2, 2, 0);
    }

    #[test]
    fn test_as_ndarray_is_height_width_channels() {
        let mut data = vec![0u8; 4 * 2 * 3];
        // row=1, col=2, G
        data[(4 + 2) * 3 + 1] = 200;
        let frame = Frame::new(data, 4, 2, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]);
        assert_eq!(arr[[1, 2, 1]], 200);
    }

    #[test]
    fn test_center_square_landscape() {
        let frame = Frame::new(vec![0u8; 320 * 240 * 3], 320, 240, 0);
        assert_eq!(frame.center_square(), (40, 0, 240));
    }

    #[test]
    fn test_center_square_portrait() {
        let frame = Frame::new(vec![0u8; 10 * 30 * 3], 10, 30, 0);
        assert_eq!(frame.center_square(), (0, 10, 10));
    }
}
