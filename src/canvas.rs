use crate::{Error, RGB, bmp};
use bytemuck::{Pod, Zeroable};
use std::{fmt, io::Write, ops::Range};

/// Pixel as it is laid out in the bitmap pixel array
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct BGR {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl From<RGB> for BGR {
    fn from(color: RGB) -> Self {
        let [b, g, r] = color.to_bgr();
        Self { b, g, r }
    }
}

impl From<BGR> for RGB {
    fn from(pixel: BGR) -> Self {
        RGB::new(pixel.r, pixel.g, pixel.b)
    }
}

/// Pixel buffer in the bitmap layout
///
/// Rows are padded to 4 bytes and stored bottom-up, while all the methods
/// address pixels top-down: row `0` is the top row of the image.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    row_stride: usize,
    data: Vec<u8>,
}

impl Canvas {
    /// Create black canvas
    pub fn new(width: usize, height: usize) -> Result<Self, Error> {
        let row_stride = bmp::row_stride(width);
        let size = row_stride
            .checked_mul(height)
            .ok_or(Error::OutOfMemory { size: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory { size })?;
        data.resize(size, 0);
        Ok(Self {
            width,
            height,
            row_stride,
            data,
        })
    }

    /// Wrap bitmap pixel array, its size must be `row_stride(width) * height`
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, Error> {
        let row_stride = bmp::row_stride(width);
        if row_stride.checked_mul(height) != Some(data.len()) {
            return Err(Error::InvalidCanvas {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            row_stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of bytes per row including padding
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Bitmap pixel array
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    // byte range of the row pixels (padding excluded), `row` is counted from the top
    fn row_range(&self, row: usize) -> Option<Range<usize>> {
        if row >= self.height {
            return None;
        }
        let start = (self.height - 1 - row) * self.row_stride;
        Some(start..start + self.width * 3)
    }

    /// Pixels of the row, `None` if row is outside of the canvas
    pub fn row(&self, row: usize) -> Option<&[BGR]> {
        let range = self.row_range(row)?;
        self.data.get(range).map(bytemuck::cast_slice)
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut [BGR]> {
        let range = self.row_range(row)?;
        self.data.get_mut(range).map(bytemuck::cast_slice_mut)
    }

    /// Color of the pixel, `None` if it is outside of the canvas
    pub fn get_pixel(&self, col: usize, row: usize) -> Option<RGB> {
        self.row(row)?.get(col).map(|pixel| RGB::from(*pixel))
    }

    /// Set color of the pixel
    ///
    /// Pixels outside of the canvas are silently dropped, shapes rely on
    /// this instead of clipping their geometry.
    pub fn write_pixel(&mut self, col: i64, row: i64, color: RGB) {
        let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
            return;
        };
        if col >= self.width {
            return;
        }
        if let Some(pixel) = self.row_mut(row).and_then(|pixels| pixels.get_mut(col)) {
            *pixel = color.into();
        }
    }

    /// Fill pixels `x0..x1` of the row, span is clipped to the canvas
    pub fn fill_span(&mut self, row: i64, x0: i64, x1: i64, color: RGB) {
        let Ok(row) = usize::try_from(row) else {
            return;
        };
        let width = self.width as i64;
        let (x0, x1) = (x0.clamp(0, width) as usize, x1.clamp(0, width) as usize);
        if x0 >= x1 {
            return;
        }
        if let Some(pixels) = self.row_mut(row) {
            pixels[x0..x1].fill(color.into());
        }
    }

    /// Set all pixels to the color, padding is left untouched
    pub fn clear(&mut self, color: RGB) {
        for row in 0..self.height {
            if let Some(pixels) = self.row_mut(row) {
                pixels.fill(color.into());
            }
        }
    }

    /// Write canvas as a BMP file
    pub fn write_bmp(&self, out: impl Write) -> Result<(), Error> {
        bmp::write_bmp(self.width, self.height, &self.data, out)
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_stride", &self.row_stride)
            .finish()
    }
}
