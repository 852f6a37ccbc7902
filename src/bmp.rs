//! Uncompressed 24-bit BMP encoding
//!
//! File is a 54 bytes header (`BITMAPFILEHEADER` followed by `BITMAPINFOHEADER`)
//! immediately followed by the pixel array. Pixel array rows are stored bottom-up,
//! each pixel is `B, G, R` and each row is padded to a multiple of 4 bytes.
use crate::Error;
use bytemuck::{Pod, Zeroable};
use std::io::Write;

/// Size of the file header together with the info header
pub const HEADER_SIZE: usize = 54;
const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZE: usize = HEADER_SIZE - FILE_HEADER_SIZE;
const BYTES_PER_PIXEL: usize = 3;
const ROW_ALIGNMENT: usize = 4;

#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct BitmapHeader {
    // file header
    magic: [u8; 2],
    file_size: u32,
    reserved: u32,
    pixels_offset: u32,
    // info header
    info_size: u32,
    width: i32,
    height: i32,
    planes: u16,
    bits_per_pixel: u16,
    compression: u32,
    image_size: u32,
    x_pixels_per_meter: i32,
    y_pixels_per_meter: i32,
    colors_used: u32,
    colors_important: u32,
}

const _: () = assert!(std::mem::size_of::<BitmapHeader>() == HEADER_SIZE);

/// Number of bytes per row of the pixel array, including padding
pub fn row_stride(width: usize) -> usize {
    width
        .saturating_mul(BYTES_PER_PIXEL)
        .div_ceil(ROW_ALIGNMENT)
        .saturating_mul(ROW_ALIGNMENT)
}

/// Size of the pixel array in bytes
pub fn pixel_array_size(width: usize, height: usize) -> usize {
    row_stride(width).saturating_mul(height)
}

/// Size of the whole BMP file in bytes
pub fn file_size(width: usize, height: usize) -> usize {
    pixel_array_size(width, height).saturating_add(HEADER_SIZE)
}

/// Encode header of the image with provided dimensions
pub fn header(width: usize, height: usize) -> Result<[u8; HEADER_SIZE], Error> {
    let too_large = || Error::ImageTooLarge { width, height };
    let file_size = u32::try_from(file_size(width, height)).map_err(|_| too_large())?;
    let header = BitmapHeader {
        magic: *b"BM",
        file_size: file_size.to_le(),
        reserved: 0,
        pixels_offset: (HEADER_SIZE as u32).to_le(),
        info_size: (INFO_HEADER_SIZE as u32).to_le(),
        width: i32::try_from(width).map_err(|_| too_large())?.to_le(),
        height: i32::try_from(height).map_err(|_| too_large())?.to_le(),
        planes: 1u16.to_le(),
        bits_per_pixel: ((BYTES_PER_PIXEL * 8) as u16).to_le(),
        // BI_RGB, image size of zero is allowed for it
        compression: 0,
        image_size: 0,
        x_pixels_per_meter: 0,
        y_pixels_per_meter: 0,
        colors_used: 0,
        colors_important: 0,
    };
    let mut bytes = [0u8; HEADER_SIZE];
    bytes.copy_from_slice(bytemuck::bytes_of(&header));
    Ok(bytes)
}

/// Write BMP file consisting of the header and the provided pixel array
pub fn write_bmp(
    width: usize,
    height: usize,
    pixels: &[u8],
    mut out: impl Write,
) -> Result<(), Error> {
    let _span = tracing::debug_span!("[bmp]", width, height).entered();
    if pixels.len() != pixel_array_size(width, height) {
        return Err(Error::InvalidCanvas {
            width,
            height,
            len: pixels.len(),
        });
    }
    out.write_all(&header(width, height)?)?;
    out.write_all(pixels)?;
    out.flush()?;
    tracing::debug!("[bmp:size] {}", HEADER_SIZE + pixels.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_stride() {
        assert_eq!(row_stride(0), 0);
        assert_eq!(row_stride(1), 4);
        assert_eq!(row_stride(2), 8);
        assert_eq!(row_stride(3), 12);
        assert_eq!(row_stride(4), 12);
        assert_eq!(row_stride(5), 16);
        for width in 0..64 {
            let stride = row_stride(width);
            assert_eq!(stride % 4, 0);
            assert!(stride >= width * 3 && stride < width * 3 + 4);
        }
    }

    #[test]
    fn test_header_4x4() -> Result<(), Error> {
        let size = (54 + row_stride(4) * 4) as u8;
        assert_eq!(size, 0x66);
        #[rustfmt::skip]
        let expected = [
            0x42, 0x4d, size, 0, 0, 0, 0, 0, 0, 0, 0x36, 0, 0, 0,
            0x28, 0, 0, 0, 4, 0, 0, 0, 4, 0, 0, 0, 1, 0, 24, 0,
            0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0, 0, 0, 0, 0,
        ];
        assert_eq!(header(4, 4)?, expected);
        Ok(())
    }

    #[test]
    fn test_header_fields() -> Result<(), Error> {
        let le_u32 = |bytes: &[u8]| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        for (width, height) in [(0, 0), (1, 1), (3, 7), (640, 480), (1001, 3)] {
            let header = header(width, height)?;
            assert_eq!(&header[0..2], b"BM");
            assert_eq!(
                le_u32(&header[2..6]) as usize,
                54 + row_stride(width) * height
            );
            assert_eq!(le_u32(&header[10..14]), 54);
            assert_eq!(le_u32(&header[14..18]), 40);
            assert_eq!(le_u32(&header[18..22]) as usize, width);
            assert_eq!(le_u32(&header[22..26]) as usize, height);
        }
        assert!(matches!(
            header(1 << 31, 1),
            Err(Error::ImageTooLarge { .. })
        ));
        assert!(matches!(
            header(100_000, 100_000),
            Err(Error::ImageTooLarge { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_write_bmp() -> Result<(), Error> {
        let pixels = vec![0xaa; pixel_array_size(3, 2)];
        let mut out = Vec::new();
        write_bmp(3, 2, &pixels, &mut out)?;
        assert_eq!(out.len(), file_size(3, 2));
        assert_eq!(&out[..HEADER_SIZE], &header(3, 2)?);
        assert_eq!(&out[HEADER_SIZE..], pixels.as_slice());

        assert!(matches!(
            write_bmp(3, 2, &pixels[1..], Vec::new()),
            Err(Error::InvalidCanvas { len: 23, .. })
        ));
        Ok(())
    }
}
