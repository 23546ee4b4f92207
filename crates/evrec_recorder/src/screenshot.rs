//! Front-buffer capture and screenshot export.
//!
//! Provides functionality to:
//! - Read back the rendered frame through a [`FrameReadback`] backend
//! - Convert bottom-up BGR readback data into top-down RGBA
//! - Export screenshots as PNG or uncompressed TGA

use crate::error::ScreenshotError;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Source of raw front-buffer pixels.
///
/// Implementations return tightly packed BGR8 rows, bottom row first,
/// matching a GL `glReadPixels(.., GL_BGR, GL_UNSIGNED_BYTE, ..)` with a pack
/// alignment of 1.
pub trait FrameReadback {
    fn read_front_buffer(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8>;
}

/// A captured frame in top-down RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Raw pixel data (RGBA8)
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl CapturedFrame {
    /// Convert bottom-up BGR8 readback data to an opaque top-down RGBA8 frame.
    pub fn from_bgr_bottom_up(
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Self, ScreenshotError> {
        check_buffer(pixels.len(), width, height, 3)?;

        let row_len = width as usize * 3;
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for row in pixels.chunks_exact(row_len).rev() {
            for bgr in row.chunks_exact(3) {
                data.extend_from_slice(&[bgr[2], bgr[1], bgr[0], 255]);
            }
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Get the number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Get a pixel at (x, y) as RGBA.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(idx..idx + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Export the frame as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ScreenshotError> {
        encode_png(path, &self.data, self.width, self.height)
    }
}

fn check_buffer(
    actual: usize,
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), ScreenshotError> {
    if width == 0 || height == 0 {
        return Err(ScreenshotError::EmptyImage { width, height });
    }
    let expected = width as usize * height as usize * channels;
    if actual != expected {
        return Err(ScreenshotError::BufferSize { expected, actual });
    }
    Ok(())
}

/// Encode RGBA8 pixels as a PNG file.
///
/// Dimensions and buffer length are validated before the file is created,
/// so a rejected image never leaves a partial file behind.
pub fn encode_png(
    path: impl AsRef<Path>,
    rgba: &[u8],
    width: u32,
    height: u32,
) -> Result<(), ScreenshotError> {
    check_buffer(rgba.len(), width, height, 4)?;

    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    writer.finish()?;

    Ok(())
}

/// Read back the front buffer and save it as PNG.
pub fn save_png<R: FrameReadback + ?Sized>(
    readback: &R,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
) -> Result<CapturedFrame, ScreenshotError> {
    let path = path.as_ref();
    let pixels = readback.read_front_buffer(0, 0, width, height);
    let frame = CapturedFrame::from_bgr_bottom_up(&pixels, width, height)?;
    frame.save_png(path)?;
    info!(
        "PNG file created successfully! {}x{} -> {}",
        width,
        height,
        path.display()
    );
    Ok(frame)
}

/// TGA header size in bytes
const TGA_HEADER_SIZE: usize = 18;
/// Uncompressed true-color image
const TGA_TRUE_COLOR: u8 = 2;

/// Write bottom-up BGR8 pixels as an uncompressed 24-bit TGA file.
///
/// TGA stores true-color pixels bottom-up in BGR order, so readback data
/// is written without conversion.
pub fn encode_tga(
    path: impl AsRef<Path>,
    bgr: &[u8],
    width: u32,
    height: u32,
) -> Result<(), ScreenshotError> {
    check_buffer(bgr.len(), width, height, 3)?;
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ScreenshotError::DimensionsTooLarge { width, height });
    };

    let mut out = BufWriter::new(File::create(path)?);
    let mut header = Vec::with_capacity(TGA_HEADER_SIZE);
    header.write_u8(0)?; // id length
    header.write_u8(0)?; // no color map
    header.write_u8(TGA_TRUE_COLOR)?;
    header.write_all(&[0; 5])?; // color map fields
    header.write_u16::<LittleEndian>(0)?; // x origin
    header.write_u16::<LittleEndian>(0)?; // y origin
    header.write_u16::<LittleEndian>(w)?;
    header.write_u16::<LittleEndian>(h)?;
    header.write_u8(24)?;
    header.write_u8(0)?; // bottom-left origin, no alpha bits

    out.write_all(&header)?;
    out.write_all(bgr)?;
    out.flush()?;
    Ok(())
}

/// Read back the front buffer and save it as TGA.
pub fn save_tga<R: FrameReadback + ?Sized>(
    readback: &R,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    let pixels = readback.read_front_buffer(0, 0, width, height);
    encode_tga(path, &pixels, width, height)?;
    info!("Finish writing to file {}", path.display());
    Ok(())
}

/// Gradient test pattern standing in for a GPU readback.
///
/// In top-down image space pixel (x, y) is `R = x`, `G = y`, `B = x + y`,
/// each modulo 256.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestPattern;

impl TestPattern {
    /// Expected RGBA value at top-down image position (x, y)
    pub fn pixel(x: u32, y: u32) -> [u8; 4] {
        [(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]
    }
}

impl FrameReadback for TestPattern {
    fn read_front_buffer(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        // Bottom row first: readback row r is image row (height - 1 - r)
        for row in (0..height).rev() {
            for col in 0..width {
                let [r, g, b, _] = Self::pixel(x + col, y + row);
                pixels.extend_from_slice(&[b, g, r]);
            }
        }
        pixels
    }
}
