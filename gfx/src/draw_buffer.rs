use alloc::vec;
use alloc::vec::Vec;

use flux_abi::draw::{Canvas, Color32, EncodedPixel};
use flux_abi::pixel::PixelFormat;
use flux_abi::rect::Rect;

/// Heap-backed pixel buffer implementing [`Canvas`].
///
/// Used as an off-screen surface and as the inspectable target in tests:
/// [`pixel`](Self::pixel) reads back what was drawn and
/// [`damage`](Self::damage) accumulates the bounding box of every reported
/// region since the last [`clear_damage`](Self::clear_damage).
pub struct DrawBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    pitch: usize,
    format: PixelFormat,
    damage: Rect,
}

impl DrawBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let pitch = width as usize * format.bytes_per_pixel() as usize;
        Self {
            data: vec![0; pitch * height as usize],
            width,
            height,
            pitch,
            format,
            damage: Rect::default(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decoded color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color32> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let bpp = self.format.bytes_per_pixel() as usize;
        let off = y as usize * self.pitch + x as usize * bpp;
        let bytes = self.data.get(off..off + bpp)?;
        let mut raw = [0u8; 4];
        raw[..bpp].copy_from_slice(bytes);
        Some(self.format.decode(EncodedPixel(u32::from_le_bytes(raw))))
    }

    /// Number of pixels in `area` equal to `color`.
    pub fn count_color(&self, area: Rect, color: Color32) -> usize {
        let mut n = 0;
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if self.pixel(x, y) == Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    pub fn damage(&self) -> Rect {
        self.damage
    }

    pub fn clear_damage(&mut self) {
        self.damage = Rect::default();
    }
}

impl Canvas for DrawBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pitch_bytes(&self) -> usize {
        self.pitch
    }

    fn bytes_per_pixel(&self) -> u8 {
        self.format.bytes_per_pixel()
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn write_encoded_at(&mut self, byte_offset: usize, pixel: EncodedPixel) {
        let bpp = self.format.bytes_per_pixel() as usize;
        let bytes = pixel.to_u32().to_le_bytes();
        if let Some(dst) = self.data.get_mut(byte_offset..byte_offset + bpp) {
            dst.copy_from_slice(&bytes[..bpp]);
        }
    }

    fn report_damage(&mut self, rect: Rect) {
        self.damage = self.damage.union(&rect);
    }
}
