use crate::pixel::PixelFormat;
use crate::rect::Rect;

/// Color in 0xAARRGGBB form, the layout every theme constant uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Color32(pub u32);

impl Color32 {
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

/// A color already converted to a surface's native pixel layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct EncodedPixel(pub u32);

impl EncodedPixel {
    #[inline]
    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

#[inline]
fn clip_span(width: u32, height: u32, row: i32, x0: i32, x1: i32) -> Option<(usize, usize, usize)> {
    if row < 0 || row >= height as i32 {
        return None;
    }
    let x0 = x0.max(0);
    let x1 = x1.min(width as i32 - 1);
    if x0 > x1 {
        return None;
    }
    Some((row as usize, x0 as usize, x1 as usize))
}

/// Drawing surface.
///
/// Implementors supply geometry and a single byte-offset pixel write; the
/// span, line and rectangle helpers are provided on top of it. Every
/// provided method clips to the surface, so callers may pass coordinates
/// that lie partly or fully off-screen (a window dragged past the left edge
/// is the common case).
///
/// The trait is object safe: widgets draw through `&mut dyn Canvas`, which
/// lets the hardware framebuffer and the in-memory test buffer share one
/// rendering path.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Row stride in bytes.
    fn pitch_bytes(&self) -> usize;

    /// 3 or 4.
    fn bytes_per_pixel(&self) -> u8;

    fn pixel_format(&self) -> PixelFormat;

    /// Store one encoded pixel. `byte_offset` is always in bounds when
    /// called from the provided methods.
    fn write_encoded_at(&mut self, byte_offset: usize, pixel: EncodedPixel);

    #[inline]
    fn encode(&self, color: Color32) -> EncodedPixel {
        self.pixel_format().encode(color)
    }

    /// Fill columns `x0..=x1` of `row`.
    #[inline]
    fn fill_row_span(&mut self, row: i32, x0: i32, x1: i32, pixel: EncodedPixel) {
        let Some((row, x0, x1)) = clip_span(self.width(), self.height(), row, x0, x1) else {
            return;
        };
        let bpp = self.bytes_per_pixel() as usize;
        let row_start = row * self.pitch_bytes();
        for x in x0..=x1 {
            self.write_encoded_at(row_start + x * bpp, pixel);
        }
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, pixel: EncodedPixel) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        let off =
            (y as usize) * self.pitch_bytes() + (x as usize) * self.bytes_per_pixel() as usize;
        self.write_encoded_at(off, pixel);
    }

    #[inline]
    fn hline(&mut self, x0: i32, x1: i32, y: i32, pixel: EncodedPixel) {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        self.fill_row_span(y, lo, hi, pixel);
    }

    #[inline]
    fn vline(&mut self, x: i32, y0: i32, y1: i32, pixel: EncodedPixel) {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        let lo = lo.max(0);
        let hi = hi.min(self.height() as i32 - 1);
        for y in lo..=hi {
            self.put_pixel(x, y, pixel);
        }
    }

    fn fill_rect_encoded(&mut self, x: i32, y: i32, w: i32, h: i32, pixel: EncodedPixel) {
        if w <= 0 || h <= 0 {
            return;
        }
        let y0 = y.max(0);
        let y1 = y.saturating_add(h - 1).min(self.height() as i32 - 1);
        let x1 = x.saturating_add(w - 1);
        for row in y0..=y1 {
            self.fill_row_span(row, x, x1, pixel);
        }
    }

    fn clear_canvas(&mut self, pixel: EncodedPixel) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        self.fill_rect_encoded(0, 0, w, h, pixel);
    }

    /// Called by the `gfx` primitives after they touch a region. Direct
    /// framebuffer surfaces ignore it.
    #[inline]
    fn report_damage(&mut self, _rect: Rect) {}
}
