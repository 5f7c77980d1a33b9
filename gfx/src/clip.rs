use flux_abi::draw::{Canvas, EncodedPixel};
use flux_abi::pixel::PixelFormat;
use flux_abi::rect::Rect;

/// Restricts drawing on an inner canvas to `clip`.
///
/// Coordinates stay those of the inner canvas; writes outside the clip
/// rectangle are dropped. Windows wrap the target in one of these before
/// drawing their child so content never spills past the client area.
pub struct ClipCanvas<'a, T: Canvas + ?Sized> {
    inner: &'a mut T,
    clip: Rect,
}

impl<'a, T: Canvas + ?Sized> ClipCanvas<'a, T> {
    pub fn new(inner: &'a mut T, clip: Rect) -> Self {
        let clip = clip.clip(inner.width() as i32, inner.height() as i32);
        Self { inner, clip }
    }

    pub fn clip_rect(&self) -> Rect {
        self.clip
    }
}

impl<T: Canvas + ?Sized> Canvas for ClipCanvas<'_, T> {
    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn pitch_bytes(&self) -> usize {
        self.inner.pitch_bytes()
    }

    fn bytes_per_pixel(&self) -> u8 {
        self.inner.bytes_per_pixel()
    }

    fn pixel_format(&self) -> PixelFormat {
        self.inner.pixel_format()
    }

    fn write_encoded_at(&mut self, byte_offset: usize, pixel: EncodedPixel) {
        let pitch = self.inner.pitch_bytes();
        let bpp = self.inner.bytes_per_pixel() as usize;
        if pitch == 0 || bpp == 0 {
            return;
        }
        let y = (byte_offset / pitch) as i32;
        let x = ((byte_offset % pitch) / bpp) as i32;
        if self.clip.contains(x, y) {
            self.inner.write_encoded_at(byte_offset, pixel);
        }
    }

    fn fill_row_span(&mut self, row: i32, x0: i32, x1: i32, pixel: EncodedPixel) {
        if row < self.clip.y || row >= self.clip.bottom() {
            return;
        }
        let x0 = x0.max(self.clip.x);
        let x1 = x1.min(self.clip.right() - 1);
        if x0 <= x1 {
            self.inner.fill_row_span(row, x0, x1, pixel);
        }
    }

    fn report_damage(&mut self, rect: Rect) {
        if let Some(visible) = rect.intersection(&self.clip) {
            self.inner.report_damage(visible);
        }
    }
}
