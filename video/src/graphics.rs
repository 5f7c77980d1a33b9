use flux_abi::draw::{Canvas, EncodedPixel};
use flux_abi::pixel::PixelFormat;

use crate::framebuffer::{self, FbState, VideoResult};

/// [`Canvas`] over the linear framebuffer. Every store is volatile.
pub struct GraphicsContext {
    fb: FbState,
}

impl GraphicsContext {
    /// Context for the framebuffer accepted by [`framebuffer::init`].
    pub fn new() -> VideoResult<Self> {
        framebuffer::snapshot().map(|fb| Self { fb })
    }

    /// Context over caller-supplied memory, validated the same way as the
    /// boot framebuffer.
    ///
    /// # Safety
    /// `address` must point at `pitch * height` writable bytes that outlive
    /// the returned context.
    pub unsafe fn from_raw(
        address: *mut u8,
        width: u64,
        height: u64,
        pitch: u64,
        bpp: u16,
    ) -> VideoResult<Self> {
        framebuffer::validate(address as u64, width, height, pitch, bpp).map(|fb| Self { fb })
    }

    #[inline]
    fn in_bounds(&self, byte_offset: usize, len: usize) -> bool {
        byte_offset
            .checked_add(len)
            .is_some_and(|end| end <= self.fb.buffer_size())
    }
}

impl Canvas for GraphicsContext {
    #[inline]
    fn width(&self) -> u32 {
        self.fb.info.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.fb.info.height
    }

    #[inline]
    fn pitch_bytes(&self) -> usize {
        self.fb.info.pitch as usize
    }

    #[inline]
    fn bytes_per_pixel(&self) -> u8 {
        self.fb.info.bytes_per_pixel()
    }

    #[inline]
    fn pixel_format(&self) -> PixelFormat {
        self.fb.info.format
    }

    #[inline]
    fn write_encoded_at(&mut self, byte_offset: usize, pixel: EncodedPixel) {
        let bytes_pp = self.fb.info.bytes_per_pixel() as usize;
        if !self.in_bounds(byte_offset, bytes_pp) {
            return;
        }
        let color = pixel.to_u32();
        // SAFETY: the offset was bounds-checked against the validated buffer size.
        let pixel_ptr = unsafe { self.fb.base_ptr().add(byte_offset) };
        // SAFETY: `pixel_ptr..pixel_ptr + bytes_pp` lies inside the framebuffer.
        unsafe {
            match bytes_pp {
                4 => (pixel_ptr as *mut u32).write_volatile(color),
                3 => {
                    pixel_ptr.write_volatile(color as u8);
                    pixel_ptr.add(1).write_volatile((color >> 8) as u8);
                    pixel_ptr.add(2).write_volatile((color >> 16) as u8);
                }
                _ => {}
            }
        }
    }

    #[inline]
    fn fill_row_span(&mut self, row: i32, x0: i32, x1: i32, pixel: EncodedPixel) {
        if row < 0 || row >= self.fb.info.height as i32 {
            return;
        }
        let x0 = x0.max(0);
        let x1 = x1.min(self.fb.info.width as i32 - 1);
        if x0 > x1 {
            return;
        }

        let bytes_pp = self.fb.info.bytes_per_pixel() as usize;
        let start = row as usize * self.fb.info.pitch as usize + x0 as usize * bytes_pp;
        let count = (x1 - x0 + 1) as usize;
        if bytes_pp != 4 || !self.in_bounds(start, count * 4) {
            for i in 0..count {
                self.write_encoded_at(start + i * bytes_pp, pixel);
            }
            return;
        }

        let color = pixel.to_u32();
        // SAFETY: the whole span was bounds-checked above.
        unsafe {
            let mut ptr = self.fb.base_ptr().add(start) as *mut u32;
            for _ in 0..count {
                ptr.write_volatile(color);
                ptr = ptr.add(1);
            }
        }
    }
}
