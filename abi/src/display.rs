use crate::pixel::PixelFormat;

/// Geometry of a linear framebuffer as handed over by the bootloader.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayInfo {
    pub width: u32,
    pub height: u32,
    /// Bytes per row.
    pub pitch: u32,
    pub format: PixelFormat,
}

impl DisplayInfo {
    pub const MAX_DIMENSION: u32 = 16384;

    #[inline]
    pub const fn new(width: u32, height: u32, pitch: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            pitch,
            format,
        }
    }

    /// Build from bootloader-sized fields. Returns `None` for a depth the
    /// drawing code cannot handle.
    pub fn from_raw(width: u64, height: u64, pitch: u64, bpp: u16) -> Option<Self> {
        let format = PixelFormat::from_depth(bpp)?;
        Some(Self::new(
            u32::try_from(width).ok()?,
            u32::try_from(height).ok()?,
            u32::try_from(pitch).ok()?,
            format,
        ))
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> u8 {
        self.format.bytes_per_pixel()
    }

    #[inline]
    pub fn buffer_size(&self) -> u64 {
        self.pitch as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let info = DisplayInfo::from_raw(1024, 768, 4096, 32);
        assert_eq!(
            info,
            Some(DisplayInfo::new(1024, 768, 4096, PixelFormat::Xrgb8888))
        );
        assert_eq!(info.map(|i| i.buffer_size()), Some(4096 * 768));
        assert_eq!(DisplayInfo::from_raw(1024, 768, 2048, 16), None);
    }
}
