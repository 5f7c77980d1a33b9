//! Framebuffer pixel layouts.

use crate::draw::{Color32, EncodedPixel};

/// Build an 0xAARRGGBB value.
#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Build an opaque 0xFFRRGGBB value.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    rgba(r, g, b, 0xFF)
}

/// Native layout of a linear framebuffer.
///
/// Firmware framebuffers on x86 are almost always `Xrgb8888`; the 24-bit
/// variants show up on some older VBE modes.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// Memory layout: [B, G, R, A] (little-endian)
    #[default]
    Argb8888 = 0,
    /// Memory layout: [B, G, R, X] (little-endian)
    Xrgb8888 = 1,
    /// Memory layout: [B, G, R]
    Rgb888 = 2,
    /// Memory layout: [R, G, B]
    Bgr888 = 3,
}

impl PixelFormat {
    /// Pick a layout from a bits-per-pixel value. Only 24 and 32 are usable.
    #[inline]
    pub fn from_depth(depth: u16) -> Option<Self> {
        match depth {
            32 => Some(Self::Xrgb8888),
            24 => Some(Self::Rgb888),
            _ => None,
        }
    }

    #[inline]
    pub fn bytes_per_pixel(self) -> u8 {
        match self {
            Self::Argb8888 | Self::Xrgb8888 => 4,
            Self::Rgb888 | Self::Bgr888 => 3,
        }
    }

    #[inline]
    pub fn encode(self, color: Color32) -> EncodedPixel {
        let v = color.0;
        let r = (v >> 16) & 0xFF;
        let g = (v >> 8) & 0xFF;
        let b = v & 0xFF;

        EncodedPixel(match self {
            Self::Argb8888 => v,
            Self::Xrgb8888 => 0xFF00_0000 | (v & 0x00FF_FFFF),
            Self::Rgb888 => (r << 16) | (g << 8) | b,
            Self::Bgr888 => (b << 16) | (g << 8) | r,
        })
    }

    /// Inverse of [`encode`](Self::encode), alpha forced opaque.
    #[inline]
    pub fn decode(self, pixel: EncodedPixel) -> Color32 {
        let v = pixel.0;
        match self {
            Self::Argb8888 => Color32(v),
            Self::Xrgb8888 | Self::Rgb888 => Color32(0xFF00_0000 | (v & 0x00FF_FFFF)),
            Self::Bgr888 => {
                let b = (v >> 16) & 0xFF;
                let g = (v >> 8) & 0xFF;
                let r = v & 0xFF;
                Color32(0xFF00_0000 | (r << 16) | (g << 8) | b)
            }
        }
    }
}
