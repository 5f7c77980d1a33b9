//! Flux shared types
//!
//! Plain data shared by every layer of the desktop: colors and the `Canvas`
//! drawing contract, rectangles, decoded input events and window state
//! enums. Nothing in here touches hardware, so the whole crate builds and
//! tests on the host.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod draw;
pub mod input;
pub mod pixel;
pub mod rect;
pub mod window;

pub use display::DisplayInfo;
pub use draw::{Canvas, Color32, EncodedPixel};
pub use input::*;
pub use pixel::*;
pub use rect::Rect;
pub use window::*;
