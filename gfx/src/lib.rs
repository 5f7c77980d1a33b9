//! Software rendering primitives over [`flux_abi::Canvas`].
//!
//! Every primitive clips to the target, reports the touched area through
//! `Canvas::report_damage`, and returns it.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod canvas_font;
pub mod canvas_ops;
pub mod clip;
pub mod draw_buffer;

pub use canvas_font::{FONT_CHAR_HEIGHT, FONT_CHAR_WIDTH, draw_char, draw_string, text_width};
pub use canvas_ops::{fill_rect, line, rect, set_pixel};
pub use clip::ClipCanvas;
pub use draw_buffer::DrawBuffer;
