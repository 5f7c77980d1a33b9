//! Framebuffer access.
//!
//! Validates the bootloader's linear framebuffer once at boot and hands out
//! [`GraphicsContext`] canvases over it.

#![no_std]
#![forbid(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod framebuffer;
pub mod graphics;
pub mod panic_screen;

pub use framebuffer::{VideoError, VideoResult};
pub use graphics::GraphicsContext;

/// Paint the panic report if a framebuffer is up. Returns whether anything
/// was drawn.
pub fn display_panic_screen(
    message: Option<&dyn core::fmt::Display>,
    location: Option<(&str, u32)>,
) -> bool {
    match GraphicsContext::new() {
        Ok(mut ctx) => {
            panic_screen::draw_panic_screen(&mut ctx, message, location);
            true
        }
        Err(_) => false,
    }
}
