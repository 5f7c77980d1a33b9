//! Kernel panic screen.
//!
//! Paints a full-screen report when the kernel hits an unrecoverable error.
//! It only needs a canvas, so it still works when the desktop state is
//! unusable.

use core::fmt::{self, Write};

use flux_abi::draw::{Canvas, Color32};
use flux_gfx::{FONT_CHAR_HEIGHT, FONT_CHAR_WIDTH, canvas_font, canvas_ops};

const PANIC_BG_COLOR: Color32 = Color32(0xFF8B_0000);
const PANIC_FG_COLOR: Color32 = Color32(0xFFFF_FFFF);
const PANIC_HEADER_COLOR: Color32 = Color32(0xFFFF_4444);
const PANIC_NOTE_COLOR: Color32 = Color32(0xFF88_8888);

const MARGIN: i32 = 40;
const MESSAGE_CAPACITY: usize = 512;

/// Fixed-capacity text for formatting without an allocator.
struct LineBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> LineBuf<N> {
    const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("?")
    }
}

impl<const N: usize> Write for LineBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &b in s.as_bytes() {
            if self.len == self.buf.len() {
                break;
            }
            self.buf[self.len] = if b.is_ascii() { b } else { b'?' };
            self.len += 1;
        }
        Ok(())
    }
}

fn centered<T: Canvas + ?Sized>(target: &mut T, y: i32, text: &str, fg: Color32) {
    let x = (target.width() as i32 - canvas_font::text_width(text)) / 2;
    canvas_font::draw_string(target, x.max(0), y, text, fg, PANIC_BG_COLOR);
}

/// Paint the panic report.
///
/// `message` is formatted into a fixed buffer and wrapped inside the side
/// margins; `location` is the source file and line of the panic, when known.
pub fn draw_panic_screen<T: Canvas + ?Sized>(
    target: &mut T,
    message: Option<&dyn fmt::Display>,
    location: Option<(&str, u32)>,
) {
    let width = target.width() as i32;
    let height = target.height() as i32;
    canvas_ops::fill_rect(target, 0, 0, width, height, PANIC_BG_COLOR);

    let mut y = 60;
    centered(target, y, "=== KERNEL PANIC ===", PANIC_HEADER_COLOR);
    y += FONT_CHAR_HEIGHT * 2;
    centered(target, y, "An unrecoverable error has occurred", PANIC_FG_COLOR);
    y += FONT_CHAR_HEIGHT * 3;

    if let Some(message) = message {
        let mut text = LineBuf::<MESSAGE_CAPACITY>::new();
        let _ = write!(text, "{}", message);
        canvas_font::draw_string(target, MARGIN, y, "Reason: ", PANIC_FG_COLOR, PANIC_BG_COLOR);
        let left = MARGIN + 8 * FONT_CHAR_WIDTH;
        let mut x = left;
        for ch in text.as_str().chars() {
            if ch == '\n' || x + FONT_CHAR_WIDTH > width - MARGIN {
                y += FONT_CHAR_HEIGHT;
                x = left;
                if y > height - 120 {
                    break;
                }
                if ch == '\n' {
                    continue;
                }
            }
            canvas_font::draw_char(target, x, y, ch, PANIC_FG_COLOR, PANIC_BG_COLOR);
            x += FONT_CHAR_WIDTH;
        }
        y += FONT_CHAR_HEIGHT * 2;
    }

    if let Some((file, line)) = location {
        let mut buf = LineBuf::<128>::new();
        let _ = write!(buf, "At: {}:{}", file, line);
        canvas_font::draw_string(target, MARGIN, y, buf.as_str(), PANIC_FG_COLOR, PANIC_BG_COLOR);
    }

    centered(
        target,
        height - 40,
        "(Details also available on the serial console)",
        PANIC_NOTE_COLOR,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_abi::pixel::PixelFormat;
    use flux_abi::rect::Rect;
    use flux_gfx::DrawBuffer;

    #[test]
    fn test_panic_screen_fills_background() {
        let mut buf = DrawBuffer::new(640, 480, PixelFormat::Xrgb8888);
        draw_panic_screen(&mut buf, Some(&"out of memory"), Some(("kernel/src/main.rs", 42)));
        assert_eq!(buf.pixel(0, 0), Some(PANIC_BG_COLOR));
        assert_eq!(buf.pixel(639, 479), Some(PANIC_BG_COLOR));
        assert!(buf.count_color(Rect::new(0, 60, 640, 8), PANIC_HEADER_COLOR) > 0);
    }

    #[test]
    fn test_formatted_reason_is_drawn() {
        // "Reason: " starts at y = 60 + 16 + 24.
        let reason_row = Rect::new(0, 100, 640, FONT_CHAR_HEIGHT);
        let mut plain = DrawBuffer::new(640, 480, PixelFormat::Xrgb8888);
        draw_panic_screen(&mut plain, Some(&"index 7 out of range"), None);
        let mut formatted = DrawBuffer::new(640, 480, PixelFormat::Xrgb8888);
        draw_panic_screen(&mut formatted, Some(&format_args!("index {} out of range", 7)), None);
        let mut missing = DrawBuffer::new(640, 480, PixelFormat::Xrgb8888);
        draw_panic_screen(&mut missing, None, None);

        let lit = plain.count_color(reason_row, PANIC_FG_COLOR);
        assert!(lit > missing.count_color(reason_row, PANIC_FG_COLOR));
        assert_eq!(formatted.count_color(reason_row, PANIC_FG_COLOR), lit);
    }

    #[test]
    fn test_line_buf_truncates() {
        let mut buf = LineBuf::<128>::new();
        for _ in 0..20 {
            let _ = buf.write_str("0123456789");
        }
        assert_eq!(buf.as_str().len(), 128);
    }
}
