use flux_abi::draw::Canvas;
use flux_abi::rect::Rect;
use flux_gfx::canvas_ops;

use crate::theme::{COLOR_BLACK, COLOR_WHITE};

pub const CURSOR_WIDTH: i32 = 9;
pub const CURSOR_HEIGHT: i32 = 12;

/// Draw the arrow pointer with its tip at `(x, y)`. Nothing underneath is
/// saved, so the previous position stays visible until the next repaint.
pub fn draw_cursor(canvas: &mut dyn Canvas, x: i32, y: i32) -> Rect {
    // White body, one row at a time.
    for dy in 2..8 {
        canvas_ops::line(canvas, x + 1, y + dy, x + dy - 1, y + dy, COLOR_WHITE);
    }
    canvas_ops::line(canvas, x + 1, y + 8, x + 2, y + 8, COLOR_WHITE);
    canvas_ops::set_pixel(canvas, x + 1, y + 9, COLOR_WHITE);

    // Outline.
    canvas_ops::line(canvas, x, y, x, y + CURSOR_HEIGHT - 1, COLOR_BLACK);
    canvas_ops::line(canvas, x, y, x + 8, y + 8, COLOR_BLACK);
    canvas_ops::line(canvas, x + 3, y + 8, x + 8, y + 8, COLOR_BLACK);
    canvas_ops::line(canvas, x, y + CURSOR_HEIGHT - 1, x + 3, y + 8, COLOR_BLACK);

    Rect::new(x, y, CURSOR_WIDTH, CURSOR_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_abi::pixel::PixelFormat;
    use flux_gfx::DrawBuffer;

    #[test]
    fn test_arrow_shape() {
        let mut buf = DrawBuffer::new(32, 32, PixelFormat::Xrgb8888);
        let desktop = buf.encode(crate::theme::COLOR_DESKTOP);
        buf.clear_canvas(desktop);
        let area = draw_cursor(&mut buf, 4, 4);
        assert_eq!(area, Rect::new(4, 4, 9, 12));
        assert_eq!(buf.pixel(4, 4), Some(COLOR_BLACK));
        assert_eq!(buf.pixel(4, 15), Some(COLOR_BLACK));
        assert_eq!(buf.pixel(6, 10), Some(COLOR_WHITE));
        assert_eq!(buf.pixel(12, 12), Some(COLOR_BLACK));
        assert_eq!(buf.pixel(12, 4), Some(crate::theme::COLOR_DESKTOP));
    }

    #[test]
    fn test_clipped_at_screen_edge() {
        let mut buf = DrawBuffer::new(16, 16, PixelFormat::Xrgb8888);
        draw_cursor(&mut buf, 12, 12);
        assert_eq!(buf.pixel(12, 12), Some(COLOR_BLACK));
    }
}
