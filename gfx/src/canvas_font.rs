use flux_abi::draw::{Canvas, Color32};
use flux_abi::rect::Rect;
use font8x8::{BASIC_FONTS, UnicodeFonts};

pub const FONT_CHAR_WIDTH: i32 = 8;
pub const FONT_CHAR_HEIGHT: i32 = 8;

/// Characters outside the basic Latin table draw as this.
const FALLBACK_GLYPH: char = '?';

/// Width in pixels of one line of `text`.
#[inline]
pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * FONT_CHAR_WIDTH
}

/// Draw one glyph. A fully transparent `bg` leaves background pixels alone.
pub fn draw_char<T: Canvas + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    ch: char,
    fg: Color32,
    bg: Color32,
) -> Option<Rect> {
    let glyph = BASIC_FONTS
        .get(ch)
        .or_else(|| BASIC_FONTS.get(FALLBACK_GLYPH))?;
    let fg_px = target.encode(fg);
    let bg_px = target.encode(bg);
    let has_bg = bg.alpha() != 0;

    for (row, &bits) in glyph.iter().enumerate() {
        let py = y + row as i32;
        for col in 0..FONT_CHAR_WIDTH {
            if (bits >> col) & 1 != 0 {
                target.put_pixel(x + col, py, fg_px);
            } else if has_bg {
                target.put_pixel(x + col, py, bg_px);
            }
        }
    }

    let area = Rect::new(x, y, FONT_CHAR_WIDTH, FONT_CHAR_HEIGHT)
        .clip(target.width() as i32, target.height() as i32);
    if area.is_empty() {
        None
    } else {
        target.report_damage(area);
        Some(area)
    }
}

/// Draw `text` starting at `(x, y)`; `\n` starts a new line at `x`.
pub fn draw_string<T: Canvas + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    text: &str,
    fg: Color32,
    bg: Color32,
) -> Option<Rect> {
    let mut cx = x;
    let mut cy = y;
    let mut damage: Option<Rect> = None;

    for ch in text.chars() {
        if ch == '\n' {
            cx = x;
            cy += FONT_CHAR_HEIGHT;
            continue;
        }
        if let Some(d) = draw_char(target, cx, cy, ch, fg, bg) {
            damage = Some(match damage {
                Some(prev) => prev.union(&d),
                None => d,
            });
        }
        cx += FONT_CHAR_WIDTH;
    }
    damage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DrawBuffer;
    use flux_abi::pixel::PixelFormat;

    const TRANSPARENT: Color32 = Color32(0);

    fn lit(buf: &DrawBuffer, area: Rect) -> usize {
        let mut n = 0;
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if buf.pixel(x, y) == Some(Color32::WHITE) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("Start"), 40);
        assert_eq!(text_width(""), 0);
    }

    #[test]
    fn test_space_draws_nothing_visible() {
        let mut buf = DrawBuffer::new(16, 8, PixelFormat::Xrgb8888);
        draw_char(&mut buf, 0, 0, ' ', Color32::WHITE, TRANSPARENT);
        assert_eq!(lit(&buf, Rect::new(0, 0, 8, 8)), 0);
    }

    #[test]
    fn test_glyph_lands_in_its_cell() {
        let mut buf = DrawBuffer::new(24, 8, PixelFormat::Xrgb8888);
        let damage = draw_string(&mut buf, 0, 0, "A B", Color32::WHITE, TRANSPARENT);
        assert_eq!(damage, Some(Rect::new(0, 0, 24, 8)));
        assert!(lit(&buf, Rect::new(0, 0, 8, 8)) > 0);
        assert_eq!(lit(&buf, Rect::new(8, 0, 8, 8)), 0);
        assert!(lit(&buf, Rect::new(16, 0, 8, 8)) > 0);
    }

    #[test]
    fn test_opaque_background_fills_cell() {
        let mut buf = DrawBuffer::new(8, 8, PixelFormat::Xrgb8888);
        let red = Color32(0xFFFF_0000);
        draw_char(&mut buf, 0, 0, ' ', Color32::WHITE, red);
        assert_eq!(buf.pixel(3, 3), Some(red));
    }

    #[test]
    fn test_newline_moves_down() {
        let mut buf = DrawBuffer::new(8, 16, PixelFormat::Xrgb8888);
        draw_string(&mut buf, 0, 0, " \nA", Color32::WHITE, TRANSPARENT);
        assert_eq!(lit(&buf, Rect::new(0, 0, 8, 8)), 0);
        assert!(lit(&buf, Rect::new(0, 8, 8, 8)) > 0);
    }
}
