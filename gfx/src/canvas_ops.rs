use flux_abi::draw::{Canvas, Color32};
use flux_abi::rect::Rect;

#[inline]
fn emit<T: Canvas + ?Sized>(target: &mut T, area: Rect) -> Option<Rect> {
    let clipped = area.clip(target.width() as i32, target.height() as i32);
    if clipped.is_empty() {
        return None;
    }
    target.report_damage(clipped);
    Some(clipped)
}

pub fn set_pixel<T: Canvas + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    color: Color32,
) -> Option<Rect> {
    let px = target.encode(color);
    target.put_pixel(x, y, px);
    emit(target, Rect::new(x, y, 1, 1))
}

/// Bresenham line, both endpoints inclusive.
pub fn line<T: Canvas + ?Sized>(
    target: &mut T,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Color32,
) -> Option<Rect> {
    let w = target.width() as i32;
    let h = target.height() as i32;
    if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= w && x1 >= w) || (y0 >= h && y1 >= h) {
        return None;
    }

    let px = target.encode(color);
    if y0 == y1 {
        target.hline(x0, x1, y0, px);
    } else if x0 == x1 {
        target.vline(x0, y0, y1, px);
    } else {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut cx, mut cy) = (x0, y0);
        loop {
            target.put_pixel(cx, cy, px);
            if cx == x1 && cy == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                err += dx;
                cy += sy;
            }
        }
    }

    let left = x0.min(x1);
    let top = y0.min(y1);
    emit(
        target,
        Rect::new(left, top, x0.max(x1) - left + 1, y0.max(y1) - top + 1),
    )
}

/// One-pixel outline.
pub fn rect<T: Canvas + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: Color32,
) -> Option<Rect> {
    if w <= 0 || h <= 0 {
        return None;
    }
    let px = target.encode(color);
    let (x1, y1) = (x + w - 1, y + h - 1);
    target.hline(x, x1, y, px);
    target.hline(x, x1, y1, px);
    target.vline(x, y, y1, px);
    target.vline(x1, y, y1, px);
    emit(target, Rect::new(x, y, w, h))
}

pub fn fill_rect<T: Canvas + ?Sized>(
    target: &mut T,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: Color32,
) -> Option<Rect> {
    if w <= 0 || h <= 0 {
        return None;
    }
    let px = target.encode(color);
    target.fill_rect_encoded(x, y, w, h, px);
    emit(target, Rect::new(x, y, w, h))
}
