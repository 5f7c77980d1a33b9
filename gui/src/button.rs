use alloc::boxed::Box;
use alloc::string::String;

use flux_abi::draw::{Canvas, Color32};
use flux_abi::input::{Event, EventSink, MouseButton};
use flux_abi::rect::Rect;
use flux_gfx::{FONT_CHAR_HEIGHT, canvas_font, canvas_ops};

use crate::theme::*;
use crate::widget::{EventContext, Response, Widget};

/// Runs on a completed click. The returned response propagates to the
/// owning window, so a button can ask for its window to close.
pub type ClickHandler = Box<dyn FnMut(&mut dyn EventSink) -> Response>;

pub struct Button {
    bounds: Rect,
    label: String,
    pressed: bool,
    hovered: bool,
    base_color: Color32,
    hover_color: Color32,
    on_click: Option<ClickHandler>,
}

impl Button {
    pub fn new(x: i32, y: i32, width: i32, height: i32, label: &str) -> Self {
        Self {
            bounds: Rect::new(x, y, width, height),
            label: String::from(label),
            pressed: false,
            hovered: false,
            base_color: COLOR_BUTTON,
            hover_color: COLOR_BUTTON_HOVER,
            on_click: None,
        }
    }

    pub fn with_on_click(
        mut self,
        handler: impl FnMut(&mut dyn EventSink) -> Response + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    pub fn set_on_click(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    fn fill_color(&self) -> Color32 {
        if self.pressed {
            COLOR_DARK_GRAY
        } else if self.hovered {
            self.hover_color
        } else {
            self.base_color
        }
    }

    fn release(&mut self, x: i32, y: i32, sink: &mut dyn EventSink) -> Response {
        self.pressed = false;
        if !self.bounds.contains(x, y) {
            return Response::Repaint;
        }
        match self.on_click.as_mut().map(|handler| handler(sink)) {
            Some(resp) if resp.is_window_action() => resp,
            _ => Response::Repaint,
        }
    }
}

impl Widget for Button {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: (i32, i32)) {
        let r = self.bounds.offset(origin.0, origin.1);
        let bg = self.fill_color();

        canvas_ops::fill_rect(canvas, r.x, r.y, r.width, r.height, bg);
        canvas_ops::rect(canvas, r.x, r.y, r.width, r.height, COLOR_DARK_GRAY);
        canvas_ops::line(canvas, r.x + 1, r.y, r.right() - 2, r.y, COLOR_WHITE);
        canvas_ops::line(
            canvas,
            r.x + 1,
            r.bottom() - 1,
            r.right() - 2,
            r.bottom() - 1,
            COLOR_DARK_GRAY,
        );

        let text_x = r.x + (r.width - canvas_font::text_width(&self.label)) / 2;
        let text_y = r.y + (r.height - FONT_CHAR_HEIGHT) / 2;
        canvas_font::draw_string(canvas, text_x, text_y, &self.label, COLOR_BLACK, bg);
    }

    fn handle_event(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> Response {
        match *event {
            Event::MouseMove { x, y } => {
                let inside = self.bounds.contains(x, y);
                if inside == self.hovered {
                    return Response::Ignored;
                }
                self.hovered = inside;
                Response::Repaint
            }
            Event::MouseDown {
                x,
                y,
                button: MouseButton::Left,
            } if self.bounds.contains(x, y) => {
                self.pressed = true;
                Response::Repaint
            }
            Event::MouseUp {
                x,
                y,
                button: MouseButton::Left,
            } if self.pressed => self.release(x, y, &mut *ctx.sink),
            _ => Response::Ignored,
        }
    }
}
