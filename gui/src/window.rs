//! Top-level and nested windows.
//!
//! A window owns its geometry, its interaction state and at most one child
//! widget. Event handling runs the press/drag/resize state machine and
//! reports window-level requests (close, minimize, maximize) back to the
//! owner as a [`Response`]; the window manager carries them out.
//!
//! ```text
//!   (x, y) ┌──────────────────────────────── [□][_][X] ┐  title bar, 24 px
//!          ├───────────────────────────────────────────┤
//!          │ client area, origin (x + 1, y + 24)       │
//!          │                                           │
//!          └───────────────────────────────────────────┘
//! ```

use alloc::boxed::Box;
use alloc::string::String;

use flux_abi::draw::{Canvas, Color32};
use flux_abi::input::{Event, EventSink, MouseButton};
use flux_abi::rect::Rect;
use flux_abi::window::{
    BorderRegion, InteractionMode, VisibilityMode, WINDOW_TITLE_MAX, WindowFlags, WindowId,
};
use flux_gfx::{ClipCanvas, FONT_CHAR_WIDTH, canvas_font, canvas_ops};
use flux_lib::klog_warn;

use crate::theme::*;
use crate::widget::{Child, EventContext, Response, Widget};

/// Runs just before the window is destroyed.
pub type CloseHandler = Box<dyn FnMut(WindowId, &mut dyn EventSink)>;

pub struct Window {
    id: WindowId,
    geometry: Rect,
    min_width: i32,
    min_height: i32,
    interaction: InteractionMode,
    minimized: bool,
    /// Geometry to return to; present exactly while maximized.
    saved: Option<Rect>,
    flags: WindowFlags,
    title: String,
    bg_color: Color32,
    child: Option<Child>,
    on_close: Option<CloseHandler>,
}

/// Copy at most `WINDOW_TITLE_MAX` characters of `title`, or `None` when the
/// allocation fails.
fn copy_title(title: &str) -> Option<String> {
    let end = title
        .char_indices()
        .nth(WINDOW_TITLE_MAX)
        .map_or(title.len(), |(i, _)| i);
    let mut out = String::new();
    out.try_reserve_exact(end).ok()?;
    out.push_str(&title[..end]);
    Some(out)
}

impl Window {
    /// Like [`try_new`](Self::try_new), but an allocation failure leaves the
    /// title empty instead of failing.
    pub fn new(id: WindowId, geometry: Rect, title: &str) -> Self {
        let title = copy_title(title).unwrap_or_else(|| {
            klog_warn!("gui: no memory for title of window {}", id);
            String::new()
        });
        Self::with_title(id, geometry, title)
    }

    pub fn try_new(id: WindowId, geometry: Rect, title: &str) -> Option<Self> {
        copy_title(title).map(|title| Self::with_title(id, geometry, title))
    }

    fn with_title(id: WindowId, geometry: Rect, title: String) -> Self {
        Self {
            id,
            geometry,
            min_width: MIN_WINDOW_WIDTH,
            min_height: MIN_WINDOW_HEIGHT,
            interaction: InteractionMode::Idle,
            minimized: false,
            saved: None,
            flags: WindowFlags::default(),
            title,
            bg_color: COLOR_WINDOW_BG,
            child: None,
            on_close: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns `false`, keeping the old title, if the copy cannot be allocated.
    pub fn set_title(&mut self, title: &str) -> bool {
        match copy_title(title) {
            Some(title) => {
                self.title = title;
                true
            }
            None => false,
        }
    }

    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: WindowFlags) {
        self.flags = flags;
    }

    pub fn set_min_size(&mut self, width: i32, height: i32) {
        self.min_width = width;
        self.min_height = height;
    }

    pub fn min_size(&self) -> (i32, i32) {
        (self.min_width, self.min_height)
    }

    pub fn set_background(&mut self, color: Color32) {
        self.bg_color = color;
    }

    pub fn interaction(&self) -> InteractionMode {
        self.interaction
    }

    pub fn cancel_interaction(&mut self) {
        self.interaction = InteractionMode::Idle;
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.saved.is_some()
    }

    pub fn visibility(&self) -> VisibilityMode {
        if self.minimized {
            VisibilityMode::Minimized
        } else if self.is_maximized() {
            VisibilityMode::Maximized
        } else {
            VisibilityMode::Normal
        }
    }

    pub fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
        if minimized {
            self.interaction = InteractionMode::Idle;
        }
    }

    pub fn child(&self) -> Option<&Child> {
        self.child.as_ref()
    }

    pub fn child_mut(&mut self) -> Option<&mut Child> {
        self.child.as_mut()
    }

    pub fn set_child(&mut self, child: impl Into<Child>) {
        self.child = Some(child.into());
    }

    pub fn take_child(&mut self) -> Option<Child> {
        self.child.take()
    }

    pub fn set_on_close(&mut self, handler: Option<CloseHandler>) {
        self.on_close = handler;
    }

    /// Call the close handler, if any. The handler runs at most once.
    pub(crate) fn notify_close(&mut self, sink: &mut dyn EventSink) {
        if let Some(mut handler) = self.on_close.take() {
            handler(self.id, sink);
        }
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.geometry.x = x;
        self.geometry.y = y;
    }

    /// Resize, never below the minimum size.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.geometry.width = width.max(self.min_width);
        self.geometry.height = height.max(self.min_height);
    }

    /// Maximize into `area`, or return to the saved geometry.
    pub fn toggle_maximize(&mut self, area: Rect) {
        match self.saved.take() {
            Some(saved) => self.geometry = saved,
            None => {
                self.saved = Some(self.geometry);
                self.geometry = area;
            }
        }
        self.interaction = InteractionMode::Idle;
    }

    // ── Layout ──────────────────────────────────────────────────────────────

    pub fn title_bar_rect(&self) -> Rect {
        let g = self.geometry;
        Rect::new(g.x, g.y, g.width, TITLE_BAR_HEIGHT)
    }

    /// Area the child lives in, inside the border and below the title bar.
    pub fn client_rect(&self) -> Rect {
        let g = self.geometry;
        Rect::new(
            g.x + 1,
            g.y + TITLE_BAR_HEIGHT,
            g.width - 2,
            g.height - TITLE_BAR_HEIGHT - 1,
        )
    }

    fn glyph_rect(&self, slot: i32) -> Rect {
        let g = self.geometry;
        Rect::new(
            g.right() - CLOSE_GLYPH_INSET - slot * GLYPH_STEP,
            g.y + GLYPH_TOP,
            GLYPH_SIZE,
            GLYPH_SIZE,
        )
    }

    pub fn close_glyph(&self) -> Option<Rect> {
        self.flags
            .contains(WindowFlags::HAS_CLOSE)
            .then(|| self.glyph_rect(0))
    }

    pub fn minimize_glyph(&self) -> Option<Rect> {
        self.flags
            .contains(WindowFlags::HAS_MINIMIZE)
            .then(|| self.glyph_rect(1))
    }

    pub fn maximize_glyph(&self) -> Option<Rect> {
        self.flags
            .contains(WindowFlags::HAS_MAXIMIZE)
            .then(|| self.glyph_rect(2))
    }

    /// Which resize handle `(x, y)` is on. Windows that are maximized or not
    /// resizable, and points outside the window, report `Client`.
    pub fn hit_test_border(&self, x: i32, y: i32) -> BorderRegion {
        let g = self.geometry;
        if self.is_maximized() || !self.flags.contains(WindowFlags::RESIZABLE) || !g.contains(x, y)
        {
            return BorderRegion::Client;
        }
        BorderRegion::from_edges(
            y < g.y + RESIZE_MARGIN,
            y >= g.bottom() - RESIZE_MARGIN,
            x < g.x + RESIZE_MARGIN,
            x >= g.right() - RESIZE_MARGIN,
        )
    }

    // ── Interaction ─────────────────────────────────────────────────────────

    fn press(&mut self, x: i32, y: i32, event: &Event, ctx: &mut EventContext<'_>) -> Response {
        let hit = |glyph: Option<Rect>| glyph.is_some_and(|r| r.contains(x, y));
        if hit(self.close_glyph()) {
            return Response::Close;
        }
        if hit(self.minimize_glyph()) {
            return Response::Minimize;
        }
        if hit(self.maximize_glyph()) {
            return Response::ToggleMaximize;
        }

        let region = self.hit_test_border(x, y);
        if region != BorderRegion::Client {
            self.interaction = InteractionMode::Resizing {
                region,
                anchor_x: x,
                anchor_y: y,
                start: self.geometry,
            };
            return Response::Handled;
        }

        if self.title_bar_rect().contains(x, y) {
            self.interaction = InteractionMode::Dragging {
                offset_x: x - self.geometry.x,
                offset_y: y - self.geometry.y,
            };
            return Response::Handled;
        }

        self.forward_to_child(event, ctx)
    }

    fn drag_to(
        &mut self,
        x: i32,
        y: i32,
        offset_x: i32,
        offset_y: i32,
        ctx: &EventContext<'_>,
    ) -> Response {
        let max_y = (ctx.screen.height - TASKBAR_HEIGHT - TITLE_BAR_HEIGHT).max(0);
        let new_x = x - offset_x;
        let new_y = (y - offset_y).clamp(0, max_y);
        if (new_x, new_y) == (self.geometry.x, self.geometry.y) {
            return Response::Handled;
        }
        self.move_to(new_x, new_y);
        Response::Repaint
    }

    /// Apply the cursor's travel since the anchor to the starting geometry.
    /// An axis that would drop below its minimum keeps its current value.
    fn resize_to(
        &mut self,
        x: i32,
        y: i32,
        region: BorderRegion,
        anchor: (i32, i32),
        start: Rect,
    ) -> Response {
        let dx = x - anchor.0;
        let dy = y - anchor.1;
        let (mut new_x, mut new_w) = (start.x, start.width);
        let (mut new_y, mut new_h) = (start.y, start.height);

        if region.moves_left() {
            new_x += dx;
            new_w -= dx;
        } else if region.moves_right() {
            new_w += dx;
        }
        if region.moves_top() {
            new_y += dy;
            new_h -= dy;
        } else if region.moves_bottom() {
            new_h += dy;
        }

        let before = self.geometry;
        if new_w >= self.min_width {
            self.geometry.x = new_x;
            self.geometry.width = new_w;
        }
        if new_h >= self.min_height {
            self.geometry.y = new_y;
            self.geometry.height = new_h;
        }
        if self.geometry == before {
            Response::Handled
        } else {
            Response::Repaint
        }
    }

    fn forward_to_child(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> Response {
        let client = self.client_rect();
        let Some(child) = self.child.as_mut() else {
            return Response::Ignored;
        };
        let nested = matches!(child, Child::Window(_));
        let local = event.relative_to(client.x, client.y);
        let resp = child.handle_event(&local, ctx);

        match (nested, resp) {
            // A nested window asking to close is removed here; its other
            // window-level requests have nowhere to go.
            (true, Response::Close) => {
                if let Some(Child::Window(mut window)) = self.child.take() {
                    window.notify_close(&mut *ctx.sink);
                }
                Response::Repaint
            }
            (true, r) if r.is_window_action() => Response::Handled,
            (_, r) => r,
        }
    }

    // ── Drawing ─────────────────────────────────────────────────────────────

    fn draw_glyph_frame(canvas: &mut dyn Canvas, r: Rect) {
        canvas_ops::fill_rect(canvas, r.x, r.y, r.width, r.height, COLOR_LIGHT_GRAY);
    }

    fn draw_glyphs(&self, canvas: &mut dyn Canvas, origin: (i32, i32)) {
        if let Some(r) = self.close_glyph().map(|r| r.offset(origin.0, origin.1)) {
            Self::draw_glyph_frame(canvas, r);
            canvas_ops::line(canvas, r.x + 4, r.y + 4, r.x + 12, r.y + 12, COLOR_RED);
            canvas_ops::line(canvas, r.x + 12, r.y + 4, r.x + 4, r.y + 12, COLOR_RED);
            canvas_ops::rect(canvas, r.x, r.y, r.width, r.height, COLOR_DARK_GRAY);
        }
        if let Some(r) = self.minimize_glyph().map(|r| r.offset(origin.0, origin.1)) {
            Self::draw_glyph_frame(canvas, r);
            canvas_ops::line(canvas, r.x + 4, r.y + 11, r.x + 12, r.y + 11, COLOR_BLACK);
            canvas_ops::rect(canvas, r.x, r.y, r.width, r.height, COLOR_DARK_GRAY);
        }
        if let Some(r) = self.maximize_glyph().map(|r| r.offset(origin.0, origin.1)) {
            Self::draw_glyph_frame(canvas, r);
            if self.is_maximized() {
                // Restore: two stacked frames.
                canvas_ops::rect(canvas, r.x + 6, r.y + 3, 7, 6, COLOR_BLACK);
                canvas_ops::fill_rect(canvas, r.x + 3, r.y + 7, 7, 6, COLOR_LIGHT_GRAY);
                canvas_ops::rect(canvas, r.x + 3, r.y + 7, 7, 6, COLOR_BLACK);
            } else {
                canvas_ops::rect(canvas, r.x + 4, r.y + 4, 8, 8, COLOR_BLACK);
                canvas_ops::line(canvas, r.x + 4, r.y + 5, r.x + 11, r.y + 5, COLOR_BLACK);
            }
            canvas_ops::rect(canvas, r.x, r.y, r.width, r.height, COLOR_DARK_GRAY);
        }
    }

    /// Leftmost x (window-relative) the title text may not cross.
    fn title_limit(&self) -> i32 {
        [self.close_glyph(), self.minimize_glyph(), self.maximize_glyph()]
            .into_iter()
            .flatten()
            .map(|r| r.x - self.geometry.x)
            .min()
            .unwrap_or(self.geometry.width)
    }
}

impl Widget for Window {
    fn bounds(&self) -> Rect {
        self.geometry
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: (i32, i32)) {
        if self.minimized {
            return;
        }
        let g = self.geometry.offset(origin.0, origin.1);

        canvas_ops::fill_rect(canvas, g.x, g.y, g.width, TITLE_BAR_HEIGHT, COLOR_TITLE_BAR);
        let max_chars = ((self.title_limit() - TITLE_TEXT_X - 2) / FONT_CHAR_WIDTH).max(0) as usize;
        let end = self
            .title
            .char_indices()
            .nth(max_chars)
            .map_or(self.title.len(), |(i, _)| i);
        canvas_font::draw_string(
            canvas,
            g.x + TITLE_TEXT_X,
            g.y + TITLE_TEXT_Y,
            &self.title[..end],
            COLOR_WHITE,
            COLOR_TITLE_BAR,
        );
        self.draw_glyphs(canvas, origin);

        let client = self.client_rect().offset(origin.0, origin.1);
        canvas_ops::fill_rect(
            canvas,
            client.x,
            client.y,
            client.width,
            client.height,
            self.bg_color,
        );
        if !self.is_maximized() {
            canvas_ops::rect(canvas, g.x, g.y, g.width, g.height, COLOR_BORDER);
        }

        if let Some(child) = &self.child {
            let mut clipped = ClipCanvas::new(canvas, client);
            child.draw(&mut clipped, (client.x, client.y));
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> Response {
        match *event {
            Event::MouseDown {
                x,
                y,
                button: MouseButton::Left,
            } if self.interaction.is_idle() => self.press(x, y, event, ctx),
            Event::MouseMove { x, y } => match self.interaction {
                InteractionMode::Dragging { offset_x, offset_y } => {
                    self.drag_to(x, y, offset_x, offset_y, ctx)
                }
                InteractionMode::Resizing {
                    region,
                    anchor_x,
                    anchor_y,
                    start,
                } => self.resize_to(x, y, region, (anchor_x, anchor_y), start),
                InteractionMode::Idle => self.forward_to_child(event, ctx),
            },
            Event::MouseUp { .. } => {
                let was_busy = !self.interaction.is_idle();
                self.interaction = InteractionMode::Idle;
                let resp = self.forward_to_child(event, ctx);
                if was_busy && resp == Response::Ignored {
                    Response::Handled
                } else {
                    resp
                }
            }
            Event::Redraw => Response::Ignored,
            _ => self.forward_to_child(event, ctx),
        }
    }
}
