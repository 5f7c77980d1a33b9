//! Window stack, focus and pointer routing.
//!
//! Windows live in a `Vec` ordered topmost-first: index 0 is drawn last and
//! hit-tested first. Minimized windows keep their slot so the taskbar can
//! list them, but they are skipped by hit-testing and drawing.
//!
//! After a button goes down on a window that window holds the pointer grab
//! and receives every pointer event until the next button release, wherever
//! the cursor goes. The click the decoder reports right after that release
//! belongs to the same window.

use alloc::vec::Vec;

use flux_abi::draw::Canvas;
use flux_abi::input::{Event, EventSink};
use flux_abi::rect::Rect;
use flux_abi::window::{BorderRegion, WindowId};
use flux_lib::{klog_debug, klog_info, klog_warn};

use crate::theme::MAX_WINDOWS;
use crate::widget::{EventContext, Response, Screen, Widget};
use crate::window::Window;

pub struct WindowManager {
    windows: Vec<Window>,
    active: Option<WindowId>,
    grab: Option<WindowId>,
    /// Window whose grab the last release ended; it owns the paired click.
    click_owner: Option<WindowId>,
    hover: Option<WindowId>,
    next_id: u32,
    screen: Screen,
    dirty: bool,
}

impl WindowManager {
    pub fn new(screen: Screen) -> Self {
        Self {
            windows: Vec::new(),
            active: None,
            grab: None,
            click_owner: None,
            hover: None,
            next_id: 1,
            screen,
            dirty: true,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Report and clear whether anything visible changed.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::take(&mut self.dirty)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ── Lookup ──────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Every window, topmost first, minimized ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    /// Every window in creation order.
    pub fn iter_by_id(&self) -> impl Iterator<Item = &Window> {
        let mut ordered: Vec<&Window> = self.windows.iter().collect();
        ordered.sort_unstable_by_key(|w| w.id());
        ordered.into_iter()
    }

    fn index_of(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id() == id)
    }

    /// Stack position; 0 is topmost.
    pub fn z_index(&self, id: WindowId) -> Option<usize> {
        self.index_of(id)
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id() == id)
    }

    /// Callers that change what a window looks like must also call
    /// [`mark_dirty`](Self::mark_dirty).
    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id() == id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<WindowId> {
        self.windows.iter().find(|w| w.title() == title).map(Window::id)
    }

    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    pub fn grab(&self) -> Option<WindowId> {
        self.grab
    }

    /// Whether `event` belongs to a window regardless of what is under the
    /// cursor: everything during a grab, and the click that ends one.
    pub fn owns_pointer(&self, event: &Event) -> bool {
        let is_click = matches!(event, Event::MouseClick { .. });
        self.grab.is_some() || (is_click && self.click_owner.is_some())
    }

    fn topmost_visible(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|w| !w.is_minimized())
            .map(Window::id)
    }

    // ── Lifecycle ───────────────────────────────────────────────────────────

    /// Open a window on top of the stack and focus it.
    ///
    /// Returns `None` when the window limit is reached or the allocation
    /// fails; both are logged.
    pub fn create(&mut self, geometry: Rect, title: &str) -> Option<WindowId> {
        if self.windows.len() >= MAX_WINDOWS {
            klog_warn!("wm: window limit of {} reached, '{}' not created", MAX_WINDOWS, title);
            return None;
        }
        let id = WindowId(self.next_id);
        let window = match Window::try_new(id, geometry, title) {
            Some(window) if self.windows.try_reserve(1).is_ok() => window,
            _ => {
                klog_warn!("wm: out of memory creating '{}'", title);
                return None;
            }
        };
        self.next_id += 1;
        self.windows.insert(0, window);
        self.active = Some(id);
        self.dirty = true;
        klog_debug!(
            "wm: created window {} '{}' at {}x{}+{}+{}",
            id,
            title,
            geometry.width,
            geometry.height,
            geometry.x,
            geometry.y
        );
        Some(id)
    }

    /// Run the close handler, then destroy the window and its child.
    pub fn close(&mut self, id: WindowId, sink: &mut dyn EventSink) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.windows[idx].notify_close(sink);
        let window = self.windows.remove(idx);
        klog_info!("wm: closed window {} '{}'", id, window.title());

        if self.grab == Some(id) {
            self.grab = None;
        }
        if self.click_owner == Some(id) {
            self.click_owner = None;
        }
        if self.hover == Some(id) {
            self.hover = None;
        }
        if self.active == Some(id) {
            self.active = self.topmost_visible();
        }
        self.dirty = true;
        true
    }

    // ── Stacking and state ──────────────────────────────────────────────────

    /// Move to the top of the stack and focus.
    pub fn bring_to_front(&mut self, id: WindowId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        if idx != 0 {
            let window = self.windows.remove(idx);
            self.windows.insert(0, window);
        }
        self.active = Some(id);
        self.dirty = true;
        true
    }

    /// Topmost visible window containing the point.
    pub fn hit_test_point(&self, x: i32, y: i32) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|w| !w.is_minimized() && w.geometry().contains(x, y))
            .map(Window::id)
    }

    pub fn hit_test_border(&self, id: WindowId, x: i32, y: i32) -> BorderRegion {
        self.get(id)
            .map_or(BorderRegion::Client, |w| w.hit_test_border(x, y))
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        let area = self.screen.desktop_area();
        let Some(window) = self.windows.iter_mut().find(|w| w.id() == id) else {
            return false;
        };
        window.toggle_maximize(area);
        self.dirty = true;
        true
    }

    /// Hide the window. Focus moves to the topmost window still visible.
    pub fn minimize(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.iter_mut().find(|w| w.id() == id) else {
            return false;
        };
        window.set_minimized(true);
        if self.grab == Some(id) {
            self.grab = None;
        }
        if self.active == Some(id) {
            self.active = self.topmost_visible();
        }
        self.dirty = true;
        true
    }

    pub fn restore(&mut self, id: WindowId) -> bool {
        let Some(window) = self.windows.iter_mut().find(|w| w.id() == id) else {
            return false;
        };
        window.set_minimized(false);
        if self.active.is_none() {
            self.active = Some(id);
        }
        self.dirty = true;
        true
    }

    // ── Event routing ───────────────────────────────────────────────────────

    fn apply(&mut self, id: WindowId, event: &Event, resp: Response, sink: &mut dyn EventSink) {
        match resp {
            Response::Close => {
                self.close(id, sink);
            }
            Response::Minimize => {
                self.minimize(id);
            }
            Response::ToggleMaximize => {
                self.toggle_maximize(id);
            }
            Response::Repaint => self.dirty = true,
            Response::Handled | Response::Ignored => {}
        }
        if event.is_left_down() && !resp.is_window_action() {
            self.bring_to_front(id);
        }
    }

    fn deliver(
        &mut self,
        id: WindowId,
        event: &Event,
        ctx: &mut EventContext<'_>,
    ) -> Option<Response> {
        let idx = self.index_of(id)?;
        let resp = self.windows[idx].handle_event(event, ctx);
        self.apply(id, event, resp, &mut *ctx.sink);
        Some(resp)
    }

    /// Route a pointer event to the grabbing window, or else to the window
    /// under the cursor. Returns whether a window took it.
    pub fn handle_pointer(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        let Some((x, y)) = event.position() else {
            return false;
        };
        let released = match event {
            Event::MouseClick { .. } => self.click_owner.take(),
            _ => {
                self.click_owner = None;
                None
            }
        };
        let target = self.grab.or(released).or_else(|| self.hit_test_point(x, y));

        if matches!(event, Event::MouseMove { .. }) && self.grab.is_none() && self.hover != target {
            // Let the window the cursor just left drop its hover state.
            if let Some(previous) = self.hover.take() {
                self.deliver(previous, event, ctx);
            }
            self.hover = target;
        }

        let Some(id) = target else {
            return false;
        };
        let delivered = self.deliver(id, event, ctx).is_some();

        match event {
            Event::MouseDown { .. } if self.index_of(id).is_some() => {
                let visible = self.get(id).is_some_and(|w| !w.is_minimized());
                if visible {
                    self.grab = Some(id);
                }
            }
            Event::MouseUp { .. } => self.click_owner = self.grab.take(),
            _ => {}
        }
        delivered
    }

    /// The cursor moved onto something that is not a window.
    pub fn pointer_left(&mut self, event: &Event, ctx: &mut EventContext<'_>) {
        self.click_owner = None;
        if let Some(previous) = self.hover.take() {
            self.deliver(previous, event, ctx);
        }
    }

    /// Keyboard events go to the focused window.
    pub fn handle_key(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        match self.active {
            Some(id) => self.deliver(id, event, ctx).is_some(),
            None => false,
        }
    }

    // ── Drawing ─────────────────────────────────────────────────────────────

    /// Paint every visible window, bottom of the stack first.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for window in self.windows.iter().rev().filter(|w| !w.is_minimized()) {
            window.draw(canvas, (0, 0));
        }
    }
}
