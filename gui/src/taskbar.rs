//! Taskbar strip, start menu and clock.
//!
//! ```text
//!  ┌───────┐ ┌──────────────┐ ┌──────────────┐          ┌─────────┐
//!  │ Start │ │ Welcome to.. │ │ About Flux   │   ...    │  12:00  │
//!  └───────┘ └──────────────┘ └──────────────┘          └─────────┘
//! ```
//!
//! App buttons follow window creation order; one that would run into the
//! clock is left out.

use alloc::format;
use alloc::string::String;

use flux_abi::draw::{Canvas, Color32};
use flux_abi::rect::Rect;
use flux_abi::window::WindowId;
use flux_drivers::WallTime;
use flux_gfx::{FONT_CHAR_HEIGHT, FONT_CHAR_WIDTH, canvas_font, canvas_ops};

use crate::demo::DemoWindow;
use crate::theme::*;
use crate::widget::Screen;
use crate::window::Window;
use crate::window_manager::WindowManager;

pub const START_MENU_ITEMS: [DemoWindow; 2] = DemoWindow::ALL;

/// What a click on the strip or the menu asks the desktop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarAction {
    Nothing,
    Repaint,
    Launch(DemoWindow),
}

pub struct Taskbar {
    screen: Screen,
    menu_open: bool,
    clock: Option<WallTime>,
}

impl Taskbar {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            menu_open: false,
            clock: None,
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn close_menu(&mut self) -> bool {
        core::mem::take(&mut self.menu_open)
    }

    // ── Geometry ────────────────────────────────────────────────────────────

    pub fn area(&self) -> Rect {
        self.screen.taskbar_area()
    }

    fn button_y(&self) -> i32 {
        self.screen.height - TASKBAR_HEIGHT + TASKBAR_BUTTON_TOP
    }

    pub fn start_button_rect(&self) -> Rect {
        Rect::new(
            START_BUTTON_X,
            self.button_y(),
            START_BUTTON_WIDTH,
            TASKBAR_BUTTON_HEIGHT,
        )
    }

    pub fn clock_rect(&self) -> Rect {
        Rect::new(
            self.screen.width - CLOCK_TEXT_INSET - 5,
            self.screen.height - TASKBAR_HEIGHT + 6,
            CLOCK_BOX_WIDTH,
            CLOCK_BOX_HEIGHT,
        )
    }

    /// Button for the `index`-th window in creation order, if it fits.
    pub fn app_button_rect(&self, index: usize) -> Option<Rect> {
        let first = START_BUTTON_X + START_BUTTON_WIDTH + 5;
        let x = first + index as i32 * (APP_BUTTON_WIDTH + APP_BUTTON_GAP);
        let r = Rect::new(x, self.button_y(), APP_BUTTON_WIDTH, TASKBAR_BUTTON_HEIGHT);
        (r.right() <= self.clock_rect().x).then_some(r)
    }

    pub fn menu_rect(&self) -> Rect {
        let height =
            START_MENU_ITEMS.len() as i32 * START_MENU_ITEM_HEIGHT + 2 * START_MENU_PADDING;
        Rect::new(
            START_BUTTON_X,
            self.screen.height - TASKBAR_HEIGHT - height,
            START_MENU_WIDTH,
            height,
        )
    }

    fn menu_item_rect(&self, index: usize) -> Rect {
        let menu = self.menu_rect();
        Rect::new(
            menu.x,
            menu.y + START_MENU_PADDING + index as i32 * START_MENU_ITEM_HEIGHT,
            menu.width,
            START_MENU_ITEM_HEIGHT,
        )
    }

    // ── Clock ───────────────────────────────────────────────────────────────

    /// Store the latest reading. Returns `true` when the displayed `HH:MM`
    /// changed.
    pub fn update_clock(&mut self, now: Option<WallTime>) -> bool {
        let shown = |t: Option<WallTime>| t.map(|t| (t.hour, t.minute));
        let changed = shown(self.clock) != shown(now);
        self.clock = now;
        changed
    }

    pub fn clock_text(&self) -> String {
        match self.clock {
            Some(t) => format!("{:02}:{:02}", t.hour, t.minute),
            None => String::from("12:00"),
        }
    }

    // ── Input ───────────────────────────────────────────────────────────────

    /// Left click inside the strip.
    ///
    /// An app button restores a minimized or background window and
    /// minimizes the one already in front.
    pub fn click(&mut self, x: i32, y: i32, wm: &mut WindowManager) -> TaskbarAction {
        if self.start_button_rect().contains(x, y) {
            self.menu_open = !self.menu_open;
            return TaskbarAction::Repaint;
        }

        let hit = wm.iter_by_id().enumerate().find_map(|(i, w)| {
            self.app_button_rect(i)
                .filter(|r| r.contains(x, y))
                .map(|_| (w.id(), w.is_minimized()))
        });
        let Some((id, minimized)) = hit else {
            return TaskbarAction::Nothing;
        };

        self.menu_open = false;
        if minimized {
            wm.restore(id);
            wm.bring_to_front(id);
        } else if wm.active() == Some(id) {
            wm.minimize(id);
        } else {
            wm.bring_to_front(id);
        }
        TaskbarAction::Repaint
    }

    /// Left click while the menu is open. Any click closes the menu; one on
    /// an item also launches it.
    pub fn menu_click(&mut self, x: i32, y: i32) -> TaskbarAction {
        if !self.menu_open {
            return TaskbarAction::Nothing;
        }
        self.menu_open = false;
        START_MENU_ITEMS
            .iter()
            .enumerate()
            .find(|&(i, _)| self.menu_item_rect(i).contains(x, y))
            .map_or(TaskbarAction::Repaint, |(_, &item)| TaskbarAction::Launch(item))
    }

    // ── Drawing ─────────────────────────────────────────────────────────────

    fn draw_button(canvas: &mut dyn Canvas, r: Rect, label: &str, bg: Color32) {
        canvas_ops::fill_rect(canvas, r.x, r.y, r.width, r.height, bg);
        canvas_ops::rect(canvas, r.x, r.y, r.width, r.height, COLOR_DARK_GRAY);
        canvas_ops::line(canvas, r.x + 1, r.y, r.right() - 2, r.y, COLOR_WHITE);

        let max_chars = ((r.width - 16) / FONT_CHAR_WIDTH).max(0) as usize;
        let end = label.char_indices().nth(max_chars).map_or(label.len(), |(i, _)| i);
        let text_y = r.y + (r.height - FONT_CHAR_HEIGHT) / 2;
        canvas_font::draw_string(canvas, r.x + 8, text_y, &label[..end], COLOR_BLACK, bg);
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, wm: &WindowManager) {
        let strip = self.area();
        canvas_ops::fill_rect(canvas, strip.x, strip.y, strip.width, strip.height, COLOR_TASKBAR);
        canvas_ops::line(canvas, 0, strip.y, strip.width - 1, strip.y, COLOR_LIGHT_GRAY);

        let start_bg = if self.menu_open {
            COLOR_BUTTON
        } else {
            COLOR_LIGHT_GRAY
        };
        Self::draw_button(canvas, self.start_button_rect(), "Start", start_bg);

        for (i, window) in wm.iter_by_id().enumerate() {
            let Some(r) = self.app_button_rect(i) else {
                break;
            };
            Self::draw_button(canvas, r, window.title(), app_button_color(window, wm.active()));
        }

        let clock = self.clock_rect();
        canvas_ops::fill_rect(
            canvas,
            clock.x,
            clock.y,
            clock.width,
            clock.height,
            COLOR_LIGHT_GRAY,
        );
        canvas_ops::rect(canvas, clock.x, clock.y, clock.width, clock.height, COLOR_DARK_GRAY);
        canvas_font::draw_string(
            canvas,
            self.screen.width - CLOCK_TEXT_INSET,
            clock.y + 2,
            &self.clock_text(),
            COLOR_BLACK,
            COLOR_LIGHT_GRAY,
        );
    }

    pub fn draw_menu(&self, canvas: &mut dyn Canvas) {
        if !self.menu_open {
            return;
        }
        let menu = self.menu_rect();
        canvas_ops::fill_rect(canvas, menu.x, menu.y, menu.width, menu.height, COLOR_WINDOW_BG);
        canvas_ops::rect(canvas, menu.x, menu.y, menu.width, menu.height, COLOR_BORDER);
        for (i, item) in START_MENU_ITEMS.iter().enumerate() {
            let r = self.menu_item_rect(i);
            let text_y = r.y + (r.height - FONT_CHAR_HEIGHT) / 2;
            canvas_font::draw_string(
                canvas,
                r.x + 12,
                text_y,
                item.label(),
                COLOR_BLACK,
                COLOR_WINDOW_BG,
            );
        }
    }
}

fn app_button_color(window: &Window, active: Option<WindowId>) -> Color32 {
    if window.is_minimized() {
        COLOR_BUTTON
    } else if active == Some(window.id()) {
        COLOR_WHITE
    } else {
        COLOR_LIGHT_GRAY
    }
}
