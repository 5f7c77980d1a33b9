//! Windows the desktop opens at startup and from the start menu.

use flux_abi::rect::Rect;
use flux_abi::window::{WindowFlags, WindowId};
use flux_lib::klog_warn;

use crate::button::Button;
use crate::widget::{Response, Screen};
use crate::window_manager::WindowManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoWindow {
    Welcome,
    About,
}

impl DemoWindow {
    pub const ALL: [Self; 2] = [Self::Welcome, Self::About];

    /// Start menu entry.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::About => "About",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome to Flux",
            Self::About => "About Flux",
        }
    }

    fn geometry(self, screen: Screen) -> Rect {
        let (cx, cy) = (screen.width / 2, screen.height / 2);
        match self {
            Self::Welcome => Rect::new(cx - 200, cy - 150, 400, 300),
            Self::About => Rect::new(cx - 150, cy - 100, 300, 200),
        }
    }

    /// Raise the window if one with this title is open, otherwise create it.
    pub fn open(self, wm: &mut WindowManager) -> Option<WindowId> {
        if let Some(id) = wm.find_by_title(self.title()) {
            wm.restore(id);
            wm.bring_to_front(id);
            return Some(id);
        }

        let Some(id) = wm.create(self.geometry(wm.screen()), self.title()) else {
            klog_warn!("gui: could not open '{}'", self.title());
            return None;
        };
        let window = wm.get_mut(id)?;
        match self {
            Self::Welcome => {
                window.set_flags(WindowFlags::HAS_CLOSE | WindowFlags::HAS_MINIMIZE);
                let ok = Button::new(150, 220, 96, 28, "OK").with_on_click(|_| Response::Close);
                window.set_child(ok);
            }
            Self::About => {
                window.set_flags(WindowFlags::default() | WindowFlags::RESIZABLE);
                window.set_min_size(200, 120);
            }
        }
        wm.mark_dirty();
        Some(id)
    }
}
