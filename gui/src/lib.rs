//! Windowing layer: widgets, window manager, taskbar and the desktop loop.
//!
//! Everything here runs on the host as well as on bare metal. Hardware is
//! reached only through the `Ps2Controller`, `Clock`, `Delay` and `Canvas`
//! traits, so the tests drive the whole desktop with scripted fakes.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod button;
pub mod config;
pub mod cursor;
pub mod demo;
pub mod desktop;
pub mod event_queue;
pub mod shortcuts;
pub mod taskbar;
pub mod theme;
pub mod widget;
pub mod window;
pub mod window_manager;

#[cfg(test)]
mod scenario_tests;

pub use button::Button;
pub use config::GuiConfig;
pub use demo::DemoWindow;
pub use desktop::GuiState;
pub use event_queue::{EventQueue, SharedEventQueue};
pub use shortcuts::ShortcutRegistry;
pub use taskbar::{Taskbar, TaskbarAction};
pub use widget::{Child, EventContext, Response, Screen, Widget};
pub use window::Window;
pub use window_manager::WindowManager;
