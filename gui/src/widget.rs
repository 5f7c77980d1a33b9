use alloc::boxed::Box;

use flux_abi::draw::Canvas;
use flux_abi::input::{Event, EventSink};
use flux_abi::rect::Rect;

use crate::button::Button;
use crate::theme::TASKBAR_HEIGHT;
use crate::window::Window;

/// Screen geometry every widget can consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: i32,
    pub height: i32,
}

impl Screen {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Everything above the taskbar; the area a maximized window fills.
    pub const fn desktop_area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height - TASKBAR_HEIGHT)
    }

    pub const fn taskbar_area(&self) -> Rect {
        Rect::new(0, self.height - TASKBAR_HEIGHT, self.width, TASKBAR_HEIGHT)
    }
}

/// What a widget asks its owner to do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The event was not for this widget.
    Ignored,
    /// Consumed without a visible change.
    Handled,
    Repaint,
    Close,
    Minimize,
    ToggleMaximize,
}

impl Response {
    /// Requests only a window manager can carry out.
    #[inline]
    pub fn is_window_action(self) -> bool {
        matches!(self, Self::Close | Self::Minimize | Self::ToggleMaximize)
    }

    #[inline]
    pub fn needs_repaint(self) -> bool {
        !matches!(self, Self::Ignored | Self::Handled)
    }
}

/// Per-dispatch context: screen geometry plus somewhere to post follow-up
/// events.
pub struct EventContext<'a> {
    pub screen: Screen,
    pub sink: &'a mut dyn EventSink,
}

impl<'a> EventContext<'a> {
    pub fn new(screen: Screen, sink: &'a mut dyn EventSink) -> Self {
        Self { screen, sink }
    }
}

/// The contract shared by every element of the desktop.
///
/// `bounds` is expressed in the parent's coordinate space and `draw`
/// receives the parent's origin in screen space. Events arrive already
/// translated into the parent's space.
pub trait Widget {
    fn bounds(&self) -> Rect;
    fn draw(&self, canvas: &mut dyn Canvas, origin: (i32, i32));
    fn handle_event(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> Response;
}

/// Content a window can own.
pub enum Child {
    Button(Button),
    Window(Box<Window>),
}

impl Widget for Child {
    fn bounds(&self) -> Rect {
        match self {
            Self::Button(button) => button.bounds(),
            Self::Window(window) => window.bounds(),
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: (i32, i32)) {
        match self {
            Self::Button(button) => button.draw(canvas, origin),
            Self::Window(window) => window.draw(canvas, origin),
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> Response {
        match self {
            Self::Button(button) => button.handle_event(event, ctx),
            Self::Window(window) => window.handle_event(event, ctx),
        }
    }
}

impl From<Button> for Child {
    fn from(button: Button) -> Self {
        Self::Button(button)
    }
}

impl From<Window> for Child {
    fn from(window: Window) -> Self {
        Self::Window(Box::new(window))
    }
}
