//! Decoded input events.
//!
//! The PS/2 decoders produce these, the event queue carries them, and the
//! window manager consumes them. Pointer events carry absolute screen
//! coordinates; a window translates them into client-local coordinates
//! before forwarding to its child widget.

use bitflags::bitflags;

/// Capacity of the desktop event queue (one slot stays reserved).
pub const EVENT_QUEUE_SLOTS: usize = 64;

bitflags! {
    /// Button bitmask in PS/2 packet layout (byte 0, bits 0..=2).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MouseButtons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

bitflags! {
    /// Keyboard modifier state at the moment a key event was decoded.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const CAPS_LOCK = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Diff order used by the mouse decoder.
    pub const ALL: [Self; 3] = [Self::Left, Self::Right, Self::Middle];

    #[inline]
    pub const fn mask(self) -> MouseButtons {
        match self {
            Self::Left => MouseButtons::LEFT,
            Self::Right => MouseButtons::RIGHT,
            Self::Middle => MouseButtons::MIDDLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Make code with the release bit stripped.
    pub scancode: u8,
    /// US-layout translation, 0 when the key has none.
    pub ascii: u8,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    MouseMove { x: i32, y: i32 },
    MouseDown { x: i32, y: i32, button: MouseButton },
    MouseUp { x: i32, y: i32, button: MouseButton },
    /// Always queued straight after the matching `MouseUp`.
    MouseClick { x: i32, y: i32, button: MouseButton },
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    Redraw,
}

impl Event {
    #[inline]
    pub fn position(&self) -> Option<(i32, i32)> {
        match *self {
            Self::MouseMove { x, y }
            | Self::MouseDown { x, y, .. }
            | Self::MouseUp { x, y, .. }
            | Self::MouseClick { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    #[inline]
    pub fn button(&self) -> Option<MouseButton> {
        match *self {
            Self::MouseDown { button, .. }
            | Self::MouseUp { button, .. }
            | Self::MouseClick { button, .. } => Some(button),
            _ => None,
        }
    }

    #[inline]
    pub fn is_pointer_event(&self) -> bool {
        self.position().is_some()
    }

    #[inline]
    pub fn is_key_event(&self) -> bool {
        matches!(self, Self::KeyDown(_) | Self::KeyUp(_))
    }

    /// Press of the left button, the only press that drives window
    /// interaction.
    #[inline]
    pub fn is_left_down(&self) -> bool {
        matches!(
            self,
            Self::MouseDown {
                button: MouseButton::Left,
                ..
            }
        )
    }

    /// Same event with its position shifted by `(-dx, -dy)`, i.e. expressed
    /// relative to an origin at `(dx, dy)`. Non-pointer events are returned
    /// unchanged.
    pub fn relative_to(&self, dx: i32, dy: i32) -> Self {
        match *self {
            Self::MouseMove { x, y } => Self::MouseMove {
                x: x - dx,
                y: y - dy,
            },
            Self::MouseDown { x, y, button } => Self::MouseDown {
                x: x - dx,
                y: y - dy,
                button,
            },
            Self::MouseUp { x, y, button } => Self::MouseUp {
                x: x - dx,
                y: y - dy,
                button,
            },
            Self::MouseClick { x, y, button } => Self::MouseClick {
                x: x - dx,
                y: y - dy,
                button,
            },
            other => other,
        }
    }
}

/// Anything events can be posted into: the desktop queue, the interrupt-safe
/// shared queue, or a plain vector in tests.
pub trait EventSink {
    fn post(&mut self, event: Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_masks_match_packet_bits() {
        assert_eq!(MouseButton::Left.mask().bits(), 0x01);
        assert_eq!(MouseButton::Right.mask().bits(), 0x02);
        assert_eq!(MouseButton::Middle.mask().bits(), 0x04);
    }

    #[test]
    fn test_relative_to() {
        let ev = Event::MouseDown {
            x: 120,
            y: 108,
            button: MouseButton::Left,
        };
        assert_eq!(
            ev.relative_to(101, 124),
            Event::MouseDown {
                x: 19,
                y: -16,
                button: MouseButton::Left
            }
        );
        assert_eq!(Event::Redraw.relative_to(5, 5), Event::Redraw);
    }

    #[test]
    fn test_accessors() {
        let up = Event::MouseUp {
            x: 1,
            y: 2,
            button: MouseButton::Right,
        };
        assert_eq!(up.position(), Some((1, 2)));
        assert_eq!(up.button(), Some(MouseButton::Right));
        assert!(!up.is_left_down());
        let key = Event::KeyDown(KeyEvent {
            scancode: 0x1E,
            ascii: b'a',
            modifiers: Modifiers::empty(),
        });
        assert!(key.is_key_event());
        assert_eq!(key.position(), None);
    }
}
