use core::fmt;

use bitflags::bitflags;

use crate::rect::Rect;

pub const WINDOW_TITLE_MAX: usize = 64;

/// Process-unique window handle. Ids start at 1 and are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Capabilities a window was created with.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WindowFlags: u32 {
        const RESIZABLE = 1 << 0;
        const HAS_CLOSE = 1 << 1;
        const HAS_MINIMIZE = 1 << 2;
        const HAS_MAXIMIZE = 1 << 3;
    }
}

impl Default for WindowFlags {
    /// Close, minimize and maximize glyphs; not resizable.
    fn default() -> Self {
        Self::HAS_CLOSE | Self::HAS_MINIMIZE | Self::HAS_MAXIMIZE
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VisibilityMode {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// Which part of a window a point falls on, for resizing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BorderRegion {
    Client,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl BorderRegion {
    /// Combine the vertical and horizontal edge hits into one region.
    pub fn from_edges(top: bool, bottom: bool, left: bool, right: bool) -> Self {
        match (top, bottom, left, right) {
            (true, _, true, _) => Self::TopLeft,
            (true, _, _, true) => Self::TopRight,
            (_, true, true, _) => Self::BottomLeft,
            (_, true, _, true) => Self::BottomRight,
            (true, _, _, _) => Self::Top,
            (_, true, _, _) => Self::Bottom,
            (_, _, true, _) => Self::Left,
            (_, _, _, true) => Self::Right,
            _ => Self::Client,
        }
    }

    #[inline]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    #[inline]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    #[inline]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    #[inline]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }
}

/// Pointer interaction a window is in the middle of.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Cursor offset from the window origin at grab time.
    Dragging { offset_x: i32, offset_y: i32 },
    /// Cursor position and geometry when the resize started.
    Resizing {
        region: BorderRegion,
        anchor_x: i32,
        anchor_y: i32,
        start: Rect,
    },
}

impl InteractionMode {
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let flags = WindowFlags::default();
        assert!(flags.contains(WindowFlags::HAS_CLOSE | WindowFlags::HAS_MINIMIZE));
        assert!(flags.contains(WindowFlags::HAS_MAXIMIZE));
        assert!(!flags.contains(WindowFlags::RESIZABLE));
    }

    #[test]
    fn test_every_flag_has_a_glyph_or_resize_meaning() {
        let all = WindowFlags::RESIZABLE | WindowFlags::default();
        assert_eq!(WindowFlags::all(), all);
    }

    #[test]
    fn test_region_from_edges() {
        assert_eq!(
            BorderRegion::from_edges(false, false, false, false),
            BorderRegion::Client
        );
        assert_eq!(
            BorderRegion::from_edges(true, false, true, false),
            BorderRegion::TopLeft
        );
        assert_eq!(
            BorderRegion::from_edges(false, true, false, true),
            BorderRegion::BottomRight
        );
        assert_eq!(
            BorderRegion::from_edges(false, false, false, true),
            BorderRegion::Right
        );
    }

    #[test]
    fn test_region_edges() {
        assert!(BorderRegion::TopRight.moves_top());
        assert!(BorderRegion::TopRight.moves_right());
        assert!(!BorderRegion::TopRight.moves_left());
        assert!(!BorderRegion::Client.moves_bottom());
    }
}
