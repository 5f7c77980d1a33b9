//! PS/2 mouse packet decoder.
//!
//! Standard 3-byte packets:
//!
//! | Byte | Bits |
//! |------|------|
//! | 0    | 0-2 left/right/middle, 3 always set, 4-5 X/Y sign, 6-7 X/Y overflow |
//! | 1    | X movement (low 8 bits) |
//! | 2    | Y movement (low 8 bits, up is positive) |

use flux_abi::input::{Event, EventSink, MouseButton, MouseButtons};

pub const PACKET_SYNC: u8 = 0x08;
pub const PACKET_X_SIGN: u8 = 0x10;
pub const PACKET_Y_SIGN: u8 = 0x20;
pub const PACKET_X_OVERFLOW: u8 = 0x40;
pub const PACKET_Y_OVERFLOW: u8 = 0x80;
const PACKET_BUTTONS: u8 = 0x07;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub buttons: MouseButtons,
    pub last_dx: i32,
    pub last_dy: i32,
}

pub struct MouseDecoder {
    state: MouseState,
    packet: [u8; 3],
    packet_byte: usize,
    max_x: i32,
    max_y: i32,
}

impl MouseDecoder {
    /// Decoder for a `width` x `height` screen, cursor centred.
    pub fn new(width: u32, height: u32) -> Self {
        let max_x = (width as i32).max(1);
        let max_y = (height as i32).max(1);
        Self {
            state: MouseState {
                x: max_x / 2,
                y: max_y / 2,
                buttons: MouseButtons::empty(),
                last_dx: 0,
                last_dy: 0,
            },
            packet: [0; 3],
            packet_byte: 0,
            max_x,
            max_y,
        }
    }

    pub fn set_bounds(&mut self, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        self.max_x = width;
        self.max_y = height;
        self.state.x = self.state.x.clamp(0, width - 1);
        self.state.y = self.state.y.clamp(0, height - 1);
    }

    #[inline]
    pub fn state(&self) -> &MouseState {
        &self.state
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.state.x, self.state.y)
    }

    /// Feed one byte from the aux port.
    ///
    /// Returns `true` when the byte completed a packet, in which case one
    /// `MouseMove` followed by any button transitions has been posted to
    /// `sink`. A byte that should start a packet but lacks the sync bit is
    /// dropped, which is how the decoder recovers from a lost byte.
    pub fn feed<S: EventSink + ?Sized>(&mut self, byte: u8, sink: &mut S) -> bool {
        if self.packet_byte == 0 && byte & PACKET_SYNC == 0 {
            return false;
        }

        self.packet[self.packet_byte] = byte;
        self.packet_byte += 1;
        if self.packet_byte < self.packet.len() {
            return false;
        }
        self.packet_byte = 0;

        let flags = self.packet[0];
        let dx = axis_delta(
            self.packet[1],
            flags & PACKET_X_SIGN != 0,
            flags & PACKET_X_OVERFLOW != 0,
        );
        let dy = -axis_delta(
            self.packet[2],
            flags & PACKET_Y_SIGN != 0,
            flags & PACKET_Y_OVERFLOW != 0,
        );

        let old_buttons = self.state.buttons;
        let new_buttons = MouseButtons::from_bits_truncate(flags & PACKET_BUTTONS);

        self.state.last_dx = dx;
        self.state.last_dy = dy;
        self.state.x = (self.state.x + dx).clamp(0, self.max_x - 1);
        self.state.y = (self.state.y + dy).clamp(0, self.max_y - 1);
        self.state.buttons = new_buttons;

        let (x, y) = (self.state.x, self.state.y);
        sink.post(Event::MouseMove { x, y });

        let changed = old_buttons ^ new_buttons;
        for button in MouseButton::ALL {
            if !changed.contains(button.mask()) {
                continue;
            }
            if new_buttons.contains(button.mask()) {
                sink.post(Event::MouseDown { x, y, button });
            } else {
                sink.post(Event::MouseUp { x, y, button });
                sink.post(Event::MouseClick { x, y, button });
            }
        }
        true
    }
}

/// 9-bit two's complement delta; an overflowed axis contributes nothing.
#[inline]
fn axis_delta(low: u8, negative: bool, overflow: bool) -> i32 {
    if overflow {
        return 0;
    }
    let raw = low as i32;
    if negative { raw - 256 } else { raw }
}
