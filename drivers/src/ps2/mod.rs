//! PS/2 Controller Driver
//!
//! Polled access to the 8042-style controller behind ports 0x60 (data) and
//! 0x64 (status/command). The desktop never takes PS/2 interrupts: the main
//! loop calls [`poll_byte`] each iteration and hands the byte to the mouse
//! or keyboard decoder depending on which device produced it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ KeyboardDec. │◀────│  poll_byte()      │────▶│ MouseDecoder │
//! └──────────────┘     │  (this module)    │     └──────────────┘
//!                      └─────────┬─────────┘
//!                                ▼
//!                      ┌───────────────────┐
//!                      │  Ps2Controller    │  PortController on hardware,
//!                      │  0x60 / 0x64      │  a scripted fake in tests
//!                      └───────────────────┘
//! ```
//!
//! # Status Register (Port 0x64 read)
//!
//! | Bit | Name | Description |
//! |-----|------|-------------|
//! | 0   | OBF  | Output buffer full (data available to read) |
//! | 1   | IBF  | Input buffer full (controller busy) |
//! | 5   | MOBF | Byte in the output buffer came from the mouse |
//!
//! Every wait in here is a fixed-iteration spin; nothing blocks forever.

pub mod keyboard;
pub mod mouse;

use core::fmt;

use flux_lib::ports::{PS2_COMMAND, PS2_DATA, PS2_STATUS};
use flux_lib::{klog_debug, klog_info};

// =============================================================================
// Status Register Bits
// =============================================================================

pub const STATUS_OUTPUT_FULL: u8 = 0x01;
pub const STATUS_INPUT_FULL: u8 = 0x02;
pub const STATUS_MOUSE_DATA: u8 = 0x20;

// =============================================================================
// Controller Commands (written to port 0x64)
// =============================================================================

pub const CMD_READ_CONFIG: u8 = 0x20;
pub const CMD_WRITE_CONFIG: u8 = 0x60;
pub const CMD_DISABLE_AUX: u8 = 0xA7;
pub const CMD_ENABLE_AUX: u8 = 0xA8;
pub const CMD_DISABLE_FIRST: u8 = 0xAD;
pub const CMD_ENABLE_FIRST: u8 = 0xAE;
/// Route the next data byte to the mouse.
pub const CMD_WRITE_AUX: u8 = 0xD4;

// =============================================================================
// Configuration Byte Bits
// =============================================================================

pub const CONFIG_FIRST_IRQ: u8 = 0x01;
pub const CONFIG_AUX_IRQ: u8 = 0x02;
pub const CONFIG_AUX_CLOCK_DISABLE: u8 = 0x20;
/// Set 2 → set 1 translation; the keyboard decoder expects set 1.
pub const CONFIG_TRANSLATION: u8 = 0x40;

// =============================================================================
// Device Commands (written to port 0x60)
// =============================================================================

pub const DEV_CMD_SET_RESOLUTION: u8 = 0xE8;
pub const DEV_CMD_SET_SAMPLE_RATE: u8 = 0xF3;
pub const DEV_CMD_ENABLE: u8 = 0xF4;
pub const DEV_CMD_DEFAULTS: u8 = 0xF6;
pub const DEV_ACK: u8 = 0xFA;

/// Spin budget for every controller wait.
pub const WAIT_ITERATIONS: u32 = 100_000;

/// Upper bound on stale bytes discarded by [`flush`].
const FLUSH_LIMIT: usize = 32;

const MOUSE_SAMPLE_RATE: u8 = 100;
/// 8 counts per millimetre.
const MOUSE_RESOLUTION: u8 = 3;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ps2Error {
    /// A bounded wait ran out before the controller responded.
    Timeout,
    /// The device answered something other than ACK.
    Nak(u8),
    /// The controller reports no second port.
    NoDevice,
}

impl fmt::Display for Ps2Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "controller did not respond in time"),
            Self::Nak(byte) => write!(f, "device replied {:#04x} instead of ACK", byte),
            Self::NoDevice => write!(f, "no auxiliary port present"),
        }
    }
}

pub type Ps2Result<T = ()> = Result<T, Ps2Error>;

// =============================================================================
// Device access
// =============================================================================

/// Raw byte access to the controller. Implementations do no waiting; the
/// free functions in this module layer the bounded waits on top.
pub trait Ps2Controller {
    fn read_status(&mut self) -> u8;
    fn read_data(&mut self) -> u8;
    fn write_command(&mut self, cmd: u8);
    fn write_data(&mut self, data: u8);
}

/// The real controller at ports 0x60/0x64.
pub struct PortController {
    _private: (),
}

impl PortController {
    /// # Safety
    /// Only one `PortController` may exist, and the caller must be running on
    /// hardware with a legacy PS/2 controller (or its emulation).
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Ps2Controller for PortController {
    #[inline]
    fn read_status(&mut self) -> u8 {
        // SAFETY: construction guarantees exclusive access to the controller.
        unsafe { PS2_STATUS.read() }
    }

    #[inline]
    fn read_data(&mut self) -> u8 {
        // SAFETY: as above.
        unsafe { PS2_DATA.read() }
    }

    #[inline]
    fn write_command(&mut self, cmd: u8) {
        // SAFETY: as above.
        unsafe { PS2_COMMAND.write(cmd) }
    }

    #[inline]
    fn write_data(&mut self, data: u8) {
        // SAFETY: as above.
        unsafe { PS2_DATA.write(data) }
    }
}

/// Which device a polled byte came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ps2Byte {
    Keyboard(u8),
    Mouse(u8),
}

// =============================================================================
// Bounded waits
// =============================================================================

fn wait_for<C: Ps2Controller + ?Sized>(ctrl: &mut C, ready: impl Fn(u8) -> bool) -> Ps2Result<u8> {
    for _ in 0..WAIT_ITERATIONS {
        let status = ctrl.read_status();
        if ready(status) {
            return Ok(status);
        }
        core::hint::spin_loop();
    }
    Err(Ps2Error::Timeout)
}

/// Wait until the controller can take another byte.
pub fn wait_ready<C: Ps2Controller + ?Sized>(ctrl: &mut C) -> Ps2Result {
    wait_for(ctrl, |s| s & STATUS_INPUT_FULL == 0).map(|_| ())
}

/// Wait until a byte is available; returns the status it was seen with.
pub fn wait_data<C: Ps2Controller + ?Sized>(ctrl: &mut C) -> Ps2Result<u8> {
    wait_for(ctrl, |s| s & STATUS_OUTPUT_FULL != 0)
}

pub fn send_command<C: Ps2Controller + ?Sized>(ctrl: &mut C, cmd: u8) -> Ps2Result {
    wait_ready(ctrl)?;
    ctrl.write_command(cmd);
    Ok(())
}

pub fn send_data<C: Ps2Controller + ?Sized>(ctrl: &mut C, data: u8) -> Ps2Result {
    wait_ready(ctrl)?;
    ctrl.write_data(data);
    Ok(())
}

pub fn read_response<C: Ps2Controller + ?Sized>(ctrl: &mut C) -> Ps2Result<u8> {
    wait_data(ctrl)?;
    Ok(ctrl.read_data())
}

/// Non-blocking poll: one byte if the controller has one.
pub fn poll_byte<C: Ps2Controller + ?Sized>(ctrl: &mut C) -> Option<Ps2Byte> {
    let status = ctrl.read_status();
    if status & STATUS_OUTPUT_FULL == 0 {
        return None;
    }
    let data = ctrl.read_data();
    Some(if status & STATUS_MOUSE_DATA != 0 {
        Ps2Byte::Mouse(data)
    } else {
        Ps2Byte::Keyboard(data)
    })
}

/// Drop whatever is sitting in the output buffer.
pub fn flush<C: Ps2Controller + ?Sized>(ctrl: &mut C) -> usize {
    let mut dropped = 0;
    while dropped < FLUSH_LIMIT && ctrl.read_status() & STATUS_OUTPUT_FULL != 0 {
        let _ = ctrl.read_data();
        dropped += 1;
    }
    dropped
}

// =============================================================================
// Configuration
// =============================================================================

pub fn read_config<C: Ps2Controller + ?Sized>(ctrl: &mut C) -> Ps2Result<u8> {
    send_command(ctrl, CMD_READ_CONFIG)?;
    read_response(ctrl)
}

pub fn write_config<C: Ps2Controller + ?Sized>(ctrl: &mut C, config: u8) -> Ps2Result {
    send_command(ctrl, CMD_WRITE_CONFIG)?;
    send_data(ctrl, config)
}

/// Bring the controller into polled mode.
///
/// Both ports are disabled while the configuration byte is rewritten with
/// IRQs off and translation on, then re-enabled. Device bytes stay in the
/// output buffer until [`poll_byte`] collects them.
pub fn init_controller<C: Ps2Controller + ?Sized>(ctrl: &mut C) -> Ps2Result {
    send_command(ctrl, CMD_DISABLE_FIRST)?;
    send_command(ctrl, CMD_DISABLE_AUX)?;
    flush(ctrl);

    let config = read_config(ctrl)?;
    let config = (config & !(CONFIG_FIRST_IRQ | CONFIG_AUX_IRQ | CONFIG_AUX_CLOCK_DISABLE))
        | CONFIG_TRANSLATION;
    write_config(ctrl, config)?;
    klog_debug!("ps2: config byte {:#04x}", config);

    send_command(ctrl, CMD_ENABLE_FIRST)?;
    send_command(ctrl, CMD_ENABLE_AUX)?;
    flush(ctrl);
    Ok(())
}

/// Send one command byte to the mouse and wait for its ACK.
///
/// Keyboard bytes that arrive while waiting are discarded rather than taken
/// for the mouse's reply.
pub fn write_aux_acked<C: Ps2Controller + ?Sized>(ctrl: &mut C, cmd: u8) -> Ps2Result {
    send_command(ctrl, CMD_WRITE_AUX)?;
    send_data(ctrl, cmd)?;
    for _ in 0..WAIT_ITERATIONS {
        let status = wait_data(ctrl)?;
        let byte = ctrl.read_data();
        if status & STATUS_MOUSE_DATA == 0 {
            continue;
        }
        return if byte == DEV_ACK {
            Ok(())
        } else {
            Err(Ps2Error::Nak(byte))
        };
    }
    Err(Ps2Error::Timeout)
}

/// Enable the auxiliary port and put the mouse into streaming mode.
pub fn enable_mouse<C: Ps2Controller + ?Sized>(ctrl: &mut C) -> Ps2Result {
    send_command(ctrl, CMD_ENABLE_AUX)?;
    if read_config(ctrl)? & CONFIG_AUX_CLOCK_DISABLE != 0 {
        return Err(Ps2Error::NoDevice);
    }
    write_aux_acked(ctrl, DEV_CMD_DEFAULTS)?;
    write_aux_acked(ctrl, DEV_CMD_SET_SAMPLE_RATE)?;
    write_aux_acked(ctrl, MOUSE_SAMPLE_RATE)?;
    write_aux_acked(ctrl, DEV_CMD_SET_RESOLUTION)?;
    write_aux_acked(ctrl, MOUSE_RESOLUTION)?;
    write_aux_acked(ctrl, DEV_CMD_ENABLE)?;
    flush(ctrl);
    klog_info!("ps2: mouse streaming at {} Hz", MOUSE_SAMPLE_RATE);
    Ok(())
}
