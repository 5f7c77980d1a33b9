//! CMOS real-time clock, read for the taskbar clock.

use flux_lib::ports::{CMOS_ADDRESS, CMOS_DATA};

const REG_SECONDS: u8 = 0x00;
const REG_MINUTES: u8 = 0x02;
const REG_HOURS: u8 = 0x04;
const REG_STATUS_A: u8 = 0x0A;
const REG_STATUS_B: u8 = 0x0B;

const STATUS_A_UPDATE_IN_PROGRESS: u8 = 0x80;
const STATUS_B_24_HOUR: u8 = 0x02;
const STATUS_B_BINARY: u8 = 0x04;
const HOUR_PM: u8 = 0x80;
/// Keeps NMIs masked while selecting a register.
const NMI_DISABLE: u8 = 0x80;

const UPDATE_WAIT_ITERATIONS: u32 = 10_000;
const CONSISTENT_READ_ATTEMPTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Source of the time of day.
pub trait Clock {
    /// `None` when the clock cannot be read right now.
    fn now(&mut self) -> Option<WallTime>;
}

/// Indexed register access to the CMOS chip.
pub trait CmosRegisters {
    fn read_register(&mut self, reg: u8) -> u8;
}

pub struct CmosPorts {
    _private: (),
}

impl CmosPorts {
    /// # Safety
    /// Only one user of ports 0x70/0x71 may exist.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl CmosRegisters for CmosPorts {
    fn read_register(&mut self, reg: u8) -> u8 {
        // SAFETY: exclusive access guaranteed at construction.
        unsafe {
            CMOS_ADDRESS.write(NMI_DISABLE | reg);
            CMOS_DATA.read()
        }
    }
}

#[inline]
pub fn bcd_to_binary(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Normalise a raw hours register to 0..=23.
pub fn decode_hour(raw: u8, status_b: u8) -> u8 {
    let pm = raw & HOUR_PM != 0;
    let mut hour = raw & !HOUR_PM;
    if status_b & STATUS_B_BINARY == 0 {
        hour = bcd_to_binary(hour);
    }
    if status_b & STATUS_B_24_HOUR == 0 {
        hour %= 12;
        if pm {
            hour += 12;
        }
    }
    hour
}

pub struct CmosClock<R: CmosRegisters> {
    regs: R,
}

impl<R: CmosRegisters> CmosClock<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    fn wait_update_done(&mut self) -> bool {
        for _ in 0..UPDATE_WAIT_ITERATIONS {
            if self.regs.read_register(REG_STATUS_A) & STATUS_A_UPDATE_IN_PROGRESS == 0 {
                return true;
            }
            core::hint::spin_loop();
        }
        false
    }

    fn read_raw(&mut self) -> Option<[u8; 3]> {
        if !self.wait_update_done() {
            return None;
        }
        Some([
            self.regs.read_register(REG_SECONDS),
            self.regs.read_register(REG_MINUTES),
            self.regs.read_register(REG_HOURS),
        ])
    }
}

impl<R: CmosRegisters> Clock for CmosClock<R> {
    /// Reads until two consecutive samples agree so an update that lands
    /// mid-read cannot produce a torn time.
    fn now(&mut self) -> Option<WallTime> {
        let mut last = self.read_raw()?;
        for _ in 0..CONSISTENT_READ_ATTEMPTS {
            let next = self.read_raw()?;
            if next == last {
                let status_b = self.regs.read_register(REG_STATUS_B);
                let [sec, min, hour] = next;
                let binary = status_b & STATUS_B_BINARY != 0;
                let conv = |v: u8| if binary { v } else { bcd_to_binary(v) };
                return Some(WallTime {
                    hour: decode_hour(hour, status_b),
                    minute: conv(min),
                    second: conv(sec),
                });
            }
            last = next;
        }
        None
    }
}
