use crate::io::Port;

pub const COM1_BASE: u16 = 0x3F8;

pub const PS2_DATA: Port<u8> = Port::new(0x60);
pub const PS2_STATUS: Port<u8> = Port::new(0x64);
pub const PS2_COMMAND: Port<u8> = Port::new(0x64);

pub const CMOS_ADDRESS: Port<u8> = Port::new(0x70);
pub const CMOS_DATA: Port<u8> = Port::new(0x71);

pub const IO_DELAY: Port<u8> = Port::new(0x80);
