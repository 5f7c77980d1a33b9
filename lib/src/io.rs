//! Typed x86 I/O ports.

use core::marker::PhantomData;

use x86_64::instructions::port::{PortRead, PortWrite};

/// An I/O port carrying values of width `T`.
///
/// Constructing one is free and safe; every access is `unsafe` because the
/// caller vouches that touching the port has no side effect beyond what the
/// device documents.
#[derive(Debug)]
pub struct Port<T> {
    port: u16,
    _width: PhantomData<T>,
}

impl<T> Clone for Port<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Port<T> {}

impl<T> Port<T> {
    #[inline]
    pub const fn new(port: u16) -> Self {
        Self {
            port,
            _width: PhantomData,
        }
    }

    #[inline]
    pub const fn number(&self) -> u16 {
        self.port
    }

    /// Port at `self + offset`, for register banks such as the UART.
    #[inline]
    pub const fn offset(&self, offset: u16) -> Self {
        Self::new(self.port + offset)
    }
}

impl<T: PortRead> Port<T> {
    /// # Safety
    /// The port must belong to a device whose read side effects are acceptable here.
    #[inline]
    pub unsafe fn read(&self) -> T {
        unsafe { T::read_from_port(self.port) }
    }
}

impl<T: PortWrite> Port<T> {
    /// # Safety
    /// The port must belong to a device that expects this write.
    #[inline]
    pub unsafe fn write(&self, value: T) {
        unsafe { T::write_to_port(self.port, value) }
    }
}

/// Roughly one microsecond of bus delay, for devices that need settling
/// time between commands.
#[inline]
pub fn io_wait() {
    // SAFETY: port 0x80 is the POST diagnostic port; writes are ignored.
    unsafe { crate::ports::IO_DELAY.write(0u8) }
}
