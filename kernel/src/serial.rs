//! COM1 backend for `klog`.

use core::fmt::{self, Write};

use flux_lib::klog::{self, KlogLevel};
use spin::Mutex;
use uart_16550::SerialPort;

const COM1: u16 = 0x3F8;

static PORT: Mutex<Option<SerialPort>> = Mutex::new(None);

pub fn init() {
    // SAFETY: COM1 is only touched through `PORT`.
    let mut port = unsafe { SerialPort::new(COM1) };
    port.init();
    *PORT.lock() = Some(port);
    klog::klog_register_backend(write_line);
}

fn write_line(level: KlogLevel, args: fmt::Arguments<'_>) {
    // Never block: the panic path logs too.
    let Some(mut guard) = PORT.try_lock() else {
        return;
    };
    if let Some(port) = guard.as_mut() {
        let _ = write!(port, "[{}] ", level.tag());
        let _ = port.write_fmt(args);
        let _ = port.write_str("\r\n");
    }
}
