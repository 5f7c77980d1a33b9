#![no_std]

#[cfg(test)]
extern crate std;

pub mod io;
pub mod irq_mutex;
pub mod klog;
pub mod ports;
pub mod ring_buffer;

pub use irq_mutex::{IrqMutex, IrqMutexGuard};
pub use ring_buffer::{OverflowPolicy, PushOutcome, RingBuffer};
