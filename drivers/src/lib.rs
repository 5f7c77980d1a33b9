#![no_std]

#[cfg(any(test, feature = "test-support"))]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod delay;
pub mod ps2;
pub mod rtc;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use delay::{Delay, SpinDelay};
pub use ps2::keyboard;
pub use ps2::mouse;
pub use rtc::{Clock, WallTime};
