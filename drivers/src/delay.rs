//! Loop throttling.

/// Pause between two iterations of a polling loop.
pub trait Delay {
    fn delay(&mut self);
}

/// Fixed busy-wait. Calibration-free and only roughly proportional to CPU
/// speed, which is acceptable for pacing a polled desktop.
#[derive(Debug, Clone, Copy)]
pub struct SpinDelay {
    pub iterations: u32,
}

impl SpinDelay {
    pub const DEFAULT_ITERATIONS: u32 = 10_000;

    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }
}

impl Default for SpinDelay {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ITERATIONS)
    }
}

impl Delay for SpinDelay {
    #[inline]
    fn delay(&mut self) {
        for _ in 0..self.iterations {
            core::hint::spin_loop();
        }
    }
}
