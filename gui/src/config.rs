use flux_drivers::SpinDelay;
use flux_lib::OverflowPolicy;

/// Knobs for the desktop loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuiConfig {
    /// What the event queue does when a producer finds it full.
    pub overflow_policy: OverflowPolicy,
    /// Busy-wait iterations between two loop passes.
    pub delay_iterations: u32,
    /// Upper bound on controller bytes consumed per pass.
    pub max_poll_bytes: usize,
    /// Open the welcome and about windows at startup.
    pub demo_windows: bool,
}

impl GuiConfig {
    pub const DEFAULT_MAX_POLL_BYTES: usize = 64;

    pub fn loop_delay(&self) -> SpinDelay {
        SpinDelay::new(self.delay_iterations)
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            overflow_policy: OverflowPolicy::DropNewest,
            delay_iterations: SpinDelay::DEFAULT_ITERATIONS,
            max_poll_bytes: Self::DEFAULT_MAX_POLL_BYTES,
            demo_windows: true,
        }
    }
}
