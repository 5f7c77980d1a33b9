//! Desktop event queue.
//!
//! A bounded FIFO between the input decoders (and widget callbacks) on the
//! producing side and the dispatcher on the consuming side. The loop drains
//! it completely every pass, so a full queue only happens when a burst of
//! more than `EVENT_QUEUE_SLOTS - 1` events arrives within one pass.

use flux_abi::input::{EVENT_QUEUE_SLOTS, Event, EventSink};
use flux_lib::{IrqMutex, OverflowPolicy, PushOutcome, RingBuffer, klog_warn};

/// Drops are logged on the first occurrence and then once per this many.
const DROP_LOG_INTERVAL: u64 = 64;

pub struct EventQueue {
    ring: RingBuffer<Event, EVENT_QUEUE_SLOTS>,
    policy: OverflowPolicy,
    dropped: u64,
}

impl EventQueue {
    pub const fn new(policy: OverflowPolicy) -> Self {
        Self {
            ring: RingBuffer::new_with(Event::Redraw),
            policy,
            dropped: 0,
        }
    }

    /// Queue `event` under the overflow policy. Returns `false` when an
    /// event was lost, whether it was this one or the oldest.
    pub fn push(&mut self, event: Event) -> bool {
        match self.ring.push(event, self.policy) {
            PushOutcome::Stored => true,
            PushOutcome::DroppedNewest | PushOutcome::DroppedOldest(_) => {
                self.dropped += 1;
                if self.dropped == 1 || self.dropped % DROP_LOG_INTERVAL == 0 {
                    klog_warn!(
                        "gui: event queue full ({:?}), {} dropped so far",
                        self.policy,
                        self.dropped
                    );
                }
                false
            }
        }
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Event> {
        self.ring.try_pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Usable slots: one less than the backing array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: OverflowPolicy) {
        self.policy = policy;
    }

    /// Events lost to overflow since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.ring.reset();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(OverflowPolicy::default())
    }
}

impl EventSink for EventQueue {
    fn post(&mut self, event: Event) {
        self.push(event);
    }
}

/// [`EventQueue`] behind an [`IrqMutex`], for producers outside the main
/// loop. The loop moves everything it holds into its own queue once per
/// pass.
pub struct SharedEventQueue {
    inner: IrqMutex<EventQueue>,
}

impl SharedEventQueue {
    pub const fn new(policy: OverflowPolicy) -> Self {
        Self {
            inner: IrqMutex::new(EventQueue::new(policy)),
        }
    }

    pub fn push(&self, event: Event) -> bool {
        self.inner.lock().push(event)
    }

    /// Move every queued event into `dst` in FIFO order. Returns how many
    /// were moved.
    pub fn drain_into(&self, dst: &mut EventQueue) -> usize {
        let mut src = self.inner.lock();
        let mut moved = 0;
        while let Some(event) = src.pop() {
            dst.push(event);
            moved += 1;
        }
        moved
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn dropped(&self) -> u64 {
        self.inner.lock().dropped()
    }
}
